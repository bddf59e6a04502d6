//! Session Phase Machine
//!
//! This module provides the authoritative source of truth for a participant's
//! progress through the experiment. It enforces valid phase transitions and
//! makes it impossible to skip phases programmatically.
//!
//! # Design Principles
//!
//! - **Single Source of Truth**: the `Session` owns the current phase
//! - **Validated Transitions**: only forward transitions to the next phase are allowed
//! - **No Global State**: everything lives in one owned `Session` value
//! - **Fail Fast**: invalid transitions return errors immediately
//!
//! # Phase Flow
//!
//! ```text
//! Consent
//!     ↓
//! Scenario
//!     ↓
//! Chat
//!     ↓
//! Survey
//!     ↓
//! Done
//! ```

// Library API - some accessors are exported for external use but not yet consumed by the binary
#![allow(dead_code)]

use crate::condition::{Condition, Experience};
use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Instant;
use thiserror::Error;

/// Default offer shown on the scenario screen, in whole euros
pub const DEFAULT_OFFER_EUR: u32 = 450;
/// Lowest offer the participant can enter
pub const MIN_OFFER_EUR: u32 = 100;
/// Highest offer the participant can enter
pub const MAX_OFFER_EUR: u32 = 2000;
/// Offer adjustment step on the scenario screen
pub const OFFER_STEP_EUR: u32 = 10;

/// Marker fragments an accepting client message contains.
///
/// Negotiation conclusion is decided by string-matching over the transcript,
/// never by hidden side-channel state.
pub const ACCEPTANCE_MARKERS: &[&str] = &["take your offer", "I agree"];

/// Experiment phases in sequential order.
///
/// Phases are ordered and can only progress forward. They are advanced solely
/// by key presses and, within Chat, by the scripted counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Phase {
    /// Study info and consent line
    Consent = 0,

    /// Role description (BATNA framing) and offer entry
    Scenario = 1,

    /// Scripted negotiation chat with the simulated client
    Chat = 2,

    /// Five-item questionnaire
    Survey = 3,

    /// Thank-you and debriefing (terminal state)
    Done = 4,
}

impl Phase {
    /// Returns the numeric order of this phase (0-4)
    #[inline]
    pub const fn order(self) -> u8 {
        self as u8
    }

    /// Returns true if this is the terminal phase
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns the next phase in the sequence, or None at the terminal phase
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Consent => Some(Self::Scenario),
            Self::Scenario => Some(Self::Chat),
            Self::Chat => Some(Self::Survey),
            Self::Survey => Some(Self::Done),
            Self::Done => None,
        }
    }

    /// Returns a human-readable description of this phase
    pub const fn description(self) -> &'static str {
        match self {
            Self::Consent => "Consent",
            Self::Scenario => "Scenario",
            Self::Chat => "Negotiation chat",
            Self::Survey => "Questionnaire",
            Self::Done => "Finished",
        }
    }

    /// Returns the step number (1-indexed for display)
    pub const fn step_number(self) -> usize {
        self as usize + 1
    }

    /// Total number of phases
    pub const TOTAL_STEPS: usize = 5;

    /// Returns all phases in order
    pub const fn all_phases() -> &'static [Self] {
        &[
            Self::Consent,
            Self::Scenario,
            Self::Chat,
            Self::Survey,
            Self::Done,
        ]
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur during phase transitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhaseTransitionError {
    /// Attempted to skip one or more phases
    #[error("Cannot skip from {from} to {to} (must pass through intermediate phases)")]
    SkippedPhase { from: Phase, to: Phase },

    /// Attempted to go backwards (not allowed)
    #[error("Cannot go backwards from {from} to {to} (the session is forward-only)")]
    BackwardTransition { from: Phase, to: Phase },

    /// Attempted to transition out of the terminal phase
    #[error("Cannot transition from terminal phase {from}")]
    FromTerminalPhase { from: Phase },

    /// Attempted to transition to the current phase
    #[error("Already at phase {phase}")]
    AlreadyAtPhase { phase: Phase },

    /// Attempted to leave Chat before the client accepted
    #[error("Negotiation is not concluded yet (no accepting client message)")]
    NegotiationUnfinished,

    /// Attempted to submit the questionnaire a second time
    #[error("Results for this session were already submitted")]
    AlreadySubmitted,
}

/// Who sent a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    /// The participant (the freelancer making the offer)
    Participant,
    /// The simulated client
    Client,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Participant => write!(f, "You"),
            Self::Client => write!(f, "Client"),
        }
    }
}

/// One entry in the session transcript
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }

    /// Returns true if this message concludes the negotiation
    pub fn is_acceptance(&self) -> bool {
        self.speaker == Speaker::Client
            && ACCEPTANCE_MARKERS.iter().any(|m| self.text.contains(m))
    }
}

/// The five questionnaire answers, with the defaults the form starts at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurveyAnswers {
    /// Satisfaction with the outcome, 1-7
    pub satisfaction: u8,
    /// Perceived fairness of the negotiation, 1-7
    pub fairness: u8,
    /// Regret about the own offer, 1-7
    pub regret: u8,
    /// Participant age, 16-90
    pub age: u8,
    /// Self-reported negotiation experience
    pub experience: Experience,
}

impl Default for SurveyAnswers {
    fn default() -> Self {
        Self {
            satisfaction: 4,
            fairness: 4,
            regret: 3,
            age: 25,
            experience: Experience::Low,
        }
    }
}

/// Ephemeral per-session record.
///
/// Created at session start, mutated in place by the phase dispatcher, and
/// discarded after the final result row is written. Nothing here persists
/// beyond the appended CSV row.
///
/// # Example
///
/// ```
/// use parleylab::condition::Condition;
/// use parleylab::session::{Phase, Session};
///
/// let mut session = Session::new(Condition::default());
/// assert_eq!(session.phase(), Phase::Consent);
///
/// session.advance().unwrap();
/// assert_eq!(session.phase(), Phase::Scenario);
///
/// // Entering Chat goes through send_offer, not advance
/// assert!(session.advance().is_err());
/// session.send_offer(450).unwrap();
/// assert_eq!(session.phase(), Phase::Chat);
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    /// Assigned experimental condition
    condition: Condition,

    /// Current phase
    phase: Phase,

    /// Ordered transcript of exchanged messages
    transcript: Vec<ChatMessage>,

    /// The participant's offer in whole euros
    offer_eur: u32,

    /// Instant the offer message entered the chat (latency reference point)
    chat_started: Option<Instant>,

    /// Milliseconds from the offer message to the accepting client message
    response_time_ms: Option<u64>,

    /// Questionnaire answers (edited in place by the survey form)
    survey: SurveyAnswers,

    /// Guards the single result-row write
    submitted: bool,

    /// History of phase transitions with unix timestamps, for debugging
    phase_history: Vec<(Phase, u64)>,
}

impl Session {
    /// Create a new session in the Consent phase
    pub fn new(condition: Condition) -> Self {
        let mut session = Self {
            condition,
            phase: Phase::Consent,
            transcript: Vec::new(),
            offer_eur: DEFAULT_OFFER_EUR,
            chat_started: None,
            response_time_ms: None,
            survey: SurveyAnswers::default(),
            submitted: false,
            phase_history: Vec::with_capacity(Phase::TOTAL_STEPS),
        };
        session.record_phase(Phase::Consent);
        session
    }

    #[inline]
    pub fn condition(&self) -> Condition {
        self.condition
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    #[inline]
    pub fn offer_eur(&self) -> u32 {
        self.offer_eur
    }

    #[inline]
    pub fn response_time_ms(&self) -> Option<u64> {
        self.response_time_ms
    }

    #[inline]
    pub fn survey(&self) -> &SurveyAnswers {
        &self.survey
    }

    #[inline]
    pub fn survey_mut(&mut self) -> &mut SurveyAnswers {
        &mut self.survey
    }

    #[inline]
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Returns the phase history as (phase, unix timestamp) pairs
    pub fn phase_history(&self) -> &[(Phase, u64)] {
        &self.phase_history
    }

    /// Returns true if an accepting client message is present in the transcript
    pub fn is_concluded(&self) -> bool {
        self.transcript.iter().any(ChatMessage::is_acceptance)
    }

    /// Advance to the next phase in sequence.
    ///
    /// The two guarded transitions must go through their dedicated methods:
    /// Scenario → Chat through [`send_offer`](Self::send_offer) and
    /// Survey → Done through [`mark_submitted`](Self::mark_submitted).
    /// Leaving Chat additionally requires the negotiation to be concluded.
    ///
    /// # Errors
    ///
    /// - `FromTerminalPhase` if already at Done
    /// - `SkippedPhase` when called on Scenario or Survey (wrong entry point)
    /// - `NegotiationUnfinished` when leaving Chat without an accepting message
    pub fn advance(&mut self) -> Result<Phase, PhaseTransitionError> {
        if self.phase.is_terminal() {
            return Err(PhaseTransitionError::FromTerminalPhase { from: self.phase });
        }

        match self.phase {
            Phase::Scenario => {
                // Entering Chat must record the offer; callers use send_offer
                Err(PhaseTransitionError::SkippedPhase {
                    from: Phase::Scenario,
                    to: Phase::Chat,
                })
            }
            Phase::Survey => {
                // Leaving Survey must go through the submission guard
                Err(PhaseTransitionError::SkippedPhase {
                    from: Phase::Survey,
                    to: Phase::Done,
                })
            }
            Phase::Chat if !self.is_concluded() => {
                Err(PhaseTransitionError::NegotiationUnfinished)
            }
            _ => match self.phase.next() {
                Some(next) => {
                    self.set_phase(next);
                    Ok(next)
                }
                // Unreachable: only the terminal phase has no successor
                None => Err(PhaseTransitionError::FromTerminalPhase { from: self.phase }),
            },
        }
    }

    /// Transition to a specific phase (must be the immediate next phase).
    ///
    /// Stricter than `advance()`: validates the caller's expectation and
    /// returns a typed error naming the violation.
    pub fn transition_to(&mut self, target: Phase) -> Result<Phase, PhaseTransitionError> {
        if self.phase.is_terminal() {
            return Err(PhaseTransitionError::FromTerminalPhase { from: self.phase });
        }
        if target == self.phase {
            return Err(PhaseTransitionError::AlreadyAtPhase { phase: target });
        }
        if target.order() < self.phase.order() {
            return Err(PhaseTransitionError::BackwardTransition {
                from: self.phase,
                to: target,
            });
        }
        if self.phase.next() != Some(target) {
            return Err(PhaseTransitionError::SkippedPhase {
                from: self.phase,
                to: target,
            });
        }
        self.advance()
    }

    /// Send the offer and enter the Chat phase (Scenario → Chat).
    ///
    /// Resets the transcript, appends the participant's offer message, and
    /// records the chat start instant that response latency is measured from.
    ///
    /// # Errors
    ///
    /// - `SkippedPhase` if the session is not in Scenario
    pub fn send_offer(&mut self, offer_eur: u32) -> Result<(), PhaseTransitionError> {
        if self.phase != Phase::Scenario {
            return Err(PhaseTransitionError::SkippedPhase {
                from: self.phase,
                to: Phase::Chat,
            });
        }

        self.offer_eur = offer_eur.clamp(MIN_OFFER_EUR, MAX_OFFER_EUR);
        self.transcript.clear();
        self.transcript.push(ChatMessage::new(
            Speaker::Participant,
            format!("I could take on the project for {} €.", self.offer_eur),
        ));
        self.chat_started = Some(Instant::now());
        self.response_time_ms = None;
        self.set_phase(Phase::Chat);
        Ok(())
    }

    /// Append a message to the transcript.
    ///
    /// If the message is the accepting client message and no latency was
    /// recorded yet, the response time is measured here.
    pub fn push_message(&mut self, message: ChatMessage) {
        if message.is_acceptance() && self.response_time_ms.is_none() {
            self.response_time_ms = self
                .chat_started
                .map(|start| start.elapsed().as_millis() as u64);
        }
        self.transcript.push(message);
    }

    /// Leave the chat for the questionnaire (Chat → Survey).
    ///
    /// # Errors
    ///
    /// - `NegotiationUnfinished` if no accepting client message is present
    pub fn finish_chat(&mut self) -> Result<(), PhaseTransitionError> {
        if self.phase != Phase::Chat {
            return Err(PhaseTransitionError::SkippedPhase {
                from: self.phase,
                to: Phase::Survey,
            });
        }
        if !self.is_concluded() {
            return Err(PhaseTransitionError::NegotiationUnfinished);
        }
        self.set_phase(Phase::Survey);
        Ok(())
    }

    /// Mark the result row as written and finish the session (Survey → Done).
    ///
    /// Callers flip this only after the CSV append succeeded; a failed write
    /// leaves the session in Survey so the participant can submit again.
    ///
    /// # Errors
    ///
    /// - `AlreadySubmitted` if the flag is already set
    /// - `SkippedPhase` if the session is not in Survey
    pub fn mark_submitted(&mut self) -> Result<(), PhaseTransitionError> {
        if self.submitted {
            return Err(PhaseTransitionError::AlreadySubmitted);
        }
        if self.phase != Phase::Survey {
            return Err(PhaseTransitionError::SkippedPhase {
                from: self.phase,
                to: Phase::Done,
            });
        }
        self.submitted = true;
        self.set_phase(Phase::Done);
        Ok(())
    }

    fn set_phase(&mut self, phase: Phase) {
        self.record_phase(phase);
        self.phase = phase;
    }

    fn record_phase(&mut self, phase: Phase) {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.phase_history.push((phase, timestamp));
    }
}

// Convert PhaseTransitionError to the main ParleyLabError type
impl From<PhaseTransitionError> for crate::error::ParleyLabError {
    fn from(err: PhaseTransitionError) -> Self {
        crate::error::ParleyLabError::Phase(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{BatnaStrength, ReplyTempo};

    fn test_session() -> Session {
        Session::new(Condition {
            tempo: ReplyTempo::Immediate,
            batna: BatnaStrength::Strong,
        })
    }

    fn accepting_message() -> ChatMessage {
        ChatMessage::new(Speaker::Client, "Okay, I'll take your offer.")
    }

    // =========================================================================
    // Phase Tests
    // =========================================================================

    #[test]
    fn test_phase_order_is_sequential() {
        for (i, phase) in Phase::all_phases().iter().enumerate() {
            assert_eq!(phase.order() as usize, i);
            assert_eq!(phase.step_number(), i + 1);
        }
    }

    #[test]
    fn test_phase_next_forms_chain() {
        let mut current = Phase::Consent;
        let mut count = 0;

        while let Some(next) = current.next() {
            current = next;
            count += 1;
            assert!(count < 10, "Infinite loop detected in phase chain");
        }

        assert_eq!(current, Phase::Done);
        assert_eq!(count, 4);
    }

    #[test]
    fn test_only_done_is_terminal() {
        for phase in Phase::all_phases() {
            assert_eq!(phase.is_terminal(), *phase == Phase::Done);
        }
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Consent.to_string(), "Consent");
        assert_eq!(Phase::Chat.to_string(), "Negotiation chat");
        assert_eq!(Phase::Done.to_string(), "Finished");
    }

    // =========================================================================
    // Session Tests
    // =========================================================================

    #[test]
    fn test_session_starts_at_consent() {
        let session = test_session();
        assert_eq!(session.phase(), Phase::Consent);
        assert!(session.transcript().is_empty());
        assert!(!session.is_submitted());
        assert_eq!(session.offer_eur(), DEFAULT_OFFER_EUR);
    }

    #[test]
    fn test_full_forward_walk() {
        let mut session = test_session();

        session.advance().expect("Consent -> Scenario");
        session.send_offer(500).expect("Scenario -> Chat");
        session.push_message(accepting_message());
        session.finish_chat().expect("Chat -> Survey");
        session.mark_submitted().expect("Survey -> Done");

        assert_eq!(session.phase(), Phase::Done);
        assert!(session.is_submitted());
        // Every phase from Consent to Done, stamped in order
        assert_eq!(session.phase_history().len(), Phase::TOTAL_STEPS);
    }

    #[test]
    fn test_cannot_skip_phases() {
        let mut session = test_session();

        let err = session.transition_to(Phase::Chat).unwrap_err();
        assert!(matches!(err, PhaseTransitionError::SkippedPhase { .. }));

        let err = session.transition_to(Phase::Done).unwrap_err();
        assert!(matches!(err, PhaseTransitionError::SkippedPhase { .. }));
    }

    #[test]
    fn test_cannot_go_backwards() {
        let mut session = test_session();
        session.advance().expect("Consent -> Scenario");
        session.send_offer(450).expect("Scenario -> Chat");

        let err = session.transition_to(Phase::Consent).unwrap_err();
        assert!(matches!(
            err,
            PhaseTransitionError::BackwardTransition { .. }
        ));
    }

    #[test]
    fn test_cannot_transition_out_of_done() {
        let mut session = test_session();
        session.advance().unwrap();
        session.send_offer(450).unwrap();
        session.push_message(accepting_message());
        session.finish_chat().unwrap();
        session.mark_submitted().unwrap();

        let err = session.advance().unwrap_err();
        assert!(matches!(
            err,
            PhaseTransitionError::FromTerminalPhase { .. }
        ));
    }

    #[test]
    fn test_advance_refuses_guarded_transitions() {
        let mut session = test_session();
        session.advance().expect("Consent -> Scenario");

        // Scenario -> Chat only through send_offer
        let err = session.advance().unwrap_err();
        assert!(matches!(err, PhaseTransitionError::SkippedPhase { .. }));

        session.send_offer(450).unwrap();
        session.push_message(accepting_message());
        session.finish_chat().unwrap();

        // Survey -> Done only through mark_submitted
        let err = session.advance().unwrap_err();
        assert!(matches!(err, PhaseTransitionError::SkippedPhase { .. }));
    }

    #[test]
    fn test_send_offer_resets_transcript_and_clamps() {
        let mut session = test_session();
        session.advance().unwrap();
        session.send_offer(999_999).unwrap();

        assert_eq!(session.offer_eur(), MAX_OFFER_EUR);
        assert_eq!(session.transcript().len(), 1);
        let msg = &session.transcript()[0];
        assert_eq!(msg.speaker, Speaker::Participant);
        assert!(msg.text.contains("2000 €"));
    }

    #[test]
    fn test_finish_chat_requires_acceptance() {
        let mut session = test_session();
        session.advance().unwrap();
        session.send_offer(450).unwrap();

        let err = session.finish_chat().unwrap_err();
        assert_eq!(err, PhaseTransitionError::NegotiationUnfinished);

        session.push_message(ChatMessage::new(
            Speaker::Client,
            "Hmm, let me think about that for a moment...",
        ));
        assert!(!session.is_concluded());
        assert!(session.finish_chat().is_err());

        session.push_message(accepting_message());
        assert!(session.is_concluded());
        session.finish_chat().expect("Chat -> Survey");
    }

    #[test]
    fn test_acceptance_records_latency_once() {
        let mut session = test_session();
        session.advance().unwrap();
        session.send_offer(450).unwrap();
        assert_eq!(session.response_time_ms(), None);

        session.push_message(accepting_message());
        let first = session.response_time_ms();
        assert!(first.is_some());

        // A second accepting message must not overwrite the measurement
        session.push_message(ChatMessage::new(Speaker::Client, "Alright, I agree."));
        assert_eq!(session.response_time_ms(), first);
    }

    #[test]
    fn test_participant_message_is_not_acceptance() {
        let msg = ChatMessage::new(Speaker::Participant, "450 € is my best offer, I agree.");
        assert!(!msg.is_acceptance());
    }

    #[test]
    fn test_mark_submitted_is_single_shot() {
        let mut session = test_session();
        session.advance().unwrap();
        session.send_offer(450).unwrap();
        session.push_message(accepting_message());
        session.finish_chat().unwrap();

        session.mark_submitted().expect("first submission");
        let err = session.mark_submitted().unwrap_err();
        assert_eq!(err, PhaseTransitionError::AlreadySubmitted);
    }

    #[test]
    fn test_mark_submitted_requires_survey_phase() {
        let mut session = test_session();
        let err = session.mark_submitted().unwrap_err();
        assert!(matches!(err, PhaseTransitionError::SkippedPhase { .. }));
    }

    #[test]
    fn test_survey_defaults() {
        let answers = SurveyAnswers::default();
        assert_eq!(answers.satisfaction, 4);
        assert_eq!(answers.fairness, 4);
        assert_eq!(answers.regret, 3);
        assert_eq!(answers.age, 25);
        assert_eq!(answers.experience, Experience::Low);
    }
}
