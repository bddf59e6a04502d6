//! Scripted dialogue generator
//!
//! Pure logic that maps (condition, transcript) to the next scripted cue.
//! No I/O and no sleeping happens here; the counterpart worker owns the
//! clock. Advancement is driven by string-matching over prior messages and
//! speaker counts, never by hidden side-channel state, so the script can be
//! re-asked for the next cue at any time and always agrees with the
//! transcript.
//!
//! # Cue sequences per tempo
//!
//! | Tempo        | Cues (delay → message)                                       |
//! |--------------|--------------------------------------------------------------|
//! | immediate    | 1 s → client accepts                                         |
//! | deliberate   | 10 s → client stalls; 10 s → client accepts                  |
//! | counteroffer | 7 s → client counters (offer − 20 €); 0.3 s → participant    |
//! |              | rebuts; 7 s → client yields                                  |

use crate::condition::ReplyTempo;
use crate::session::{ChatMessage, Speaker};
use std::time::Duration;

/// Fragment the counter-offer message is recognized by
const COUNTER_MARKER: &str = "work for you as well";
/// Fragment the participant's scripted rebuttal is recognized by
const REBUTTAL_MARKER: &str = "best offer";

/// How much below the participant's offer the client counters, in euros
const COUNTER_DISCOUNT_EUR: u32 = 20;

/// The delays between scripted messages.
///
/// The standard profile carries the study timings; the accelerated profile
/// divides them by ten for piloting (`--quick`). Profile choice never alters
/// texts, ordering, or latency semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayProfile {
    /// Immediate tempo: pause before the accepting message
    pub immediate_accept: Duration,
    /// Deliberate tempo: pause before the stalling message
    pub deliberate_stall: Duration,
    /// Deliberate tempo: pause between stall and acceptance
    pub deliberate_accept: Duration,
    /// Counteroffer tempo: pause before the counter-offer
    pub counter_offer: Duration,
    /// Counteroffer tempo: pause before the participant's scripted rebuttal
    pub rebuttal: Duration,
    /// Counteroffer tempo: pause between rebuttal and the yielding message
    pub counter_accept: Duration,
}

impl DelayProfile {
    /// The study timings
    pub const fn standard() -> Self {
        Self {
            immediate_accept: Duration::from_secs(1),
            deliberate_stall: Duration::from_secs(10),
            deliberate_accept: Duration::from_secs(10),
            counter_offer: Duration::from_secs(7),
            rebuttal: Duration::from_millis(300),
            counter_accept: Duration::from_secs(7),
        }
    }

    /// Standard timings divided by ten, for piloting
    pub fn accelerated() -> Self {
        let s = Self::standard();
        Self {
            immediate_accept: s.immediate_accept / 10,
            deliberate_stall: s.deliberate_stall / 10,
            deliberate_accept: s.deliberate_accept / 10,
            counter_offer: s.counter_offer / 10,
            rebuttal: s.rebuttal / 10,
            counter_accept: s.counter_accept / 10,
        }
    }
}

impl Default for DelayProfile {
    fn default() -> Self {
        Self::standard()
    }
}

/// One scripted message together with the pause that precedes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    /// How long the counterpart "types" before the message appears
    pub delay: Duration,
    pub speaker: Speaker,
    pub text: String,
    /// True if appending this message concludes the negotiation
    pub concludes: bool,
}

/// The scripted counterpart for one session.
///
/// Built when the participant sends the offer; `next_cue` inspects the
/// transcript and returns the next pending cue, or `None` once the dialogue
/// is finished.
#[derive(Debug, Clone)]
pub struct DialogueScript {
    tempo: ReplyTempo,
    offer_eur: u32,
    delays: DelayProfile,
}

impl DialogueScript {
    pub fn new(tempo: ReplyTempo, offer_eur: u32, delays: DelayProfile) -> Self {
        Self {
            tempo,
            offer_eur,
            delays,
        }
    }

    /// The amount the client counters with (offer minus a fixed discount)
    pub fn counter_offer_eur(&self) -> u32 {
        self.offer_eur.saturating_sub(COUNTER_DISCOUNT_EUR)
    }

    /// Returns the next cue given the transcript so far, or `None` when the
    /// dialogue is finished.
    pub fn next_cue(&self, transcript: &[ChatMessage]) -> Option<Cue> {
        match self.tempo {
            ReplyTempo::Immediate => self.next_immediate(transcript),
            ReplyTempo::Deliberate => self.next_deliberate(transcript),
            ReplyTempo::CounterOffer => self.next_counteroffer(transcript),
        }
    }

    fn next_immediate(&self, transcript: &[ChatMessage]) -> Option<Cue> {
        if client_message_count(transcript) > 0 {
            return None;
        }
        Some(Cue {
            delay: self.delays.immediate_accept,
            speaker: Speaker::Client,
            text: "That sounds great, I'll take your offer right away!".to_string(),
            concludes: true,
        })
    }

    fn next_deliberate(&self, transcript: &[ChatMessage]) -> Option<Cue> {
        match client_message_count(transcript) {
            0 => Some(Cue {
                delay: self.delays.deliberate_stall,
                speaker: Speaker::Client,
                text: "Hmm, let me think about that for a moment...".to_string(),
                concludes: false,
            }),
            1 => Some(Cue {
                delay: self.delays.deliberate_accept,
                speaker: Speaker::Client,
                text: "Okay, I'll take your offer.".to_string(),
                concludes: true,
            }),
            _ => None,
        }
    }

    fn next_counteroffer(&self, transcript: &[ChatMessage]) -> Option<Cue> {
        if !contains_marker(transcript, COUNTER_MARKER) {
            return Some(Cue {
                delay: self.delays.counter_offer,
                speaker: Speaker::Client,
                text: format!("Would {} € work for you as well?", self.counter_offer_eur()),
                concludes: false,
            });
        }
        if !contains_marker(transcript, REBUTTAL_MARKER) {
            return Some(Cue {
                delay: self.delays.rebuttal,
                speaker: Speaker::Participant,
                text: format!("{} € is my best offer.", self.offer_eur),
                concludes: false,
            });
        }
        if !transcript.iter().any(ChatMessage::is_acceptance) {
            return Some(Cue {
                delay: self.delays.counter_accept,
                speaker: Speaker::Client,
                text: "Alright, I agree.".to_string(),
                concludes: true,
            });
        }
        None
    }
}

fn client_message_count(transcript: &[ChatMessage]) -> usize {
    transcript
        .iter()
        .filter(|m| m.speaker == Speaker::Client)
        .count()
}

fn contains_marker(transcript: &[ChatMessage], marker: &str) -> bool {
    transcript.iter().any(|m| m.text.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive the script to completion, appending each cue to the transcript.
    fn play_out(script: &DialogueScript) -> Vec<Cue> {
        let mut transcript = vec![ChatMessage::new(
            Speaker::Participant,
            format!("I could take on the project for {} €.", 450),
        )];
        let mut cues = Vec::new();

        while let Some(cue) = script.next_cue(&transcript) {
            transcript.push(ChatMessage::new(cue.speaker, cue.text.clone()));
            cues.push(cue);
            assert!(cues.len() < 10, "script did not terminate");
        }
        cues
    }

    #[test]
    fn test_immediate_sequence() {
        let script = DialogueScript::new(ReplyTempo::Immediate, 450, DelayProfile::standard());
        let cues = play_out(&script);

        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].speaker, Speaker::Client);
        assert_eq!(cues[0].delay, Duration::from_secs(1));
        assert!(cues[0].text.contains("take your offer"));
        assert!(cues[0].concludes);
    }

    #[test]
    fn test_deliberate_sequence() {
        let script = DialogueScript::new(ReplyTempo::Deliberate, 450, DelayProfile::standard());
        let cues = play_out(&script);

        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].text, "Hmm, let me think about that for a moment...");
        assert_eq!(cues[0].delay, Duration::from_secs(10));
        assert!(!cues[0].concludes);

        assert_eq!(cues[1].text, "Okay, I'll take your offer.");
        assert_eq!(cues[1].delay, Duration::from_secs(10));
        assert!(cues[1].concludes);
    }

    #[test]
    fn test_counteroffer_sequence() {
        let script = DialogueScript::new(ReplyTempo::CounterOffer, 450, DelayProfile::standard());
        let cues = play_out(&script);

        assert_eq!(cues.len(), 3);

        assert_eq!(cues[0].speaker, Speaker::Client);
        assert_eq!(cues[0].text, "Would 430 € work for you as well?");
        assert_eq!(cues[0].delay, Duration::from_secs(7));

        assert_eq!(cues[1].speaker, Speaker::Participant);
        assert_eq!(cues[1].text, "450 € is my best offer.");
        assert_eq!(cues[1].delay, Duration::from_millis(300));

        assert_eq!(cues[2].speaker, Speaker::Client);
        assert_eq!(cues[2].text, "Alright, I agree.");
        assert!(cues[2].concludes);
    }

    #[test]
    fn test_counter_tracks_participant_offer() {
        let script = DialogueScript::new(ReplyTempo::CounterOffer, 800, DelayProfile::standard());
        assert_eq!(script.counter_offer_eur(), 780);

        let cues = play_out(&script);
        assert!(cues[0].text.contains("780 €"));
        assert!(cues[1].text.contains("800 €"));
    }

    #[test]
    fn test_exactly_one_concluding_cue_per_tempo() {
        for tempo in [
            ReplyTempo::Immediate,
            ReplyTempo::Deliberate,
            ReplyTempo::CounterOffer,
        ] {
            let script = DialogueScript::new(tempo, 450, DelayProfile::standard());
            let cues = play_out(&script);
            assert_eq!(
                cues.iter().filter(|c| c.concludes).count(),
                1,
                "tempo {tempo} must conclude exactly once"
            );
            assert!(cues.last().expect("at least one cue").concludes);
        }
    }

    #[test]
    fn test_script_is_pure_over_transcript() {
        // Re-asking with the same transcript yields the same cue
        let script = DialogueScript::new(ReplyTempo::Deliberate, 450, DelayProfile::standard());
        let transcript = vec![ChatMessage::new(Speaker::Participant, "offer")];
        assert_eq!(
            script.next_cue(&transcript),
            script.next_cue(&transcript)
        );
    }

    #[test]
    fn test_accelerated_profile_divides_delays() {
        let std_profile = DelayProfile::standard();
        let quick = DelayProfile::accelerated();
        assert_eq!(quick.immediate_accept, std_profile.immediate_accept / 10);
        assert_eq!(quick.deliberate_stall, Duration::from_secs(1));
        assert_eq!(quick.rebuttal, Duration::from_millis(30));
    }
}
