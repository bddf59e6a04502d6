//! Simulated counterpart worker
//!
//! Bridges the pure [`DialogueScript`](crate::script::DialogueScript) to
//! wall-clock time: a background thread repeatedly asks the script for the
//! next cue, sleeps the cue's delay while the UI paints a typing indicator,
//! then appends the message to the session transcript under the app-state
//! mutex. The worker exits when the script is exhausted or the session
//! leaves the Chat phase.
//!
//! This is the only concurrency in the program, internal to one session.

use crate::app::AppState;
use crate::script::DialogueScript;
use crate::session::{ChatMessage, Phase, Speaker};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use tracing::{debug, info};

/// Handle to the running counterpart thread.
///
/// Dropping the handle does not stop the worker; it stops on its own when
/// the dialogue is finished or the session leaves Chat. Quitting the app
/// mid-chat simply abandons it along with the session.
pub struct Counterpart {
    handle: Option<JoinHandle<()>>,
}

impl Counterpart {
    /// Spawn the worker for one chat.
    pub fn start(state: Arc<Mutex<AppState>>, script: DialogueScript) -> Self {
        let handle = thread::spawn(move || run_worker(state, script));
        Self {
            handle: Some(handle),
        }
    }

    /// Returns true once the worker thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the worker to exit (used by tests).
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run_worker(state: Arc<Mutex<AppState>>, script: DialogueScript) {
    debug!("counterpart worker started");

    loop {
        // Decide the next cue under the lock, then sleep without it.
        let cue = {
            let Ok(mut guard) = state.lock() else { return };
            if guard.session.phase() != Phase::Chat {
                guard.client_typing = false;
                return;
            }
            match script.next_cue(guard.session.transcript()) {
                Some(cue) => {
                    guard.client_typing = cue.speaker == Speaker::Client;
                    cue
                }
                None => {
                    guard.client_typing = false;
                    debug!("dialogue exhausted, counterpart worker exiting");
                    return;
                }
            }
        };

        thread::sleep(cue.delay);

        let Ok(mut guard) = state.lock() else { return };
        // The participant may have quit while we slept
        if guard.session.phase() != Phase::Chat {
            guard.client_typing = false;
            return;
        }

        guard.client_typing = false;
        guard
            .session
            .push_message(ChatMessage::new(cue.speaker, cue.text));

        if cue.concludes {
            info!(
                response_time_ms = ?guard.session.response_time_ms(),
                "negotiation concluded"
            );
            guard.set_status("The negotiation is concluded. Press Enter for the questionnaire.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppState;
    use crate::condition::{BatnaStrength, Condition, ReplyTempo};
    use crate::config::StudyConfig;
    use crate::script::DelayProfile;
    use std::time::Duration;

    /// Profile with millisecond delays so tests finish quickly.
    fn instant_profile() -> DelayProfile {
        DelayProfile {
            immediate_accept: Duration::from_millis(1),
            deliberate_stall: Duration::from_millis(1),
            deliberate_accept: Duration::from_millis(1),
            counter_offer: Duration::from_millis(1),
            rebuttal: Duration::from_millis(1),
            counter_accept: Duration::from_millis(1),
        }
    }

    fn chat_state(tempo: ReplyTempo) -> Arc<Mutex<AppState>> {
        let mut state = AppState::new(
            Condition {
                tempo,
                batna: BatnaStrength::Strong,
            },
            &StudyConfig::default(),
        );
        state.session.advance().unwrap();
        state.session.send_offer(450).unwrap();
        Arc::new(Mutex::new(state))
    }

    #[test]
    fn test_worker_plays_immediate_dialogue() {
        let state = chat_state(ReplyTempo::Immediate);
        let script = DialogueScript::new(ReplyTempo::Immediate, 450, instant_profile());

        Counterpart::start(Arc::clone(&state), script).join();

        let guard = state.lock().unwrap();
        assert_eq!(guard.session.transcript().len(), 2); // offer + acceptance
        assert!(guard.session.is_concluded());
        assert!(guard.session.response_time_ms().is_some());
        assert!(!guard.client_typing);
    }

    #[test]
    fn test_worker_plays_counteroffer_dialogue() {
        let state = chat_state(ReplyTempo::CounterOffer);
        let script = DialogueScript::new(ReplyTempo::CounterOffer, 450, instant_profile());

        Counterpart::start(Arc::clone(&state), script).join();

        let guard = state.lock().unwrap();
        // offer, counter, rebuttal, agreement
        assert_eq!(guard.session.transcript().len(), 4);
        assert!(guard.session.is_concluded());
    }

    #[test]
    fn test_worker_exits_when_session_leaves_chat() {
        let state = chat_state(ReplyTempo::Deliberate);
        // Conclude and leave Chat before the worker gets going
        {
            let mut guard = state.lock().unwrap();
            guard.session.push_message(ChatMessage::new(
                Speaker::Client,
                "Okay, I'll take your offer.",
            ));
            guard.session.finish_chat().unwrap();
        }

        let script = DialogueScript::new(ReplyTempo::Deliberate, 450, instant_profile());
        Counterpart::start(Arc::clone(&state), script).join();

        let guard = state.lock().unwrap();
        // Nothing beyond the offer and the message we injected
        assert_eq!(guard.session.transcript().len(), 2);
    }
}
