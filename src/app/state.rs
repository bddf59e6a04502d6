//! Application state definitions
//!
//! One `AppState` per process, shared between the event loop and the
//! counterpart worker behind an `Arc<Mutex<_>>`.

use crate::condition::Condition;
use crate::config::StudyConfig;
use crate::input::{OfferInput, SurveyForm};
use crate::session::Session;

/// Main application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// The one session this process runs
    pub session: Session,
    /// Offer entry on the scenario screen
    pub offer_input: OfferInput,
    /// Questionnaire form navigation
    pub survey_form: SurveyForm,
    /// Status message for user feedback (write failures surface here)
    pub status_message: String,
    /// Whether the status message reports a failure (drives its styling)
    pub status_is_error: bool,
    /// Whether the counterpart worker is "typing"
    pub client_typing: bool,
    /// Whether the help overlay is visible
    pub help_visible: bool,
}

impl AppState {
    pub fn new(condition: Condition, config: &StudyConfig) -> Self {
        Self {
            session: Session::new(condition),
            offer_input: OfferInput::new(
                config.default_offer_eur,
                config.min_offer_eur,
                config.max_offer_eur,
                config.offer_step_eur,
            ),
            survey_form: SurveyForm::new(),
            status_message: "Welcome to the negotiation study".to_string(),
            status_is_error: false,
            client_typing: false,
            help_visible: false,
        }
    }

    /// Set an informational status message, clearing any error styling
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.status_is_error = false;
    }

    /// Set a failure status message
    pub fn set_error_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.status_is_error = true;
    }
}
