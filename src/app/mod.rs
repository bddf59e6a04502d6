//! Application module
//!
//! Contains the main event loop, per-phase key dispatch, and the submit
//! path that writes the result row.
//!
//! # Module Structure
//! - `state` - application state types (AppState)
//! - Main module - App struct and event loop

mod state;

// Re-export state types for external use
pub use state::AppState;

use crate::components::keybindings::KeybindingContext;
use crate::condition::Condition;
use crate::config::StudyConfig;
use crate::counterpart::Counterpart;
use crate::error;
use crate::results::{self, ResultsStore};
use crate::script::DialogueScript;
use crate::session::Phase;
use crate::ui::UiRenderer;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Main application struct
pub struct App {
    state: Arc<Mutex<AppState>>,
    config: StudyConfig,
    results: ResultsStore,
    ui_renderer: UiRenderer,
    keybinding_context: KeybindingContext,
    /// Worker playing the scripted counterpart during the Chat phase
    counterpart: Option<Counterpart>,
}

impl App {
    /// Create a new application instance for one session
    pub fn new(config: StudyConfig, condition: Condition) -> Self {
        info!(%condition, "creating session");
        let results = ResultsStore::new(config.results_path.clone());

        Self {
            state: Arc::new(Mutex::new(AppState::new(condition, &config))),
            config,
            results,
            ui_renderer: UiRenderer::new(),
            keybinding_context: KeybindingContext::new(),
            counterpart: None,
        }
    }

    /// Helper function to safely lock the state mutex
    fn lock_state(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, AppState>, Box<dyn std::error::Error>> {
        self.state
            .lock()
            .map_err(|e| error::general_error(format!("Mutex poisoned: {}", e)).into())
    }

    /// Run the main application loop
    pub fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        info!("starting main application loop");

        loop {
            // Handle input events; 50 ms poll keeps the typing indicator live
            if crossterm::event::poll(Duration::from_millis(50))? {
                if let Event::Key(key_event) = crossterm::event::read()? {
                    // Windows terminals deliver both press and release
                    if key_event.kind == KeyEventKind::Press && self.handle_key_event(key_event)? {
                        break; // Exit requested
                    }
                }
            }

            // Reap the counterpart handle once its dialogue is played out
            if self
                .counterpart
                .as_ref()
                .is_some_and(Counterpart::is_finished)
            {
                self.counterpart = None;
            }

            // Render UI
            terminal.draw(|f| {
                let state = match self.state.lock() {
                    Ok(state) => state,
                    Err(_) => {
                        eprintln!("Fatal error: Mutex poisoned, cannot continue");
                        std::process::exit(1);
                    }
                };
                self.ui_renderer.render(f, &state, &self.keybinding_context);
            })?;
        }

        Ok(())
    }

    /// Handle a keyboard event. Returns true when the app should exit.
    fn handle_key_event(&mut self, key_event: KeyEvent) -> Result<bool, Box<dyn std::error::Error>> {
        let (phase, help_visible) = {
            let state = self.lock_state()?;
            (state.session.phase(), state.help_visible)
        };

        // Help overlay swallows keys until dismissed
        if help_visible {
            if matches!(key_event.code, KeyCode::Char('?') | KeyCode::Esc) {
                self.lock_state()?.help_visible = false;
            }
            return Ok(false);
        }

        match key_event.code {
            KeyCode::Char('?') => {
                self.lock_state()?.help_visible = true;
                return Ok(false);
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                // Abandoning the session writes nothing
                if phase != Phase::Done {
                    warn!(%phase, "session abandoned before completion");
                }
                return Ok(true);
            }
            _ => {}
        }

        match phase {
            Phase::Consent => self.handle_consent_key(key_event),
            Phase::Scenario => self.handle_scenario_key(key_event),
            Phase::Chat => self.handle_chat_key(key_event),
            Phase::Survey => self.handle_survey_key(key_event),
            Phase::Done => Ok(key_event.code == KeyCode::Enter),
        }
    }

    fn handle_consent_key(
        &mut self,
        key_event: KeyEvent,
    ) -> Result<bool, Box<dyn std::error::Error>> {
        if key_event.code == KeyCode::Enter {
            let mut state = self.lock_state()?;
            state.session.advance()?;
            state.set_status("Read the scenario, then enter your offer");
            debug!("consent given");
        }
        Ok(false)
    }

    fn handle_scenario_key(
        &mut self,
        key_event: KeyEvent,
    ) -> Result<bool, Box<dyn std::error::Error>> {
        match key_event.code {
            KeyCode::Up => self.lock_state()?.offer_input.increment(),
            KeyCode::Down => self.lock_state()?.offer_input.decrement(),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.lock_state()?.offer_input.push_digit(c)
            }
            KeyCode::Backspace => self.lock_state()?.offer_input.backspace(),
            KeyCode::Enter => self.send_offer()?,
            _ => {}
        }
        Ok(false)
    }

    /// Send the offer, enter Chat, and start the counterpart worker
    fn send_offer(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let script = {
            let mut state = self.lock_state()?;
            let offer = state.offer_input.value();
            state.session.send_offer(offer)?;
            state.set_status("Offer sent");

            info!(offer_eur = offer, "offer sent, chat started");
            DialogueScript::new(
                state.session.condition().tempo,
                state.session.offer_eur(),
                self.config.delays.profile(),
            )
        };

        self.counterpart = Some(Counterpart::start(Arc::clone(&self.state), script));
        Ok(())
    }

    fn handle_chat_key(
        &mut self,
        key_event: KeyEvent,
    ) -> Result<bool, Box<dyn std::error::Error>> {
        if key_event.code == KeyCode::Enter {
            let mut state = self.lock_state()?;
            if state.session.is_concluded() {
                state.session.finish_chat()?;
                state.set_status("Please answer the questionnaire, then submit");
            }
            // Enter before conclusion is ignored; the client is still typing
        }
        Ok(false)
    }

    fn handle_survey_key(
        &mut self,
        key_event: KeyEvent,
    ) -> Result<bool, Box<dyn std::error::Error>> {
        match key_event.code {
            KeyCode::Up => self.lock_state()?.survey_form.select_previous(),
            KeyCode::Down => self.lock_state()?.survey_form.select_next(),
            KeyCode::Left => {
                let mut guard = self.lock_state()?;
                let state = &mut *guard;
                state.survey_form.adjust(state.session.survey_mut(), -1);
            }
            KeyCode::Right => {
                let mut guard = self.lock_state()?;
                let state = &mut *guard;
                state.survey_form.adjust(state.session.survey_mut(), 1);
            }
            KeyCode::Enter => {
                let on_submit_row = {
                    let state = self.lock_state()?;
                    state.survey_form.current_field() == crate::input::SurveyField::Submit
                };
                if on_submit_row {
                    self.submit_survey()?;
                } else {
                    self.lock_state()?.survey_form.select_next();
                }
            }
            _ => {}
        }
        Ok(false)
    }

    /// Write the result row and advance to Done.
    ///
    /// A failed write keeps the session in Survey with the error in the
    /// status line; pressing submit again re-attempts.
    fn submit_survey(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let mut state = self.lock_state()?;
        match results::submit_session(&self.results, &mut state.session) {
            Ok(()) => {
                state.set_status("Your answers have been saved");
            }
            Err(e) => {
                warn!(error = %e, "result write failed");
                state.set_error_status(format!(
                    "Could not save your answers: {:#}. Press Enter to retry.",
                    e
                ));
            }
        }
        Ok(())
    }
}
