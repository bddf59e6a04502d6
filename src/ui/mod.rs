//! User interface rendering module
//!
//! This module is organized into submodules for better maintainability:
//! - `header` - banner, title, status line, and common widget rendering
//! - `screens` - consent, scenario, survey, and done screens
//! - `chat` - transcript and typing indicator

mod chat;
mod header;
mod screens;

use crate::app::AppState;
use crate::components::help_overlay::HelpOverlay;
use crate::components::keybindings::KeybindingContext;
use crate::components::nav_bar::NavBar;
use crate::session::Phase;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

// Re-export for external use
pub use header::HeaderRenderer;

/// UI renderer for the application.
///
/// The main entry point for rendering. It dispatches on the session phase
/// and delegates to the screen submodules.
pub struct UiRenderer {
    header: HeaderRenderer,
}

impl Default for UiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl UiRenderer {
    /// Create a new UI renderer
    pub fn new() -> Self {
        Self {
            header: HeaderRenderer::new(),
        }
    }

    /// Render the complete UI based on the session phase
    pub fn render(&self, f: &mut Frame, state: &AppState, keybinding_ctx: &KeybindingContext) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7), // Banner
                Constraint::Length(3), // Title + step indicator
                Constraint::Min(10),   // Phase screen
                Constraint::Length(1), // Status line
                Constraint::Length(1), // Navigation bar
            ])
            .split(f.area());

        let phase = state.session.phase();

        self.header.render_header(f, main_chunks[0]);
        self.header.render_title(f, main_chunks[1], phase);

        match phase {
            Phase::Consent => screens::render_consent_screen(f, main_chunks[2]),
            Phase::Scenario => screens::render_scenario_screen(f, main_chunks[2], state),
            Phase::Chat => chat::render_chat_screen(f, main_chunks[2], state),
            Phase::Survey => screens::render_survey_screen(f, main_chunks[2], state),
            Phase::Done => screens::render_done_screen(f, main_chunks[2]),
        }

        header::render_status_line(
            f,
            main_chunks[3],
            &state.status_message,
            state.status_is_error,
        );

        let nav_bar = NavBar::new(keybinding_ctx.get_nav_items(phase));
        nav_bar.render(f, main_chunks[4]);

        // Help overlay on top of everything
        if state.help_visible {
            let overlay = HelpOverlay::new(phase, keybinding_ctx);
            overlay.render(f, f.area());
        }
    }
}
