//! Centralized theme and styling for the TUI
//!
//! Single source of truth for all colors and styles used throughout the
//! application, so screens stay visually consistent.

#![allow(dead_code)]

use ratatui::style::{Color, Modifier, Style};

// =============================================================================
// COLOR PALETTE
// =============================================================================

/// Core color palette for the application.
/// All colors should be defined here rather than hardcoded in screens.
pub struct Colors;

impl Colors {
    /// Default foreground text color
    pub const FG_PRIMARY: Color = Color::White;

    /// Secondary/muted text color
    pub const FG_SECONDARY: Color = Color::Gray;

    /// Disabled/inactive text color
    pub const FG_MUTED: Color = Color::DarkGray;

    /// Primary accent color - borders, titles, highlights
    pub const PRIMARY: Color = Color::Cyan;

    /// Secondary accent color - selected items, emphasis
    pub const SECONDARY: Color = Color::Yellow;

    /// Success/positive feedback
    pub const SUCCESS: Color = Color::Green;

    /// Warning/caution feedback
    pub const WARNING: Color = Color::Yellow;

    /// Error/danger feedback
    pub const ERROR: Color = Color::Red;

    /// Informational feedback
    pub const INFO: Color = Color::Blue;

    /// The participant's chat messages
    pub const PARTICIPANT: Color = Color::Green;

    /// The simulated client's chat messages
    pub const CLIENT: Color = Color::Cyan;

    /// Typing indicator
    pub const TYPING: Color = Color::DarkGray;

    /// Selected form row background
    pub const SELECTED_BG: Color = Color::Yellow;

    /// Selected form row text (for contrast on yellow)
    pub const SELECTED_FG: Color = Color::Black;

    /// Active border color
    pub const BORDER_ACTIVE: Color = Color::Cyan;

    /// Inactive/unfocused border color
    pub const BORDER_INACTIVE: Color = Color::DarkGray;

    /// Navigation hint color
    pub const NAV_HINT: Color = Color::DarkGray;
}

// =============================================================================
// PRE-BUILT STYLES
// =============================================================================

/// Commonly used style combinations
pub struct Styles;

impl Styles {
    /// Screen titles
    pub fn title() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Selected list/form rows
    pub fn selected() -> Style {
        Style::default()
            .bg(Colors::SELECTED_BG)
            .fg(Colors::SELECTED_FG)
            .add_modifier(Modifier::BOLD)
    }

    /// Muted hint text
    pub fn hint() -> Style {
        Style::default().fg(Colors::FG_MUTED)
    }

    /// Success banners
    pub fn success() -> Style {
        Style::default()
            .fg(Colors::SUCCESS)
            .add_modifier(Modifier::BOLD)
    }

    /// Error/status-failure text
    pub fn error() -> Style {
        Style::default().fg(Colors::ERROR)
    }

    /// Style for a chat speaker prefix
    pub fn speaker(speaker: crate::session::Speaker) -> Style {
        let color = match speaker {
            crate::session::Speaker::Participant => Colors::PARTICIPANT,
            crate::session::Speaker::Client => Colors::CLIENT,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}
