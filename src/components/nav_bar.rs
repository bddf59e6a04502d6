//! Bottom navigation bar
//!
//! One line of key hints rendered from the keybinding context.

use crate::theme::Colors;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Navigation bar showing the keys available in the current phase
pub struct NavBar {
    items: Vec<(String, String)>,
}

impl NavBar {
    pub fn new(items: Vec<(String, String)>) -> Self {
        Self { items }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        if area.height == 0 {
            return;
        }

        let mut spans = Vec::new();
        for (i, (key, description)) in self.items.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", Style::default()));
            }
            spans.push(Span::styled(
                format!("[{key}]"),
                Style::default()
                    .fg(Colors::SECONDARY)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(" {description}"),
                Style::default().fg(Colors::NAV_HINT),
            ));
        }

        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
