//! Header and common widget rendering
//!
//! ASCII art banner, screen titles, and the step indicator shared by all
//! phase screens.

use crate::session::Phase;
use crate::theme::Colors;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Header renderer containing the ASCII art banner
pub struct HeaderRenderer {
    header_lines: Vec<Line<'static>>,
}

impl Default for HeaderRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderRenderer {
    /// Create a new header renderer
    pub fn new() -> Self {
        Self {
            header_lines: Self::create_header(),
        }
    }

    /// Render the ASCII art banner
    pub fn render_header(&self, f: &mut Frame, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let header = Paragraph::new(self.header_lines.clone())
            .block(Block::default().borders(Borders::NONE))
            .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    /// Render a screen title with the step indicator
    pub fn render_title(&self, f: &mut Frame, area: Rect, phase: Phase) {
        let title = format!(
            "{} (step {}/{})",
            phase.description(),
            phase.step_number(),
            Phase::TOTAL_STEPS
        );
        let title_widget = Paragraph::new(title)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Colors::PRIMARY));
        f.render_widget(title_widget, area);
    }

    fn create_header() -> Vec<Line<'static>> {
        let banner = [
            r"  ____            _            _          _     ",
            r" |  _ \ __ _ _ __| | ___ _   _| |    __ _| |__  ",
            r" | |_) / _` | '__| |/ _ \ | | | |   / _` | '_ \ ",
            r" |  __/ (_| | |  | |  __/ |_| | |__| (_| | |_) |",
            r" |_|   \__,_|_|  |_|\___|\__, |_____\__,_|_.__/ ",
            r"                         |___/                  ",
        ];
        banner
            .iter()
            .map(|line| {
                Line::from(vec![Span::styled(
                    *line,
                    Style::default().fg(Colors::PRIMARY),
                )])
            })
            .collect()
    }
}

/// Render the status line (write failures surface here)
pub fn render_status_line(f: &mut Frame, area: Rect, status: &str, is_error: bool) {
    let style = if is_error {
        Style::default().fg(Colors::ERROR)
    } else {
        Style::default().fg(Colors::FG_SECONDARY)
    };
    let status_widget = Paragraph::new(status.to_string())
        .alignment(Alignment::Center)
        .style(style);
    f.render_widget(status_widget, area);
}
