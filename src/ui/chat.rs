//! Chat transcript rendering
//!
//! Speaker-colored transcript, the typing indicator while a cue is pending,
//! and the completion banner once the negotiation is concluded.

use crate::app::AppState;
use crate::theme::{Colors, Styles};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn render_chat_screen(f: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),    // Transcript
            Constraint::Length(3), // Typing indicator / completion banner
        ])
        .split(area);

    let mut lines: Vec<Line> = vec![Line::from("")];
    for message in state.session.transcript() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {}: ", message.speaker),
                Styles::speaker(message.speaker),
            ),
            Span::styled(
                message.text.clone(),
                Style::default().fg(Colors::FG_PRIMARY),
            ),
        ]));
        lines.push(Line::from(""));
    }

    let transcript = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Chat"))
        .wrap(Wrap { trim: false });
    f.render_widget(transcript, chunks[0]);

    let footer = if state.session.is_concluded() {
        Paragraph::new(Line::from(vec![Span::styled(
            "The negotiation is concluded. [Enter] Continue to questionnaire",
            Styles::success(),
        )]))
    } else if state.client_typing {
        Paragraph::new(Line::from(vec![Span::styled(
            "Client is typing...",
            Style::default().fg(Colors::TYPING),
        )]))
    } else {
        Paragraph::new(Line::from(vec![Span::styled(
            "Waiting for the client...",
            Styles::hint(),
        )]))
    };
    f.render_widget(
        footer
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        chunks[1],
    );
}
