//! Phase screens
//!
//! One render function per non-chat phase: consent, scenario, survey, done.
//! The chat transcript lives in `ui::chat`.

use crate::app::AppState;
use crate::condition::BatnaStrength;
use crate::input::SurveyField;
use crate::theme::{Colors, Styles};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

// ============================================================================
// Consent
// ============================================================================

pub fn render_consent_screen(f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),    // Study info
            Constraint::Length(3), // Consent line
        ])
        .split(area);

    let info_lines = vec![
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Study information",
            Styles::title(),
        )]),
        Line::from(""),
        Line::from("  You are taking part in a short, anonymous study on negotiations"),
        Line::from("  (duration about 10 minutes)."),
        Line::from(""),
        Line::from("  The other side of the negotiation is simulated."),
        Line::from("  No personal data is collected."),
    ];
    let info = Paragraph::new(info_lines)
        .block(Block::default().borders(Borders::ALL).title("Welcome"))
        .wrap(Wrap { trim: false });
    f.render_widget(info, chunks[0]);

    let consent = Paragraph::new(Line::from(vec![Span::styled(
        "I consent to anonymous data collection and can stop at any time. [Enter to agree]",
        Style::default()
            .fg(Colors::SUCCESS)
            .add_modifier(Modifier::BOLD),
    )]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(consent, chunks[1]);
}

// ============================================================================
// Scenario
// ============================================================================

pub fn render_scenario_screen(f: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(9),    // Role text
            Constraint::Length(3), // Offer entry
        ])
        .split(area);

    let batna_lines = match state.session.condition().batna {
        BatnaStrength::Strong => vec![
            Line::from("  You have a strong alternative (BATNA):"),
            Line::from(vec![Span::styled(
                "  another project at 440 € is in prospect.",
                Style::default().fg(Colors::SUCCESS),
            )]),
        ],
        BatnaStrength::Weak => vec![
            Line::from("  You have a weak, uncertain alternative (BATNA):"),
            Line::from(vec![Span::styled(
                "  currently no other concrete offer.",
                Style::default().fg(Colors::WARNING),
            )]),
        ],
    };

    let mut role_lines = vec![
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Your role: provider",
            Styles::title(),
        )]),
        Line::from(""),
        Line::from("  You are a freelancer (graphic design)."),
        Line::from("  You want to charge 450 € for a project."),
        Line::from(""),
    ];
    role_lines.extend(batna_lines);

    let role = Paragraph::new(role_lines)
        .block(Block::default().borders(Borders::ALL).title("Scenario"))
        .wrap(Wrap { trim: false });
    f.render_widget(role, chunks[0]);

    let offer = Paragraph::new(Line::from(vec![
        Span::raw("Your offer: "),
        Span::styled(
            format!("{} €", state.offer_input.raw()),
            Style::default()
                .fg(Colors::SECONDARY)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "   ({}-{} €, Up/Down to adjust, Enter to send)",
                state.offer_input.min(),
                state.offer_input.max()
            ),
            Styles::hint(),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Colors::BORDER_ACTIVE)),
    );
    f.render_widget(offer, chunks[1]);
}

// ============================================================================
// Survey
// ============================================================================

pub fn render_survey_screen(f: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),    // Form
            Constraint::Length(2), // Hint
        ])
        .split(area);

    let answers = state.session.survey();
    let current = state.survey_form.current_field();

    let items: Vec<ListItem> = SurveyField::ALL
        .iter()
        .map(|field| {
            let selected = *field == current;
            let line = if *field == SurveyField::Submit {
                Line::from(Span::styled(
                    "  [ Submit answers ]",
                    if selected {
                        Styles::selected()
                    } else {
                        Style::default().fg(Colors::SUCCESS)
                    },
                ))
            } else {
                let value = crate::input::SurveyForm::value_text(*field, answers);
                Line::from(vec![
                    Span::styled(
                        format!("  {:<52}", field.label()),
                        if selected {
                            Styles::selected()
                        } else {
                            Style::default().fg(Colors::FG_PRIMARY)
                        },
                    ),
                    Span::styled(
                        format!("< {value} >"),
                        if selected {
                            Style::default()
                                .fg(Colors::SECONDARY)
                                .add_modifier(Modifier::BOLD)
                        } else {
                            Style::default().fg(Colors::FG_SECONDARY)
                        },
                    ),
                ])
            };
            ListItem::new(line)
        })
        .collect();

    let form = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Questionnaire"),
    );
    f.render_widget(form, chunks[0]);

    let hint = Paragraph::new("Up/Down select a question, Left/Right change the answer")
        .alignment(Alignment::Center)
        .style(Styles::hint());
    f.render_widget(hint, chunks[1]);
}

// ============================================================================
// Done
// ============================================================================

pub fn render_done_screen(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Thank you! Your answers have been saved.",
            Styles::success(),
        )]),
        Line::from(""),
        Line::from(vec![Span::styled("  Debriefing", Styles::title())]),
        Line::from(""),
        Line::from("  The other side of the negotiation was simulated."),
        Line::from("  This study examines how the speed of acceptance affects"),
        Line::from("  satisfaction with a negotiation outcome."),
        Line::from("  Your data is anonymous."),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Press Enter to close.",
            Styles::hint(),
        )]),
    ];

    let done = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Finished"))
        .wrap(Wrap { trim: false });
    f.render_widget(done, area);
}
