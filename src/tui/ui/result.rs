//! Submission progress and prediction result view.

use std::time::Instant;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::domain::PredictionResult;
use crate::tui::styles::ClinicTheme;

/// View state for one submission cycle.
#[derive(Debug, Clone, Default)]
pub enum ResultState {
    /// No submission yet (or the previous one was cleared).
    #[default]
    Idle,
    /// Request outstanding; the timestamp drives the progress animation.
    Sending { started_at: Instant },
    /// Submission resolved.
    Complete { result: PredictionResult },
    /// Submission failed; carries the display message.
    Failed { message: String },
}

/// Render the submission/result screen.
pub fn render_result(f: &mut Frame, area: Rect, state: &ResultState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_header(f, chunks[0]);
    match state {
        ResultState::Idle => render_idle(f, chunks[1]),
        ResultState::Sending { started_at } => render_sending(f, chunks[1], *started_at),
        ResultState::Complete { result } => render_complete(f, chunks[1], result),
        ResultState::Failed { message } => render_failed(f, chunks[1], message),
    }
    render_footer(f, chunks[2], state);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ClinicTheme::text()),
        Span::styled("Risk Prediction", ClinicTheme::title()),
        Span::styled(" │ Remote Model Service", ClinicTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "No submission yet",
            ClinicTheme::text_secondary(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Enter patient data to request a prediction",
            ClinicTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_sending(f: &mut Frame, area: Rect, started_at: Instant) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .margin(2)
        .split(area);

    let label = Paragraph::new(Line::from(vec![
        Span::styled("Stage: ", ClinicTheme::text_secondary()),
        Span::styled("Requesting", ClinicTheme::focused()),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(label, chunks[0]);

    // Monotonic fake progress approaching 95% while the request is out.
    let elapsed = started_at.elapsed().as_secs_f64();
    let progress = 0.95 * (1.0 - (-elapsed / 2.5).exp());

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(ClinicTheme::border()),
        )
        .gauge_style(ClinicTheme::focused())
        .percent((progress * 100.0) as u16)
        .label(format!("{:.0}%", progress * 100.0));
    f.render_widget(gauge, chunks[1]);

    let desc = Paragraph::new(Line::from(Span::styled(
        "Waiting for the prediction service...",
        ClinicTheme::text_muted(),
    )))
    .alignment(Alignment::Center);
    f.render_widget(desc, chunks[2]);
}

fn render_complete(f: &mut Frame, area: Rect, result: &PredictionResult) {
    let block = Block::default()
        .title(Span::styled(" Prediction Result ", ClinicTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(ClinicTheme::border_focused());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Risk level
            Constraint::Length(4), // Positive probability gauge
            Constraint::Length(2), // Negative probability
            Constraint::Min(0),    // Timestamp
        ])
        .margin(1)
        .split(inner);

    let level = result.risk_level();
    let risk_display = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{level}"),
            ClinicTheme::risk(level).add_modifier(ratatui::style::Modifier::BOLD),
        )),
        Line::from(Span::styled(
            level.description(),
            ClinicTheme::text_secondary(),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(risk_display, chunks[0]);

    let positive = result.probability.positive;
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(
                    " Disease Probability ",
                    ClinicTheme::text_secondary(),
                ))
                .borders(Borders::ALL)
                .border_style(ClinicTheme::border()),
        )
        .gauge_style(ClinicTheme::risk(level))
        .percent((positive * 100.0) as u16)
        .label(format!("{:.1}%", positive * 100.0));
    f.render_widget(gauge, chunks[1]);

    let negative = Paragraph::new(Line::from(vec![
        Span::styled("No-disease probability: ", ClinicTheme::text_secondary()),
        Span::styled(
            format!("{:.1}%", result.probability.negative * 100.0),
            ClinicTheme::text(),
        ),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(negative, chunks[2]);

    let timestamp = Paragraph::new(Line::from(vec![
        Span::styled("Model timestamp: ", ClinicTheme::text_muted()),
        Span::styled(result.timestamp.clone(), ClinicTheme::text_muted()),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(timestamp, chunks[3]);
}

fn render_failed(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Submission failed", ClinicTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message.to_string(), ClinicTheme::text())),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to return to the form and retry.",
            ClinicTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(ClinicTheme::danger()),
    );

    f.render_widget(content, area);
}

fn render_footer(f: &mut Frame, area: Rect, state: &ResultState) {
    let content = match state {
        ResultState::Complete { .. } => Line::from(vec![
            Span::styled("[Enter] ", ClinicTheme::key_hint()),
            Span::styled("Home ", ClinicTheme::key_desc()),
            Span::styled("[N] ", ClinicTheme::key_hint()),
            Span::styled("New Screening", ClinicTheme::key_desc()),
        ]),
        ResultState::Failed { .. } => Line::from(vec![
            Span::styled("[Enter] ", ClinicTheme::key_hint()),
            Span::styled("Back to Form ", ClinicTheme::key_desc()),
            Span::styled("[Esc] ", ClinicTheme::key_hint()),
            Span::styled("Home", ClinicTheme::key_desc()),
        ]),
        _ => Line::from(vec![Span::styled(
            "Waiting for response...",
            ClinicTheme::text_muted(),
        )]),
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(footer, area);
}
