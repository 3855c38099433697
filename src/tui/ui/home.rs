//! Home screen: service status and quick actions.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::styles::ClinicTheme;

/// Home screen state.
#[derive(Debug, Clone, Copy, Default)]
pub struct HomeState {
    /// Whether the prediction endpoint is configured.
    pub endpoint_configured: bool,
    /// Submissions completed this session.
    pub completed: usize,
}

/// Render the home screen.
pub fn render_home(f: &mut Frame, area: Rect, state: &HomeState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
        ])
        .split(area);

    render_header(f, chunks[0]);
    render_content(f, chunks[1], state);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ClinicTheme::text()),
        Span::styled("Cardioscreen", ClinicTheme::title()),
        Span::styled(" │ ", ClinicTheme::text_muted()),
        Span::styled(
            "Heart Disease Risk Screening",
            ClinicTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_content(f: &mut Frame, area: Rect, state: &HomeState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Status
            Constraint::Min(0),    // Actions
        ])
        .margin(1)
        .split(area);

    let (endpoint_icon, endpoint_style) = if state.endpoint_configured {
        ("OK", ClinicTheme::success())
    } else {
        ("MISSING", ClinicTheme::danger())
    };

    let mut status_lines = vec![
        Line::from(vec![
            Span::styled(format!("  {endpoint_icon} "), endpoint_style),
            Span::styled("Prediction endpoint", ClinicTheme::text()),
        ]),
        Line::from(vec![
            Span::styled("  Screenings this session: ", ClinicTheme::text_secondary()),
            Span::styled(state.completed.to_string(), ClinicTheme::text()),
        ]),
    ];
    if !state.endpoint_configured {
        status_lines.push(Line::from(Span::styled(
            "  Set CARDIOSCREEN_API_URL and restart to enable submissions.",
            ClinicTheme::text_muted(),
        )));
    }

    let status = Paragraph::new(status_lines).block(
        Block::default()
            .title(Span::styled(" Service Status ", ClinicTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(ClinicTheme::border()),
    );
    f.render_widget(status, chunks[0]);

    let actions = vec![
        Line::from(vec![
            Span::styled("[N] ", ClinicTheme::key_hint()),
            Span::styled("New Screening", ClinicTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[Q] ", ClinicTheme::key_hint()),
            Span::styled("Quit", ClinicTheme::key_desc()),
        ]),
    ];
    let actions = Paragraph::new(actions).block(
        Block::default()
            .title(Span::styled(" Quick Actions ", ClinicTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(ClinicTheme::border()),
    );
    f.render_widget(actions, chunks[1]);
}
