//! Main TUI application state machine.
//!
//! Handles screen navigation, input events, and the background submission
//! worker. The event loop keeps polling while a request is outstanding, so
//! the interface stays responsive.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::{HttpConfig, HttpPredictionClient};
use crate::application::SubmissionService;
use crate::ports::PredictionBackend;

use super::ui::{
    form::{render_form, FormState},
    home::{render_home, HomeState},
    render_disclaimer,
    result::{render_result, ResultState},
};
use super::worker::{SubmissionProgress, SubmissionWorker, SubmissionWorkerHandle};

/// Current screen/view in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Form,
    Result,
}

/// Main application state.
pub struct App<B>
where
    B: PredictionBackend + 'static,
{
    screen: Screen,
    should_quit: bool,

    service: Arc<SubmissionService<B>>,

    home: HomeState,
    form: FormState,
    result: ResultState,

    /// Submission worker, while one is running.
    pending: Option<SubmissionWorkerHandle>,
}

impl App<HttpPredictionClient> {
    /// Create the application with the HTTP backend, reading endpoint
    /// configuration from the environment (composition root).
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self> {
        let config = HttpConfig::from_env();
        if config.endpoint.is_none() {
            tracing::warn!(
                "CARDIOSCREEN_API_URL is not set; submissions will fail until it is configured"
            );
        }
        let backend = HttpPredictionClient::new(config)
            .map_err(|e| anyhow!("Failed to build prediction client: {e}"))?;
        Ok(Self::with_backend(Arc::new(backend)))
    }
}

impl<B> App<B>
where
    B: PredictionBackend + 'static,
{
    /// Create the application over an injected backend (used by tests).
    #[must_use]
    pub fn with_backend(backend: Arc<B>) -> Self {
        let service = Arc::new(SubmissionService::new(backend));
        let home = HomeState {
            endpoint_configured: service.backend_configured(),
            completed: 0,
        };
        Self {
            screen: Screen::Home,
            should_quit: false,
            service,
            home,
            form: FormState::default(),
            result: ResultState::Idle,
            pending: None,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.poll_worker();

            terminal.draw(|f| {
                let area = f.area();
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(2)])
                    .split(area);

                match self.screen {
                    Screen::Home => render_home(f, chunks[0], &self.home),
                    Screen::Form => render_form(f, chunks[0], &self.form),
                    Screen::Result => render_result(f, chunks[0], &self.result),
                }

                render_disclaimer(f, chunks[1]);
            })?;

            // Short poll so the progress animation and worker updates stay live.
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key.code, key.modifiers);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Drain progress updates from the background submission worker.
    fn poll_worker(&mut self) {
        loop {
            let progress = match self.pending.as_ref().and_then(|w| w.try_recv()) {
                Some(p) => p,
                None => break,
            };

            match progress {
                SubmissionProgress::Sending => {
                    // Already in Sending state since the spawn; nothing to do.
                }
                SubmissionProgress::Complete(result) => {
                    self.result = ResultState::Complete { result };
                    self.pending = None;
                    self.home.completed += 1;
                    break;
                }
                SubmissionProgress::Failed(message) => {
                    self.result = ResultState::Failed { message };
                    self.pending = None;
                    break;
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Home => self.handle_home_key(key),
            Screen::Form => self.handle_form_key(key),
            Screen::Result => self.handle_result_key(key),
        }
    }

    fn handle_home_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.form.reset();
                self.screen = Screen::Form;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.screen = Screen::Home;
            }
            KeyCode::Up => {
                self.form.prev_field();
            }
            KeyCode::Down | KeyCode::Tab => {
                self.form.next_field();
            }
            KeyCode::Left => {
                self.form.cycle_choice(false);
            }
            KeyCode::Right => {
                self.form.cycle_choice(true);
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.form.load_sample();
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.form.reset();
                self.result = ResultState::Idle;
            }
            KeyCode::Char(c) => {
                self.form.input_char(c);
            }
            KeyCode::Backspace => {
                self.form.delete_char();
            }
            KeyCode::Delete => {
                self.form.clear_field();
            }
            KeyCode::Enter => {
                self.submit_form();
            }
            _ => {}
        }
    }

    fn handle_result_key(&mut self, key: KeyCode) {
        match &self.result {
            ResultState::Complete { .. } => match key {
                KeyCode::Enter | KeyCode::Esc => {
                    self.screen = Screen::Home;
                }
                KeyCode::Char('n') | KeyCode::Char('N') => {
                    self.form.reset();
                    self.result = ResultState::Idle;
                    self.screen = Screen::Form;
                }
                _ => {}
            },
            ResultState::Failed { .. } => match key {
                KeyCode::Enter => {
                    self.screen = Screen::Form;
                }
                KeyCode::Esc => {
                    self.screen = Screen::Home;
                }
                _ => {}
            },
            // No cancellation for an in-flight request; the operator waits.
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        // Only one submission per form instance may be outstanding.
        if self.pending.is_some() {
            self.form.notice = Some("A submission is already in flight".to_string());
            return;
        }

        match self.service.validate(&self.form.input) {
            Ok(typed) => {
                // A new cycle discards the previous result.
                self.result = ResultState::Sending {
                    started_at: Instant::now(),
                };
                self.screen = Screen::Result;
                self.pending = Some(SubmissionWorker::spawn(self.service.clone(), typed));

                // Drop raw patient values from UI state right away.
                self.form.clear_sensitive();
            }
            Err(errors) => {
                self.form.errors = errors;
            }
        }
    }
}
