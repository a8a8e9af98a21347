//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Service integration
//! - The presentation-only "analyzing" pause before a result is revealed

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::rules::RuleTableEstimator;
use crate::application::AssessmentService;
use crate::config::AppConfig;

use super::ui::{
    assessment::{render_assessment, AssessmentState, AssessmentView},
    patient::{render_patient_form, PatientFormState},
    render_disclaimer,
};

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    PatientForm,
    Assessment,
}

/// A computed result waiting for the analyzing pause to elapse.
struct PendingReveal {
    started_at: Instant,
    view: AssessmentView,
}

/// Main application state
pub struct App {
    screen: Screen,
    should_quit: bool,

    service: AssessmentService<RuleTableEstimator>,

    /// How long the analyzing gauge runs before the result shows
    analysis_delay: Duration,

    patient_form_state: PatientFormState,
    /// Set once a form has been submitted
    assessment_state: Option<AssessmentState>,
    pending: Option<PendingReveal>,
}

impl App {
    /// Create a new application instance with the rule-table estimator.
    ///
    /// # Errors
    /// Currently infallible; kept fallible for parity with `run`.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let service = AssessmentService::new(Arc::new(RuleTableEstimator::new()));
        Ok(Self::with_dependencies(service, config.analysis_delay))
    }

    /// Create application with an injected service (Composition Root pattern).
    #[must_use]
    pub fn with_dependencies(
        service: AssessmentService<RuleTableEstimator>,
        analysis_delay: Duration,
    ) -> Self {
        Self {
            screen: Screen::PatientForm,
            should_quit: false,
            service,
            analysis_delay,
            patient_form_state: PatientFormState::default(),
            assessment_state: None,
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
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore the terminal even if the loop failed
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            self.tick(Instant::now());
            self.draw(terminal)?;

            // Short poll keeps the analyzing gauge animated
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> Result<()> {
        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(3)])
                .split(f.area());

            match (self.screen, &self.assessment_state) {
                (Screen::Assessment, Some(state)) => render_assessment(f, chunks[0], state),
                _ => render_patient_form(f, chunks[0], &self.patient_form_state),
            }

            render_disclaimer(f, chunks[1]);
        })?;
        Ok(())
    }

    /// Advance the analyzing gauge, revealing the result once the delay has passed.
    fn tick(&mut self, now: Instant) {
        let Some(pending) = &self.pending else {
            return;
        };

        let elapsed = now.saturating_duration_since(pending.started_at);
        if elapsed >= self.analysis_delay {
            if let Some(done) = self.pending.take() {
                self.assessment_state = Some(AssessmentState::Complete(Box::new(done.view)));
            }
            return;
        }

        let progress = elapsed.as_secs_f64() / self.analysis_delay.as_secs_f64();
        self.assessment_state = Some(AssessmentState::Analyzing { progress });
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::PatientForm => self.handle_patient_form_key(key),
            Screen::Assessment => self.handle_assessment_key(key),
        }
    }

    fn handle_patient_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.patient_form_state.prev_field();
            }
            KeyCode::Down | KeyCode::Tab => {
                self.patient_form_state.next_field();
            }
            KeyCode::Char(' ') => {
                self.patient_form_state.toggle();
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.patient_form_state.load_sample_data();
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.patient_form_state.reset();
            }
            KeyCode::Char(c) => {
                self.patient_form_state.input_char(c);
            }
            KeyCode::Backspace => {
                self.patient_form_state.delete_char();
            }
            KeyCode::Delete => {
                self.patient_form_state.clear_field();
            }
            KeyCode::Enter => {
                self.submit_patient_form(Instant::now());
            }
            _ => {}
        }
    }

    fn handle_assessment_key(&mut self, key: KeyCode) {
        match &self.assessment_state {
            Some(AssessmentState::Analyzing { .. }) => {
                if key == KeyCode::Esc {
                    self.pending = None;
                    self.assessment_state = None;
                    self.screen = Screen::PatientForm;
                }
            }
            Some(AssessmentState::Complete(_)) | None => match key {
                KeyCode::Char('n') | KeyCode::Char('N') => {
                    // dropping the old form zeroizes its buffers
                    self.patient_form_state = PatientFormState::default();
                    self.assessment_state = None;
                    self.screen = Screen::PatientForm;
                }
                KeyCode::Enter | KeyCode::Esc => {
                    self.screen = Screen::PatientForm;
                }
                KeyCode::Char('q') | KeyCode::Char('Q') => {
                    self.should_quit = true;
                }
                _ => {}
            },
        }
    }

    fn submit_patient_form(&mut self, now: Instant) {
        let record = match self.patient_form_state.to_patient_record() {
            Ok(record) => record,
            Err(e) => {
                self.patient_form_state.error_message = Some(e);
                return;
            }
        };

        match self.service.run_assessment(&record) {
            Ok(assessment) => {
                let view = AssessmentView {
                    comparison: self.service.comparison_score(&record),
                    assessment,
                };

                self.screen = Screen::Assessment;
                self.assessment_state = Some(AssessmentState::Analyzing { progress: 0.0 });
                self.pending = Some(PendingReveal {
                    started_at: now,
                    view,
                });
                self.tick(now);
            }
            Err(e) => {
                self.patient_form_state.error_message = Some(e.to_string());
            }
        }
    }
}
