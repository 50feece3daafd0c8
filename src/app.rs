//! Application state and lifecycle management.
//!
//! This module contains the `App` struct, the wizard controller. It owns the
//! current [`WizardState`], the text being typed on the confront step, and
//! the advisor used to fulfil analysis and plan requests.
//!
//! Requests run as tasks on a tokio runtime. Each task reports back over a
//! channel; completions are applied on the UI thread in [`App::tick`] (or
//! awaited directly with [`App::settle`]), so the state record has a single
//! writer.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::ai::{Advisor, AdvisorResult};
use crate::core::{ActionPlan, Config, Rejected, Step, StressAnalysis, Ticket, WizardState};
use crate::tui::Theme;

/// Result of one advisor call, tagged with the ticket it was issued under.
#[derive(Debug)]
pub struct Completion {
    pub ticket: Ticket,
    pub outcome: Outcome,
}

/// Payload of a finished request.
#[derive(Debug)]
pub enum Outcome {
    Analysis(AdvisorResult<StressAnalysis>),
    Plan(AdvisorResult<ActionPlan>),
}

/// Main application state.
pub struct App {
    /// Current wizard state record
    pub state: WizardState,

    /// Text typed on the confront step
    pub input: String,

    /// Cursor position in the input field, in characters
    pub cursor_position: usize,

    /// Vertical scroll offset for the result views
    pub scroll: u16,

    /// Whether the application should quit
    pub should_quit: bool,

    /// Application configuration
    pub config: Config,

    /// Current UI theme
    pub theme: Theme,

    /// Ticks since launch; drives the spinner and breathing cue
    pub tick_count: u64,

    advisor: Arc<dyn Advisor>,
    runtime: Handle,
    completions_tx: UnboundedSender<Completion>,
    completions_rx: UnboundedReceiver<Completion>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("state", &self.state)
            .field("advisor", &self.advisor.name())
            .field("should_quit", &self.should_quit)
            .finish_non_exhaustive()
    }
}

impl App {
    /// Create a new application instance.
    ///
    /// `runtime` is where advisor requests are spawned.
    pub fn new(config: Config, advisor: Arc<dyn Advisor>, runtime: Handle) -> Self {
        let theme = Self::resolve_theme(&config);
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        Self {
            state: WizardState::new(),
            input: String::new(),
            cursor_position: 0,
            scroll: 0,
            should_quit: false,
            config,
            theme,
            tick_count: 0,
            advisor,
            runtime,
            completions_tx,
            completions_rx,
        }
    }

    /// Resolve theme from configuration.
    fn resolve_theme(config: &Config) -> Theme {
        let mut theme = Theme::by_name(&config.ui.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %config.ui.theme, "Unknown theme, using default");
            Theme::default()
        });

        if let Some(ref custom) = config.ui.custom_colors {
            theme.apply_overrides(custom);
        }

        theme
    }

    /// Current step.
    pub fn step(&self) -> Step {
        self.state.step()
    }

    /// Whether a request is in flight.
    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    /// Name of the provider behind the advisor.
    pub fn advisor_name(&self) -> &str {
        self.advisor.name()
    }

    /// Leave the intro.
    pub fn start(&mut self) {
        let next = self.state.start();
        self.transition(next);
    }

    /// Send the typed text for analysis.
    ///
    /// The input is kept so it is still there if the request fails.
    pub fn submit_input(&mut self) {
        let text = self.input.clone();
        self.submit(text);
    }

    /// Send `text` for analysis. Ignored while a request is in flight.
    pub fn submit(&mut self, text: String) {
        let (state, ticket) = match self.state.begin_analysis() {
            Ok(issued) => issued,
            Err(reason) => return Self::log_rejection(&reason),
        };
        self.state = state;

        tracing::debug!(chars = text.chars().count(), "Requesting analysis");

        let advisor = Arc::clone(&self.advisor);
        let tx = self.completions_tx.clone();
        self.runtime.spawn(async move {
            let outcome = Outcome::Analysis(advisor.analyze(&text).await);
            let _ = tx.send(Completion { ticket, outcome });
        });
    }

    /// Move from the analysis to the release step.
    pub fn next(&mut self) {
        let next = self.state.next();
        self.transition(next);
    }

    /// Ask for an action plan built from the stored analysis.
    ///
    /// Without an analysis, or while busy, nothing is sent.
    pub fn request_plan(&mut self) {
        let (state, ticket, analysis) = match self.state.begin_plan() {
            Ok(issued) => issued,
            Err(reason) => return Self::log_rejection(&reason),
        };
        self.state = state;

        tracing::debug!("Requesting action plan");

        let advisor = Arc::clone(&self.advisor);
        let tx = self.completions_tx.clone();
        self.runtime.spawn(async move {
            let outcome = Outcome::Plan(advisor.plan(&analysis).await);
            let _ = tx.send(Completion { ticket, outcome });
        });
    }

    /// Start over from the intro. In-flight requests are abandoned.
    pub fn reset(&mut self) {
        if let Some(kind) = self.state.pending() {
            tracing::debug!(%kind, "Abandoning in-flight request");
        }
        self.state = self.state.reset();
        self.clear_input();
        self.scroll = 0;
    }

    /// Apply a finished request to the state.
    pub fn apply_completion(&mut self, completion: Completion) {
        let Completion { ticket, outcome } = completion;

        let next = match outcome {
            Outcome::Analysis(Ok(analysis)) => {
                tracing::info!(
                    provider = self.advisor.name(),
                    sentiment = %analysis.sentiment,
                    categories = analysis.categories.len(),
                    "Analysis received"
                );
                self.state.complete_analysis(ticket, analysis)
            }
            Outcome::Plan(Ok(plan)) => {
                tracing::info!(
                    provider = self.advisor.name(),
                    steps = plan.immediate_steps.len(),
                    resources = plan.usm_resources.len(),
                    "Action plan received"
                );
                self.state.complete_plan(ticket, plan)
            }
            Outcome::Analysis(Err(e)) | Outcome::Plan(Err(e)) => {
                tracing::warn!(
                    provider = self.advisor.name(),
                    kind = %ticket.kind(),
                    error = %e,
                    "Request failed"
                );
                self.state.fail_request(ticket)
            }
        };

        self.transition(next);
    }

    /// Apply every completion that has already arrived.
    ///
    /// Returns how many were drained, including stale ones that were discarded.
    pub fn poll_completions(&mut self) -> usize {
        let mut drained = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.apply_completion(completion);
            drained += 1;
        }
        drained
    }

    /// Wait for the in-flight request, if any, and apply its result.
    pub async fn settle(&mut self) {
        while self.state.is_busy() {
            match self.completions_rx.recv().await {
                Some(completion) => self.apply_completion(completion),
                None => break,
            }
        }
    }

    /// Periodic tick from the event loop.
    pub fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
        let _ = self.poll_completions();
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    fn transition(&mut self, next: Result<WizardState, Rejected>) {
        match next {
            Ok(state) => {
                if state.step() != self.state.step() {
                    tracing::debug!(from = %self.state.step(), to = %state.step(), "Step changed");
                    self.scroll = 0;
                }
                self.state = state;
            }
            Err(reason) => Self::log_rejection(&reason),
        }
    }

    fn log_rejection(reason: &Rejected) {
        tracing::debug!(%reason, "Action ignored");
    }

    // Input editing

    /// Insert a character at the cursor.
    pub fn enter_char(&mut self, c: char) {
        let index = self.byte_index();
        self.input.insert(index, c);
        self.cursor_position += 1;
    }

    /// Delete the character before the cursor.
    pub fn delete_char(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        self.cursor_position -= 1;
        let index = self.byte_index();
        self.input.remove(index);
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.cursor_position = (self.cursor_position + 1).min(self.input.chars().count());
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_position = self.input.chars().count();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor_position)
            .map_or(self.input.len(), |(i, _)| i)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::ai::AdvisorError;
    use crate::core::{Sentiment, StressCategory, SupportResource};

    /// Scripted advisor that counts calls and can be told to fail.
    #[derive(Default)]
    pub(crate) struct MockAdvisor {
        pub fail: bool,
        pub analyze_calls: AtomicUsize,
        pub plan_calls: AtomicUsize,
    }

    impl MockAdvisor {
        pub fn failing() -> Self {
            Self { fail: true, ..Self::default() }
        }
    }

    #[async_trait]
    impl Advisor for MockAdvisor {
        async fn analyze(&self, text: &str) -> AdvisorResult<StressAnalysis> {
            self.analyze_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AdvisorError::Malformed("scripted failure".to_string()));
            }
            Ok(StressAnalysis {
                categories: vec![StressCategory {
                    name: "Academic".to_string(),
                    score: 75.0,
                    description: text.to_string(),
                }],
                summary: "You have a lot on.".to_string(),
                sentiment: Sentiment::Anxious,
            })
        }

        async fn plan(&self, _analysis: &StressAnalysis) -> AdvisorResult<ActionPlan> {
            self.plan_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AdvisorError::EmptyResponse("mock"));
            }
            Ok(ActionPlan {
                immediate_steps: vec!["Take a walk".to_string()],
                long_term_strategies: vec!["Plan revision blocks".to_string()],
                usm_resources: vec![SupportResource {
                    name: "Counselling Unit".to_string(),
                    contact: "ext. 1234".to_string(),
                    link: "https://example.org/counselling".to_string(),
                }],
            })
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    pub(crate) fn app_with(advisor: Arc<MockAdvisor>) -> App {
        App::new(Config::default(), advisor, Handle::current())
    }

    #[tokio::test]
    async fn test_full_flow() {
        let advisor = Arc::new(MockAdvisor::default());
        let mut app = app_with(Arc::clone(&advisor));

        app.start();
        assert_eq!(app.step(), Step::Face);

        app.submit("I have three exams this week".to_string());
        assert!(app.is_busy());
        app.settle().await;
        assert_eq!(app.step(), Step::Deconstruct);
        assert!(!app.is_busy());

        app.next();
        assert_eq!(app.step(), Step::Release);

        app.request_plan();
        app.settle().await;
        assert_eq!(app.step(), Step::Cope);
        assert!(app.state.plan().is_some());

        assert_eq!(advisor.analyze_calls.load(Ordering::SeqCst), 1);
        assert_eq!(advisor.plan_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_analysis_stays_on_face_and_keeps_input() {
        let mut app = app_with(Arc::new(MockAdvisor::failing()));
        app.start();
        for c in "deadline".chars() {
            app.enter_char(c);
        }

        app.submit_input();
        app.settle().await;

        assert_eq!(app.step(), Step::Face);
        assert!(!app.is_busy());
        assert_eq!(app.input, "deadline");
    }

    #[tokio::test]
    async fn test_duplicate_submit_sends_one_request() {
        let advisor = Arc::new(MockAdvisor::default());
        let mut app = app_with(Arc::clone(&advisor));
        app.start();

        app.submit("one".to_string());
        app.submit("two".to_string());
        app.settle().await;

        assert_eq!(advisor.analyze_calls.load(Ordering::SeqCst), 1);
        assert_eq!(app.state.analysis().unwrap().categories[0].description, "one");
    }

    #[tokio::test]
    async fn test_plan_on_wrong_step_sends_nothing() {
        let advisor = Arc::new(MockAdvisor::default());
        let mut app = app_with(Arc::clone(&advisor));
        app.start();

        app.request_plan();
        assert!(!app.is_busy());
        assert_eq!(advisor.plan_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_late_completion_after_reset_is_ignored() {
        let mut app = app_with(Arc::new(MockAdvisor::default()));
        app.start();
        app.submit("exams".to_string());
        assert!(app.is_busy());

        app.reset();
        app.start();
        assert_eq!(app.step(), Step::Face);

        // Drain the abandoned task's completion by hand.
        let completion = app.completions_rx.recv().await.unwrap();
        app.apply_completion(completion);

        assert_eq!(app.step(), Step::Face);
        assert!(app.state.analysis().is_none());
    }

    #[tokio::test]
    async fn test_input_editing_is_char_aware() {
        let mut app = app_with(Arc::new(MockAdvisor::default()));
        for c in "héllo".chars() {
            app.enter_char(c);
        }
        app.move_cursor_left();
        app.move_cursor_left();
        app.delete_char();
        assert_eq!(app.input, "hélo");
        assert_eq!(app.cursor_position, 2);

        app.move_cursor_home();
        app.enter_char('>');
        assert_eq!(app.input, ">hélo");

        app.move_cursor_end();
        app.move_cursor_right();
        assert_eq!(app.cursor_position, 5);
    }
}
