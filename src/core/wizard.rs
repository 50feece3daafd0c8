//! The wizard state machine.
//!
//! [`WizardState`] is an immutable record. Every transition borrows the
//! current state and returns its successor, or a [`Rejected`] reason when
//! the action does not apply. Nothing else writes to the record.
//!
//! Flow: `Intro -> Face -> Deconstruct -> Release -> Cope`, with `reset`
//! returning to `Intro` from anywhere.
//!
//! Outbound requests are tracked with a [`Ticket`]. A reset bumps the epoch,
//! so a completion that arrives after a reset no longer matches and is
//! rejected as stale instead of mutating the fresh session.

use std::fmt;
use std::sync::Arc;

use super::{ActionPlan, Step, StressAnalysis};

/// Which advisor call a ticket belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Analysis,
    Plan,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Analysis => f.write_str("analysis"),
            Self::Plan => f.write_str("plan"),
        }
    }
}

/// Handle for one in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    epoch: u64,
    kind: RequestKind,
}

impl Ticket {
    /// The request this ticket was issued for.
    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    /// Session epoch the ticket was issued in.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Why an action was not applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejected {
    #[error("'{action}' is not available on step {step}")]
    WrongStep { action: &'static str, step: Step },

    #[error("a {0} request is already in flight")]
    Busy(RequestKind),

    #[error("no analysis available to plan from")]
    MissingAnalysis,

    #[error("stale {} completion from epoch {}", .0.kind, .0.epoch)]
    Stale(Ticket),
}

/// Snapshot of the whole wizard session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardState {
    step: Step,
    analysis: Option<Arc<StressAnalysis>>,
    plan: Option<Arc<ActionPlan>>,
    pending: Option<RequestKind>,
    epoch: u64,
}

impl WizardState {
    /// A fresh session on the intro step.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn analysis(&self) -> Option<&StressAnalysis> {
        self.analysis.as_deref()
    }

    pub fn plan(&self) -> Option<&ActionPlan> {
        self.plan.as_deref()
    }

    /// Whether a request is in flight.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// The kind of request currently in flight.
    pub fn pending(&self) -> Option<RequestKind> {
        self.pending
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// `Intro -> Face`.
    pub fn start(&self) -> Result<Self, Rejected> {
        self.expect_step("start", Step::Intro)?;
        Ok(Self { step: Step::Face, ..self.clone() })
    }

    /// Mark an analysis request as in flight.
    ///
    /// The caller must send the user's text to the advisor and report back
    /// with [`complete_analysis`](Self::complete_analysis) or
    /// [`fail_request`](Self::fail_request) using the returned ticket.
    pub fn begin_analysis(&self) -> Result<(Self, Ticket), Rejected> {
        self.expect_step("submit", Step::Face)?;
        self.expect_idle()?;

        let ticket = self.issue(RequestKind::Analysis);
        Ok((Self { pending: Some(RequestKind::Analysis), ..self.clone() }, ticket))
    }

    /// `Face -> Deconstruct` once the analysis has arrived.
    pub fn complete_analysis(
        &self,
        ticket: Ticket,
        analysis: StressAnalysis,
    ) -> Result<Self, Rejected> {
        self.expect_ticket(ticket, RequestKind::Analysis)?;

        Ok(Self {
            step: Step::Deconstruct,
            analysis: Some(Arc::new(analysis)),
            pending: None,
            ..self.clone()
        })
    }

    /// `Deconstruct -> Release`.
    pub fn next(&self) -> Result<Self, Rejected> {
        self.expect_step("next", Step::Deconstruct)?;
        if self.analysis.is_none() {
            return Err(Rejected::MissingAnalysis);
        }
        Ok(Self { step: Step::Release, ..self.clone() })
    }

    /// Mark a plan request as in flight.
    ///
    /// Returns the stored analysis to send. Without an analysis nothing is
    /// issued and the step stays where it is.
    pub fn begin_plan(&self) -> Result<(Self, Ticket, Arc<StressAnalysis>), Rejected> {
        self.expect_step("generate plan", Step::Release)?;
        let analysis = self.analysis.clone().ok_or(Rejected::MissingAnalysis)?;
        self.expect_idle()?;

        let ticket = self.issue(RequestKind::Plan);
        Ok((Self { pending: Some(RequestKind::Plan), ..self.clone() }, ticket, analysis))
    }

    /// `Release -> Cope` once the plan has arrived.
    pub fn complete_plan(&self, ticket: Ticket, plan: ActionPlan) -> Result<Self, Rejected> {
        self.expect_ticket(ticket, RequestKind::Plan)?;

        Ok(Self { step: Step::Cope, plan: Some(Arc::new(plan)), pending: None, ..self.clone() })
    }

    /// Clear the busy flag after a failed request. The step does not change.
    pub fn fail_request(&self, ticket: Ticket) -> Result<Self, Rejected> {
        self.expect_ticket(ticket, ticket.kind)?;
        Ok(Self { pending: None, ..self.clone() })
    }

    /// Back to `Intro`, dropping analysis, plan and any in-flight request.
    pub fn reset(&self) -> Self {
        Self { epoch: self.epoch.wrapping_add(1), ..Self::default() }
    }

    fn issue(&self, kind: RequestKind) -> Ticket {
        Ticket { epoch: self.epoch, kind }
    }

    fn expect_step(&self, action: &'static str, step: Step) -> Result<(), Rejected> {
        if self.step == step {
            Ok(())
        } else {
            Err(Rejected::WrongStep { action, step: self.step })
        }
    }

    fn expect_idle(&self) -> Result<(), Rejected> {
        match self.pending {
            Some(kind) => Err(Rejected::Busy(kind)),
            None => Ok(()),
        }
    }

    fn expect_ticket(&self, ticket: Ticket, kind: RequestKind) -> Result<(), Rejected> {
        if ticket.epoch == self.epoch && ticket.kind == kind && self.pending == Some(kind) {
            Ok(())
        } else {
            Err(Rejected::Stale(ticket))
        }
    }
}
