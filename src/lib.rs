//! # MindEase
//!
//! Guided stress-management wizard for your terminal.
//!
//! MindEase walks you through four steps:
//!
//! 1. **Confront** - write down what is weighing on you
//! 2. **Analyze** - see it broken into categories with a summary and sentiment
//! 3. **Release** - a short paced-breathing pause
//! 4. **Resolve** - immediate steps, long-term strategies and USM support resources
//!
//! The interpretation is done by a text-generation service (Gemini, Claude or
//! a local Ollama model) behind the [`ai::Advisor`] trait. The wizard itself
//! is the [`core::WizardState`] state machine driven by [`App`].
//!
//! ## Quick Start
//!
//! ```bash
//! export GEMINI_API_KEY=...
//! mindease
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::significant_drop_tightening)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod ai;
pub mod app;
pub mod core;
pub mod tui;

pub use ai::{build_advisor, Advisor, AdvisorError, AdvisorResult};
pub use app::App;
pub use core::{ActionPlan, Config, Sentiment, Step, StressAnalysis, WizardState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "mindease";
