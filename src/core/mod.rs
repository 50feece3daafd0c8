//! Core types for MindEase.
//!
//! This module contains the fundamental data structures used throughout
//! the application: wizard steps, the advisor's structured results,
//! the wizard state machine, and configuration.

mod config;
mod model;
mod step;
mod wizard;

pub use config::{AiConfig, Config, CustomColorsConfig, LoggingConfig, OllamaConfig, ProviderKind, UiConfig};
pub use model::{ActionPlan, Sentiment, StressAnalysis, StressCategory, SupportResource, MAX_SCORE};
pub use step::Step;
pub use wizard::{Rejected, RequestKind, Ticket, WizardState};
