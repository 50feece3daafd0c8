//! Advisor integration module.
//!
//! The wizard delegates all interpretation to an external text-generation
//! service behind the two-operation [`Advisor`] trait:
//!
//! - `analyze`: free text to a [`StressAnalysis`]
//! - `plan`: a [`StressAnalysis`] to an [`ActionPlan`]
//!
//! Each call is exactly one outbound request. There is no caching,
//! deduplication, retry, or fallback to another provider.

mod claude;
mod gemini;
mod ollama;
pub mod prompt;

pub use claude::ClaudeAdvisor;
pub use gemini::GeminiAdvisor;
pub use ollama::OllamaAdvisor;

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::{ActionPlan, AiConfig, ProviderKind, StressAnalysis};

/// Result alias for advisor calls.
pub type AdvisorResult<T> = Result<T, AdvisorError>;

/// Trait for text-generation backends.
#[async_trait]
pub trait Advisor: Send + Sync {
    /// Break free text down into categorized stressors.
    async fn analyze(&self, text: &str) -> AdvisorResult<StressAnalysis>;

    /// Turn an analysis into concrete steps and resources.
    async fn plan(&self, analysis: &StressAnalysis) -> AdvisorResult<ActionPlan>;

    /// Get the provider name.
    fn name(&self) -> &str;
}

/// Advisor error types.
///
/// The wizard treats every variant the same way ("request failed"); the
/// distinction only matters for logs and the one-shot CLI commands.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("{0} not set")]
    MissingApiKey(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("No response from {0}")]
    EmptyResponse(&'static str),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Build the advisor selected by the configuration.
pub fn build_advisor(config: &AiConfig) -> AdvisorResult<Arc<dyn Advisor>> {
    let advisor: Arc<dyn Advisor> = match config.provider {
        ProviderKind::Gemini => Arc::new(GeminiAdvisor::from_config(config)?),
        ProviderKind::Claude => Arc::new(ClaudeAdvisor::from_config(config)?),
        ProviderKind::Ollama => Arc::new(OllamaAdvisor::from_config(config)?),
    };

    tracing::debug!(provider = advisor.name(), "Advisor ready");
    Ok(advisor)
}

/// Read a non-empty API key from the environment.
fn api_key_from_env(var: &'static str) -> AdvisorResult<String> {
    std::env::var(var)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or(AdvisorError::MissingApiKey(var))
}

/// Shared HTTP client honoring the configured timeout.
fn http_client(config: &AiConfig) -> AdvisorResult<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(config.timeout()).build()?)
}

/// Turn a non-success response into an [`AdvisorError::Api`].
async fn check_status(response: reqwest::Response) -> AdvisorResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(AdvisorError::Api { status: status.as_u16(), body })
}
