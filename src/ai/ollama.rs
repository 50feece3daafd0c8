//! Ollama local LLM integration.
//!
//! Implements the Advisor trait for Ollama. Requests use `format: "json"` so
//! the model is constrained to emit a JSON document.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{prompt, Advisor, AdvisorResult};
use crate::core::{ActionPlan, AiConfig, StressAnalysis};

/// Ollama API advisor for a local LLM.
pub struct OllamaAdvisor {
    client: Client,
    base_url: String,
    model: String,
    temperature: Option<f32>,
}

impl OllamaAdvisor {
    /// Create an Ollama advisor from configuration.
    ///
    /// `OLLAMA_HOST` overrides the configured base URL. The top-level
    /// `ai.model` wins over `ai.ollama.model`.
    pub fn from_config(config: &AiConfig) -> AdvisorResult<Self> {
        let base_url =
            std::env::var("OLLAMA_HOST").unwrap_or_else(|_| config.ollama.base_url.clone());

        Ok(Self {
            client: super::http_client(config)?,
            base_url: normalize_base_url(&base_url),
            model: config.model.clone().unwrap_or_else(|| config.ollama.model.clone()),
            temperature: config.temperature,
        })
    }

    /// Create with a specific base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn build_request(&self, user_prompt: String) -> OllamaRequest {
        OllamaRequest {
            model: self.model.clone(),
            system: prompt::SYSTEM_PROMPT.to_string(),
            prompt: user_prompt,
            format: "json".to_string(),
            stream: false,
            options: self.temperature.map(|temperature| OllamaOptions { temperature }),
        }
    }

    /// Make a request to the Ollama API.
    async fn request(&self, user_prompt: String) -> AdvisorResult<String> {
        let request = self.build_request(user_prompt);

        tracing::debug!(model = %self.model, base_url = %self.base_url, "Sending Ollama request");

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?;

        let response: OllamaResponse = super::check_status(response).await?.json().await?;
        Ok(response.response)
    }
}

#[async_trait]
impl Advisor for OllamaAdvisor {
    async fn analyze(&self, text: &str) -> AdvisorResult<StressAnalysis> {
        let raw = self.request(prompt::analysis_prompt(text)).await?;
        prompt::decode_analysis(&raw)
    }

    async fn plan(&self, analysis: &StressAnalysis) -> AdvisorResult<ActionPlan> {
        let raw = self.request(prompt::plan_prompt(analysis)?).await?;
        prompt::decode_plan(&raw)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Ollama API request structure.
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    system: String,
    prompt: String,
    format: String,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Ollama API response structure.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

/// Trim trailing slashes and default to `http://` for bare `host:port` values.
fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}
