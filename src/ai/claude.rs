//! Claude API integration.
//!
//! Implements the Advisor trait for Claude.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{prompt, Advisor, AdvisorError, AdvisorResult};
use crate::core::{ActionPlan, AiConfig, StressAnalysis};

const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Claude API advisor.
pub struct ClaudeAdvisor {
    client: Client,
    api_key: String,
    model: String,
    temperature: Option<f32>,
}

impl ClaudeAdvisor {
    /// Create a Claude advisor from configuration.
    ///
    /// Reads API key from ANTHROPIC_API_KEY environment variable.
    pub fn from_config(config: &AiConfig) -> AdvisorResult<Self> {
        let api_key = super::api_key_from_env("ANTHROPIC_API_KEY")?;

        Ok(Self {
            client: super::http_client(config)?,
            api_key,
            model: config.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: config.temperature,
        })
    }

    fn build_request(&self, user_message: String) -> ClaudeRequest {
        ClaudeRequest {
            model: self.model.clone(),
            max_tokens: 2048,
            system: prompt::SYSTEM_PROMPT.to_string(),
            temperature: self.temperature,
            messages: vec![Message { role: "user".to_string(), content: user_message }],
        }
    }

    /// Make a request to the Claude API.
    async fn request(&self, user_message: String) -> AdvisorResult<String> {
        let request = self.build_request(user_message);

        tracing::debug!(model = %self.model, "Sending Claude request");

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let response: ClaudeResponse = super::check_status(response).await?.json().await?;

        response
            .content
            .into_iter()
            .find_map(|c| c.text)
            .ok_or(AdvisorError::EmptyResponse("Claude"))
    }
}

#[async_trait]
impl Advisor for ClaudeAdvisor {
    async fn analyze(&self, text: &str) -> AdvisorResult<StressAnalysis> {
        let raw = self.request(prompt::analysis_prompt(text)).await?;
        prompt::decode_analysis(&raw)
    }

    async fn plan(&self, analysis: &StressAnalysis) -> AdvisorResult<ActionPlan> {
        let raw = self.request(prompt::plan_prompt(analysis)?).await?;
        prompt::decode_plan(&raw)
    }

    fn name(&self) -> &str {
        "claude"
    }
}

/// Claude API request structure.
#[derive(Debug, Serialize)]
struct ClaudeRequest {
    model: String,
    max_tokens: u32,
    system: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    messages: Vec<Message>,
}

/// Message in a Claude request.
#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

/// Claude API response structure.
#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    content: Vec<ContentBlock>,
}

/// Content block in a Claude response. Non-text blocks carry no `text`.
#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}
