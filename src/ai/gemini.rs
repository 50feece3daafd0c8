//! Google Gemini integration.
//!
//! Uses `generateContent` with a JSON response mime type and a response
//! schema, so the service itself constrains the output shape.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{prompt, Advisor, AdvisorError, AdvisorResult};
use crate::core::{ActionPlan, AiConfig, StressAnalysis};

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini API advisor.
pub struct GeminiAdvisor {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: Option<f32>,
}

impl GeminiAdvisor {
    /// Create a Gemini advisor from configuration.
    ///
    /// Reads API key from GEMINI_API_KEY environment variable.
    pub fn from_config(config: &AiConfig) -> AdvisorResult<Self> {
        let api_key = super::api_key_from_env("GEMINI_API_KEY")?;

        Ok(Self {
            client: super::http_client(config)?,
            api_key,
            model: config.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: BASE_URL.to_string(),
            temperature: config.temperature,
        })
    }

    /// Create with a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }

    fn build_request(&self, user_prompt: String, schema: Value) -> GeminiRequest {
        GeminiRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiPart { text: prompt::SYSTEM_PROMPT.to_string() }],
            },
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart { text: user_prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                response_mime_type: "application/json".to_string(),
                response_schema: schema,
            },
        }
    }

    /// Make a request to the Gemini API and return the completion text.
    async fn request(&self, user_prompt: String, schema: Value) -> AdvisorResult<String> {
        let request = self.build_request(user_prompt, schema);

        tracing::debug!(model = %self.model, "Sending Gemini request");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let response: GeminiResponse = super::check_status(response).await?.json().await?;

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or(AdvisorError::EmptyResponse("Gemini"))
    }
}

#[async_trait]
impl Advisor for GeminiAdvisor {
    async fn analyze(&self, text: &str) -> AdvisorResult<StressAnalysis> {
        let raw = self.request(prompt::analysis_prompt(text), prompt::analysis_schema()).await?;
        prompt::decode_analysis(&raw)
    }

    async fn plan(&self, analysis: &StressAnalysis) -> AdvisorResult<ActionPlan> {
        let raw = self.request(prompt::plan_prompt(analysis)?, prompt::plan_schema()).await?;
        prompt::decode_plan(&raw)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// Gemini API request structure.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

/// Content block in a Gemini request.
#[derive(Debug, Serialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

/// Generation settings with structured output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    response_mime_type: String,
    response_schema: Value,
}

/// Gemini API response structure.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

/// Candidate in a Gemini response. Content is absent when the candidate was blocked.
#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}
