//! Prompt templates and response decoding shared by every provider.
//!
//! Providers differ only in transport. They all send the same instructions
//! and hand the raw completion text to [`decode_analysis`] or
//! [`decode_plan`], which locate the JSON object and shape-check it.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::{AdvisorError, AdvisorResult};
use crate::core::{ActionPlan, StressAnalysis};

/// System instruction used for both calls.
pub const SYSTEM_PROMPT: &str = r"You are MindEase, a calm and supportive wellbeing assistant for students and staff of Universiti Sains Malaysia (USM).
You never diagnose. You help people name what is weighing on them and turn it into small, realistic actions.
Always answer with a single JSON object and nothing else: no markdown, no code fences, no commentary.";

/// Build the user prompt for the analysis call.
pub fn analysis_prompt(text: &str) -> String {
    format!(
        r#"Read what the user wrote about their stress and break it down.

Return JSON with exactly this shape:
{{
  "categories": [{{"name": string, "score": number 0-100, "description": string}}],
  "summary": string,
  "sentiment": "Overwhelmed" | "Anxious" | "Fatigued" | "Uncertain"
}}

Rules:
1. Between 2 and 5 categories, most intense first
2. score is the intensity of that category from 0 to 100
3. summary is two or three empathetic sentences addressed to the user
4. sentiment must be exactly one of the four listed values

User wrote:
"""
{text}
""""#
    )
}

/// Build the user prompt for the plan call.
pub fn plan_prompt(analysis: &StressAnalysis) -> AdvisorResult<String> {
    let analysis_json = serde_json::to_string_pretty(analysis)
        .map_err(|e| AdvisorError::Malformed(format!("cannot encode analysis: {e}")))?;

    Ok(format!(
        r#"Using this stress analysis, write a practical action plan.

Analysis:
{analysis_json}

Return JSON with exactly this shape:
{{
  "immediateSteps": [string],
  "longTermStrategies": [string],
  "usmResources": [{{"name": string, "contact": string, "link": string}}]
}}

Rules:
1. immediateSteps: 3 to 5 actions doable within 24 hours
2. longTermStrategies: 3 to 5 habits for the coming weeks
3. usmResources: relevant USM support services such as the counselling unit or health campus clinic, with contact details and a link"#
    ))
}

/// Response schema for the analysis call, in the Gemini schema dialect.
pub fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "categories": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "score": { "type": "NUMBER" },
                        "description": { "type": "STRING" }
                    },
                    "required": ["name", "score", "description"]
                }
            },
            "summary": { "type": "STRING" },
            "sentiment": {
                "type": "STRING",
                "enum": ["Overwhelmed", "Anxious", "Fatigued", "Uncertain"]
            }
        },
        "required": ["categories", "summary", "sentiment"]
    })
}

/// Response schema for the plan call, in the Gemini schema dialect.
pub fn plan_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "immediateSteps": { "type": "ARRAY", "items": { "type": "STRING" } },
            "longTermStrategies": { "type": "ARRAY", "items": { "type": "STRING" } },
            "usmResources": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "contact": { "type": "STRING" },
                        "link": { "type": "STRING" }
                    },
                    "required": ["name", "contact", "link"]
                }
            }
        },
        "required": ["immediateSteps", "longTermStrategies", "usmResources"]
    })
}

/// Decode and shape-check an analysis completion.
pub fn decode_analysis(raw: &str) -> AdvisorResult<StressAnalysis> {
    let analysis: StressAnalysis = decode(raw)?;
    analysis.check_shape().map_err(AdvisorError::Malformed)?;
    Ok(analysis)
}

/// Decode and shape-check a plan completion.
pub fn decode_plan(raw: &str) -> AdvisorResult<ActionPlan> {
    decode(raw)
}

fn decode<T: DeserializeOwned>(raw: &str) -> AdvisorResult<T> {
    let body = extract_json(raw)
        .ok_or_else(|| AdvisorError::Malformed("no JSON object in response".to_string()))?;
    serde_json::from_str(body).map_err(|e| AdvisorError::Malformed(e.to_string()))
}

/// Find the outermost JSON object in a completion.
///
/// Models sometimes wrap the object in a code fence or a sentence of prose
/// despite the instructions; everything outside the first `{` and the last
/// `}` is dropped.
pub fn extract_json(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}
