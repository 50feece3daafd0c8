//! Structured results produced by the advisor.
//!
//! Both records use camelCase keys on the wire so they match the response
//! schema sent to the text-generation service.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper bound of the category score scale.
pub const MAX_SCORE: f64 = 100.0;

/// Overall emotional tone detected in the user's text.
///
/// The set is closed: anything else in a response is a shape error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Overwhelmed,
    Anxious,
    Fatigued,
    Uncertain,
}

impl Sentiment {
    /// Every accepted sentiment value.
    pub const ALL: [Self; 4] = [Self::Overwhelmed, Self::Anxious, Self::Fatigued, Self::Uncertain];

    /// Wire name of the sentiment.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Overwhelmed => "Overwhelmed",
            Self::Anxious => "Anxious",
            Self::Fatigued => "Fatigued",
            Self::Uncertain => "Uncertain",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single categorized stressor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressCategory {
    /// Category name (e.g. "Academic", "Financial")
    pub name: String,

    /// Intensity on a 0-100 scale
    pub score: f64,

    /// One or two sentences on how this category shows up for the user
    pub description: String,
}

impl StressCategory {
    /// Score as a 0.0..=1.0 ratio, clamped for gauges.
    pub fn ratio(&self) -> f64 {
        (self.score / MAX_SCORE).clamp(0.0, 1.0)
    }
}

/// Breakdown of the user's free text into categories, a summary and a sentiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StressAnalysis {
    /// Categories in the order the service ranked them
    pub categories: Vec<StressCategory>,

    /// Short empathetic summary
    pub summary: String,

    /// Dominant emotional tone
    pub sentiment: Sentiment,
}

impl StressAnalysis {
    /// Check the parts of the shape that serde cannot express.
    pub fn check_shape(&self) -> Result<(), String> {
        for category in &self.categories {
            if !category.score.is_finite() {
                return Err(format!("category '{}' has a non-finite score", category.name));
            }
        }
        Ok(())
    }

    /// Category with the highest score, if any.
    pub fn dominant_category(&self) -> Option<&StressCategory> {
        self.categories.iter().max_by(|a, b| a.score.total_cmp(&b.score))
    }
}

/// A campus support resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportResource {
    pub name: String,
    pub contact: String,
    pub link: String,
}

/// Concrete steps and resources generated from a [`StressAnalysis`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPlan {
    /// Things to do today
    pub immediate_steps: Vec<String>,

    /// Habits and strategies for the coming weeks
    pub long_term_strategies: Vec<String>,

    /// Universiti Sains Malaysia support services
    pub usm_resources: Vec<SupportResource>,
}

impl ActionPlan {
    /// Whether the plan carries no content at all.
    pub fn is_empty(&self) -> bool {
        self.immediate_steps.is_empty()
            && self.long_term_strategies.is_empty()
            && self.usm_resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_deserialization() {
        let json = r#"{
            "categories": [
                {"name": "Academic", "score": 82, "description": "Three exams in one week."},
                {"name": "Sleep", "score": 40.5, "description": "Late nights revising."}
            ],
            "summary": "Exam pressure is stacking up.",
            "sentiment": "Anxious"
        }"#;

        let analysis: StressAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.categories.len(), 2);
        assert_eq!(analysis.sentiment, Sentiment::Anxious);
        assert!(analysis.check_shape().is_ok());
        assert_eq!(analysis.dominant_category().map(|c| c.name.as_str()), Some("Academic"));
    }

    #[test]
    fn test_unknown_sentiment_is_rejected() {
        let json = r#"{"categories": [], "summary": "ok", "sentiment": "Happy"}"#;
        assert!(serde_json::from_str::<StressAnalysis>(json).is_err());
    }

    #[test]
    fn test_missing_summary_is_rejected() {
        let json = r#"{"categories": [], "sentiment": "Fatigued"}"#;
        assert!(serde_json::from_str::<StressAnalysis>(json).is_err());
    }

    #[test]
    fn test_non_finite_score_fails_shape_check() {
        let analysis = StressAnalysis {
            categories: vec![StressCategory {
                name: "Work".to_string(),
                score: f64::NAN,
                description: String::new(),
            }],
            summary: String::new(),
            sentiment: Sentiment::Overwhelmed,
        };
        assert!(analysis.check_shape().is_err());
    }

    #[test]
    fn test_ratio_is_clamped() {
        let mut category =
            StressCategory { name: "x".to_string(), score: 150.0, description: String::new() };
        assert!((category.ratio() - 1.0).abs() < f64::EPSILON);
        category.score = -5.0;
        assert!(category.ratio().abs() < f64::EPSILON);
        category.score = 25.0;
        assert!((category.ratio() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_plan_uses_camel_case_keys() {
        let plan = ActionPlan {
            immediate_steps: vec!["Drink water".to_string()],
            long_term_strategies: vec![],
            usm_resources: vec![SupportResource {
                name: "Counselling Unit".to_string(),
                contact: "04-000 0000".to_string(),
                link: "https://example.org".to_string(),
            }],
        };
        let json = serde_json::to_string(&plan).unwrap();
        assert!(json.contains("immediateSteps"));
        assert!(json.contains("longTermStrategies"));
        assert!(json.contains("usmResources"));
    }

    #[test]
    fn test_plan_requires_every_list() {
        assert!(serde_json::from_str::<ActionPlan>("{}").is_err());
        assert!(serde_json::from_str::<ActionPlan>(r#"{"immediateSteps": ["Walk"]}"#).is_err());

        let plan: ActionPlan = serde_json::from_str(
            r#"{"immediateSteps": ["Walk"], "longTermStrategies": [], "usmResources": []}"#,
        )
        .unwrap();
        assert_eq!(plan.immediate_steps, vec!["Walk"]);
        assert!(!plan.is_empty());
        assert!(ActionPlan::default().is_empty());
    }
}
