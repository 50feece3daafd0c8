//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use mindease::ai::{Advisor, AdvisorError, AdvisorResult};
use mindease::core::{ActionPlan, Sentiment, StressAnalysis, StressCategory, SupportResource};
use mindease::{App, Config};
use tokio::runtime::Handle;

/// Advisor double that answers from fixed data and counts calls.
#[derive(Default)]
pub struct ScriptedAdvisor {
    pub fail_analyze: bool,
    pub fail_plan: bool,
    pub analyze_calls: AtomicUsize,
    pub plan_calls: AtomicUsize,
}

impl ScriptedAdvisor {
    pub fn analyze_calls(&self) -> usize {
        self.analyze_calls.load(Ordering::SeqCst)
    }

    pub fn plan_calls(&self) -> usize {
        self.plan_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Advisor for ScriptedAdvisor {
    async fn analyze(&self, text: &str) -> AdvisorResult<StressAnalysis> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_analyze {
            return Err(AdvisorError::Api { status: 503, body: "unavailable".to_string() });
        }
        Ok(sample_analysis(text))
    }

    async fn plan(&self, _analysis: &StressAnalysis) -> AdvisorResult<ActionPlan> {
        self.plan_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_plan {
            return Err(AdvisorError::Malformed("missing fields".to_string()));
        }
        Ok(ActionPlan {
            immediate_steps: vec!["Drink some water".to_string(), "Write a to-do list".to_string()],
            long_term_strategies: vec!["Spread revision across the week".to_string()],
            usm_resources: vec![SupportResource {
                name: "Counselling Unit".to_string(),
                contact: "04-653 0000".to_string(),
                link: "https://example.org/counselling".to_string(),
            }],
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub fn sample_analysis(text: &str) -> StressAnalysis {
    StressAnalysis {
        categories: vec![
            StressCategory {
                name: "Academic".to_string(),
                score: 85.0,
                description: format!("Mentioned: {text}"),
            },
            StressCategory {
                name: "Sleep".to_string(),
                score: 40.0,
                description: "Late nights before exams".to_string(),
            },
        ],
        summary: "Exam pressure is the main load.".to_string(),
        sentiment: Sentiment::Overwhelmed,
    }
}

/// App wired to the current tokio runtime.
pub fn app_with(advisor: &Arc<ScriptedAdvisor>) -> App {
    let advisor: Arc<dyn Advisor> = Arc::clone(advisor) as Arc<dyn Advisor>;
    App::new(Config::default(), advisor, Handle::current())
}
