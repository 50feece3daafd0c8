//! Wizard Flow Integration Tests
//!
//! Drives the controller through the public API with a scripted advisor.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{app_with, sample_analysis, ScriptedAdvisor};
use mindease::core::{Rejected, RequestKind, Sentiment, Step, WizardState};

// ============================================================================
// Full Walkthrough
// ============================================================================

#[tokio::test]
async fn test_walkthrough_from_intro_to_cope() {
    let advisor = Arc::new(ScriptedAdvisor::default());
    let mut app = app_with(&advisor);
    assert_eq!(app.step(), Step::Intro);

    app.start();
    assert_eq!(app.step(), Step::Face);

    app.submit("I have three exams this week".to_string());
    assert!(app.is_busy());
    app.settle().await;

    assert_eq!(app.step(), Step::Deconstruct);
    assert!(!app.is_busy());
    let analysis = app.state.analysis().expect("analysis stored");
    assert!(Sentiment::ALL.contains(&analysis.sentiment));

    app.next();
    assert_eq!(app.step(), Step::Release);

    app.request_plan();
    app.settle().await;

    assert_eq!(app.step(), Step::Cope);
    let plan = app.state.plan().expect("plan stored");
    let json = serde_json::to_value(plan).unwrap();
    assert!(json["immediateSteps"].is_array());
    assert!(json["longTermStrategies"].is_array());
    assert!(json["usmResources"].is_array());

    assert_eq!(advisor.analyze_calls(), 1);
    assert_eq!(advisor.plan_calls(), 1);
}

#[tokio::test]
async fn test_reset_after_cope_starts_over() {
    let advisor = Arc::new(ScriptedAdvisor::default());
    let mut app = app_with(&advisor);

    app.start();
    app.submit("rent is due".to_string());
    app.settle().await;
    app.next();
    app.request_plan();
    app.settle().await;
    assert_eq!(app.step(), Step::Cope);

    app.reset();
    assert_eq!(app.step(), Step::Intro);
    assert!(app.state.analysis().is_none());
    assert!(app.state.plan().is_none());
}

// ============================================================================
// Failure Handling
// ============================================================================

#[tokio::test]
async fn test_failed_analysis_stays_on_face() {
    let advisor = Arc::new(ScriptedAdvisor { fail_analyze: true, ..ScriptedAdvisor::default() });
    let mut app = app_with(&advisor);

    app.start();
    app.submit("everything at once".to_string());
    app.settle().await;

    assert_eq!(app.step(), Step::Face);
    assert!(!app.is_busy());
    assert!(app.state.analysis().is_none());

    // A retry is a fresh request.
    app.submit("everything at once".to_string());
    app.settle().await;
    assert_eq!(advisor.analyze_calls(), 2);
}

#[tokio::test]
async fn test_failed_plan_stays_on_release() {
    let advisor = Arc::new(ScriptedAdvisor { fail_plan: true, ..ScriptedAdvisor::default() });
    let mut app = app_with(&advisor);

    app.start();
    app.submit("deadlines".to_string());
    app.settle().await;
    app.next();
    app.request_plan();
    app.settle().await;

    assert_eq!(app.step(), Step::Release);
    assert!(!app.is_busy());
    assert!(app.state.plan().is_none());
    // The analysis survives the failed plan.
    assert!(app.state.analysis().is_some());
}

#[tokio::test]
async fn test_plan_request_outside_release_makes_no_call() {
    let advisor = Arc::new(ScriptedAdvisor::default());
    let mut app = app_with(&advisor);

    app.request_plan();
    app.start();
    app.request_plan();
    app.settle().await;

    assert_eq!(app.step(), Step::Face);
    assert_eq!(advisor.plan_calls(), 0);
}

#[tokio::test]
async fn test_reset_discards_response_in_flight() {
    let advisor = Arc::new(ScriptedAdvisor::default());
    let mut app = app_with(&advisor);

    app.start();
    app.submit("group project".to_string());
    app.reset();
    app.start();
    assert!(!app.is_busy());

    // Drive the abandoned request to completion and drain it.
    let drained = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            tokio::task::yield_now().await;
            let drained = app.poll_completions();
            if drained > 0 {
                break drained;
            }
        }
    })
    .await
    .expect("abandoned request never completed");

    assert_eq!(drained, 1);
    assert_eq!(advisor.analyze_calls(), 1);
    assert_eq!(app.step(), Step::Face);
    assert!(!app.is_busy());
    assert!(app.state.analysis().is_none());
}

// ============================================================================
// State Machine Through the Public API
// ============================================================================

#[test]
fn test_state_machine_without_runtime() {
    let state = WizardState::new().start().unwrap();
    let (busy, ticket) = state.begin_analysis().unwrap();
    assert_eq!(ticket.kind(), RequestKind::Analysis);
    assert!(matches!(busy.begin_analysis(), Err(Rejected::Busy(RequestKind::Analysis))));

    let analysed = busy.complete_analysis(ticket, sample_analysis("exams")).unwrap();
    assert_eq!(analysed.step(), Step::Deconstruct);

    let release = analysed.next().unwrap();
    let (waiting, ticket, analysis) = release.begin_plan().unwrap();
    assert_eq!(analysis.categories.len(), 2);

    let failed = waiting.fail_request(ticket).unwrap();
    assert_eq!(failed.step(), Step::Release);
    assert!(!failed.is_busy());
}

#[test]
fn test_ticket_from_before_reset_is_stale() {
    let state = WizardState::new().start().unwrap();
    let (busy, ticket) = state.begin_analysis().unwrap();
    let fresh = busy.reset();

    assert!(matches!(
        fresh.complete_analysis(ticket, sample_analysis("late")),
        Err(Rejected::Stale(_))
    ));
}
