//! Integration tests for the submission workflow round trip.

mod common;

use postdeck_app::run_submission;
use postdeck_submit::{SubmissionMachine, SubmissionState};
use postdeck_ui::{DashboardState, Section, Theme};

#[test]
fn submission_workflow_tests_failure_reenables_and_keeps_selection() {
    let (client, envelopes) = common::submission_client(500);
    let selection = common::complete_selection();
    let mut submission = SubmissionMachine::new();
    let mut ui = DashboardState::new(Theme::Light);

    let result = run_submission(&client, &mut submission, &selection, &mut ui);
    assert!(result.is_err());
    assert_eq!(submission.state(), SubmissionState::Ready { enabled: true });
    assert!(ui.submit_error.is_some());
    assert!(!ui.locked);

    // Selection untouched: a retry sends the identical payload.
    let retry = run_submission(&client, &mut submission, &selection, &mut ui);
    assert!(retry.is_err());

    let sent = envelopes.lock().expect("envelope log lock");
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].body, sent[1].body);
    assert_eq!(sent[0].idempotency_key, sent[1].idempotency_key);

    let body: serde_json::Value =
        serde_json::from_slice(&sent[0].body).expect("payload body should be json");
    assert_eq!(body["caption"], "Launch day");
    assert_eq!(body["imageUrl"], "https://img.example.test/u1.png");
    assert_eq!(body["postTime"], "2025-06-01T10:00:00Z");
}

#[test]
fn submission_workflow_tests_success_locks_until_reload() {
    let (client, _envelopes) = common::submission_client(200);
    let selection = common::complete_selection();
    let mut submission = SubmissionMachine::new();
    let mut ui = DashboardState::new(Theme::Light);

    let report = run_submission(&client, &mut submission, &selection, &mut ui)
        .expect("submission should succeed");
    assert_eq!(report.status, 200);
    assert!(submission.is_locked());
    assert!(ui.locked);
    assert!(!ui.submit_visible);
    assert!(ui.refresh_visible);

    // A second submit attempt in the locked state has no observable effect.
    let again = run_submission(&client, &mut submission, &selection, &mut ui);
    assert!(again.is_err());
    for section in [
        Section::Generator,
        Section::Captions,
        Section::Images,
        Section::Schedule,
    ] {
        assert!(!ui.click_allowed(section));
    }
}

#[test]
fn submission_workflow_tests_incomplete_selection_is_rejected_before_flight() {
    let (client, envelopes) = common::submission_client(200);
    let selection = postdeck_core::Selection::new();
    let mut submission = SubmissionMachine::new();
    let mut ui = DashboardState::new(Theme::Light);

    let result = run_submission(&client, &mut submission, &selection, &mut ui);
    assert!(result.is_err());
    assert!(envelopes.lock().expect("envelope log lock").is_empty());
    assert!(matches!(
        submission.state(),
        SubmissionState::Ready { .. }
    ));
}
