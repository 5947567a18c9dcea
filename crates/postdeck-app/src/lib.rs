#![warn(missing_docs)]
//! # postdeck-app
//!
//! ## Purpose
//! Orchestrates session gating, generation, selection, submission, and UI
//! state for `postdeck`.
//!
//! ## Responsibilities
//! - Gate protected-page navigation on the session cookie.
//! - Drive the generation and submission workflows end to end, keeping the
//!   state machines and the dashboard projection consistent.
//! - Apply candidate picks and schedule input to the selection record.
//! - Provide log redaction for session material.
//!
//! ## Data flow
//! Session gate -> empty selection -> generation populates candidates ->
//! picks mutate selection -> submission freezes a payload and, on success,
//! locks the dashboard until reload.
//!
//! ## Ownership and lifetimes
//! Orchestration functions borrow the machines and state mutably for the
//! duration of one event; nothing here holds long-lived references.
//!
//! ## Error model
//! Subsystem failures are wrapped in [`AppError`]. Every error path leaves
//! the dashboard in a usable, retry-capable state; the one terminal state is
//! the intentional post-success lock.
//!
//! ## Security and privacy notes
//! - The session gate checks cookie presence only; see `postdeck-session`
//!   for the documented limitation.
//! - Cookie headers are redacted before reaching log output.

use log::{info, warn};
use postdeck_core::{CoreError, ScheduleTime, Selection};
use postdeck_generate::{GenerateClient, GenerateError, GenerationMachine, Topic};
use postdeck_session::{GuardDecision, LogoutResponse, SessionError, SessionPolicy};
use postdeck_submit::{SubmissionMachine, SubmitClient, SubmitError, SubmitReport};
use postdeck_ui::DashboardState;
use thiserror::Error;
use time::UtcOffset;

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("POSTDECK_VERSION");

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Gates one navigation request to the dashboard.
///
/// Delegates to the session guard and logs the decision with the cookie
/// header redacted.
pub fn guard_dashboard(
    policy: &SessionPolicy,
    path: &str,
    cookie_header: Option<&str>,
) -> GuardDecision {
    let decision = postdeck_session::guard_request(policy, path, cookie_header);
    let redacted_cookies = cookie_header
        .map(redact_sensitive)
        .unwrap_or_else(|| "none".to_string());
    info!(
        "session gate for {path}: {} (cookies: {redacted_cookies})",
        match &decision {
            GuardDecision::PassThrough => "pass",
            GuardDecision::Redirect { .. } => "redirect",
        },
    );
    decision
}

/// Handles one logout invocation.
pub fn logout(method: &str) -> LogoutResponse {
    let response = postdeck_session::handle_logout(method);
    info!("logout via {method}: status {}", response.status);
    response
}

/// Runs one generation round trip for raw topic input.
///
/// Order of effects mirrors the workflow contract: validate the topic first
/// (no state transition on rejection), then perform the full selection and
/// candidate reset, then issue the single request.
///
/// # Errors
/// Returns [`AppError::Generate`] for validation, in-flight, transport,
/// status, and contract failures. The dashboard reflects the failure before
/// the error is returned.
pub fn run_generation(
    topic_raw: &str,
    client: &GenerateClient,
    machine: &mut GenerationMachine,
    selection: &mut Selection,
    submission: &mut SubmissionMachine,
    ui: &mut DashboardState,
) -> Result<(), AppError> {
    let topic = match Topic::new(topic_raw) {
        Ok(topic) => topic,
        Err(error) => {
            ui.generation_rejected("Please enter a topic to generate content");
            return Err(error.into());
        }
    };

    machine.begin()?;
    selection.clear();
    submission.refresh_enabled(false);
    ui.reset_content();
    ui.begin_generation();

    match client.generate(&topic) {
        Ok(candidates) => {
            info!(
                "generation for {:?}: {} captions, {} images",
                topic.as_str(),
                candidates.captions().len(),
                candidates.images().len(),
            );
            machine.complete(candidates)?;
            ui.generation_populated();
            Ok(())
        }
        Err(error) => {
            warn!("generation for {:?} failed: {error}", topic.as_str());
            let message = format!("Failed to generate content: {error}");
            machine.fail(message.clone())?;
            ui.generation_failed(message);
            Err(error.into())
        }
    }
}

/// Applies a caption candidate pick to the selection.
///
/// # Errors
/// Returns [`AppError::Core`] with [`CoreError::UnknownCandidate`] when no
/// candidate exists at `index` (including when nothing is populated).
pub fn pick_caption(
    machine: &GenerationMachine,
    index: usize,
    selection: &mut Selection,
    submission: &mut SubmissionMachine,
    ui: &mut DashboardState,
) -> Result<(), AppError> {
    let caption = machine
        .candidates()
        .and_then(|candidates| candidates.caption_at(index))
        .ok_or(CoreError::UnknownCandidate { index })?;

    selection.select_caption(caption);
    sync_selection(selection, submission, ui);
    Ok(())
}

/// Applies an image candidate pick to the selection.
///
/// Render-broken candidates remain pickable; brokenness is presentation
/// metadata, not a workflow failure.
///
/// # Errors
/// Returns [`AppError::Core`] with [`CoreError::UnknownCandidate`] when no
/// candidate exists at `index`.
pub fn pick_image(
    machine: &GenerationMachine,
    index: usize,
    selection: &mut Selection,
    submission: &mut SubmissionMachine,
    ui: &mut DashboardState,
) -> Result<(), AppError> {
    let image = machine
        .candidates()
        .and_then(|candidates| candidates.image_at(index))
        .ok_or(CoreError::UnknownCandidate { index })?;

    selection.select_image(image.url.clone());
    sync_selection(selection, submission, ui);
    Ok(())
}

/// Applies schedule picker input to the selection.
///
/// # Errors
/// Returns [`AppError::Core`] when the input matches no supported format.
pub fn pick_schedule(
    input: &str,
    offset: UtcOffset,
    selection: &mut Selection,
    submission: &mut SubmissionMachine,
    ui: &mut DashboardState,
) -> Result<(), AppError> {
    let schedule = ScheduleTime::parse(input, offset)?;
    selection.select_schedule(schedule);
    sync_selection(selection, submission, ui);
    Ok(())
}

/// Flags a populated image candidate as failed-to-render.
///
/// # Errors
/// Returns [`AppError::Core`] for an out-of-range index and
/// [`AppError::Generate`] when nothing is populated.
pub fn mark_image_broken(machine: &mut GenerationMachine, index: usize) -> Result<(), AppError> {
    let candidates = machine
        .candidates_mut()
        .ok_or(GenerateError::IllegalTransition(
            "no populated candidates to mark",
        ))?;
    candidates.mark_image_broken(index)?;
    Ok(())
}

/// Runs one submission round trip for the current selection.
///
/// # Errors
/// Returns [`AppError::Submit`] for lock/in-flight rejections, incomplete
/// selections, transport failures and non-success statuses. The dashboard
/// reflects the failure before the error is returned; the selection is left
/// untouched so an identical retry is possible.
pub fn run_submission(
    client: &SubmitClient,
    submission: &mut SubmissionMachine,
    selection: &Selection,
    ui: &mut DashboardState,
) -> Result<SubmitReport, AppError> {
    let payload = match submission.begin(selection) {
        Ok(payload) => payload,
        Err(error) => {
            if matches!(error, SubmitError::Payload(CoreError::IncompleteSelection)) {
                ui.submission_rejected("Please select a caption, an image, and a schedule");
            }
            return Err(error.into());
        }
    };

    ui.begin_submission();

    match client.submit(&payload) {
        Ok(report) => {
            info!(
                "submission accepted with status {} (key {})",
                report.status, report.idempotency_key
            );
            submission.succeed()?;
            ui.lock();
            Ok(report)
        }
        Err(error) => {
            warn!("submission failed: {error}");
            submission.fail()?;
            ui.submission_failed(format!("Failed to submit selection: {error}"));
            Err(error.into())
        }
    }
}

/// Returns `true` when navigating away must surface the blocking prompt.
pub fn navigation_prompt_required(
    topic_draft: &str,
    selection: &Selection,
    ui: &DashboardState,
) -> bool {
    postdeck_ui::unload_prompt_required(topic_draft, selection.is_dirty(), ui.locked)
}

/// Consolidated dashboard snapshot for simple shell rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStatus {
    /// Whether the submit trigger is currently enabled.
    pub submit_enabled: bool,
    /// Whether the submit trigger is visible at all.
    pub submit_visible: bool,
    /// Whether the terminal locked state was entered.
    pub locked: bool,
    /// Caption counter text.
    pub captions: String,
    /// Image counter text.
    pub images: String,
    /// Schedule counter text.
    pub schedules: String,
    /// Persisted theme value.
    pub theme: String,
}

/// Projects dashboard UI state into a flat status snapshot.
pub fn project_dashboard_status(state: &DashboardState) -> DashboardStatus {
    DashboardStatus {
        submit_enabled: state.submit_enabled,
        submit_visible: state.submit_visible,
        locked: state.locked,
        captions: state.caption_counter.clone(),
        images: state.image_counter.clone(),
        schedules: state.schedule_counter.clone(),
        theme: state.theme.as_str().to_string(),
    }
}

/// Re-projects counters and trigger enablement after a selection mutation.
fn sync_selection(
    selection: &Selection,
    submission: &mut SubmissionMachine,
    ui: &mut DashboardState,
) {
    let complete = selection.is_complete();
    submission.refresh_enabled(complete);
    ui.apply_selection(selection.counts(), complete);
}

/// Redacts session material markers in log-safe output.
pub fn redact_sensitive(input: &str) -> String {
    let lower = input.to_ascii_lowercase();
    for marker in ["token", "cookie", "authorization", "password"] {
        if let Some(position) = lower.find(marker) {
            let prefix = &input[..position];
            return format!("{prefix}{marker}=<redacted>");
        }
    }

    input.to_string()
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Session guard or logout plumbing error.
    #[error("session error: {0}")]
    Session(#[from] SessionError),
    /// Generation workflow error.
    #[error("generation error: {0}")]
    Generate(#[from] GenerateError),
    /// Submission workflow error.
    #[error("submission error: {0}")]
    Submit(#[from] SubmitError),
    /// Core model error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

#[cfg(test)]
mod tests {
    //! Unit tests for log redaction.

    use super::*;

    #[test]
    fn redaction_strips_cookie_values() {
        let redacted = redact_sensitive("postdeck_token=abc123; theme=dark");
        assert!(!redacted.contains("abc123"));
        assert!(redacted.contains("<redacted>"));
    }

    #[test]
    fn redaction_leaves_plain_text_untouched() {
        assert_eq!(redact_sensitive("theme=dark"), "theme=dark");
    }
}
