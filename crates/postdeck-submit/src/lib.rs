#![warn(missing_docs)]
//! # postdeck-submit
//!
//! ## Purpose
//! Implements the submission workflow: defensive completeness validation,
//! the request to the external scheduling service, and the
//! `Ready -> Submitting -> {Locked, Ready}` state machine.
//!
//! ## Responsibilities
//! - Freeze a complete selection into one immutable payload per submit.
//! - Guard the trigger for the flight duration (no double submission).
//! - Enter the terminal `Locked` state on success; only a fresh machine
//!   (page reload) exits it.
//! - Derive deterministic idempotency keys for outbound payloads.
//!
//! ## Data flow
//! Complete [`postdeck_core::Selection`] -> [`SubmissionMachine::begin`] ->
//! [`SubmitClient::submit`] through [`SubmissionTransport`] ->
//! [`SubmissionMachine::succeed`] or [`SubmissionMachine::fail`].
//!
//! ## Ownership and lifetimes
//! The machine never holds the selection; it consumes completeness facts and
//! emits owned payload snapshots, so failed submissions leave the selection
//! untouched for retry.
//!
//! ## Error model
//! All failures surface as [`SubmitError`] variants, one per failure class;
//! `Locked` rejections are terminal-state signals, not errors a caller
//! should retry.
//!
//! ## Security and privacy notes
//! The scheduling endpoint must be HTTPS. Payloads carry user content only;
//! no session material is ever attached here.

use std::sync::Arc;

use postdeck_core::{CoreError, PostPayload, RequestPolicy, Selection, WireResponse};
use sha2::{Digest, Sha256};
use thiserror::Error;
use url::Url;

/// Submission workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    /// Awaiting a submit; `enabled` mirrors selection completeness.
    Ready {
        /// Whether the submit trigger is currently enabled.
        enabled: bool,
    },
    /// A submission request is in flight; the trigger is disabled.
    Submitting,
    /// Terminal post-success state. No programmatic unlock exists.
    Locked,
}

/// Submission state machine with explicit legal transitions.
#[derive(Debug, Clone)]
pub struct SubmissionMachine {
    state: SubmissionState,
}

impl SubmissionMachine {
    /// Creates a machine in `Ready` with the trigger disabled.
    pub fn new() -> Self {
        Self {
            state: SubmissionState::Ready { enabled: false },
        }
    }

    /// Returns the current state snapshot.
    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Returns `true` once the terminal locked state was entered.
    pub fn is_locked(&self) -> bool {
        matches!(self.state, SubmissionState::Locked)
    }

    /// Keeps trigger enablement consistent with selection completeness.
    ///
    /// Only meaningful while `Ready`; ignored in flight and after locking.
    pub fn refresh_enabled(&mut self, selection_complete: bool) {
        if let SubmissionState::Ready { .. } = self.state {
            self.state = SubmissionState::Ready {
                enabled: selection_complete,
            };
        }
    }

    /// Starts one submission, freezing the selection into a payload.
    ///
    /// Completeness is re-validated here regardless of the trigger flag,
    /// guarding against a UI race where the button was enabled but the
    /// selection changed underneath it.
    ///
    /// # Errors
    /// - [`SubmitError::Locked`] after a terminal success.
    /// - [`SubmitError::InFlight`] while a request is outstanding.
    /// - [`SubmitError::Payload`] when the selection is incomplete or the
    ///   schedule cannot be wire-formatted.
    pub fn begin(&mut self, selection: &Selection) -> Result<PostPayload, SubmitError> {
        match self.state {
            SubmissionState::Locked => return Err(SubmitError::Locked),
            SubmissionState::Submitting => return Err(SubmitError::InFlight),
            SubmissionState::Ready { .. } => {}
        }

        let payload = PostPayload::from_selection(selection)?;
        self.state = SubmissionState::Submitting;
        Ok(payload)
    }

    /// Applies the `Submitting -> Locked` transition.
    ///
    /// # Errors
    /// Returns [`SubmitError::IllegalTransition`] when not `Submitting`.
    pub fn succeed(&mut self) -> Result<(), SubmitError> {
        if !matches!(self.state, SubmissionState::Submitting) {
            return Err(SubmitError::IllegalTransition("succeed outside Submitting"));
        }

        self.state = SubmissionState::Locked;
        Ok(())
    }

    /// Applies the `Submitting -> Ready(enabled)` transition after a failed
    /// call. The selection was not touched, so the trigger re-enables for an
    /// identical retry.
    ///
    /// # Errors
    /// Returns [`SubmitError::IllegalTransition`] when not `Submitting`.
    pub fn fail(&mut self) -> Result<(), SubmitError> {
        if !matches!(self.state, SubmissionState::Submitting) {
            return Err(SubmitError::IllegalTransition("fail outside Submitting"));
        }

        self.state = SubmissionState::Ready { enabled: true };
        Ok(())
    }
}

impl Default for SubmissionMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// One outbound submission call handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionEnvelope {
    /// Destination endpoint URL.
    pub endpoint: String,
    /// Transport-enforced timeout in milliseconds.
    pub timeout_ms: u64,
    /// Deterministic key identifying this payload across retries.
    pub idempotency_key: String,
    /// JSON-encoded payload body.
    pub body: Vec<u8>,
}

/// Abstract transport used by the submission client.
pub trait SubmissionTransport: Send + Sync {
    /// Sends one submission request and returns the raw HTTP outcome.
    ///
    /// # Errors
    /// Returns [`SubmitError::Transport`] when no HTTP response was obtained.
    fn send(&self, envelope: &SubmissionEnvelope) -> Result<WireResponse, SubmitError>;
}

/// Report for one accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReport {
    /// HTTP status the scheduling service answered with.
    pub status: u16,
    /// Idempotency key attached to the call.
    pub idempotency_key: String,
}

/// Submission client that validates endpoint policy and classifies outcomes.
#[derive(Clone)]
pub struct SubmitClient {
    endpoint: String,
    policy: RequestPolicy,
    transport: Arc<dyn SubmissionTransport>,
}

impl SubmitClient {
    /// Creates a validated submission client.
    ///
    /// # Errors
    /// Returns [`SubmitError::InvalidEndpoint`] when the URL does not parse
    /// or is not HTTPS.
    pub fn new(
        endpoint: impl Into<String>,
        policy: RequestPolicy,
        transport: Arc<dyn SubmissionTransport>,
    ) -> Result<Self, SubmitError> {
        let endpoint = endpoint.into();
        validate_submit_endpoint(&endpoint)?;

        Ok(Self {
            endpoint,
            policy,
            transport,
        })
    }

    /// Sends one payload to the scheduling service.
    ///
    /// Success is signalled purely by HTTP status; the response body is
    /// ignored by design.
    ///
    /// # Errors
    /// - [`SubmitError::Transport`] when the call produced no response.
    /// - [`SubmitError::Status`] for non-2xx responses.
    /// - [`SubmitError::Payload`] when payload encoding fails.
    pub fn submit(&self, payload: &PostPayload) -> Result<SubmitReport, SubmitError> {
        let body = payload.to_json_bytes()?;
        let idempotency_key = idempotency_key_for_payload(payload);

        let response = self.transport.send(&SubmissionEnvelope {
            endpoint: self.endpoint.clone(),
            timeout_ms: self.policy.timeout_ms,
            idempotency_key: idempotency_key.clone(),
            body,
        })?;

        if !response.is_success() {
            return Err(SubmitError::Status(response.status));
        }

        Ok(SubmitReport {
            status: response.status,
            idempotency_key,
        })
    }

    /// Returns the configured scheduling endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Derives a deterministic idempotency key for one payload.
///
/// Identical payloads always hash to the same key, so a retry after a failed
/// call is recognizable server-side as the same logical submission.
pub fn idempotency_key_for_payload(payload: &PostPayload) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload.caption.as_bytes());
    hasher.update([0]);
    hasher.update(payload.image_url.as_str().as_bytes());
    hasher.update([0]);
    hasher.update(payload.post_time.as_bytes());
    hex::encode(hasher.finalize())
}

fn validate_submit_endpoint(endpoint: &str) -> Result<(), SubmitError> {
    let parsed = Url::parse(endpoint)
        .map_err(|error| SubmitError::InvalidEndpoint(format!("invalid endpoint url: {error}")))?;

    if parsed.scheme() != "https" {
        return Err(SubmitError::InvalidEndpoint(
            "scheduling endpoint must use https".to_string(),
        ));
    }

    Ok(())
}

/// Errors produced by the submission workflow.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Machine already reached the terminal locked state.
    #[error("submission is locked; reload to start over")]
    Locked,
    /// A submission request is already in flight.
    #[error("a submission request is already in flight")]
    InFlight,
    /// Transition requested from a state that does not allow it.
    #[error("illegal submission transition: {0}")]
    IllegalTransition(&'static str),
    /// Endpoint violates the HTTPS webhook policy.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// Call produced no HTTP response.
    #[error("submission transport failure: {0}")]
    Transport(String),
    /// Service answered with a non-success status.
    #[error("scheduling service returned status {0}")]
    Status(u16),
    /// Payload construction or encoding failure.
    #[error("payload failure: {0}")]
    Payload(#[from] CoreError),
}

#[cfg(test)]
mod tests {
    //! Unit tests for submission transitions and outcome classification.

    use postdeck_core::ScheduleTime;
    use time::UtcOffset;
    use url::Url;

    use super::*;

    fn complete_selection() -> Selection {
        let mut selection = Selection::new();
        selection.select_caption("Launch day");
        selection.select_image(Url::parse("https://img.example.test/1.png").expect("valid url"));
        selection.select_schedule(
            ScheduleTime::parse("2025-06-01T10:00", UtcOffset::UTC).expect("valid schedule"),
        );
        selection
    }

    #[test]
    fn success_locks_terminally() {
        let mut machine = SubmissionMachine::new();
        machine
            .begin(&complete_selection())
            .expect("begin should pass");
        machine.succeed().expect("succeed should pass");

        assert!(machine.is_locked());
        assert!(matches!(
            machine.begin(&complete_selection()),
            Err(SubmitError::Locked)
        ));
    }

    #[test]
    fn failure_reenables_with_selection_intact() {
        let selection = complete_selection();
        let mut machine = SubmissionMachine::new();

        let first = machine.begin(&selection).expect("begin should pass");
        machine.fail().expect("fail should pass");
        assert_eq!(
            machine.state(),
            SubmissionState::Ready { enabled: true }
        );

        let second = machine.begin(&selection).expect("retry should pass");
        assert_eq!(first, second);
    }

    #[test]
    fn begin_revalidates_completeness_defensively() {
        let mut machine = SubmissionMachine::new();
        machine.refresh_enabled(true); // stale UI enablement
        let incomplete = Selection::new();

        assert!(matches!(
            machine.begin(&incomplete),
            Err(SubmitError::Payload(CoreError::IncompleteSelection))
        ));
        assert!(matches!(machine.state(), SubmissionState::Ready { .. }));
    }

    #[test]
    fn in_flight_begin_is_rejected() {
        let mut machine = SubmissionMachine::new();
        machine
            .begin(&complete_selection())
            .expect("begin should pass");
        assert!(matches!(
            machine.begin(&complete_selection()),
            Err(SubmitError::InFlight)
        ));
    }

    #[test]
    fn idempotency_key_is_stable_for_identical_payloads() {
        let payload_a = PostPayload::from_selection(&complete_selection()).expect("payload");
        let payload_b = PostPayload::from_selection(&complete_selection()).expect("payload");
        assert_eq!(
            idempotency_key_for_payload(&payload_a),
            idempotency_key_for_payload(&payload_b)
        );
    }

    #[test]
    fn non_success_status_is_classified() {
        struct Failing;
        impl SubmissionTransport for Failing {
            fn send(&self, _envelope: &SubmissionEnvelope) -> Result<WireResponse, SubmitError> {
                Ok(WireResponse {
                    status: 503,
                    body: String::new(),
                })
            }
        }

        let client = SubmitClient::new(
            "https://hooks.example.test/schedule",
            RequestPolicy::default(),
            Arc::new(Failing),
        )
        .expect("client should build");

        let payload = PostPayload::from_selection(&complete_selection()).expect("payload");
        assert!(matches!(
            client.submit(&payload),
            Err(SubmitError::Status(503))
        ));
    }
}
