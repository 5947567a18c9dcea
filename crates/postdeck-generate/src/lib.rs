#![warn(missing_docs)]
//! # postdeck-generate
//!
//! ## Purpose
//! Implements the content generation workflow: topic validation, the request
//! to the external generation service, and the `Idle -> Loading ->
//! {Populated, Failed}` state machine.
//!
//! ## Responsibilities
//! - Reject blank topics before any network activity.
//! - Execute generation requests through an injectable transport abstraction.
//! - Classify transport, status and response-shape failures separately.
//! - Hold the generation-scoped candidate set inside the machine state.
//!
//! ## Data flow
//! UI topic input -> [`Topic::new`] -> [`GenerationMachine::begin`] ->
//! [`GenerateClient::generate`] through [`GenerationTransport`] ->
//! [`GenerationMachine::complete`] or [`GenerationMachine::fail`].
//!
//! ## Ownership and lifetimes
//! The machine owns the active [`CandidateSet`]; a new generation replaces it
//! wholesale. Candidates never outlive their generation.
//!
//! ## Error model
//! All failures surface as [`GenerateError`] variants grouped by failure
//! class: validation, transport, and protocol/shape.
//!
//! ## Security and privacy notes
//! The generation endpoint must be HTTPS; topics and candidate text are user
//! content and safe to log, transport errors are surfaced verbatim.

use std::sync::Arc;

use postdeck_core::{CandidateSet, RequestPolicy, WireResponse};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Validated, trimmed generation topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic(String);

impl Topic {
    /// Trims and validates raw topic input.
    ///
    /// # Errors
    /// Returns [`GenerateError::EmptyTopic`] for empty or whitespace-only
    /// input. Rejection happens before any network call.
    pub fn new(raw: &str) -> Result<Self, GenerateError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(GenerateError::EmptyTopic);
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Returns the trimmed topic text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// JSON request body sent to the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    /// Topic the service should generate content for.
    pub topic: String,
}

/// Expected success response shape from the generation service.
///
/// Both fields are mandatory; a response missing either is a shape violation
/// and fails the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenerationResponse {
    /// Generated caption candidates in service order.
    pub captions: Vec<String>,
    /// Generated image URL candidates in service order.
    pub images: Vec<String>,
}

/// One outbound generation call handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationEnvelope {
    /// Destination endpoint URL.
    pub endpoint: String,
    /// Transport-enforced timeout in milliseconds.
    pub timeout_ms: u64,
    /// JSON-encoded request body.
    pub body: Vec<u8>,
}

/// Abstract transport used by the generation client.
pub trait GenerationTransport: Send + Sync {
    /// Sends one generation request and returns the raw HTTP outcome.
    ///
    /// # Errors
    /// Returns [`GenerateError::Transport`] when no HTTP response was
    /// obtained (connection failure, timeout).
    fn send(&self, envelope: &GenerationEnvelope) -> Result<WireResponse, GenerateError>;
}

/// Generation client that validates endpoint policy and classifies outcomes.
#[derive(Clone)]
pub struct GenerateClient {
    endpoint: String,
    policy: RequestPolicy,
    transport: Arc<dyn GenerationTransport>,
}

impl GenerateClient {
    /// Creates a validated generation client.
    ///
    /// # Errors
    /// Returns [`GenerateError::InvalidEndpoint`] when the URL does not parse
    /// or is not HTTPS.
    pub fn new(
        endpoint: impl Into<String>,
        policy: RequestPolicy,
        transport: Arc<dyn GenerationTransport>,
    ) -> Result<Self, GenerateError> {
        let endpoint = endpoint.into();
        validate_webhook_endpoint(&endpoint).map_err(GenerateError::InvalidEndpoint)?;

        Ok(Self {
            endpoint,
            policy,
            transport,
        })
    }

    /// Executes one generation request for a validated topic.
    ///
    /// # Errors
    /// - [`GenerateError::Transport`] when the call produced no response.
    /// - [`GenerateError::Status`] for non-2xx responses.
    /// - [`GenerateError::Contract`] when the body is missing `captions` or
    ///   `images`, or carries unparseable image URLs.
    pub fn generate(&self, topic: &Topic) -> Result<CandidateSet, GenerateError> {
        let request = GenerationRequest {
            topic: topic.as_str().to_string(),
        };
        let body = serde_json::to_vec(&request)
            .map_err(|error| GenerateError::Contract(error.to_string()))?;

        let response = self.transport.send(&GenerationEnvelope {
            endpoint: self.endpoint.clone(),
            timeout_ms: self.policy.timeout_ms,
            body,
        })?;

        if !response.is_success() {
            return Err(GenerateError::Status(response.status));
        }

        parse_generation_response(&response.body)
    }

    /// Returns the configured generation endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Parses a success body into a candidate set.
///
/// # Errors
/// Returns [`GenerateError::Contract`] when mandatory fields are absent or an
/// image entry is not a valid URL.
pub fn parse_generation_response(raw: &str) -> Result<CandidateSet, GenerateError> {
    let parsed: GenerationResponse =
        serde_json::from_str(raw).map_err(|error| GenerateError::Contract(error.to_string()))?;

    CandidateSet::new(parsed.captions, parsed.images)
        .map_err(|error| GenerateError::Contract(error.to_string()))
}

/// Validates an external webhook endpoint (HTTPS-only policy).
///
/// # Errors
/// Returns a human-readable reason when the URL does not parse or uses a
/// scheme other than `https`.
pub fn validate_webhook_endpoint(endpoint: &str) -> Result<(), String> {
    let parsed = Url::parse(endpoint).map_err(|error| format!("invalid endpoint url: {error}"))?;

    if parsed.scheme() != "https" {
        return Err("webhook endpoint must use https".to_string());
    }

    Ok(())
}

/// Generation workflow state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationState {
    /// No generation attempted yet, or state was reset.
    Idle,
    /// A generation request is in flight.
    Loading,
    /// Candidates from the latest successful generation.
    Populated(CandidateSet),
    /// Latest generation failed; human-readable message retained.
    Failed(String),
}

/// Generation state machine with explicit legal transitions.
///
/// The trigger is guarded for the flight duration: a second `begin` while
/// `Loading` is rejected instead of issuing an overlapping request.
#[derive(Debug, Clone)]
pub struct GenerationMachine {
    state: GenerationState,
}

impl GenerationMachine {
    /// Creates a machine in `Idle` state.
    pub fn new() -> Self {
        Self {
            state: GenerationState::Idle,
        }
    }

    /// Returns the current state snapshot.
    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    /// Returns `true` while a request is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self.state, GenerationState::Loading)
    }

    /// Enters `Loading` from `Idle`, `Populated`, or `Failed`.
    ///
    /// Any previous candidate set is discarded here; the caller must reset
    /// selection state alongside.
    ///
    /// # Errors
    /// Returns [`GenerateError::InFlight`] when already `Loading`.
    pub fn begin(&mut self) -> Result<(), GenerateError> {
        if self.is_loading() {
            return Err(GenerateError::InFlight);
        }

        self.state = GenerationState::Loading;
        Ok(())
    }

    /// Applies the `Loading -> Populated` transition.
    ///
    /// # Errors
    /// Returns [`GenerateError::IllegalTransition`] when not `Loading`.
    pub fn complete(&mut self, candidates: CandidateSet) -> Result<(), GenerateError> {
        if !self.is_loading() {
            return Err(GenerateError::IllegalTransition("complete outside Loading"));
        }

        self.state = GenerationState::Populated(candidates);
        Ok(())
    }

    /// Applies the `Loading -> Failed` transition.
    ///
    /// # Errors
    /// Returns [`GenerateError::IllegalTransition`] when not `Loading`.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), GenerateError> {
        if !self.is_loading() {
            return Err(GenerateError::IllegalTransition("fail outside Loading"));
        }

        self.state = GenerationState::Failed(message.into());
        Ok(())
    }

    /// Returns the active candidate set when `Populated`.
    pub fn candidates(&self) -> Option<&CandidateSet> {
        match &self.state {
            GenerationState::Populated(candidates) => Some(candidates),
            _ => None,
        }
    }

    /// Returns mutable access to the active candidate set when `Populated`.
    ///
    /// Used to flag render-broken images without leaving `Populated`.
    pub fn candidates_mut(&mut self) -> Option<&mut CandidateSet> {
        match &mut self.state {
            GenerationState::Populated(candidates) => Some(candidates),
            _ => None,
        }
    }

    /// Resets the machine to `Idle`, discarding candidates or errors.
    pub fn reset(&mut self) {
        self.state = GenerationState::Idle;
    }
}

impl Default for GenerationMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors produced by the generation workflow.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Topic input is empty or whitespace-only.
    #[error("topic must be non-empty")]
    EmptyTopic,
    /// A generation request is already in flight.
    #[error("a generation request is already in flight")]
    InFlight,
    /// Transition requested from a state that does not allow it.
    #[error("illegal generation transition: {0}")]
    IllegalTransition(&'static str),
    /// Endpoint violates the HTTPS webhook policy.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// Call produced no HTTP response.
    #[error("generation transport failure: {0}")]
    Transport(String),
    /// Service answered with a non-success status.
    #[error("generation service returned status {0}")]
    Status(u16),
    /// Response body violated the expected contract shape.
    #[error("invalid generation response: {0}")]
    Contract(String),
}
