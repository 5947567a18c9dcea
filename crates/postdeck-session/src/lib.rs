#![warn(missing_docs)]
//! # postdeck-session
//!
//! ## Purpose
//! Implements the session cookie gate for the protected dashboard page and
//! the idempotent logout endpoint.
//!
//! ## Responsibilities
//! - Decide pass-through versus landing-page redirect per incoming request.
//! - Clear the session token and logged-in indicator cookies on logout.
//! - Reject logout invocations that use a non-state-changing HTTP method.
//!
//! ## Data flow
//! Edge runtime hands `(path, Cookie header)` to [`guard_request`] and routes
//! logout calls to [`handle_logout`]; both return plain decision values the
//! hosting substrate translates into HTTP responses.
//!
//! ## Ownership and lifetimes
//! Decisions own their strings so callers can emit them after the request
//! buffers are gone.
//!
//! ## Error model
//! Guard and logout never fail at runtime; the only fallible operation is
//! [`SessionPolicy`] construction, which returns [`SessionError`].
//!
//! ## Security and privacy notes
//! The guard checks cookie *presence* only. Token integrity and expiry are
//! not validated here; a deployment must verify the token server-side before
//! trusting the session. Cookie values are never logged or echoed back.

use serde::Serialize;
use thiserror::Error;

/// Cookie carrying the opaque session credential.
pub const SESSION_COOKIE_NAME: &str = "postdeck_token";

/// Companion cookie signalling a logged-in UI state to non-HttpOnly readers.
pub const LOGGED_IN_COOKIE_NAME: &str = "postdeck_logged_in";

/// Route policy for the protected page and the landing redirect target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPolicy {
    protected_path: String,
    landing_path: String,
}

impl SessionPolicy {
    /// Creates a validated route policy.
    ///
    /// # Errors
    /// Returns [`SessionError::InvalidPath`] when either path is empty or not
    /// absolute.
    pub fn new(
        protected_path: impl Into<String>,
        landing_path: impl Into<String>,
    ) -> Result<Self, SessionError> {
        let protected_path = protected_path.into();
        let landing_path = landing_path.into();

        for path in [&protected_path, &landing_path] {
            if path.is_empty() || !path.starts_with('/') {
                return Err(SessionError::InvalidPath(path.clone()));
            }
        }

        Ok(Self {
            protected_path,
            landing_path,
        })
    }

    /// Returns the protected page path.
    pub fn protected_path(&self) -> &str {
        &self.protected_path
    }

    /// Returns the landing page path used as redirect target.
    pub fn landing_path(&self) -> &str {
        &self.landing_path
    }
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            protected_path: "/dashboard".to_string(),
            landing_path: "/".to_string(),
        }
    }
}

/// Outcome of the per-request session gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Request may reach its target unchanged.
    PassThrough,
    /// Request must be redirected to the landing page.
    Redirect {
        /// Redirect target path.
        location: String,
    },
}

/// Gates one navigation request against the session cookie.
///
/// # Semantics
/// - Paths other than the protected one always pass through.
/// - The protected path passes when [`SESSION_COOKIE_NAME`] is present in the
///   `Cookie` header, regardless of its value. Presence is the whole check.
/// - Absence yields a redirect to the landing path.
pub fn guard_request(
    policy: &SessionPolicy,
    path: &str,
    cookie_header: Option<&str>,
) -> GuardDecision {
    if path != policy.protected_path() {
        return GuardDecision::PassThrough;
    }

    if cookie_present(cookie_header, SESSION_COOKIE_NAME) {
        return GuardDecision::PassThrough;
    }

    GuardDecision::Redirect {
        location: policy.landing_path().to_string(),
    }
}

/// Returns `true` when `name` appears as a cookie key in the header.
///
/// An empty value still counts as present; the gate never inspects values.
pub fn cookie_present(cookie_header: Option<&str>, name: &str) -> bool {
    let Some(header) = cookie_header else {
        return false;
    };

    header.split(';').any(|pair| {
        let key = pair.split('=').next().unwrap_or("").trim();
        key == name
    })
}

/// JSON body emitted by the logout endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LogoutBody {
    /// Successful logout acknowledgement.
    Success {
        /// Always `true` on the success path.
        success: bool,
    },
    /// Method rejection detail.
    Rejected {
        /// Human-readable rejection reason.
        error: String,
    },
}

/// Full logout endpoint response: status, JSON body, Set-Cookie directives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutResponse {
    /// HTTP status code (200 or 405).
    pub status: u16,
    /// JSON response body.
    pub body: LogoutBody,
    /// `Set-Cookie` header values; empty on method rejection.
    pub set_cookie: Vec<String>,
}

impl LogoutResponse {
    /// Serializes the JSON body.
    ///
    /// # Errors
    /// Returns [`SessionError::Codec`] when serialization fails.
    pub fn body_json(&self) -> Result<String, SessionError> {
        serde_json::to_string(&self.body).map_err(SessionError::Codec)
    }
}

/// Handles one logout invocation.
///
/// # Semantics
/// - Any method other than `POST` (case-sensitive, per HTTP method casing)
///   yields 405 with `{"error":"Method not allowed"}` and no cookie changes.
/// - `POST` yields 200 with `{"success":true}` and both auth cookies
///   overwritten with immediately-expiring values. The operation is
///   idempotent: logging out without a live session still succeeds.
pub fn handle_logout(method: &str) -> LogoutResponse {
    if method != "POST" {
        return LogoutResponse {
            status: 405,
            body: LogoutBody::Rejected {
                error: "Method not allowed".to_string(),
            },
            set_cookie: Vec::new(),
        };
    }

    LogoutResponse {
        status: 200,
        body: LogoutBody::Success { success: true },
        set_cookie: vec![
            expired_cookie(SESSION_COOKIE_NAME, true),
            expired_cookie(LOGGED_IN_COOKIE_NAME, false),
        ],
    }
}

/// Builds an immediately-expiring Set-Cookie directive.
///
/// The session token stays HttpOnly; the logged-in indicator is readable by
/// page scripts and therefore must not carry HttpOnly.
fn expired_cookie(name: &str, http_only: bool) -> String {
    if http_only {
        format!("{name}=; HttpOnly; Secure; SameSite=Strict; Max-Age=0; Path=/")
    } else {
        format!("{name}=; Secure; SameSite=Strict; Max-Age=0; Path=/")
    }
}

/// Errors produced by session policy construction and body encoding.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Policy paths must be non-empty and absolute.
    #[error("invalid route path: {0:?}")]
    InvalidPath(String),
    /// JSON body encoding failure.
    #[error("logout body codec failure: {0}")]
    Codec(#[from] serde_json::Error),
}
