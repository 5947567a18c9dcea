//! Shared fixtures for app integration tests.

use std::sync::{Arc, Mutex};

use postdeck_core::{RequestPolicy, ScheduleTime, Selection, WireResponse};
use postdeck_generate::{GenerateClient, GenerateError, GenerationEnvelope, GenerationTransport};
use postdeck_submit::{SubmissionEnvelope, SubmissionTransport, SubmitClient, SubmitError};
use time::UtcOffset;
use url::Url;

/// Canned generation transport that records how many calls it served.
#[allow(dead_code)]
pub struct CannedGeneration {
    response: WireResponse,
    pub calls: Arc<Mutex<u32>>,
}

impl GenerationTransport for CannedGeneration {
    fn send(&self, _envelope: &GenerationEnvelope) -> Result<WireResponse, GenerateError> {
        *self.calls.lock().expect("call counter lock") += 1;
        Ok(self.response.clone())
    }
}

/// Builds a generation client answering with `status` and `body`.
#[allow(dead_code)]
pub fn generation_client(status: u16, body: &str) -> (GenerateClient, Arc<Mutex<u32>>) {
    let calls = Arc::new(Mutex::new(0));
    let transport = Arc::new(CannedGeneration {
        response: WireResponse {
            status,
            body: body.to_string(),
        },
        calls: Arc::clone(&calls),
    });
    let client = GenerateClient::new(
        "https://hooks.example.test/generate",
        RequestPolicy::default(),
        transport,
    )
    .expect("generation client should build");

    (client, calls)
}

/// Canned submission transport that records served envelopes.
#[allow(dead_code)]
pub struct CannedSubmission {
    status: u16,
    pub envelopes: Arc<Mutex<Vec<SubmissionEnvelope>>>,
}

impl SubmissionTransport for CannedSubmission {
    fn send(&self, envelope: &SubmissionEnvelope) -> Result<WireResponse, SubmitError> {
        self.envelopes
            .lock()
            .expect("envelope log lock")
            .push(envelope.clone());
        Ok(WireResponse {
            status: self.status,
            body: String::new(),
        })
    }
}

/// Builds a submission client answering with `status`.
#[allow(dead_code)]
pub fn submission_client(status: u16) -> (SubmitClient, Arc<Mutex<Vec<SubmissionEnvelope>>>) {
    let envelopes = Arc::new(Mutex::new(Vec::new()));
    let transport = Arc::new(CannedSubmission {
        status,
        envelopes: Arc::clone(&envelopes),
    });
    let client = SubmitClient::new(
        "https://hooks.example.test/schedule",
        RequestPolicy::default(),
        transport,
    )
    .expect("submission client should build");

    (client, envelopes)
}

/// Generation success body with two captions and one image.
#[allow(dead_code)]
pub const TWO_CAPTIONS_ONE_IMAGE: &str =
    r#"{"captions":["A","B"],"images":["https://img.example.test/u1.png"]}"#;

/// Creates a complete selection fixture.
#[allow(dead_code)]
pub fn complete_selection() -> Selection {
    let mut selection = Selection::new();
    selection.select_caption("Launch day");
    selection.select_image(Url::parse("https://img.example.test/u1.png").expect("valid url"));
    selection.select_schedule(
        ScheduleTime::parse("2025-06-01T10:00", UtcOffset::UTC).expect("valid schedule"),
    );
    selection
}
