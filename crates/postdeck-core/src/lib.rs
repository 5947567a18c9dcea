#![warn(missing_docs)]
//! # postdeck-core
//!
//! ## Purpose
//! Defines the pure data model used across the `postdeck` workspace.
//!
//! ## Responsibilities
//! - Represent the tri-state selection record driving submit eligibility.
//! - Hold generation-scoped candidate sets for captions and images.
//! - Convert picker-local schedule input into an absolute UTC wire instant.
//! - Build the immutable submission payload snapshot.
//!
//! ## Data flow
//! Generation results become a [`CandidateSet`]. User picks mutate
//! [`Selection`]. At submit time a complete selection is frozen into a
//! [`PostPayload`] and never mutated afterwards.
//!
//! ## Ownership and lifetimes
//! Selections and payloads own their values (`String`, `Url`) so workflow
//! state machines and transports never borrow from transient UI buffers.
//!
//! ## Error model
//! Validation failures (incomplete selection, malformed schedule input,
//! unparseable image URLs) return [`CoreError`] variants with
//! caller-actionable categorization.
//!
//! ## Security and privacy notes
//! This crate never touches session cookies or credentials; it models only
//! user-visible content choices.
//!
//! ## Example
//! ```rust
//! use postdeck_core::Selection;
//!
//! let mut selection = Selection::new();
//! selection.select_caption("Spring launch post");
//! assert!(!selection.is_complete());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{PrimitiveDateTime, UtcOffset};
use url::Url;

/// Normalized picker input format (`2025-06-01T10:00:30`).
const SCHEDULE_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// Scheduled posting time anchored to an explicit UTC offset.
///
/// The picker supplies a naive local wall-clock value; the offset is the
/// environment's fixed offset at selection time. Keeping the offset explicit
/// makes wire conversion deterministic and testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleTime {
    local: PrimitiveDateTime,
    offset: UtcOffset,
}

impl ScheduleTime {
    /// Parses picker-local input (`YYYY-MM-DDTHH:MM[:SS]`) with its offset.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidScheduleInput`] when the value does not
    /// match the supported picker shape.
    pub fn parse(input: &str, offset: UtcOffset) -> Result<Self, CoreError> {
        let trimmed = input.trim();

        // Minute-precision picker values get an explicit zero seconds field.
        let normalized = if trimmed.len() == "2025-06-01T10:00".len() {
            format!("{trimmed}:00")
        } else {
            trimmed.to_string()
        };

        let local = PrimitiveDateTime::parse(&normalized, SCHEDULE_FORMAT)
            .map_err(|_| CoreError::InvalidScheduleInput(trimmed.to_string()))?;

        Ok(Self { local, offset })
    }

    /// Formats the schedule as an absolute RFC 3339 UTC instant.
    ///
    /// Conversion is pure: repeated calls on the same value always produce
    /// the identical wire string.
    ///
    /// # Errors
    /// Returns [`CoreError::ScheduleFormat`] when RFC 3339 formatting fails.
    pub fn to_wire(&self) -> Result<String, CoreError> {
        self.local
            .assume_offset(self.offset)
            .to_offset(UtcOffset::UTC)
            .format(&Rfc3339)
            .map_err(|error| CoreError::ScheduleFormat(error.to_string()))
    }
}

/// Tri-state selection record: caption, image, schedule.
///
/// Each field holds at most one value; picking a new candidate of a kind
/// overwrites the previous choice of that kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    caption: Option<String>,
    image: Option<Url>,
    schedule: Option<ScheduleTime>,
}

/// Per-category selection counts used purely for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionCounts {
    /// 0 or 1 selected captions.
    pub captions: usize,
    /// 0 or 1 selected images.
    pub images: usize,
    /// 0 or 1 selected schedule slots.
    pub schedules: usize,
}

impl Selection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects a caption, replacing any previous caption choice.
    pub fn select_caption(&mut self, caption: impl Into<String>) {
        self.caption = Some(caption.into());
    }

    /// Selects an image, replacing any previous image choice.
    pub fn select_image(&mut self, image: Url) {
        self.image = Some(image);
    }

    /// Selects a schedule slot, replacing any previous schedule choice.
    pub fn select_schedule(&mut self, schedule: ScheduleTime) {
        self.schedule = Some(schedule);
    }

    /// Returns currently selected caption, if any.
    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    /// Returns currently selected image, if any.
    pub fn image(&self) -> Option<&Url> {
        self.image.as_ref()
    }

    /// Returns currently selected schedule, if any.
    pub fn schedule(&self) -> Option<&ScheduleTime> {
        self.schedule.as_ref()
    }

    /// Returns `true` when all three categories have a selection.
    ///
    /// This is the single submit-enable predicate; UI code must not derive
    /// its own variant of this check.
    pub fn is_complete(&self) -> bool {
        self.caption.is_some() && self.image.is_some() && self.schedule.is_some()
    }

    /// Returns `true` when at least one category has a selection.
    pub fn is_dirty(&self) -> bool {
        self.caption.is_some() || self.image.is_some() || self.schedule.is_some()
    }

    /// Returns per-category display counts (each 0 or 1).
    pub fn counts(&self) -> SelectionCounts {
        SelectionCounts {
            captions: usize::from(self.caption.is_some()),
            images: usize::from(self.image.is_some()),
            schedules: usize::from(self.schedule.is_some()),
        }
    }

    /// Clears all three categories back to the empty state.
    pub fn clear(&mut self) {
        self.caption = None;
        self.image = None;
        self.schedule = None;
    }
}

/// One generated image offered for selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    /// Candidate image location.
    pub url: Url,
    /// Set when the image failed to render at display time.
    ///
    /// Broken candidates stay selectable; the flag is presentation metadata,
    /// not a workflow failure.
    pub broken: bool,
}

/// Generation-scoped candidate lists for captions and images.
///
/// A candidate set is replaced wholesale on each new generation and never
/// merged with a previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    captions: Vec<String>,
    images: Vec<ImageCandidate>,
}

impl CandidateSet {
    /// Builds a candidate set from generation output lists.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidImageUrl`] when any image entry is not a
    /// parseable URL; a response carrying malformed URLs is treated as a
    /// shape violation by the caller.
    pub fn new(captions: Vec<String>, image_urls: Vec<String>) -> Result<Self, CoreError> {
        let mut images = Vec::with_capacity(image_urls.len());
        for raw in image_urls {
            let url = Url::parse(&raw).map_err(|_| CoreError::InvalidImageUrl { url: raw })?;
            images.push(ImageCandidate { url, broken: false });
        }

        Ok(Self { captions, images })
    }

    /// Returns caption candidates in generation order.
    pub fn captions(&self) -> &[String] {
        &self.captions
    }

    /// Returns image candidates in generation order.
    pub fn images(&self) -> &[ImageCandidate] {
        &self.images
    }

    /// Returns the caption at `index`, if present.
    pub fn caption_at(&self, index: usize) -> Option<&str> {
        self.captions.get(index).map(String::as_str)
    }

    /// Returns the image candidate at `index`, if present.
    pub fn image_at(&self, index: usize) -> Option<&ImageCandidate> {
        self.images.get(index)
    }

    /// Flags the image at `index` as failed-to-render.
    ///
    /// # Errors
    /// Returns [`CoreError::UnknownCandidate`] for an out-of-range index.
    pub fn mark_image_broken(&mut self, index: usize) -> Result<(), CoreError> {
        match self.images.get_mut(index) {
            Some(candidate) => {
                candidate.broken = true;
                Ok(())
            }
            None => Err(CoreError::UnknownCandidate { index }),
        }
    }

    /// Returns `true` when both candidate lists are empty.
    pub fn is_empty(&self) -> bool {
        self.captions.is_empty() && self.images.is_empty()
    }
}

/// Immutable submission payload snapshot sent to the scheduling service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPayload {
    /// Finalized caption text.
    pub caption: String,
    /// Finalized image location.
    pub image_url: Url,
    /// Absolute RFC 3339 UTC posting instant.
    pub post_time: String,
}

impl PostPayload {
    /// Freezes a complete selection into a wire payload.
    ///
    /// # Errors
    /// Returns [`CoreError::IncompleteSelection`] when any category is still
    /// empty. Returns [`CoreError::ScheduleFormat`] when wire formatting of
    /// the schedule fails.
    pub fn from_selection(selection: &Selection) -> Result<Self, CoreError> {
        let (Some(caption), Some(image), Some(schedule)) = (
            selection.caption(),
            selection.image(),
            selection.schedule(),
        ) else {
            return Err(CoreError::IncompleteSelection);
        };

        Ok(Self {
            caption: caption.to_string(),
            image_url: image.clone(),
            post_time: schedule.to_wire()?,
        })
    }

    /// Serializes payload to compact JSON bytes.
    ///
    /// # Errors
    /// Returns [`CoreError::Codec`] when JSON serialization fails.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, CoreError> {
        serde_json::to_vec(self).map_err(CoreError::Codec)
    }

    /// Deserializes payload from JSON bytes.
    ///
    /// # Errors
    /// Returns [`CoreError::Codec`] when JSON decoding fails.
    pub fn from_json_bytes(raw: &[u8]) -> Result<Self, CoreError> {
        serde_json::from_slice(raw).map_err(CoreError::Codec)
    }
}

/// Outbound request policy shared by workflow clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestPolicy {
    /// Transport-enforced timeout per call in milliseconds.
    pub timeout_ms: u64,
}

impl Default for RequestPolicy {
    fn default() -> Self {
        Self { timeout_ms: 10_000 }
    }
}

/// Raw HTTP outcome handed back by workflow transports.
///
/// Transports report any response they received, successful or not; clients
/// own the status classification so protocol errors and transport errors can
/// be told apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl WireResponse {
    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Error type for core model validation and codec failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Submission requires all three categories to be selected.
    #[error("selection is incomplete: caption, image and schedule are all required")]
    IncompleteSelection,
    /// Schedule picker input did not match a supported format.
    #[error("invalid schedule input: {0}")]
    InvalidScheduleInput(String),
    /// Wire formatting of the schedule instant failed.
    #[error("schedule wire formatting failure: {0}")]
    ScheduleFormat(String),
    /// Generated image entry is not a parseable URL.
    #[error("invalid image url: {url}")]
    InvalidImageUrl {
        /// Offending raw value from the generation response.
        url: String,
    },
    /// Candidate index does not exist in the active set.
    #[error("unknown candidate index {index}")]
    UnknownCandidate {
        /// Requested out-of-range index.
        index: usize,
    },
    /// JSON encoding/decoding error.
    #[error("payload codec failure: {0}")]
    Codec(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    //! Unit tests for selection semantics and schedule conversion.

    use super::*;

    #[test]
    fn caption_pick_overwrites_previous_pick() {
        let mut selection = Selection::new();
        selection.select_caption("a");
        selection.select_caption("b");

        assert_eq!(selection.caption(), Some("b"));
        assert_eq!(selection.counts().captions, 1);
    }

    #[test]
    fn schedule_wire_conversion_is_idempotent() {
        let schedule = ScheduleTime::parse("2025-06-01T10:00", UtcOffset::UTC)
            .expect("picker input should parse");

        let first = schedule.to_wire().expect("formatting should succeed");
        let second = schedule.to_wire().expect("formatting should succeed");
        assert_eq!(first, second);
        assert_eq!(first, "2025-06-01T10:00:00Z");
    }

    #[test]
    fn schedule_applies_offset_when_converting_to_utc() {
        let offset = UtcOffset::from_hms(9, 0, 0).expect("offset should build");
        let schedule =
            ScheduleTime::parse("2025-06-01T10:00", offset).expect("picker input should parse");

        assert_eq!(
            schedule.to_wire().expect("formatting should succeed"),
            "2025-06-01T01:00:00Z"
        );
    }

    #[test]
    fn payload_requires_complete_selection() {
        let mut selection = Selection::new();
        selection.select_caption("caption");

        assert!(matches!(
            PostPayload::from_selection(&selection),
            Err(CoreError::IncompleteSelection)
        ));
    }

    #[test]
    fn candidate_set_rejects_malformed_image_urls() {
        let result = CandidateSet::new(vec!["A".to_string()], vec!["not a url".to_string()]);
        assert!(matches!(result, Err(CoreError::InvalidImageUrl { .. })));
    }
}
