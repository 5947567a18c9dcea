#![warn(missing_docs)]
//! # postdeck-ui
//!
//! ## Purpose
//! Defines the UI-facing dashboard state model for `postdeck`.
//!
//! ## Responsibilities
//! - Project selection counts into display counter text.
//! - Track placeholder, loading, banner and trigger visibility state.
//! - Model the terminal locked overlay entered after a successful submit.
//! - Persist the theme preference through an injectable store.
//! - Expose the cancellable-navigation (unload) predicate.
//!
//! ## Data flow
//! Workflow orchestration events mutate [`DashboardState`], which drives
//! rendered status in whatever shell hosts the dashboard.
//!
//! ## Ownership and lifetimes
//! `DashboardState` owns all strings/flags to keep event reducers simple and
//! shell-agnostic.
//!
//! ## Error model
//! This crate favors explicit state over recoverable errors. Invalid
//! combinations are prevented by transition methods; locked-state clicks are
//! reported, not errored.
//!
//! ## Security and privacy notes
//! UI state intentionally excludes secrets (session cookies, tokens).

use postdeck_core::SelectionCounts;

/// Interactive dashboard section, used for locked-state overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Topic input and generate trigger.
    Generator,
    /// Caption candidate list.
    Captions,
    /// Image candidate list.
    Images,
    /// Schedule picker.
    Schedule,
}

/// All interactive sections in display order.
pub const ALL_SECTIONS: [Section; 4] = [
    Section::Generator,
    Section::Captions,
    Section::Images,
    Section::Schedule,
];

/// Persisted color theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    /// Light theme (the default).
    #[default]
    Light,
    /// Dark theme.
    Dark,
}

impl Theme {
    /// Maps a stored preference value back to a theme.
    ///
    /// Unknown or missing values fall back to [`Theme::Light`].
    pub fn from_stored(stored: Option<&str>) -> Self {
        match stored {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    /// Returns the opposite theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Returns the persisted string value.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Storage key for the theme preference.
pub const THEME_PREFERENCE_KEY: &str = "theme";

/// Abstract client-local key-value preference storage.
pub trait PreferenceStore {
    /// Loads one stored value.
    fn load(&self, key: &str) -> Option<String>;
    /// Stores one value, overwriting any previous one.
    fn store(&mut self, key: &str, value: &str);
}

/// In-memory preference store for tests and headless shells.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    entries: std::collections::HashMap<String, String>,
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn store(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// Loads the saved theme, defaulting to light.
pub fn load_theme(store: &dyn PreferenceStore) -> Theme {
    Theme::from_stored(store.load(THEME_PREFERENCE_KEY).as_deref())
}

/// Toggles the theme and persists the new choice.
pub fn toggle_theme(store: &mut dyn PreferenceStore, current: Theme) -> Theme {
    let next = current.toggled();
    store.store(THEME_PREFERENCE_KEY, next.as_str());
    next
}

/// Returns `true` when navigating away must surface a blocking confirmation.
///
/// Prompt iff there is unsaved work: a non-blank draft topic or any selection
/// field set. The locked state has nothing left to lose, so it never prompts.
pub fn unload_prompt_required(topic_draft: &str, selection_dirty: bool, locked: bool) -> bool {
    !locked && (!topic_draft.trim().is_empty() || selection_dirty)
}

/// Aggregate dashboard UI state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardState {
    /// Caption counter text (`"0 selected"` / `"1 selected"`).
    pub caption_counter: String,
    /// Image counter text.
    pub image_counter: String,
    /// Schedule counter text.
    pub schedule_counter: String,
    /// Whether the caption empty-state placeholder is visible.
    pub captions_placeholder: bool,
    /// Whether the image empty-state placeholder is visible.
    pub images_placeholder: bool,
    /// Whether the caption list shows its loading indicator.
    pub captions_loading: bool,
    /// Whether the image list shows its loading indicator.
    pub images_loading: bool,
    /// Generation error banner, if shown.
    pub generate_error: Option<String>,
    /// Generation success banner, if shown.
    pub generate_success: Option<String>,
    /// Submission error banner, if shown.
    pub submit_error: Option<String>,
    /// Submission success banner, if shown.
    pub submit_success: Option<String>,
    /// Whether the submit trigger is enabled.
    pub submit_enabled: bool,
    /// Whether the submit trigger is visible at all (hidden once locked).
    pub submit_visible: bool,
    /// Whether a submission is in flight (trigger shows progress label).
    pub submit_in_flight: bool,
    /// Whether the "refresh to start over" affordance is shown.
    pub refresh_visible: bool,
    /// Terminal locked flag; never cleared without a fresh state.
    pub locked: bool,
    /// Sections covered by the locked overlay.
    pub overlays: Vec<Section>,
    /// Active color theme.
    pub theme: Theme,
}

impl DashboardState {
    /// Creates the initial dashboard state for a fresh page load.
    pub fn new(theme: Theme) -> Self {
        Self {
            caption_counter: counter_text(0),
            image_counter: counter_text(0),
            schedule_counter: counter_text(0),
            captions_placeholder: true,
            images_placeholder: true,
            captions_loading: false,
            images_loading: false,
            generate_error: None,
            generate_success: None,
            submit_error: None,
            submit_success: None,
            submit_enabled: false,
            submit_visible: true,
            submit_in_flight: false,
            refresh_visible: false,
            locked: false,
            overlays: Vec::new(),
            theme,
        }
    }

    /// Re-projects selection counts and submit enablement after a mutation.
    pub fn apply_selection(&mut self, counts: SelectionCounts, complete: bool) {
        self.caption_counter = counter_text(counts.captions);
        self.image_counter = counter_text(counts.images);
        self.schedule_counter = counter_text(counts.schedules);
        if !self.locked && !self.submit_in_flight {
            self.submit_enabled = complete;
        }
    }

    /// Reverts candidate lists to their empty state.
    ///
    /// Counters return to zero, submit disables, placeholders reappear.
    pub fn reset_content(&mut self) {
        self.caption_counter = counter_text(0);
        self.image_counter = counter_text(0);
        self.schedule_counter = counter_text(0);
        self.captions_placeholder = true;
        self.images_placeholder = true;
        self.submit_enabled = false;
    }

    /// Enters the generation loading presentation.
    pub fn begin_generation(&mut self) {
        self.generate_error = None;
        self.generate_success = None;
        self.captions_placeholder = false;
        self.images_placeholder = false;
        self.captions_loading = true;
        self.images_loading = true;
    }

    /// Leaves loading after a successful generation.
    pub fn generation_populated(&mut self) {
        self.captions_loading = false;
        self.images_loading = false;
        self.generate_success = Some("Content generated successfully!".to_string());
    }

    /// Leaves loading after a failed generation, restoring placeholders.
    pub fn generation_failed(&mut self, message: impl Into<String>) {
        self.captions_loading = false;
        self.images_loading = false;
        self.captions_placeholder = true;
        self.images_placeholder = true;
        self.generate_error = Some(message.into());
    }

    /// Shows a validation error without touching list state.
    pub fn generation_rejected(&mut self, message: impl Into<String>) {
        self.generate_error = Some(message.into());
    }

    /// Enters the submission in-flight presentation.
    pub fn begin_submission(&mut self) {
        self.submit_error = None;
        self.submit_success = None;
        self.submit_in_flight = true;
        self.submit_enabled = false;
    }

    /// Shows a pre-flight validation error without entering the in-flight
    /// presentation. Trigger enablement is left as the selection projection
    /// last computed it.
    pub fn submission_rejected(&mut self, message: impl Into<String>) {
        self.submit_error = Some(message.into());
    }

    /// Restores the trigger after a failed submission.
    pub fn submission_failed(&mut self, message: impl Into<String>) {
        self.submit_in_flight = false;
        self.submit_enabled = true;
        self.submit_error = Some(message.into());
    }

    /// Enters the terminal locked presentation after a successful submission.
    ///
    /// Every interactive section receives an overlay, the submit trigger is
    /// hidden, and the refresh affordance replaces it. There is no unlock.
    pub fn lock(&mut self) {
        self.submit_in_flight = false;
        self.submit_enabled = false;
        self.submit_visible = false;
        self.refresh_visible = true;
        self.locked = true;
        self.overlays = ALL_SECTIONS.to_vec();
        self.submit_success = Some(
            "Post submitted for scheduling! Refresh the page to start over.".to_string(),
        );
    }

    /// Returns `true` when a click in `section` may take effect.
    ///
    /// Overlaid sections swallow every interaction.
    pub fn click_allowed(&self, section: Section) -> bool {
        !self.overlays.contains(&section)
    }
}

fn counter_text(count: usize) -> String {
    format!("{count} selected")
}
