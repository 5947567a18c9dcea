//! Integration tests for the cancellable-navigation predicate.

mod common;

use postdeck_app::navigation_prompt_required;
use postdeck_core::Selection;
use postdeck_ui::{DashboardState, Theme};

#[test]
fn unload_guard_tests_prompts_for_unsaved_work_only() {
    let mut ui = DashboardState::new(Theme::Light);

    assert!(!navigation_prompt_required("", &Selection::new(), &ui));
    assert!(navigation_prompt_required("summer sale", &Selection::new(), &ui));
    assert!(navigation_prompt_required("", &common::complete_selection(), &ui));

    // Nothing left to lose once the page is locked after a successful submit.
    ui.lock();
    assert!(!navigation_prompt_required("summer sale", &common::complete_selection(), &ui));
}
