use serde_json::json;

use form_spec::{FormDocument, Navigator, StepStatus};

#[test]
fn set_step_clamps_into_range() {
    let mut navigator = Navigator::new(3);
    assert_eq!(navigator.set_step(10), 2);
    assert!(navigator.is_last());
    assert_eq!(navigator.next(), 2);
    assert_eq!(navigator.set_step(0), 0);
    assert_eq!(navigator.previous(), 0);
    assert!(navigator.is_first());
}

#[test]
fn percent_complete_rounds() {
    let mut navigator = Navigator::new(3);
    assert_eq!(navigator.percent_complete(), 33);
    navigator.next();
    assert_eq!(navigator.percent_complete(), 67);
    navigator.next();
    assert_eq!(navigator.percent_complete(), 100);
}

#[test]
fn deleting_the_active_last_step_reclamps() {
    let mut navigator = Navigator::new(3);
    navigator.set_step(2);
    navigator.after_step_deleted(2);
    assert_eq!(navigator.current(), 1);

    let mut early = Navigator::new(3);
    early.set_step(0);
    early.after_step_deleted(2);
    assert_eq!(early.current(), 0);
}

#[test]
fn added_step_becomes_active() {
    let mut navigator = Navigator::new(2);
    navigator.after_step_added(3);
    assert_eq!(navigator.current(), 2);
    assert_eq!(navigator.step_count(), 3);
}

#[test]
fn statuses_follow_progress_indicator() {
    let mut navigator = Navigator::new(3);
    navigator.set_step(1);
    assert_eq!(navigator.step_status(0), StepStatus::Completed);
    assert_eq!(navigator.step_status(1), StepStatus::Current);
    assert_eq!(navigator.step_status(2), StepStatus::Upcoming);
}

#[test]
fn moved_steps_keep_the_same_step_active() {
    let mut navigator = Navigator::new(3);
    navigator.set_step(1);
    navigator.after_step_moved(0, 2);
    assert_eq!(navigator.current(), 0);
    navigator.after_step_moved(0, 1);
    assert_eq!(navigator.current(), 1);
}

#[test]
fn visible_navigation_skips_hidden_steps() {
    let mut document =
        FormDocument::from_json_str(include_str!("../tests/fixtures/product_form.json"))
            .expect("deserialize");
    document.steps.swap(1, 2);

    let mut navigator = Navigator::for_document(&document);
    assert_eq!(navigator.next_visible(&document, &json!({})), 2);
    assert_eq!(navigator.previous_visible(&document, &json!({})), 0);

    navigator.set_step(0);
    assert_eq!(navigator.next_visible(&document, &json!({ "q3": 5 })), 1);
}

#[test]
fn deserialized_navigator_is_clamped() {
    let navigator: Navigator =
        serde_json::from_value(json!({ "current": 7, "step_count": 3 })).expect("deserialize");
    assert_eq!(navigator.current(), 2);
    assert!(navigator.is_last());
    assert_eq!(navigator.percent_complete(), 100);

    let empty: Navigator =
        serde_json::from_value(json!({ "current": 4, "step_count": 0 })).expect("deserialize");
    assert_eq!(empty.step_count(), 1);
    assert_eq!(empty.current(), 0);
}
