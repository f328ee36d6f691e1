//! Unit tests for Block Kit rendering of the card and the intake modal.

use helpdesk_bot::intake::views::{category_card, intake_modal};
use helpdesk_bot::models::IntakeCategory;
use helpdesk_bot::slack::blocks;
use slack_morphism::prelude::SlackView;

#[test]
fn modal_view_returns_modal_variant() {
    let view = blocks::modal_view(&intake_modal(IntakeCategory::Bug, None));
    assert!(
        matches!(view, SlackView::Modal(_)),
        "modal_view must produce SlackView::Modal"
    );
}

/// The submission handler routes on `callback_id`, so it must be serialized.
#[test]
fn modal_view_preserves_callback_id() {
    let view = blocks::modal_view(&intake_modal(IntakeCategory::Bug, None));
    let json = serde_json::to_string(&view).expect("serialise SlackView");
    assert!(json.contains("helpdesk_submit_bug"), "{json}");
}

#[test]
fn modal_view_carries_private_metadata() {
    let metadata = r#"{"v":1,"in_thread":false,"channel":"slack:C123"}"#;
    let view = blocks::modal_view(&intake_modal(
        IntakeCategory::Feature,
        Some(metadata.to_owned()),
    ));
    let value = serde_json::to_value(&view).expect("serialise SlackView");
    assert_eq!(value["private_metadata"], metadata);
}

#[test]
fn modal_view_serializes_field_action_ids() {
    let view = blocks::modal_view(&intake_modal(IntakeCategory::Bug, None));
    let json = serde_json::to_string(&view).expect("serialise SlackView");
    for action_id in ["\"title\"", "\"description\"", "\"priority\""] {
        assert!(json.contains(action_id), "{action_id} missing from {json}");
    }
}

#[test]
fn modal_view_lists_priority_options() {
    let view = blocks::modal_view(&intake_modal(IntakeCategory::Bug, None));
    let json = serde_json::to_string(&view).expect("serialise SlackView");
    for label in ["低", "中", "高"] {
        assert!(json.contains(label), "priority label {label} missing");
    }
}

#[test]
fn modal_view_titles_and_submit_button() {
    let view = blocks::modal_view(&intake_modal(IntakeCategory::Bug, None));
    let json = serde_json::to_string(&view).expect("serialise SlackView");
    assert!(json.contains("バグ報告フォーム"));
    assert!(json.contains("送信"));
}

#[test]
fn card_blocks_contain_title_and_buttons() {
    let blocks = blocks::card_blocks(&category_card());
    assert_eq!(blocks.len(), 2, "title section plus one actions block");

    let json = serde_json::to_string(&blocks).expect("serialise blocks");
    assert!(json.contains("お問い合わせカテゴリを選択してください"));
    assert!(json.contains("\"action_id\":\"bug\""), "{json}");
    assert!(json.contains("\"action_id\":\"feature\""), "{json}");
    assert!(json.contains("\"primary\""), "bug button must be primary");
}
