//! Unit tests for the category card and intake modal descriptors.

use helpdesk_bot::intake::views::{
    category_card, intake_modal, CARD_TITLE, DESCRIPTION_FIELD, PRIORITY_FIELD, SUBMIT_LABEL,
    TITLE_FIELD,
};
use helpdesk_bot::intake::{ButtonStyle, ModalField};
use helpdesk_bot::models::IntakeCategory;

#[test]
fn card_has_one_button_per_category() {
    let card = category_card();
    assert_eq!(card.title, CARD_TITLE);

    let ids: Vec<&str> = card.buttons.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, ["bug", "feature"]);
}

#[test]
fn bug_button_is_primary() {
    let card = category_card();
    assert_eq!(card.buttons[0].style, Some(ButtonStyle::Primary));
    assert_eq!(card.buttons[1].style, None);
}

#[test]
fn modal_has_three_fields_in_order() {
    let view = intake_modal(IntakeCategory::Bug, None);
    let ids: Vec<&str> = view.fields.iter().map(ModalField::id).collect();
    assert_eq!(ids, [TITLE_FIELD, DESCRIPTION_FIELD, PRIORITY_FIELD]);
}

#[test]
fn description_is_optional_multiline() {
    let view = intake_modal(IntakeCategory::Feature, None);
    assert!(matches!(
        &view.fields[1],
        ModalField::Text {
            multiline: true,
            optional: true,
            ..
        }
    ));
    assert!(matches!(
        &view.fields[0],
        ModalField::Text {
            multiline: false,
            optional: false,
            ..
        }
    ));
}

#[test]
fn priority_select_offers_three_values() {
    let view = intake_modal(IntakeCategory::Bug, None);
    let ModalField::Select { options, .. } = &view.fields[2] else {
        panic!("priority must be a select");
    };
    let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
    assert_eq!(values, ["low", "medium", "high"]);
}

#[test]
fn modal_carries_category_and_metadata() {
    let view = intake_modal(IntakeCategory::Feature, Some("{\"v\":1}".into()));
    assert!(view.callback_id.contains("feature"));
    assert_eq!(view.title, "機能要望フォーム");
    assert_eq!(view.submit_label, SUBMIT_LABEL);
    assert_eq!(view.private_metadata.as_deref(), Some("{\"v\":1}"));
}
