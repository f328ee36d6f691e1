//! The category card and the intake form.

use crate::models::{IntakeCategory, Priority};

use super::platform::{ButtonStyle, Card, CardButton, ModalField, ModalView, SelectOption};

/// Field id of the one-line summary.
pub const TITLE_FIELD: &str = "title";
/// Field id of the free-form details.
pub const DESCRIPTION_FIELD: &str = "description";
/// Field id of the priority selector.
pub const PRIORITY_FIELD: &str = "priority";

/// Heading of the category selection card.
pub const CARD_TITLE: &str = "お問い合わせカテゴリを選択してください";
/// Submit button label of the intake form.
pub const SUBMIT_LABEL: &str = "送信";

/// Card offering one button per intake category; the bug button is primary.
#[must_use]
pub fn category_card() -> Card {
    let buttons = IntakeCategory::ALL
        .into_iter()
        .map(|category| CardButton {
            id: category.action_id().to_owned(),
            label: category.button_label().to_owned(),
            style: (category == IntakeCategory::Bug).then_some(ButtonStyle::Primary),
        })
        .collect();

    Card {
        title: CARD_TITLE.to_owned(),
        buttons,
    }
}

/// Intake form for `category`.
///
/// The callback id encodes the category; `private_metadata` carries the
/// encoded correlation record.
#[must_use]
pub fn intake_modal(category: IntakeCategory, private_metadata: Option<String>) -> ModalView {
    let priority_options = Priority::ALL
        .into_iter()
        .map(|p| SelectOption {
            label: p.label().to_owned(),
            value: p.value().to_owned(),
        })
        .collect();

    ModalView {
        callback_id: category.callback_id(),
        title: category.form_title().to_owned(),
        submit_label: SUBMIT_LABEL.to_owned(),
        private_metadata,
        fields: vec![
            ModalField::Text {
                id: TITLE_FIELD.to_owned(),
                label: "件名".to_owned(),
                multiline: false,
                optional: false,
            },
            ModalField::Text {
                id: DESCRIPTION_FIELD.to_owned(),
                label: "詳細".to_owned(),
                multiline: true,
                optional: true,
            },
            ModalField::Select {
                id: PRIORITY_FIELD.to_owned(),
                label: "優先度".to_owned(),
                options: priority_options,
            },
        ],
    }
}
