//! Slack Block Kit rendering of the intake descriptors.

use slack_morphism::prelude::{
    SlackActionBlockElement, SlackActionId, SlackActionsBlock, SlackBlock, SlackBlockButtonElement,
    SlackBlockChoiceItem, SlackBlockId, SlackBlockPlainTextInputElement, SlackBlockPlainTextOnly,
    SlackBlockStaticSelectElement, SlackBlockText, SlackCallbackId, SlackInputBlock,
    SlackInputBlockElement, SlackModalView, SlackSectionBlock, SlackView,
};

use crate::intake::{ButtonStyle, Card, CardButton, ModalField, ModalView};

/// Block id of the actions row on a card.
pub const CARD_ACTIONS_BLOCK: &str = "intake_category";

/// Build a plain markdown section block.
#[must_use]
pub fn text_section(text: &str) -> SlackBlock {
    SlackBlock::Section(SlackSectionBlock::new().with_text(SlackBlockText::MarkDown(text.into())))
}

fn button(button: &CardButton) -> SlackActionBlockElement {
    let element = SlackBlockButtonElement::new(
        SlackActionId(button.id.clone()),
        SlackBlockPlainTextOnly::from(button.label.as_str()),
    )
    .with_value(button.id.clone());

    let element = match button.style {
        Some(ButtonStyle::Primary) => element.with_style("primary".into()),
        None => element,
    };
    SlackActionBlockElement::Button(element)
}

/// Render a card: a bold title section followed by one actions row.
#[must_use]
pub fn card_blocks(card: &Card) -> Vec<SlackBlock> {
    let elements: Vec<SlackActionBlockElement> = card.buttons.iter().map(button).collect();
    vec![
        text_section(&format!("*{}*", card.title)),
        SlackBlock::Actions(
            SlackActionsBlock::new(elements)
                .with_block_id(SlackBlockId(CARD_ACTIONS_BLOCK.to_owned())),
        ),
    ]
}

fn input_block(field: &ModalField) -> SlackBlock {
    let block = match field {
        ModalField::Text {
            id,
            label,
            multiline,
            optional,
        } => {
            let element = SlackBlockPlainTextInputElement::new(SlackActionId(id.clone()))
                .with_multiline(*multiline);
            SlackInputBlock::new(
                SlackBlockPlainTextOnly::from(label.as_str()),
                SlackInputBlockElement::PlainTextInput(element),
            )
            .with_optional(*optional)
        }
        ModalField::Select { id, label, options } => {
            let choices = options
                .iter()
                .map(|option| {
                    SlackBlockChoiceItem::new(
                        SlackBlockPlainTextOnly::from(option.label.as_str()),
                        option.value.clone(),
                    )
                })
                .collect();
            let element =
                SlackBlockStaticSelectElement::new(SlackActionId(id.clone())).with_options(choices);
            SlackInputBlock::new(
                SlackBlockPlainTextOnly::from(label.as_str()),
                SlackInputBlockElement::StaticSelect(element),
            )
        }
    };

    // Block id mirrors the field id so submitted state is keyed consistently.
    SlackBlock::Input(block.with_block_id(SlackBlockId(field.id().to_owned())))
}

/// Render a modal form.
///
/// The `callback_id` and `private_metadata` are carried verbatim so the
/// `view_submission` payload can be correlated back to the request.
#[must_use]
pub fn modal_view(view: &ModalView) -> SlackView {
    let blocks = view.fields.iter().map(input_block).collect();

    let modal = SlackModalView::new(SlackBlockPlainTextOnly::from(view.title.as_str()), blocks)
        .with_callback_id(SlackCallbackId(view.callback_id.clone()))
        .with_submit(SlackBlockPlainTextOnly::from(view.submit_label.as_str()));

    let modal = match &view.private_metadata {
        Some(metadata) => modal.with_private_metadata(metadata.clone()),
        None => modal,
    };
    SlackView::Modal(modal)
}
