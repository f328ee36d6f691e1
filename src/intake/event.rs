//! Platform-neutral inbound events.

use std::collections::HashMap;

use crate::models::ConversationRef;

/// A message that may trigger the category card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerEvent {
    /// Message text.
    pub text: String,
    /// Thread the message belongs to (or starts).
    pub thread: ConversationRef,
    /// Platform message id.
    pub message_id: String,
}

/// A slash command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashCommandEvent {
    /// Command name including the leading slash.
    pub command: String,
    /// Text after the command.
    pub text: String,
    /// Channel the command was issued in.
    pub channel: ConversationRef,
    /// Interaction trigger id.
    pub trigger_id: String,
}

/// A button press on a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEvent {
    /// Action identifier of the pressed button.
    pub action_id: String,
    /// Conversation reference of the card (`adapter:channel:thread`).
    pub thread_id: Option<String>,
    /// Platform id of the card message.
    pub message_id: String,
    /// Interaction trigger id, needed to open a modal.
    pub trigger_id: String,
    /// Acting user.
    pub user_id: String,
}

/// A modal form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalSubmitEvent {
    /// Callback id of the submitted form.
    pub callback_id: String,
    /// Private metadata attached when the modal was opened.
    pub private_metadata: Option<String>,
    /// Submitted values keyed by field id; blank fields are absent.
    pub values: HashMap<String, String>,
    /// Submitting user.
    pub user_id: String,
}

/// Normalized inbound event routed to the intake flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// The bot was mentioned.
    Mention(TriggerEvent),
    /// A plain message was posted where the bot listens.
    Message(TriggerEvent),
    /// A slash command was issued.
    SlashCommand(SlashCommandEvent),
    /// A card button was pressed.
    Action(ActionEvent),
    /// A modal form was submitted.
    ModalSubmit(ModalSubmitEvent),
}

impl InboundEvent {
    /// Short kind name for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Mention(_) => "mention",
            Self::Message(_) => "message",
            Self::SlashCommand(_) => "slash_command",
            Self::Action(_) => "action",
            Self::ModalSubmit(_) => "modal_submit",
        }
    }
}
