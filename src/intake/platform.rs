//! Chat platform port.
//!
//! The intake flow talks to the chat platform only through
//! [`ChatPlatform`] and the platform-neutral descriptors in this module.
//! The Slack adapter renders them into Block Kit.

use std::future::Future;
use std::pin::Pin;

use crate::models::ConversationRef;
use crate::Result;

/// Boxed future returned by [`ChatPlatform`] methods.
pub type PlatformFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Where a message is posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Reply inside a thread; the reference must carry a thread segment.
    Thread(ConversationRef),
    /// Top-level message in a channel.
    Channel(ConversationRef),
}

impl Destination {
    /// The conversation this destination points at.
    #[must_use]
    pub fn conversation(&self) -> &ConversationRef {
        match self {
            Self::Thread(conv) | Self::Channel(conv) => conv,
        }
    }
}

/// Visual emphasis of a card button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    /// Highlighted call to action.
    Primary,
}

/// A button on a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardButton {
    /// Action identifier delivered when pressed.
    pub id: String,
    /// Visible label.
    pub label: String,
    /// Optional emphasis.
    pub style: Option<ButtonStyle>,
}

/// A card with a title and a row of buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Heading text.
    pub title: String,
    /// Buttons in display order.
    pub buttons: Vec<CardButton>,
}

/// Body of an outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    /// Interactive card.
    Card(Card),
    /// Markdown text.
    Text(String),
}

/// One fixed option of a select field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Human label.
    pub label: String,
    /// Stable machine value.
    pub value: String,
}

/// An input field of a modal form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalField {
    /// Free text input.
    Text {
        /// Field id; submitted values are keyed by it.
        id: String,
        /// Label above the input.
        label: String,
        /// Multi-line input.
        multiline: bool,
        /// May be left blank.
        optional: bool,
    },
    /// Single choice from a fixed option set.
    Select {
        /// Field id; submitted values are keyed by it.
        id: String,
        /// Label above the selector.
        label: String,
        /// Options in display order.
        options: Vec<SelectOption>,
    },
}

impl ModalField {
    /// Field id.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Text { id, .. } | Self::Select { id, .. } => id,
        }
    }
}

/// A modal form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    /// Identifies the form on submission.
    pub callback_id: String,
    /// Modal title.
    pub title: String,
    /// Submit button label.
    pub submit_label: String,
    /// Opaque string returned verbatim with the submission.
    pub private_metadata: Option<String>,
    /// Fields in display order.
    pub fields: Vec<ModalField>,
}

/// Handle to a posted message, usable for deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedMessage {
    /// Channel the message lives in.
    pub channel: ConversationRef,
    /// Platform message id.
    pub message_id: String,
}

/// Outbound primitives of a chat platform.
pub trait ChatPlatform: Send + Sync {
    /// Post a message.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Slack` (or another platform error) if the post fails.
    fn post<'a>(
        &'a self,
        destination: &'a Destination,
        content: MessageContent,
    ) -> PlatformFuture<'a, PostedMessage>;

    /// Open a modal in response to the interaction identified by `trigger_id`.
    ///
    /// # Errors
    ///
    /// Returns a platform error if the modal cannot be opened.
    fn open_modal<'a>(&'a self, trigger_id: &'a str, view: &'a ModalView) -> PlatformFuture<'a, ()>;

    /// Delete a previously posted message.
    ///
    /// # Errors
    ///
    /// Returns a platform error if the deletion fails.
    fn delete<'a>(&'a self, message: &'a PostedMessage) -> PlatformFuture<'a, ()>;
}
