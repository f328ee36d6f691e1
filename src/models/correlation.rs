//! Correlation metadata carried through a modal.
//!
//! Opening a modal and receiving its submission happen in unrelated
//! webhook deliveries. The origin of the request travels with the modal as
//! its private metadata: a compact, versioned JSON record.

use serde::{Deserialize, Serialize};

use super::conversation::{channel_reference_of, is_thread_reply};
use super::ConversationRef;
use crate::{AppError, Result};

/// Current schema version written by [`CorrelationMetadata::encode`].
pub const CORRELATION_VERSION: u32 = 1;

/// Location of the card message that carried the category buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRef {
    /// `adapter:channel` of the card.
    pub channel: String,
    /// Platform message id of the card.
    pub message_id: String,
}

/// Origin context recovered when the modal is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationMetadata {
    /// Schema version.
    #[serde(rename = "v")]
    pub version: u32,
    /// The button was pressed inside a reply thread.
    #[serde(rename = "in_thread")]
    pub origin_is_thread: bool,
    /// Channel to post into when the origin was a channel root.
    #[serde(rename = "channel", default, skip_serializing_if = "Option::is_none")]
    pub channel_ref: Option<String>,
    /// Thread to reply into when the origin was a reply thread.
    #[serde(rename = "thread", default, skip_serializing_if = "Option::is_none")]
    pub thread_ref: Option<String>,
    /// Card to clean up after submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<CardRef>,
}

/// Where the confirmation for a submitted form goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationRoute {
    /// Reply in the originating thread.
    Thread(ConversationRef),
    /// Post a standalone message in the originating channel.
    Channel(ConversationRef),
    /// No origin could be recovered; nothing is posted.
    Nowhere,
}

impl Default for CorrelationMetadata {
    fn default() -> Self {
        Self::new(false, None)
    }
}

impl CorrelationMetadata {
    /// Build a record with only the two routing fields set.
    #[must_use]
    pub fn new(origin_is_thread: bool, channel_ref: Option<String>) -> Self {
        Self {
            version: CORRELATION_VERSION,
            origin_is_thread,
            channel_ref,
            thread_ref: None,
            card: None,
        }
    }

    /// Derive the record from the conversation reference of a button press.
    ///
    /// `thread_id` is the conversation the card lives in and `message_id`
    /// is the card's own id. Inside a reply thread the thread id is kept for
    /// the reply; at a channel root only the channel part is kept.
    #[must_use]
    pub fn from_action(thread_id: Option<&str>, message_id: &str) -> Self {
        let origin_is_thread = is_thread_reply(thread_id, message_id);
        let channel_ref = if origin_is_thread {
            None
        } else {
            thread_id.and_then(channel_reference_of)
        };
        let thread_ref = if origin_is_thread {
            thread_id.map(str::to_owned)
        } else {
            None
        };
        let card = thread_id
            .and_then(channel_reference_of)
            .filter(|_| !message_id.is_empty())
            .map(|channel| CardRef {
                channel,
                message_id: message_id.to_owned(),
            });

        Self {
            version: CORRELATION_VERSION,
            origin_is_thread,
            channel_ref,
            thread_ref,
            card,
        }
    }

    /// Serialize to the opaque private-metadata string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Correlation` if serialization fails.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|err| AppError::Correlation(format!("failed to encode metadata: {err}")))
    }

    /// Parse and validate a private-metadata string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Correlation` when the string is empty, is not a
    /// metadata record, or carries an unsupported version.
    pub fn decode(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(AppError::Correlation("metadata is empty".into()));
        }

        let metadata: Self = serde_json::from_str(raw)
            .map_err(|err| AppError::Correlation(format!("malformed metadata: {err}")))?;

        if metadata.version != CORRELATION_VERSION {
            return Err(AppError::Correlation(format!(
                "unsupported metadata version {}",
                metadata.version
            )));
        }

        Ok(metadata)
    }

    /// Resolve the confirmation destination.
    ///
    /// Thread origin wins; otherwise a parseable channel reference is used;
    /// otherwise there is nowhere to post.
    #[must_use]
    pub fn route(&self) -> ConfirmationRoute {
        if self.origin_is_thread {
            if let Some(thread) = self
                .thread_ref
                .as_deref()
                .and_then(ConversationRef::parse)
                .filter(|conv| conv.thread.is_some())
            {
                return ConfirmationRoute::Thread(thread);
            }
        }

        match self.channel_ref.as_deref().and_then(ConversationRef::parse) {
            Some(channel) => ConfirmationRoute::Channel(channel.to_channel()),
            None => ConfirmationRoute::Nowhere,
        }
    }
}
