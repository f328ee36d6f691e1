//! Intake flow handlers.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{TriggerConfig, TriggerPolicy};
use crate::models::{
    ConfirmationRoute, ConversationRef, CorrelationMetadata, IntakeCategory, Priority, Ticket,
};
use crate::{AppError, Result};

use super::event::{ActionEvent, ModalSubmitEvent, SlashCommandEvent, TriggerEvent};
use super::platform::{ChatPlatform, Destination, MessageContent, PostedMessage};
use super::{format, views};

/// Case-insensitive substring match, used for mentions.
#[must_use]
pub fn mention_matches(text: &str, keyword: &str) -> bool {
    text.to_lowercase().contains(&keyword.to_lowercase())
}

/// Case-insensitive equality of the trimmed text, used for plain messages.
#[must_use]
pub fn message_matches(text: &str, keyword: &str) -> bool {
    text.trim().to_lowercase() == keyword.trim().to_lowercase()
}

/// Exact slash command name match.
#[must_use]
pub fn command_matches(command: &str, configured: &str) -> bool {
    command.trim() == configured
}

/// The three intake handlers bound to a chat platform.
pub struct IntakeFlow {
    platform: Arc<dyn ChatPlatform>,
    trigger: TriggerConfig,
}

impl IntakeFlow {
    /// Bind the flow to a platform with the given trigger policy.
    #[must_use]
    pub fn new(platform: Arc<dyn ChatPlatform>, trigger: TriggerConfig) -> Self {
        Self { platform, trigger }
    }

    /// Active trigger configuration.
    #[must_use]
    pub fn trigger(&self) -> &TriggerConfig {
        &self.trigger
    }

    /// Handle a bot mention. Returns `true` when the card was posted.
    ///
    /// # Errors
    ///
    /// Returns a platform error if posting the card fails.
    pub async fn on_mention(&self, event: &TriggerEvent) -> Result<bool> {
        if self.trigger.policy != TriggerPolicy::Mention
            || !mention_matches(&event.text, &self.trigger.keyword)
        {
            debug!(message_id = event.message_id, "mention did not match trigger");
            return Ok(false);
        }
        self.post_card(Destination::Thread(event.thread.clone()))
            .await?;
        Ok(true)
    }

    /// Handle a plain message. Returns `true` when the card was posted.
    ///
    /// # Errors
    ///
    /// Returns a platform error if posting the card fails.
    pub async fn on_message(&self, event: &TriggerEvent) -> Result<bool> {
        if self.trigger.policy != TriggerPolicy::Message
            || !message_matches(&event.text, &self.trigger.keyword)
        {
            return Ok(false);
        }
        self.post_card(Destination::Thread(event.thread.clone()))
            .await?;
        Ok(true)
    }

    /// Handle a slash command. Returns `true` when the card was posted.
    ///
    /// The card goes to the channel root, not a thread.
    ///
    /// # Errors
    ///
    /// Returns a platform error if posting the card fails.
    pub async fn on_slash_command(&self, event: &SlashCommandEvent) -> Result<bool> {
        if self.trigger.policy != TriggerPolicy::SlashCommand
            || !command_matches(&event.command, &self.trigger.command)
        {
            debug!(command = event.command, "slash command did not match trigger");
            return Ok(false);
        }
        self.post_card(Destination::Channel(event.channel.to_channel()))
            .await?;
        Ok(true)
    }

    async fn post_card(&self, destination: Destination) -> Result<PostedMessage> {
        let posted = self
            .platform
            .post(&destination, MessageContent::Card(views::category_card()))
            .await?;
        info!(
            conversation = %destination.conversation(),
            message_id = posted.message_id,
            "category card posted"
        );
        Ok(posted)
    }

    /// Handle a category button press by opening the intake form.
    ///
    /// # Errors
    ///
    /// Returns `AppError::UnknownAction` for an unrecognized action id, or a
    /// platform error if the modal cannot be opened.
    pub async fn on_action(&self, event: &ActionEvent) -> Result<()> {
        let category = IntakeCategory::from_action_id(&event.action_id)?;
        info!(
            action_id = event.action_id,
            user_id = event.user_id,
            "action received"
        );

        let metadata =
            CorrelationMetadata::from_action(event.thread_id.as_deref(), &event.message_id);
        if !metadata.origin_is_thread && metadata.channel_ref.is_none() {
            warn!(
                thread_id = ?event.thread_id,
                "conversation reference unparseable; confirmation will have no destination"
            );
        }

        let view = views::intake_modal(category, Some(metadata.encode()?));
        self.platform.open_modal(&event.trigger_id, &view).await
    }

    /// Handle a submitted intake form.
    ///
    /// Posts the confirmation to the originating thread or channel, removes
    /// the category card, and logs the ticket. A missing or invalid
    /// correlation record means the confirmation is not posted; a failed
    /// card deletion is only logged.
    ///
    /// # Errors
    ///
    /// Returns `AppError::UnknownCallback` for a callback id this bot did not
    /// issue, `AppError::InvalidSubmission` for a missing title or priority,
    /// or a platform error if posting the confirmation fails.
    pub async fn on_modal_submit(&self, event: &ModalSubmitEvent) -> Result<Ticket> {
        let category = IntakeCategory::from_callback_id(&event.callback_id)?;

        let title = event
            .values
            .get(views::TITLE_FIELD)
            .filter(|t| !t.trim().is_empty())
            .cloned()
            .ok_or_else(|| AppError::InvalidSubmission("title is required".into()))?;
        let priority = event
            .values
            .get(views::PRIORITY_FIELD)
            .ok_or_else(|| AppError::InvalidSubmission("priority is required".into()))
            .and_then(|value| Priority::from_value(value))?;
        let description = event.values.get(views::DESCRIPTION_FIELD).cloned();

        let ticket = Ticket::new(category, title, description, priority);
        let metadata = recover_metadata(event.private_metadata.as_deref());

        let text = format::confirmation(&ticket);
        match metadata.route() {
            ConfirmationRoute::Thread(thread) => {
                self.platform
                    .post(&Destination::Thread(thread), MessageContent::Text(text))
                    .await?;
            }
            ConfirmationRoute::Channel(channel) => {
                self.platform
                    .post(&Destination::Channel(channel), MessageContent::Text(text))
                    .await?;
            }
            ConfirmationRoute::Nowhere => {
                warn!(
                    ticket_id = %ticket.id,
                    "no origin recovered; confirmation not posted"
                );
            }
        }

        if let Some(card) = metadata.card.as_ref() {
            self.remove_card(&card.channel, &card.message_id).await;
        }

        info!(
            ticket_id = %ticket.id,
            category = ticket.category.label(),
            title = ticket.title,
            priority = ticket.priority.value(),
            description = ticket.description.as_deref().unwrap_or_default(),
            "new ticket created"
        );

        Ok(ticket)
    }

    /// Best-effort deletion of the category card.
    async fn remove_card(&self, channel: &str, message_id: &str) {
        let Some(channel) = ConversationRef::parse(channel) else {
            warn!(channel, "card channel unparseable; card left in place");
            return;
        };
        let card = PostedMessage {
            channel: channel.to_channel(),
            message_id: message_id.to_owned(),
        };
        if let Err(err) = self.platform.delete(&card).await {
            warn!(%err, message_id, "failed to delete category card");
        }
    }
}

/// Decode the modal's correlation record, degrading to "no destination".
fn recover_metadata(raw: Option<&str>) -> CorrelationMetadata {
    let Some(raw) = raw else {
        warn!("modal submitted without correlation metadata");
        return CorrelationMetadata::default();
    };
    CorrelationMetadata::decode(raw).unwrap_or_else(|err| {
        warn!(%err, "correlation metadata rejected");
        CorrelationMetadata::default()
    })
}
