//! Slack Web API client implementing the chat platform port.

use std::sync::Arc;
use std::time::Duration;

use slack_morphism::prelude::{
    SlackApiChatDeleteRequest, SlackApiChatPostMessageRequest, SlackApiToken, SlackApiTokenType,
    SlackApiTokenValue, SlackApiViewsOpenRequest, SlackBlock, SlackChannelId, SlackClient,
    SlackClientHyperHttpsConnector, SlackClientSession, SlackMessageContent, SlackTriggerId,
    SlackTs,
};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::SlackConfig;
use crate::intake::platform::PlatformFuture;
use crate::intake::{ChatPlatform, Destination, MessageContent, ModalView, PostedMessage};
use crate::models::ConversationRef;
use crate::slack::{blocks, events::ADAPTER};
use crate::{AppError, Result};

/// Attempts made for a rate-limited `chat.postMessage`.
const MAX_POST_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Message to be delivered to Slack via chat.postMessage.
#[derive(Debug, Clone)]
pub struct SlackMessage {
    /// Target channel.
    pub channel: SlackChannelId,
    /// Markdown text, also the notification fallback for block messages.
    pub text: Option<String>,
    /// Block Kit layout.
    pub blocks: Option<Vec<SlackBlock>>,
    /// Parent message when replying in a thread.
    pub thread_ts: Option<SlackTs>,
}

impl SlackMessage {
    /// Build the Slack message for a destination and content.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Slack` if the destination belongs to another
    /// adapter or a thread destination lacks its thread segment.
    pub fn for_destination(destination: &Destination, content: MessageContent) -> Result<Self> {
        let conv = slack_conversation(destination.conversation())?;
        let thread_ts = match destination {
            Destination::Thread(conv) => Some(SlackTs(conv.thread.clone().ok_or_else(|| {
                AppError::Slack(format!("thread destination without thread: {conv}"))
            })?)),
            Destination::Channel(_) => None,
        };

        let (text, blocks) = match content {
            MessageContent::Card(card) => {
                let blocks = blocks::card_blocks(&card);
                (Some(card.title), Some(blocks))
            }
            MessageContent::Text(text) => (Some(text), None),
        };

        Ok(Self {
            channel: SlackChannelId(conv.channel.clone()),
            text,
            blocks,
            thread_ts,
        })
    }

    fn into_request(self) -> SlackApiChatPostMessageRequest {
        let content = SlackMessageContent {
            text: self.text,
            blocks: self.blocks,
            attachments: None,
            upload: None,
            files: None,
            reactions: None,
            metadata: None,
        };

        SlackApiChatPostMessageRequest {
            channel: self.channel,
            content,
            as_user: None,
            icon_emoji: None,
            icon_url: None,
            link_names: Some(true),
            parse: None,
            thread_ts: self.thread_ts,
            username: None,
            reply_broadcast: None,
            unfurl_links: None,
            unfurl_media: None,
        }
    }
}

fn slack_conversation(conv: &ConversationRef) -> Result<&ConversationRef> {
    if conv.adapter == ADAPTER {
        Ok(conv)
    } else {
        Err(AppError::Slack(format!(
            "conversation {conv} does not belong to the slack adapter"
        )))
    }
}

/// Slack Web API wrapper authenticated with the bot token.
pub struct SlackService {
    client: Arc<SlackClient<SlackClientHyperHttpsConnector>>,
    bot_token: SlackApiToken,
}

impl SlackService {
    /// Create the HTTPS client for the configured bot token.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Slack` if the HTTPS connector cannot be created.
    pub fn new(config: &SlackConfig) -> Result<Self> {
        let connector = SlackClientHyperHttpsConnector::new()
            .map_err(|err| AppError::Slack(format!("failed to init slack connector: {err}")))?;
        let client = Arc::new(SlackClient::new(connector));
        let bot_token = SlackApiToken {
            token_value: SlackApiTokenValue(config.bot_token.clone()),
            cookie: None,
            team_id: None,
            scope: None,
            token_type: Some(SlackApiTokenType::Bot),
        };

        info!("slack web api client ready");
        Ok(Self { client, bot_token })
    }

    /// Create an HTTP session for direct API calls using the bot token.
    #[must_use]
    pub fn http_session(&self) -> SlackClientSession<'_, SlackClientHyperHttpsConnector> {
        self.client.open_session(&self.bot_token)
    }

    /// Post a message, honouring Slack's `retry_after` on rate limiting.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Slack` if the API call fails or stays rate
    /// limited for every attempt.
    pub async fn post_message(&self, message: SlackMessage) -> Result<PostedMessage> {
        let request = message.into_request();
        let session = self.http_session();
        let mut attempt = 1;
        loop {
            match session.chat_post_message(&request).await {
                Ok(response) => {
                    return Ok(PostedMessage {
                        channel: ConversationRef::channel(ADAPTER, response.channel.0),
                        message_id: response.ts.0,
                    });
                }
                Err(slack_morphism::errors::SlackClientError::RateLimitError(rate))
                    if attempt < MAX_POST_ATTEMPTS =>
                {
                    let delay = rate.retry_after.unwrap_or(DEFAULT_RETRY_DELAY);
                    warn!(attempt, delay = ?delay, "slack post rate limited; retrying");
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    return Err(AppError::Slack(format!("failed to post message: {err}")));
                }
            }
        }
    }

    /// Open a Slack modal dialog.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Slack` if the API call fails.
    pub async fn open_view(&self, trigger_id: &str, view: &ModalView) -> Result<()> {
        let request =
            SlackApiViewsOpenRequest::new(SlackTriggerId(trigger_id.to_owned()), blocks::modal_view(view));
        self.http_session()
            .views_open(&request)
            .await
            .map_err(|err| AppError::Slack(format!("failed to open modal: {err}")))?;
        Ok(())
    }

    /// Delete a message posted by the bot.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Slack` if the API call fails.
    pub async fn delete_message(&self, message: &PostedMessage) -> Result<()> {
        let conv = slack_conversation(&message.channel)?;
        let request = SlackApiChatDeleteRequest::new(
            SlackChannelId(conv.channel.clone()),
            SlackTs(message.message_id.clone()),
        );
        self.http_session()
            .chat_delete(&request)
            .await
            .map_err(|err| AppError::Slack(format!("failed to delete message: {err}")))?;
        Ok(())
    }
}

impl ChatPlatform for SlackService {
    fn post<'a>(
        &'a self,
        destination: &'a Destination,
        content: MessageContent,
    ) -> PlatformFuture<'a, PostedMessage> {
        Box::pin(async move {
            let message = SlackMessage::for_destination(destination, content)?;
            self.post_message(message).await
        })
    }

    fn open_modal<'a>(&'a self, trigger_id: &'a str, view: &'a ModalView) -> PlatformFuture<'a, ()> {
        Box::pin(self.open_view(trigger_id, view))
    }

    fn delete<'a>(&'a self, message: &'a PostedMessage) -> PlatformFuture<'a, ()> {
        Box::pin(self.delete_message(message))
    }
}
