//! Normalization of Slack webhook deliveries.
//!
//! Slack posts three body shapes to the webhook:
//! - JSON Events API envelopes (`url_verification`, `event_callback`),
//! - form bodies with a `payload=` JSON field (interactions),
//! - form bodies with slash-command fields.
//!
//! Each delivery becomes a [`SlackInbound`] carrying a platform-neutral
//! [`InboundEvent`]. Conversation references take the form
//! `slack:<channel>:<thread_ts or ts>`.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::debug;

use crate::intake::{
    ActionEvent, InboundEvent, ModalSubmitEvent, SlashCommandEvent, TriggerEvent,
};
use crate::models::ConversationRef;
use crate::{AppError, Result};

/// Adapter name used in conversation references.
pub const ADAPTER: &str = "slack";

/// Outcome of parsing one webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlackInbound {
    /// Endpoint ownership check; echo the challenge back.
    UrlVerification(String),
    /// An event for the intake flow.
    Event {
        /// Delivery identity used for de-duplication.
        dedup_key: String,
        /// Normalized event.
        event: InboundEvent,
    },
    /// A delivery the bot does not act on.
    Ignored(&'static str),
}

#[derive(Debug, Deserialize)]
struct EventEnvelope {
    #[serde(rename = "type")]
    kind: String,
    challenge: Option<String>,
    event_id: Option<String>,
    event: Option<EventBody>,
}

#[derive(Debug, Deserialize)]
struct EventBody {
    #[serde(rename = "type")]
    kind: String,
    subtype: Option<String>,
    bot_id: Option<String>,
    text: Option<String>,
    channel: Option<String>,
    ts: Option<String>,
    thread_ts: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdRef {
    id: String,
}

#[derive(Debug, Default, Deserialize)]
struct Container {
    channel_id: Option<String>,
    message_ts: Option<String>,
    thread_ts: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    ts: String,
    thread_ts: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ActionRef {
    action_id: String,
}

#[derive(Debug, Deserialize)]
struct StateValue {
    value: Option<String>,
    selected_option: Option<SelectedOption>,
}

#[derive(Debug, Deserialize)]
struct SelectedOption {
    value: String,
}

#[derive(Debug, Default, Deserialize)]
struct ViewState {
    #[serde(default)]
    values: HashMap<String, HashMap<String, StateValue>>,
}

#[derive(Debug, Deserialize)]
struct ViewPayload {
    id: Option<String>,
    callback_id: Option<String>,
    private_metadata: Option<String>,
    #[serde(default)]
    state: ViewState,
}

#[derive(Debug, Deserialize)]
struct InteractionPayload {
    #[serde(rename = "type")]
    kind: String,
    trigger_id: Option<String>,
    user: Option<IdRef>,
    channel: Option<IdRef>,
    #[serde(default)]
    container: Container,
    message: Option<MessageRef>,
    #[serde(default)]
    actions: Vec<ActionRef>,
    view: Option<ViewPayload>,
}

/// Parse a webhook body according to its content type.
///
/// # Errors
///
/// Returns `AppError::Payload` when the body is not valid for its content
/// type or lacks fields every delivery of its kind carries.
pub fn parse_request(content_type: &str, body: &[u8]) -> Result<SlackInbound> {
    if content_type.starts_with("application/x-www-form-urlencoded") {
        let params: HashMap<String, String> =
            url::form_urlencoded::parse(body).into_owned().collect();
        match params.get("payload") {
            Some(payload) => parse_interaction(payload),
            None => parse_command(&params),
        }
    } else {
        parse_event_envelope(body)
    }
}

fn parse_event_envelope(body: &[u8]) -> Result<SlackInbound> {
    let envelope: EventEnvelope = serde_json::from_slice(body)?;

    match envelope.kind.as_str() {
        "url_verification" => {
            let challenge = envelope
                .challenge
                .ok_or_else(|| AppError::Payload("url_verification without challenge".into()))?;
            Ok(SlackInbound::UrlVerification(challenge))
        }
        "event_callback" => {
            let event = envelope
                .event
                .ok_or_else(|| AppError::Payload("event_callback without event".into()))?;
            normalize_event(envelope.event_id, event)
        }
        other => {
            debug!(envelope_type = other, "ignoring envelope");
            Ok(SlackInbound::Ignored("unsupported envelope type"))
        }
    }
}

fn normalize_event(event_id: Option<String>, event: EventBody) -> Result<SlackInbound> {
    if event.bot_id.is_some() {
        return Ok(SlackInbound::Ignored("bot message"));
    }
    if event.kind == "message" && event.subtype.is_some() {
        return Ok(SlackInbound::Ignored("message subtype"));
    }

    let (Some(channel), Some(ts)) = (event.channel, event.ts) else {
        return Err(AppError::Payload(format!(
            "{} event without channel or ts",
            event.kind
        )));
    };
    let root = event.thread_ts.unwrap_or_else(|| ts.clone());
    let dedup_key = event_id.unwrap_or_else(|| format!("{channel}:{ts}"));
    let trigger = TriggerEvent {
        text: event.text.unwrap_or_default(),
        thread: ConversationRef::thread(ADAPTER, channel, root),
        message_id: ts,
    };

    let event = match event.kind.as_str() {
        "app_mention" => InboundEvent::Mention(trigger),
        "message" => InboundEvent::Message(trigger),
        _ => return Ok(SlackInbound::Ignored("unsupported event type")),
    };
    Ok(SlackInbound::Event { dedup_key, event })
}

fn parse_interaction(raw: &str) -> Result<SlackInbound> {
    let payload: InteractionPayload = serde_json::from_str(raw)?;
    let user_id = payload.user.map(|u| u.id).unwrap_or_default();

    match payload.kind.as_str() {
        "block_actions" => {
            let trigger_id = payload
                .trigger_id
                .ok_or_else(|| AppError::Payload("block_actions without trigger_id".into()))?;
            let Some(action) = payload.actions.into_iter().next() else {
                return Ok(SlackInbound::Ignored("block_actions without actions"));
            };

            let channel = payload.channel.map(|c| c.id).or(payload.container.channel_id);
            let (message_ts, thread_ts) = match payload.message {
                Some(message) => (Some(message.ts), message.thread_ts),
                None => (payload.container.message_ts, payload.container.thread_ts),
            };
            let message_id = message_ts.unwrap_or_default();
            let thread_id = channel.map(|channel| {
                let root = thread_ts.unwrap_or_else(|| message_id.clone());
                ConversationRef::thread(ADAPTER, channel, root).to_string()
            });

            Ok(SlackInbound::Event {
                dedup_key: trigger_id.clone(),
                event: InboundEvent::Action(ActionEvent {
                    action_id: action.action_id,
                    thread_id,
                    message_id,
                    trigger_id,
                    user_id,
                }),
            })
        }
        "view_submission" => {
            let view = payload
                .view
                .ok_or_else(|| AppError::Payload("view_submission without view".into()))?;
            let dedup_key = payload
                .trigger_id
                .or(view.id)
                .ok_or_else(|| AppError::Payload("view_submission without identity".into()))?;

            Ok(SlackInbound::Event {
                dedup_key,
                event: InboundEvent::ModalSubmit(ModalSubmitEvent {
                    callback_id: view.callback_id.unwrap_or_default(),
                    private_metadata: view.private_metadata.filter(|m| !m.is_empty()),
                    values: flatten_state(view.state),
                    user_id,
                }),
            })
        }
        _ => Ok(SlackInbound::Ignored("unsupported interaction type")),
    }
}

/// Flatten `block_id → action_id → value` into `action_id → value`,
/// dropping blank inputs.
fn flatten_state(state: ViewState) -> HashMap<String, String> {
    state
        .values
        .into_values()
        .flat_map(HashMap::into_iter)
        .filter_map(|(action_id, value)| {
            value
                .value
                .or(value.selected_option.map(|option| option.value))
                .filter(|v| !v.is_empty())
                .map(|v| (action_id, v))
        })
        .collect()
}

fn parse_command(params: &HashMap<String, String>) -> Result<SlackInbound> {
    let field = |name: &str| {
        params
            .get(name)
            .filter(|v| !v.is_empty())
            .cloned()
            .ok_or_else(|| AppError::Payload(format!("slash command without {name}")))
    };

    let command = field("command")?;
    let channel = field("channel_id")?;
    let trigger_id = field("trigger_id")?;

    Ok(SlackInbound::Event {
        dedup_key: trigger_id.clone(),
        event: InboundEvent::SlashCommand(SlashCommandEvent {
            command,
            text: params.get("text").cloned().unwrap_or_default(),
            channel: ConversationRef::channel(ADAPTER, channel),
            trigger_id,
        }),
    })
}
