//! Unit tests for normalization of Slack webhook deliveries.

use helpdesk_bot::intake::InboundEvent;
use helpdesk_bot::models::ConversationRef;
use helpdesk_bot::slack::events::{parse_request, SlackInbound};
use serde_json::json;

const JSON: &str = "application/json";
const FORM: &str = "application/x-www-form-urlencoded";

fn form_payload(payload: &serde_json::Value) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("payload", &payload.to_string())
        .finish()
}

fn event_callback(event: &serde_json::Value) -> Vec<u8> {
    json!({
        "type": "event_callback",
        "event_id": "Ev0001",
        "event": event,
    })
    .to_string()
    .into_bytes()
}

#[test]
fn url_verification_echoes_challenge() {
    let body = json!({ "type": "url_verification", "challenge": "3eZbrw1aBm2rZgRNFdxV2595E9CY3gmdALWMmHkvFXO7tYXAYM8P" });
    let inbound = parse_request(JSON, body.to_string().as_bytes()).expect("parse");
    assert_eq!(
        inbound,
        SlackInbound::UrlVerification(
            "3eZbrw1aBm2rZgRNFdxV2595E9CY3gmdALWMmHkvFXO7tYXAYM8P".into()
        )
    );
}

#[test]
fn root_mention_uses_own_ts_as_thread() {
    let body = event_callback(&json!({
        "type": "app_mention",
        "text": "<@U0BOT> help please",
        "channel": "C123",
        "ts": "1234567890.123456",
    }));
    let SlackInbound::Event { dedup_key, event } = parse_request(JSON, &body).expect("parse") else {
        panic!("expected event");
    };
    assert_eq!(dedup_key, "Ev0001");
    let InboundEvent::Mention(trigger) = event else {
        panic!("expected mention");
    };
    assert_eq!(trigger.text, "<@U0BOT> help please");
    assert_eq!(
        trigger.thread,
        ConversationRef::thread("slack", "C123", "1234567890.123456")
    );
    assert_eq!(trigger.message_id, "1234567890.123456");
}

#[test]
fn threaded_message_uses_thread_ts() {
    let body = event_callback(&json!({
        "type": "message",
        "text": "help",
        "channel": "C123",
        "ts": "1234567899.000200",
        "thread_ts": "1234567890.123456",
    }));
    let SlackInbound::Event { event, .. } = parse_request(JSON, &body).expect("parse") else {
        panic!("expected event");
    };
    let InboundEvent::Message(trigger) = event else {
        panic!("expected message");
    };
    assert_eq!(trigger.thread.to_string(), "slack:C123:1234567890.123456");
    assert_eq!(trigger.message_id, "1234567899.000200");
}

#[test]
fn bot_messages_are_ignored() {
    let body = event_callback(&json!({
        "type": "message",
        "text": "help",
        "bot_id": "B01",
        "channel": "C123",
        "ts": "1.2",
    }));
    assert!(matches!(
        parse_request(JSON, &body).expect("parse"),
        SlackInbound::Ignored(_)
    ));
}

#[test]
fn message_subtypes_are_ignored() {
    let body = event_callback(&json!({
        "type": "message",
        "subtype": "message_changed",
        "channel": "C123",
        "ts": "1.2",
    }));
    assert!(matches!(
        parse_request(JSON, &body).expect("parse"),
        SlackInbound::Ignored(_)
    ));
}

#[test]
fn invalid_json_is_an_error() {
    assert!(parse_request(JSON, b"{nope").is_err());
}

#[test]
fn block_action_reports_thread_and_message() {
    let payload = json!({
        "type": "block_actions",
        "trigger_id": "13345224609.738474920.8088930838d88f008e0",
        "user": { "id": "U123" },
        "channel": { "id": "C123" },
        "message": { "ts": "1234567891.000100", "thread_ts": "1234567890.123456" },
        "actions": [ { "action_id": "bug", "block_id": "intake_category" } ],
    });
    let body = form_payload(&payload);
    let SlackInbound::Event { dedup_key, event } =
        parse_request(FORM, body.as_bytes()).expect("parse")
    else {
        panic!("expected event");
    };
    assert_eq!(dedup_key, "13345224609.738474920.8088930838d88f008e0");
    let InboundEvent::Action(action) = event else {
        panic!("expected action");
    };
    assert_eq!(action.action_id, "bug");
    assert_eq!(action.thread_id.as_deref(), Some("slack:C123:1234567890.123456"));
    assert_eq!(action.message_id, "1234567891.000100");
    assert_eq!(action.user_id, "U123");
}

#[test]
fn block_action_on_root_message_uses_container() {
    let payload = json!({
        "type": "block_actions",
        "trigger_id": "t-1",
        "user": { "id": "U123" },
        "container": { "channel_id": "C9", "message_ts": "1700000000.000001" },
        "actions": [ { "action_id": "feature" } ],
    });
    let body = form_payload(&payload);
    let SlackInbound::Event {
        event: InboundEvent::Action(action),
        ..
    } = parse_request(FORM, body.as_bytes()).expect("parse")
    else {
        panic!("expected action");
    };
    assert_eq!(action.thread_id.as_deref(), Some("slack:C9:1700000000.000001"));
    assert_eq!(action.message_id, "1700000000.000001");
}

#[test]
fn view_submission_flattens_state_values() {
    let payload = json!({
        "type": "view_submission",
        "trigger_id": "t-2",
        "user": { "id": "U123" },
        "view": {
            "id": "V123",
            "callback_id": "helpdesk_submit_bug",
            "private_metadata": "{\"v\":1,\"in_thread\":false}",
            "state": { "values": {
                "title": { "title": { "type": "plain_text_input", "value": "Login broken" } },
                "description": { "description": { "type": "plain_text_input", "value": null } },
                "priority": { "priority": {
                    "type": "static_select",
                    "selected_option": { "text": { "type": "plain_text", "text": "高" }, "value": "high" }
                } }
            } }
        }
    });
    let body = form_payload(&payload);
    let SlackInbound::Event {
        event: InboundEvent::ModalSubmit(submit),
        ..
    } = parse_request(FORM, body.as_bytes()).expect("parse")
    else {
        panic!("expected modal submission");
    };
    assert_eq!(submit.callback_id, "helpdesk_submit_bug");
    assert_eq!(
        submit.private_metadata.as_deref(),
        Some("{\"v\":1,\"in_thread\":false}")
    );
    assert_eq!(submit.values.get("title").map(String::as_str), Some("Login broken"));
    assert_eq!(submit.values.get("priority").map(String::as_str), Some("high"));
    assert!(!submit.values.contains_key("description"));
}

#[test]
fn slash_command_targets_channel() {
    let body = "command=%2Fhelpdesk&text=&channel_id=C123&trigger_id=t-3&user_id=U123";
    let SlackInbound::Event {
        dedup_key,
        event: InboundEvent::SlashCommand(command),
    } = parse_request(FORM, body.as_bytes()).expect("parse")
    else {
        panic!("expected slash command");
    };
    assert_eq!(dedup_key, "t-3");
    assert_eq!(command.command, "/helpdesk");
    assert_eq!(command.channel, ConversationRef::channel("slack", "C123"));
}

#[test]
fn slash_command_without_channel_is_an_error() {
    let body = "command=%2Fhelpdesk&trigger_id=t-3";
    assert!(parse_request(FORM, body.as_bytes()).is_err());
}

#[test]
fn unknown_interaction_is_ignored() {
    let body = form_payload(&json!({ "type": "shortcut", "trigger_id": "t" }));
    assert!(matches!(
        parse_request(FORM, body.as_bytes()).expect("parse"),
        SlackInbound::Ignored(_)
    ));
}
