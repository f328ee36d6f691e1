//! Unit tests for mapping destinations onto `chat.postMessage` fields.

use helpdesk_bot::intake::views::category_card;
use helpdesk_bot::intake::{Destination, MessageContent};
use helpdesk_bot::models::ConversationRef;
use helpdesk_bot::slack::client::SlackMessage;

#[test]
fn thread_destination_replies_in_thread() {
    let destination =
        Destination::Thread(ConversationRef::thread("slack", "C123", "1234567890.123456"));
    let message = SlackMessage::for_destination(&destination, MessageContent::Text("hi".into()))
        .expect("slack message");
    assert_eq!(message.channel.0, "C123");
    assert_eq!(
        message.thread_ts.map(|ts| ts.0).as_deref(),
        Some("1234567890.123456")
    );
    assert_eq!(message.text.as_deref(), Some("hi"));
    assert!(message.blocks.is_none());
}

#[test]
fn channel_destination_posts_at_root() {
    let destination = Destination::Channel(ConversationRef::channel("slack", "C123"));
    let message = SlackMessage::for_destination(&destination, MessageContent::Text("hi".into()))
        .expect("slack message");
    assert!(message.thread_ts.is_none());
}

#[test]
fn card_renders_blocks_with_fallback_text() {
    let destination = Destination::Channel(ConversationRef::channel("slack", "C123"));
    let message =
        SlackMessage::for_destination(&destination, MessageContent::Card(category_card()))
            .expect("slack message");
    assert_eq!(message.blocks.map(|b| b.len()), Some(2));
    assert_eq!(
        message.text.as_deref(),
        Some("お問い合わせカテゴリを選択してください")
    );
}

#[test]
fn foreign_adapter_is_rejected() {
    let destination = Destination::Channel(ConversationRef::channel("teams", "C123"));
    let err = SlackMessage::for_destination(&destination, MessageContent::Text("hi".into()))
        .unwrap_err();
    assert!(err.to_string().starts_with("slack:"), "{err}");
}

#[test]
fn thread_destination_without_thread_is_rejected() {
    let destination = Destination::Thread(ConversationRef::channel("slack", "C123"));
    assert!(
        SlackMessage::for_destination(&destination, MessageContent::Text("hi".into())).is_err()
    );
}
