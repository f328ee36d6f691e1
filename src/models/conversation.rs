//! Adapter-prefixed conversation references.
//!
//! A reference has the shape `adapter:channel[:thread]`, e.g.
//! `slack:C123:1234567890.123456`. The thread segment is the timestamp of
//! the thread's root message.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AppError;

/// Parsed conversation reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationRef {
    /// Platform adapter name (`slack`).
    pub adapter: String,
    /// Platform channel id.
    pub channel: String,
    /// Root message id of the thread, when the reference names a thread.
    pub thread: Option<String>,
}

impl ConversationRef {
    /// Reference to a channel root.
    #[must_use]
    pub fn channel(adapter: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            adapter: adapter.into(),
            channel: channel.into(),
            thread: None,
        }
    }

    /// Reference to a thread rooted at `thread`.
    #[must_use]
    pub fn thread(
        adapter: impl Into<String>,
        channel: impl Into<String>,
        thread: impl Into<String>,
    ) -> Self {
        Self {
            adapter: adapter.into(),
            channel: channel.into(),
            thread: Some(thread.into()),
        }
    }

    /// Parse `adapter:channel[:thread]`. Empty segments are rejected.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.splitn(3, ':');
        let adapter = parts.next().filter(|s| !s.is_empty())?;
        let channel = parts.next().filter(|s| !s.is_empty())?;
        let thread = match parts.next() {
            Some("") => return None,
            Some(t) => Some(t.to_owned()),
            None => None,
        };
        Some(Self {
            adapter: adapter.to_owned(),
            channel: channel.to_owned(),
            thread,
        })
    }

    /// The `adapter:channel` reference with any thread segment dropped.
    #[must_use]
    pub fn channel_reference(&self) -> String {
        format!("{}:{}", self.adapter, self.channel)
    }

    /// This reference reduced to its channel root.
    #[must_use]
    pub fn to_channel(&self) -> Self {
        Self::channel(self.adapter.clone(), self.channel.clone())
    }
}

impl Display for ConversationRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.adapter, self.channel)?;
        if let Some(thread) = &self.thread {
            write!(f, ":{thread}")?;
        }
        Ok(())
    }
}

impl FromStr for ConversationRef {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
            .ok_or_else(|| AppError::Payload(format!("malformed conversation reference: {s}")))
    }
}

/// Whether a message sits inside a reply thread rather than at a channel root.
///
/// True iff a thread id is present and does not end with the message's own
/// id. A thread id ending in the message id means the message is itself the
/// thread root.
#[must_use]
pub fn is_thread_reply(thread_id: Option<&str>, message_id: &str) -> bool {
    thread_id.is_some_and(|thread| !thread.ends_with(message_id))
}

/// Channel part of a thread id: everything before the last `:` segment.
///
/// Returns `None` when the id cannot be split into adapter and channel.
/// A two-segment id already names a channel and is returned unchanged.
#[must_use]
pub fn channel_reference_of(thread_id: &str) -> Option<String> {
    ConversationRef::parse(thread_id).map(|conv| conv.channel_reference())
}
