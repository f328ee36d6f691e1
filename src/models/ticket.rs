//! Helpdesk ticket created from a submitted intake form.
//!
//! Tickets are never persisted; the confirmation message and a log record
//! are their only trace.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{IntakeCategory, Priority};

/// Display-only ticket number, `HD-` followed by four digits.
///
/// Drawn at random with no store behind it, so collisions are possible.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketId(String);

impl TicketId {
    /// Draw a new random ticket number.
    #[must_use]
    pub fn generate() -> Self {
        let bytes = Uuid::new_v4().into_bytes();
        let n = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) % 10_000;
        Self(format!("HD-{n:04}"))
    }

    /// Borrow the rendered id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TicketId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A submitted helpdesk request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Ticket {
    /// Display-only ticket number.
    pub id: TicketId,
    /// Bug report or feature request.
    pub category: IntakeCategory,
    /// One-line summary.
    pub title: String,
    /// Free-form details; `None` when left blank.
    pub description: Option<String>,
    /// Requested priority.
    pub priority: Priority,
}

impl Ticket {
    /// Construct a ticket with a freshly drawn id.
    ///
    /// A blank description is normalized to `None`.
    #[must_use]
    pub fn new(
        category: IntakeCategory,
        title: String,
        description: Option<String>,
        priority: Priority,
    ) -> Self {
        Self {
            id: TicketId::generate(),
            category,
            title,
            description: description.filter(|d| !d.is_empty()),
            priority,
        }
    }
}
