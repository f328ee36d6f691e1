//! Confirmation message text.

use crate::models::Ticket;

/// Line separating the ticket summary from its description.
pub const SEPARATOR: &str = "---";

/// Render the confirmation posted after a form is submitted.
///
/// The separator and description are appended only when the ticket has a
/// non-empty description.
#[must_use]
pub fn confirmation(ticket: &Ticket) -> String {
    let mut lines = vec![
        "*受付完了 \u{2705}*".to_owned(),
        format!("受付番号: {}", ticket.id),
        format!("カテゴリ: {}", ticket.category.label()),
        format!("件名: {}", ticket.title),
        format!("優先度: {}", ticket.priority.value()),
    ];

    if let Some(description) = ticket.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(SEPARATOR.to_owned());
        lines.push(description.to_owned());
    }

    lines.join("\n")
}
