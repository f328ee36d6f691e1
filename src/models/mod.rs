//! Domain model module declarations.

pub mod category;
pub mod conversation;
pub mod correlation;
pub mod priority;
pub mod ticket;

pub use category::IntakeCategory;
pub use conversation::ConversationRef;
pub use correlation::{CardRef, ConfirmationRoute, CorrelationMetadata};
pub use priority::Priority;
pub use ticket::{Ticket, TicketId};
