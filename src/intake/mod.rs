//! Ticket intake flow.
//!
//! Trigger → category card → intake modal → confirmation. Each step runs
//! in its own webhook delivery; the modal's correlation metadata is the
//! only state carried between the button press and the submission.

pub mod event;
pub mod flow;
pub mod format;
pub mod platform;
pub mod router;
pub mod views;

pub use event::{ActionEvent, InboundEvent, ModalSubmitEvent, SlashCommandEvent, TriggerEvent};
pub use flow::IntakeFlow;
pub use platform::{
    ButtonStyle, Card, CardButton, ChatPlatform, Destination, MessageContent, ModalField,
    ModalView, PostedMessage, SelectOption,
};
