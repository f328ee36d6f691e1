//! Dispatch of normalized events to the intake handlers.

use tracing::{info, warn};

use crate::{AppError, Result};

use super::event::InboundEvent;
use super::flow::IntakeFlow;

/// Route one inbound event to its handler.
///
/// Unknown action and callback ids are rejected explicitly: they are logged
/// and returned as errors rather than treated as a default category.
///
/// # Errors
///
/// Propagates the handler's error.
pub async fn dispatch(flow: &IntakeFlow, event: InboundEvent) -> Result<()> {
    let kind = event.kind();
    let result = match &event {
        InboundEvent::Mention(trigger) => flow.on_mention(trigger).await.map(|_| ()),
        InboundEvent::Message(trigger) => flow.on_message(trigger).await.map(|_| ()),
        InboundEvent::SlashCommand(command) => flow.on_slash_command(command).await.map(|_| ()),
        InboundEvent::Action(action) => flow.on_action(action).await,
        InboundEvent::ModalSubmit(submit) => flow.on_modal_submit(submit).await.map(|_| ()),
    };

    match &result {
        Ok(()) => info!(kind, "event handled"),
        Err(err @ (AppError::UnknownAction(_) | AppError::UnknownCallback(_))) => {
            warn!(kind, %err, "event rejected");
        }
        Err(_) => {}
    }
    result
}
