//! Slack adapter: webhook verification and normalization, Block Kit
//! rendering, and the Web API client.

pub mod blocks;
pub mod client;
pub mod events;
pub mod verify;
