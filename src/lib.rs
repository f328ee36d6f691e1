#![forbid(unsafe_code)]

//! Slack helpdesk bot: shows a category card on request, opens an intake
//! form for the chosen category, and confirms the submitted ticket in the
//! conversation the request came from.

pub mod config;
pub mod errors;
pub mod intake;
pub mod models;
pub mod server;
pub mod slack;
pub mod state;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};
