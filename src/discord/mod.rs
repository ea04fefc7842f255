//! Discord integration: webhook signature verification and REST client.

pub mod client;
pub mod verify;
