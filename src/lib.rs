#![forbid(unsafe_code)]

//! ChannelWright — webhook-driven Discord bot that provisions campaign
//! channel structures with asynchronous progress reporting.

pub mod config;
pub mod discord;
pub mod enqueue;
pub mod errors;
pub mod models;
pub mod queue;
pub mod render;
pub mod router;
pub mod server;
pub mod state;
pub mod worker;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};
