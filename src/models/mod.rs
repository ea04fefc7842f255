//! Domain model module declarations.

pub mod channel;
pub mod interaction;
pub mod task;
