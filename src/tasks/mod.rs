//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - TTL Expiry: Removes expired keys at configured intervals

mod cleanup;

pub use cleanup::spawn_expiry_task;
