//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Purge: Removes expired entries from the in-memory backend

mod cleanup;

pub use cleanup::spawn_cleanup_task;
