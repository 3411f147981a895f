//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cache cleanup: removes expired entries from a shared cache

mod cleanup;

pub use cleanup::spawn_cleanup_task;
