//! Multi-store employee shift scheduling.
//!
//! Stores, employees, shift definitions and a date-indexed schedule are kept
//! in a local key-value substrate, mirrored to a backup snapshot, and can be
//! exported to and imported from one versioned JSON document.

pub mod backend;
pub mod error;

pub use backend::{Backend, InitializeReport};
pub use error::{Result, SchedulerError};
