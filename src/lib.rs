//! Library crate for account-admin.
//!
//! This crate exposes the building blocks of the TUI:
//! - Account model and backends (`api`)
//! - Application state and update loop (`app`)
//! - Command-line options (`cli`)
//! - Error and result types (`error`)
//! - The countdown-guarded delete confirmation (`gate`)
//! - UI rendering (`ui`)
//!
//! It is used by the `account-admin` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod app;
pub mod cli;
pub mod error;
pub mod gate;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{ApiError, DynError, Result};
