//! Mshuf - random media opening from your folder collection
//!
//! This crate provides the core functionality for the mshuf application:
//! registered root folders, constrained random folder/file selection, and
//! external viewer handoff.

pub mod cli;
pub mod config;
pub mod cooldown;
pub mod error;
pub mod launcher;
pub mod listing;
pub mod media;
pub mod selector;
pub mod store;
pub mod tui;
pub mod worker;

// Re-export primary types for convenience
pub use config::Settings;
pub use error::{LaunchError, ListError, MshufError, Result};
pub use listing::{Entry, FolderSource, FsSource, MemSource};
pub use media::{classify, MediaKind};
pub use selector::{pick, pick_and_open, OpenReport, Pick, Selection};
pub use store::{Profile, RootRecord};
