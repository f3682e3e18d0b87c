//! Samplechk - a terminal directory browser for auditioning samples
//!
//! This crate provides the navigation and file-action core of the
//! application, independent of the terminal front end.

pub mod actions;
pub mod cli;
pub mod controller;
pub mod domain;
pub mod error;
pub mod logging;
pub mod player;
pub mod settings;
pub mod shell;
pub mod tui;

// Re-export primary types for convenience
pub use actions::{ActionOptions, DeleteMode, RevealPolicy, ShellActions};
pub use controller::{AppEvent, Controller, Notice, NoticeLevel};
pub use domain::{
    list_directory, DirectoryEntry, EntryKind, Listing, ListingOptions, MediaKind, Navigator,
};
pub use error::{Result, SampleCheckerError};
pub use player::{ExternalPlayer, MediaPlayer, NullPlayer};
pub use settings::{JsonSettings, MemorySettings, SettingsStore};
pub use shell::{OsShell, SystemShell};
