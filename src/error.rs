//! Error types for samplechk

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SampleCheckerError {
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Cannot read directory {}: {source}", path.display())]
    UnreadableDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Row {row} is out of range for a listing of {len} entries")]
    IndexOutOfRange { row: usize, len: usize },

    #[error("'{}' is a directory and cannot be deleted.", .0.display())]
    DirectoryDeleteRejected(PathBuf),

    #[error("Failed to delete '{}': {reason}", path.display())]
    FileRemovalFailed { path: PathBuf, reason: String },

    #[error("Cannot play '{}': {reason}", path.display())]
    PlaybackUnsupported { path: PathBuf, reason: String },

    #[error("Failed to open file manager for '{}': {reason}", path.display())]
    ShellLaunchFailed { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl SampleCheckerError {
    /// Whether the error means a listing could not be produced
    pub fn is_listing_failure(&self) -> bool {
        matches!(
            self,
            SampleCheckerError::NotADirectory(_) | SampleCheckerError::UnreadableDirectory { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SampleCheckerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_delete_message() {
        let err = SampleCheckerError::DirectoryDeleteRejected(PathBuf::from("/tmp/kits"));
        assert_eq!(
            err.to_string(),
            "'/tmp/kits' is a directory and cannot be deleted."
        );
    }

    #[test]
    fn test_index_out_of_range_message() {
        let err = SampleCheckerError::IndexOutOfRange { row: 7, len: 3 };
        assert!(err.to_string().contains("Row 7"));
        assert!(err.to_string().contains("3 entries"));
    }

    #[test]
    fn test_is_listing_failure() {
        assert!(SampleCheckerError::NotADirectory(PathBuf::from("/x")).is_listing_failure());
        assert!(SampleCheckerError::UnreadableDirectory {
            path: PathBuf::from("/x"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        }
        .is_listing_failure());
        assert!(!SampleCheckerError::IndexOutOfRange { row: 0, len: 0 }.is_listing_failure());
    }
}
