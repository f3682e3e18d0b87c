use super::{list_directory, normalize_path, DirectoryEntry, Listing, ListingOptions};
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Owns the current directory and the listing shown for it.
///
/// Every navigation is a full re-read; a failed listing leaves an empty
/// listing behind so the caller can render zero rows.
#[derive(Debug)]
pub struct Navigator {
    current_directory: PathBuf,
    listing: Listing,
    options: ListingOptions,
}

impl Navigator {
    pub fn new(options: ListingOptions) -> Self {
        Self {
            current_directory: PathBuf::new(),
            listing: Listing::empty(PathBuf::new()),
            options,
        }
    }

    pub fn current_directory(&self) -> &Path {
        &self.current_directory
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    /// Moves to `path` and lists it.
    ///
    /// The current directory becomes `path`, normalized, even when listing
    /// fails.
    pub fn navigate(&mut self, path: &Path) -> Result<&Listing> {
        match list_directory(path, &self.options) {
            Ok(listing) => {
                self.current_directory = listing.directory().to_path_buf();
                self.listing = listing;
                tracing::info!(directory = %self.current_directory.display(), "navigated");
                Ok(&self.listing)
            }
            Err(e) => {
                let path = normalize_path(path).unwrap_or_else(|_| path.to_path_buf());
                self.listing = Listing::empty(path.clone());
                self.current_directory = path;
                tracing::warn!(directory = %self.current_directory.display(), error = %e, "navigation failed");
                Err(e)
            }
        }
    }

    /// Re-lists the current directory
    pub fn refresh(&mut self) -> Result<&Listing> {
        let current = self.current_directory.clone();
        self.navigate(&current)
    }

    pub fn resolve(&self, row: usize) -> Result<&DirectoryEntry> {
        self.listing.resolve(row)
    }
}
