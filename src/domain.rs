pub mod navigator;

pub use navigator::Navigator;

use crate::error::{Result, SampleCheckerError};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Display name of the synthetic parent-directory row
pub const PARENT_LINK_NAME: &str = "..";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    ParentLink,
}

/// Advisory classification used for icons and the details pane.
///
/// Never affects navigation or deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Folder,
    Audio,
    Video,
    Image,
    Other,
}

impl MediaKind {
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.to_lowercase();
        match ext.as_str() {
            "wav" | "wave" | "mp3" | "flac" | "ogg" | "oga" | "opus" | "aif" | "aiff" | "aifc"
            | "m4a" | "aac" | "wma" | "mid" | "midi" => MediaKind::Audio,

            "mp4" | "m4v" | "mkv" | "mov" | "avi" | "webm" | "wmv" | "mpg" | "mpeg" | "ogv" => {
                MediaKind::Video
            }

            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp" | "svg" | "tif" | "tiff" => {
                MediaKind::Image
            }

            _ => MediaKind::Other,
        }
    }

    /// Classifies a non-directory path, falling back to `Other`
    pub fn for_file(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(MediaKind::Other)
    }

    pub fn is_playable(self) -> bool {
        matches!(self, MediaKind::Audio | MediaKind::Video)
    }
}

/// One row of a listing, bound to an absolute filesystem path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    display_name: String,
    absolute_path: PathBuf,
    kind: EntryKind,
    media: MediaKind,
}

impl DirectoryEntry {
    /// Builds the synthetic `..` row for `directory`
    pub fn parent_link(directory: &Path) -> Self {
        DirectoryEntry {
            display_name: PARENT_LINK_NAME.to_string(),
            absolute_path: parent_of(directory),
            kind: EntryKind::ParentLink,
            media: MediaKind::Folder,
        }
    }

    pub fn directory(display_name: impl Into<String>, absolute_path: PathBuf) -> Self {
        DirectoryEntry {
            display_name: display_name.into(),
            absolute_path,
            kind: EntryKind::Directory,
            media: MediaKind::Folder,
        }
    }

    pub fn file(display_name: impl Into<String>, absolute_path: PathBuf) -> Self {
        let media = MediaKind::for_file(&absolute_path);
        DirectoryEntry {
            display_name: display_name.into(),
            absolute_path,
            kind: EntryKind::File,
            media,
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn absolute_path(&self) -> &Path {
        &self.absolute_path
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn media(&self) -> MediaKind {
        self.media
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Directories and the parent link both lead somewhere
    pub fn is_navigable(&self) -> bool {
        matches!(self.kind, EntryKind::Directory | EntryKind::ParentLink)
    }
}

/// The rows shown for one directory: the parent link followed by the sorted children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    directory: PathBuf,
    entries: Vec<DirectoryEntry>,
}

impl Listing {
    /// A listing with zero rows, rendered after a failed listing
    pub fn empty(directory: impl Into<PathBuf>) -> Self {
        Listing {
            directory: directory.into(),
            entries: Vec::new(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&DirectoryEntry> {
        self.entries.get(row)
    }

    /// Resolves a row index to the entry bound to it
    pub fn resolve(&self, row: usize) -> Result<&DirectoryEntry> {
        self.entries
            .get(row)
            .ok_or(SampleCheckerError::IndexOutOfRange {
                row,
                len: self.entries.len(),
            })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DirectoryEntry> {
        self.entries.iter()
    }

    /// Row of the entry whose path equals `path`, if listed.
    ///
    /// The parent link is never matched.
    pub fn position_of(&self, path: &Path) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.kind != EntryKind::ParentLink && entry.absolute_path == path)
    }
}

impl<'a> IntoIterator for &'a Listing {
    type Item = &'a DirectoryEntry;
    type IntoIter = std::slice::Iter<'a, DirectoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Options for directory listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingOptions {
    /// Include names starting with '.'
    pub show_hidden: bool,
}

impl Default for ListingOptions {
    fn default() -> Self {
        ListingOptions { show_hidden: true }
    }
}

/// Parent of `path`, or `path` itself at the filesystem root
pub fn parent_of(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => path.to_path_buf(),
    }
}

/// Makes `path` absolute and folds `.` and `..` components lexically.
///
/// Symlinks are not resolved, so `link/..` becomes the directory holding
/// `link`. `..` at the root stays at the root.
pub fn normalize_path(path: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut normalized = PathBuf::new();

    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    Ok(normalized)
}

/// Lists the immediate children of `directory`.
///
/// # Returns
/// * `Ok(Listing)` - the parent link, then children sorted by display name
///   (case-sensitive, directories mixed with files)
/// * `Err(NotADirectory)` - the path is missing or is not a directory
/// * `Err(UnreadableDirectory)` - the directory exists but cannot be read
///
/// # Behavior
/// - Relative paths are made absolute and `.`/`..` are folded, without
///   resolving symlinks
/// - Kind is decided by following symlinks; children whose metadata cannot
///   be read are kept as files and logged
/// - Does not recurse into subdirectories
pub fn list_directory(directory: &Path, options: &ListingOptions) -> Result<Listing> {
    let directory = normalize_path(directory)
        .map_err(|_| SampleCheckerError::NotADirectory(directory.to_path_buf()))?;

    if !directory.is_dir() {
        return Err(SampleCheckerError::NotADirectory(directory));
    }

    let read_dir = fs::read_dir(&directory).map_err(|source| {
        SampleCheckerError::UnreadableDirectory {
            path: directory.clone(),
            source,
        }
    })?;

    let mut children = Vec::new();

    for entry_result in read_dir {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(directory = %directory.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };

        let file_name = entry.file_name();
        let display_name = file_name.to_string_lossy().into_owned();

        if !options.show_hidden && display_name.starts_with('.') {
            continue;
        }

        let path = entry.path();

        let child = match fs::metadata(&path) {
            Ok(metadata) if metadata.is_dir() => DirectoryEntry::directory(display_name, path),
            Ok(_) => DirectoryEntry::file(display_name, path),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot stat entry, listing as file");
                DirectoryEntry::file(display_name, path)
            }
        };

        children.push(child);
    }

    children.sort_by(|a, b| a.display_name.cmp(&b.display_name));

    let mut entries = Vec::with_capacity(children.len() + 1);
    entries.push(DirectoryEntry::parent_link(&directory));
    entries.extend(children);

    tracing::debug!(directory = %directory.display(), rows = entries.len(), "listed directory");

    Ok(Listing { directory, entries })
}
