//! File actions triggered from a listing row: preview, reveal, delete and
//! open-in-file-manager.

use crate::domain::{parent_of, DirectoryEntry, EntryKind, Navigator};
use crate::error::{Result, SampleCheckerError};
use crate::player::MediaPlayer;
use crate::shell::SystemShell;
use std::fs;
use std::path::Path;

/// What revealing a plain file does
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RevealPolicy {
    /// Revealing a file is a no-op; only directories are entered
    #[default]
    Disabled,
    /// Open the file's directory in the system file manager
    ContainingFolder,
}

/// How files are removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteMode {
    /// Remove from disk
    #[default]
    Permanent,
    /// Move to the OS trash
    Trash,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionOptions {
    pub reveal_policy: RevealPolicy,
    pub delete_mode: DeleteMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewOutcome {
    Started,
    /// Entry is not a file; nothing was played
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    Navigated,
    Revealed,
    Ignored,
}

pub struct ShellActions {
    player: Box<dyn MediaPlayer>,
    shell: Box<dyn SystemShell>,
    options: ActionOptions,
}

impl ShellActions {
    pub fn new(
        player: Box<dyn MediaPlayer>,
        shell: Box<dyn SystemShell>,
        options: ActionOptions,
    ) -> Self {
        Self {
            player,
            shell,
            options,
        }
    }

    /// Hands a file to the media player
    pub fn preview(&mut self, entry: &DirectoryEntry) -> Result<PreviewOutcome> {
        if !entry.is_file() {
            return Ok(PreviewOutcome::Skipped);
        }

        self.player.play(entry.absolute_path())?;
        Ok(PreviewOutcome::Started)
    }

    /// Enters directories; files follow the configured reveal policy
    pub fn reveal(
        &self,
        entry: &DirectoryEntry,
        navigator: &mut Navigator,
    ) -> Result<RevealOutcome> {
        match entry.kind() {
            EntryKind::Directory | EntryKind::ParentLink => {
                navigator.navigate(entry.absolute_path())?;
                Ok(RevealOutcome::Navigated)
            }
            EntryKind::File => match self.options.reveal_policy {
                RevealPolicy::Disabled => Ok(RevealOutcome::Ignored),
                RevealPolicy::ContainingFolder => {
                    let folder = parent_of(entry.absolute_path());
                    self.shell.open_directory(&folder)?;
                    Ok(RevealOutcome::Revealed)
                }
            },
        }
    }

    /// Deletes a single file and re-lists its directory.
    ///
    /// Directories are never deleted. On failure the listing is left as it was.
    pub fn delete(&self, entry: &DirectoryEntry, navigator: &mut Navigator) -> Result<()> {
        if !entry.is_file() {
            tracing::warn!(path = %entry.absolute_path().display(), "refusing to delete directory");
            return Err(SampleCheckerError::DirectoryDeleteRejected(
                entry.absolute_path().to_path_buf(),
            ));
        }

        let path = entry.absolute_path();
        remove_file(path, self.options.delete_mode)?;
        tracing::info!(path = %path.display(), mode = ?self.options.delete_mode, "deleted file");

        navigator.navigate(&parent_of(path))?;
        Ok(())
    }

    pub fn open_in_system_explorer(&self, directory: &Path) -> Result<()> {
        if !directory.is_dir() {
            return Err(SampleCheckerError::NotADirectory(directory.to_path_buf()));
        }
        self.shell.open_directory(directory)
    }
}

fn remove_file(path: &Path, mode: DeleteMode) -> Result<()> {
    let removal = match mode {
        DeleteMode::Permanent => fs::remove_file(path).map_err(|e| e.to_string()),
        // trash::delete accepts directories too
        DeleteMode::Trash => match path.symlink_metadata() {
            Ok(metadata) if !metadata.is_dir() => trash::delete(path).map_err(|e| e.to_string()),
            Ok(_) => Err("is a directory".to_string()),
            Err(e) => Err(e.to_string()),
        },
    };

    removal.map_err(|reason| SampleCheckerError::FileRemovalFailed {
        path: path.to_path_buf(),
        reason,
    })
}
