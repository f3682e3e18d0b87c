//! Host file-manager integration

use crate::error::{Result, SampleCheckerError};
use std::path::Path;

pub trait SystemShell {
    /// Opens `dir` in the platform's default file manager
    fn open_directory(&self, dir: &Path) -> Result<()>;
}

/// Launches the platform handler (`xdg-open`, `open`, `explorer`) via the `open` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct OsShell;

impl SystemShell for OsShell {
    fn open_directory(&self, dir: &Path) -> Result<()> {
        tracing::info!(directory = %dir.display(), "opening system file manager");
        open::that_detached(dir).map_err(|e| SampleCheckerError::ShellLaunchFailed {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
