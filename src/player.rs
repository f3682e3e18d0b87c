//! Media playback backend.
//!
//! Playback is fire-and-forget: the caller issues a start request and never
//! inspects progress. Decoding is left to an external program.

use crate::error::{Result, SampleCheckerError};
use std::path::Path;
use std::process::{Child, Command, Stdio};

/// Program used when none is configured
pub const DEFAULT_PLAYER: &str = "mpv";

/// Arguments passed to the default player when none are configured
pub const DEFAULT_PLAYER_ARGS: &[&str] = &["--no-video", "--really-quiet"];

pub trait MediaPlayer {
    /// Replaces the current source with `path` and starts playback
    fn play(&mut self, path: &Path) -> Result<()>;
}

/// Plays files by spawning an external player process per preview
#[derive(Debug)]
pub struct ExternalPlayer {
    program: String,
    args: Vec<String>,
    child: Option<Child>,
}

impl ExternalPlayer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            child: None,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Whether a spawned player is still running
    #[cfg(test)]
    fn is_playing(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    /// Kills and reaps the current player process, if any
    pub fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                tracing::debug!(error = %e, "player already exited");
            }
            if let Err(e) = child.wait() {
                tracing::warn!(error = %e, "failed to reap player process");
            }
        }
    }
}

impl Default for ExternalPlayer {
    fn default() -> Self {
        Self::new(
            DEFAULT_PLAYER,
            DEFAULT_PLAYER_ARGS.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl MediaPlayer for ExternalPlayer {
    fn play(&mut self, path: &Path) -> Result<()> {
        self.stop();

        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SampleCheckerError::PlaybackUnsupported {
                path: path.to_path_buf(),
                reason: format!("failed to start {}: {}", self.program, e),
            })?;

        tracing::info!(program = %self.program, path = %path.display(), pid = child.id(), "playback started");
        self.child = Some(child);
        Ok(())
    }
}

impl Drop for ExternalPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Accepts every request and plays nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPlayer;

impl MediaPlayer for NullPlayer {
    fn play(&mut self, path: &Path) -> Result<()> {
        tracing::debug!(path = %path.display(), "preview disabled, ignoring play request");
        Ok(())
    }
}
