// CLI module for argument parsing and configuration

use crate::actions::{ActionOptions, DeleteMode, RevealPolicy};
use crate::domain::ListingOptions;
use crate::player::{DEFAULT_PLAYER, DEFAULT_PLAYER_ARGS};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Samplechk - browse a directory and audition its samples
///
/// Move through folders, preview audio and video files with an external
/// player, and delete the ones you don't want.
#[derive(Parser, Debug, Clone)]
#[command(name = "samplechk")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory to open
    ///
    /// If not specified, the last visited directory is reopened, falling
    /// back to the home directory.
    pub directory: Option<PathBuf>,

    /// Program used to preview files
    #[arg(long = "player", default_value = DEFAULT_PLAYER)]
    pub player: String,

    /// Extra argument passed to the player before the file path
    ///
    /// Can be specified multiple times. Defaults to
    /// "--no-video --really-quiet" for mpv.
    #[arg(long = "player-arg", allow_hyphen_values = true)]
    pub player_args: Vec<String>,

    /// Disable previews entirely
    #[arg(long = "no-preview", action = ArgAction::SetTrue)]
    pub no_preview: bool,

    /// Preview files as soon as the cursor moves onto them
    #[arg(short = 'a', long = "autoplay", action = ArgAction::SetTrue)]
    pub autoplay: bool,

    /// Move deleted files to the system trash instead of removing them
    #[arg(short = 't', long = "trash", action = ArgAction::SetTrue)]
    pub trash: bool,

    /// Skip the confirmation dialog when deleting files
    #[arg(short = 'y', long = "yes", action = ArgAction::SetTrue)]
    pub skip_confirm: bool,

    /// Open a file's folder in the system file manager when it is activated
    #[arg(long = "reveal-files", action = ArgAction::SetTrue)]
    pub reveal_files: bool,

    /// Hide files and folders starting with .
    #[arg(long = "hide-dotfiles", action = ArgAction::SetTrue)]
    pub hide_dotfiles: bool,

    /// Don't read or write the last visited directory
    #[arg(long = "no-persist", action = ArgAction::SetTrue)]
    pub no_persist: bool,

    /// Write logs to this file
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Player arguments, filling in the mpv defaults when none were given
    pub fn get_player_args(&self) -> Vec<String> {
        if self.player_args.is_empty() && self.player == DEFAULT_PLAYER {
            DEFAULT_PLAYER_ARGS.iter().map(|s| s.to_string()).collect()
        } else {
            self.player_args.clone()
        }
    }

    /// Validate the arguments and return any errors
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref directory) = self.directory {
            if !directory.exists() {
                return Err(format!("Directory does not exist: {}", directory.display()));
            }

            if !directory.is_dir() {
                return Err(format!("Path is not a directory: {}", directory.display()));
            }
        }

        if self.player.trim().is_empty() {
            return Err("Player program cannot be empty".to_string());
        }

        Ok(())
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub directory: Option<PathBuf>,
    pub player: Option<PlayerConfig>,
    pub autoplay: bool,
    pub skip_confirm: bool,
    pub listing: ListingOptions,
    pub actions: ActionOptions,
    pub persist: bool,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        let player = if args.no_preview {
            None
        } else {
            Some(PlayerConfig {
                program: args.player.clone(),
                args: args.get_player_args(),
            })
        };

        AppConfig {
            directory: args.directory,
            player,
            autoplay: args.autoplay,
            skip_confirm: args.skip_confirm,
            listing: ListingOptions {
                show_hidden: !args.hide_dotfiles,
            },
            actions: ActionOptions {
                reveal_policy: if args.reveal_files {
                    RevealPolicy::ContainingFolder
                } else {
                    RevealPolicy::Disabled
                },
                delete_mode: if args.trash {
                    DeleteMode::Trash
                } else {
                    DeleteMode::Permanent
                },
            },
            persist: !args.no_persist,
            log_file: args.log_file,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            directory: None,
            player: Some(PlayerConfig {
                program: DEFAULT_PLAYER.to_string(),
                args: DEFAULT_PLAYER_ARGS.iter().map(|s| s.to_string()).collect(),
            }),
            autoplay: false,
            skip_confirm: false,
            listing: ListingOptions::default(),
            actions: ActionOptions::default(),
            persist: true,
            log_file: None,
        }
    }
}
