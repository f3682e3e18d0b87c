//! Dispatches user input events to the navigator and shell actions, and turns
//! their outcomes into user-visible notices.

use crate::actions::{PreviewOutcome, RevealOutcome, ShellActions};
use crate::domain::{Listing, Navigator};
use crate::error::{Result, SampleCheckerError};
use crate::settings::{SettingsStore, LAST_DIRECTORY_KEY};
use std::path::{Path, PathBuf};

/// Input events the presentation layer forwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Single click: preview the row
    Select(usize),
    /// Double click or Enter: descend into / reveal the row
    Activate(usize),
    /// Delete key or context menu
    Delete(usize),
    GoToParent,
    OpenInExplorer,
    /// Path bar text confirmed
    SubmitPath(String),
    Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, title, message)
    }

    fn new(level: NoticeLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Warnings and errors need acknowledging; info goes to the status line
    pub fn is_modal(&self) -> bool {
        self.level >= NoticeLevel::Warning
    }
}

pub struct Controller {
    navigator: Navigator,
    actions: ShellActions,
    settings: Box<dyn SettingsStore>,
}

impl Controller {
    /// Builds the controller and performs the initial navigation.
    ///
    /// Starts in `initial_directory` if given, else the persisted last
    /// directory, else the home directory. The returned notice reports a
    /// failed initial listing.
    pub fn new(
        navigator: Navigator,
        actions: ShellActions,
        settings: Box<dyn SettingsStore>,
        initial_directory: Option<PathBuf>,
    ) -> (Self, Option<Notice>) {
        let start = initial_directory
            .or_else(|| settings.get(LAST_DIRECTORY_KEY).map(PathBuf::from))
            .unwrap_or_else(home_directory);

        tracing::info!(directory = %start.display(), "starting");

        let mut controller = Self {
            navigator,
            actions,
            settings,
        };
        let notice = controller.navigate(&start);
        (controller, notice)
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn listing(&self) -> &Listing {
        self.navigator.listing()
    }

    pub fn current_directory(&self) -> &Path {
        self.navigator.current_directory()
    }

    /// Handles one input event.
    ///
    /// Only a row index outside the current listing is returned as an error.
    pub fn dispatch(&mut self, event: AppEvent) -> Result<Option<Notice>> {
        tracing::debug!(?event, "dispatch");

        match event {
            AppEvent::Select(row) => {
                let entry = self.navigator.resolve(row)?.clone();
                Ok(match self.actions.preview(&entry) {
                    Ok(PreviewOutcome::Started) => Some(Notice::info(
                        "Preview",
                        format!("Playing {}", entry.display_name()),
                    )),
                    Ok(PreviewOutcome::Skipped) => None,
                    Err(e) => {
                        tracing::warn!(error = %e, "preview failed");
                        Some(Notice::info("Preview", e.to_string()))
                    }
                })
            }
            AppEvent::Activate(row) => {
                let entry = self.navigator.resolve(row)?.clone();
                Ok(match self.actions.reveal(&entry, &mut self.navigator) {
                    Ok(RevealOutcome::Navigated) => {
                        self.remember_directory();
                        None
                    }
                    Ok(RevealOutcome::Revealed) | Ok(RevealOutcome::Ignored) => None,
                    Err(e) if e.is_listing_failure() => {
                        Some(Notice::warning("Navigation", e.to_string()))
                    }
                    Err(e) => Some(Notice::error("File Explorer", e.to_string())),
                })
            }
            AppEvent::Delete(row) => {
                let entry = self.navigator.resolve(row)?.clone();
                Ok(match self.actions.delete(&entry, &mut self.navigator) {
                    Ok(()) => Some(Notice::info(
                        "Delete",
                        format!("Deleted {}", entry.display_name()),
                    )),
                    Err(e @ SampleCheckerError::DirectoryDeleteRejected(_)) => {
                        Some(Notice::warning("Delete Error", e.to_string()))
                    }
                    Err(e @ SampleCheckerError::FileRemovalFailed { .. }) => {
                        tracing::error!(error = %e, "delete failed");
                        Some(Notice::error("Delete Error", e.to_string()))
                    }
                    // The file is gone but its directory could not be re-listed
                    Err(e) => Some(Notice::warning("Navigation", e.to_string())),
                })
            }
            AppEvent::GoToParent => {
                let parent = crate::domain::parent_of(self.navigator.current_directory());
                Ok(self.navigate(&parent))
            }
            AppEvent::OpenInExplorer => {
                let directory = self.navigator.current_directory().to_path_buf();
                Ok(match self.actions.open_in_system_explorer(&directory) {
                    Ok(()) => None,
                    Err(e) => {
                        tracing::warn!(error = %e, "open in file manager failed");
                        Some(Notice::error("File Explorer", e.to_string()))
                    }
                })
            }
            AppEvent::SubmitPath(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(None);
                }
                Ok(self.navigate(&expand_home(text)))
            }
            AppEvent::Refresh => {
                let current = self.navigator.current_directory().to_path_buf();
                Ok(self.navigate(&current))
            }
        }
    }

    /// Flushes settings; call once when the window closes
    pub fn shutdown(&mut self) -> Result<()> {
        tracing::info!("shutting down");
        self.settings.flush()
    }

    fn navigate(&mut self, path: &Path) -> Option<Notice> {
        match self.navigator.navigate(path).map(|_| ()) {
            Ok(()) => {
                self.remember_directory();
                None
            }
            Err(e) => Some(Notice::warning("Navigation", e.to_string())),
        }
    }

    fn remember_directory(&mut self) {
        let directory = self.navigator.current_directory();
        let Some(text) = directory.to_str() else {
            tracing::debug!(directory = %directory.display(), "not persisting non-UTF-8 directory");
            return;
        };
        self.settings.set(LAST_DIRECTORY_KEY, text);
        if let Err(e) = self.settings.flush() {
            tracing::warn!(error = %e, "failed to persist last directory");
        }
    }
}

fn home_directory() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Expands a leading `~` to the home directory
fn expand_home(text: &str) -> PathBuf {
    if text == "~" {
        return home_directory();
    }
    match text.strip_prefix("~/") {
        Some(rest) => home_directory().join(rest),
        None => PathBuf::from(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{ActionOptions, RevealPolicy};
    use crate::domain::ListingOptions;
    use crate::player::NullPlayer;
    use crate::settings::MemorySettings;
    use crate::shell::SystemShell;
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Settings whose contents stay visible to the test after being boxed
    #[derive(Default, Clone)]
    struct SharedSettings {
        inner: Rc<RefCell<MemorySettings>>,
        flushes: Rc<RefCell<usize>>,
    }

    impl SettingsStore for SharedSettings {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.borrow().get(key)
        }

        fn set(&mut self, key: &str, value: &str) {
            self.inner.borrow_mut().set(key, value);
        }

        fn flush(&mut self) -> Result<()> {
            *self.flushes.borrow_mut() += 1;
            Ok(())
        }
    }

    struct NoShell;

    impl SystemShell for NoShell {
        fn open_directory(&self, _dir: &Path) -> Result<()> {
            Ok(())
        }
    }

    /// A shell whose file manager never starts
    struct BrokenShell;

    impl SystemShell for BrokenShell {
        fn open_directory(&self, dir: &Path) -> Result<()> {
            Err(SampleCheckerError::ShellLaunchFailed {
                path: dir.to_path_buf(),
                reason: "no file manager".to_string(),
            })
        }
    }

    fn controller_with(
        settings: SharedSettings,
        initial: Option<PathBuf>,
    ) -> (Controller, Option<Notice>) {
        controller_with_actions(
            settings,
            initial,
            ShellActions::new(
                Box::new(NullPlayer),
                Box::new(NoShell),
                ActionOptions::default(),
            ),
        )
    }

    fn controller_with_actions(
        settings: SharedSettings,
        initial: Option<PathBuf>,
        actions: ShellActions,
    ) -> (Controller, Option<Notice>) {
        Controller::new(
            Navigator::new(ListingOptions::default()),
            actions,
            Box::new(settings),
            initial,
        )
    }

    fn sample_tree() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.wav"), b"").unwrap();
        fs::create_dir(temp_dir.path().join("kit")).unwrap();
        temp_dir
    }

    fn last_directory(settings: &SharedSettings) -> Option<String> {
        settings.get(LAST_DIRECTORY_KEY)
    }

    mod startup_tests {
        use super::*;

        #[test]
        fn test_starts_in_persisted_directory() {
            let temp_dir = sample_tree();
            let settings = SharedSettings::default();
            settings
                .inner
                .borrow_mut()
                .set(LAST_DIRECTORY_KEY, &temp_dir.path().to_string_lossy());

            let (controller, notice) = controller_with(settings, None);

            assert!(notice.is_none());
            assert_eq!(controller.current_directory(), temp_dir.path());
            assert_eq!(controller.listing().len(), 3);
        }

        #[test]
        fn test_explicit_directory_wins() {
            let persisted = sample_tree();
            let explicit = TempDir::new().unwrap();
            let settings = SharedSettings::default();
            settings
                .inner
                .borrow_mut()
                .set(LAST_DIRECTORY_KEY, &persisted.path().to_string_lossy());

            let (controller, _) =
                controller_with(settings.clone(), Some(explicit.path().to_path_buf()));

            assert_eq!(controller.current_directory(), explicit.path());
            assert_eq!(
                last_directory(&settings),
                Some(explicit.path().to_string_lossy().into_owned())
            );
        }

        #[test]
        fn test_falls_back_to_home() {
            let (controller, _) = controller_with(SharedSettings::default(), None);
            if let Some(home) = dirs::home_dir() {
                assert_eq!(controller.current_directory(), home.as_path());
            }
        }

        #[test]
        fn test_missing_persisted_directory_renders_empty() {
            let settings = SharedSettings::default();
            settings
                .inner
                .borrow_mut()
                .set(LAST_DIRECTORY_KEY, "/does/not/exist");

            let (controller, notice) = controller_with(settings, None);

            assert!(controller.listing().is_empty());
            let notice = notice.unwrap();
            assert_eq!(notice.level, NoticeLevel::Warning);
            assert_eq!(notice.title, "Navigation");
        }
    }

    mod dispatch_tests {
        use super::*;

        #[test]
        fn test_activate_directory_persists() {
            let temp_dir = sample_tree();
            let settings = SharedSettings::default();
            let (mut controller, _) =
                controller_with(settings.clone(), Some(temp_dir.path().to_path_buf()));

            let row = controller
                .listing()
                .position_of(&temp_dir.path().join("kit"))
                .unwrap();
            let notice = controller.dispatch(AppEvent::Activate(row)).unwrap();

            assert!(notice.is_none());
            assert_eq!(controller.current_directory(), temp_dir.path().join("kit"));
            assert_eq!(
                last_directory(&settings),
                Some(temp_dir.path().join("kit").to_string_lossy().into_owned())
            );
        }

        #[test]
        fn test_submit_invalid_path_is_not_persisted() {
            let temp_dir = sample_tree();
            let settings = SharedSettings::default();
            let (mut controller, _) =
                controller_with(settings.clone(), Some(temp_dir.path().to_path_buf()));

            let notice = controller
                .dispatch(AppEvent::SubmitPath("/does/not/exist".to_string()))
                .unwrap()
                .unwrap();

            assert_eq!(notice.level, NoticeLevel::Warning);
            assert!(controller.listing().is_empty());
            assert_eq!(
                last_directory(&settings),
                Some(temp_dir.path().to_string_lossy().into_owned())
            );
        }

        #[test]
        fn test_submit_blank_path_is_ignored() {
            let temp_dir = sample_tree();
            let (mut controller, _) =
                controller_with(SharedSettings::default(), Some(temp_dir.path().to_path_buf()));

            let notice = controller
                .dispatch(AppEvent::SubmitPath("   ".to_string()))
                .unwrap();

            assert!(notice.is_none());
            assert_eq!(controller.current_directory(), temp_dir.path());
        }

        #[test]
        fn test_go_to_parent() {
            let temp_dir = sample_tree();
            let kit = temp_dir.path().join("kit");
            let (mut controller, _) = controller_with(SharedSettings::default(), Some(kit));

            controller.dispatch(AppEvent::GoToParent).unwrap();

            assert_eq!(controller.current_directory(), temp_dir.path());
        }

        #[test]
        fn test_delete_directory_warns() {
            let temp_dir = sample_tree();
            let (mut controller, _) =
                controller_with(SharedSettings::default(), Some(temp_dir.path().to_path_buf()));
            let row = controller
                .listing()
                .position_of(&temp_dir.path().join("kit"))
                .unwrap();

            let notice = controller.dispatch(AppEvent::Delete(row)).unwrap().unwrap();

            assert_eq!(notice.level, NoticeLevel::Warning);
            assert_eq!(notice.title, "Delete Error");
            assert!(notice.message.ends_with("is a directory and cannot be deleted."));
            assert!(notice.is_modal());
            assert!(temp_dir.path().join("kit").is_dir());
        }

        #[test]
        fn test_delete_file_relists() {
            let temp_dir = sample_tree();
            let (mut controller, _) =
                controller_with(SharedSettings::default(), Some(temp_dir.path().to_path_buf()));
            let row = controller
                .listing()
                .position_of(&temp_dir.path().join("a.wav"))
                .unwrap();

            let notice = controller.dispatch(AppEvent::Delete(row)).unwrap().unwrap();

            assert_eq!(notice.level, NoticeLevel::Info);
            assert!(!notice.is_modal());
            assert_eq!(controller.listing().len(), 2);
            assert!(controller
                .listing()
                .position_of(&temp_dir.path().join("a.wav"))
                .is_none());
        }

        #[test]
        fn test_select_file_reports_playing() {
            let temp_dir = sample_tree();
            let (mut controller, _) =
                controller_with(SharedSettings::default(), Some(temp_dir.path().to_path_buf()));
            let row = controller
                .listing()
                .position_of(&temp_dir.path().join("a.wav"))
                .unwrap();

            let notice = controller.dispatch(AppEvent::Select(row)).unwrap().unwrap();

            assert_eq!(notice.message, "Playing a.wav");
        }

        #[test]
        fn test_out_of_range_row_is_fatal() {
            let temp_dir = sample_tree();
            let (mut controller, _) =
                controller_with(SharedSettings::default(), Some(temp_dir.path().to_path_buf()));

            let result = controller.dispatch(AppEvent::Activate(99));

            assert!(matches!(
                result,
                Err(SampleCheckerError::IndexOutOfRange { row: 99, len: 3 })
            ));
        }

        #[test]
        fn test_submit_dot_dot_path_lands_on_parent() {
            let temp_dir = TempDir::new().unwrap();
            let a = temp_dir.path().join("a");
            let b = a.join("b");
            fs::create_dir_all(&b).unwrap();
            let settings = SharedSettings::default();
            let (mut controller, _) =
                controller_with(settings.clone(), Some(temp_dir.path().to_path_buf()));

            let typed = format!("{}/..", b.display());
            let notice = controller.dispatch(AppEvent::SubmitPath(typed)).unwrap();

            assert!(notice.is_none());
            assert_eq!(controller.current_directory(), a.as_path());
            assert_eq!(
                controller.listing().entries()[0].absolute_path(),
                temp_dir.path()
            );
            assert_eq!(
                last_directory(&settings),
                Some(a.to_string_lossy().into_owned())
            );

            controller.dispatch(AppEvent::Activate(0)).unwrap();
            assert_eq!(controller.current_directory(), temp_dir.path());
        }

        #[cfg(unix)]
        #[test]
        fn test_submit_unreadable_directory_warns() {
            use std::os::unix::fs::PermissionsExt;

            let temp_dir = sample_tree();
            let locked = temp_dir.path().join("locked");
            fs::create_dir(&locked).unwrap();
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

            // root ignores directory permissions
            if fs::read_dir(&locked).is_ok() {
                fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
                return;
            }

            let settings = SharedSettings::default();
            let (mut controller, _) =
                controller_with(settings.clone(), Some(temp_dir.path().to_path_buf()));

            let notice = controller
                .dispatch(AppEvent::SubmitPath(locked.display().to_string()))
                .unwrap()
                .unwrap();
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

            assert_eq!(notice.level, NoticeLevel::Warning);
            assert_eq!(notice.title, "Navigation");
            assert!(controller.listing().is_empty());
            assert_eq!(controller.current_directory(), locked.as_path());
            assert_eq!(
                last_directory(&settings),
                Some(temp_dir.path().to_string_lossy().into_owned())
            );
        }

        #[test]
        fn test_reveal_file_with_broken_shell_reports_error() {
            let temp_dir = sample_tree();
            let actions = ShellActions::new(
                Box::new(NullPlayer),
                Box::new(BrokenShell),
                ActionOptions {
                    reveal_policy: RevealPolicy::ContainingFolder,
                    ..ActionOptions::default()
                },
            );
            let (mut controller, _) = controller_with_actions(
                SharedSettings::default(),
                Some(temp_dir.path().to_path_buf()),
                actions,
            );
            let row = controller
                .listing()
                .position_of(&temp_dir.path().join("a.wav"))
                .unwrap();

            let notice = controller.dispatch(AppEvent::Activate(row)).unwrap().unwrap();

            assert_eq!(notice.level, NoticeLevel::Error);
            assert_eq!(notice.title, "File Explorer");
            assert!(notice.message.contains("no file manager"));
            assert_eq!(controller.current_directory(), temp_dir.path());
        }

        #[test]
        fn test_open_in_explorer_with_broken_shell_reports_error() {
            let temp_dir = sample_tree();
            let actions = ShellActions::new(
                Box::new(NullPlayer),
                Box::new(BrokenShell),
                ActionOptions::default(),
            );
            let (mut controller, _) = controller_with_actions(
                SharedSettings::default(),
                Some(temp_dir.path().to_path_buf()),
                actions,
            );

            let notice = controller.dispatch(AppEvent::OpenInExplorer).unwrap().unwrap();

            assert_eq!(notice.level, NoticeLevel::Error);
            assert_eq!(notice.title, "File Explorer");
        }

        #[cfg(unix)]
        #[test]
        fn test_non_utf8_directory_is_not_persisted() {
            use std::ffi::OsStr;
            use std::os::unix::ffi::OsStrExt;

            let temp_dir = sample_tree();
            let odd = temp_dir.path().join(OsStr::from_bytes(b"kit\xff"));
            // Some filesystems reject invalid UTF-8 names
            if fs::create_dir(&odd).is_err() {
                return;
            }

            let settings = SharedSettings::default();
            let (mut controller, _) =
                controller_with(settings.clone(), Some(temp_dir.path().to_path_buf()));
            let row = controller.listing().position_of(&odd).unwrap();

            controller.dispatch(AppEvent::Activate(row)).unwrap();

            assert_eq!(controller.current_directory(), odd.as_path());
            assert_eq!(
                last_directory(&settings),
                Some(temp_dir.path().to_string_lossy().into_owned())
            );
        }

        #[test]
        fn test_shutdown_flushes() {
            let temp_dir = sample_tree();
            let settings = SharedSettings::default();
            let (mut controller, _) =
                controller_with(settings.clone(), Some(temp_dir.path().to_path_buf()));
            let before = *settings.flushes.borrow();

            controller.shutdown().unwrap();

            assert_eq!(*settings.flushes.borrow(), before + 1);
        }
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/tmp/x"), PathBuf::from("/tmp/x"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~"), home);
            assert_eq!(expand_home("~/samples"), home.join("samples"));
        }
    }
}
