use samplechk::cli::{AppConfig, Args};
use samplechk::controller::{AppEvent, Controller};
use samplechk::domain::Navigator;
use samplechk::logging;
use samplechk::player::{ExternalPlayer, MediaPlayer, NullPlayer};
use samplechk::settings::{JsonSettings, MemorySettings, SettingsStore, APPLICATION, ORGANIZATION};
use samplechk::shell::OsShell;
use samplechk::tui::{
    handle_confirm_input, handle_key_event, handle_path_input, render, BrowserView, Click,
    KeyAction, PathEditAction, ViewState,
};
use samplechk::ShellActions;

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io,
    time::{Duration, Instant},
};

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let config: AppConfig = args.into();

    if let Some(path) = config.log_file.clone().or_else(logging::default_log_path) {
        if let Err(e) = logging::init(&path) {
            eprintln!("Warning: Failed to set up logging: {}", e);
        }
    }

    run_app_with_config(&config)
}

/// Runs the TUI application with configuration
pub fn run_app_with_config(config: &AppConfig) -> io::Result<()> {
    let player: Box<dyn MediaPlayer> = match &config.player {
        Some(player) => Box::new(ExternalPlayer::new(
            player.program.clone(),
            player.args.clone(),
        )),
        None => Box::new(NullPlayer),
    };
    let actions = ShellActions::new(player, Box::new(OsShell), config.actions);
    let navigator = Navigator::new(config.listing);

    let (mut controller, startup_notice) = Controller::new(
        navigator,
        actions,
        open_settings(config),
        config.directory.clone(),
    );

    let mut view = BrowserView::new();
    view.sync(controller.listing());
    view.status = startup_notice;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_loop(&mut terminal, &mut controller, &mut view, config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = controller.shutdown() {
        tracing::warn!(error = %e, "failed to save settings");
        eprintln!("Warning: Failed to save settings: {}", e);
    }

    if let Err(ref e) = result {
        eprintln!("Error: {}", e);
    }

    result
}

/// Opens persisted settings, falling back to memory when they can't be used
fn open_settings(config: &AppConfig) -> Box<dyn SettingsStore> {
    if !config.persist {
        return Box::new(MemorySettings::new());
    }

    match JsonSettings::open(ORGANIZATION, APPLICATION) {
        Ok(settings) => {
            tracing::debug!(path = %settings.path().display(), "settings loaded");
            Box::new(settings)
        }
        Err(e) => {
            tracing::warn!(error = %e, "settings unavailable, not persisting this session");
            Box::new(MemorySettings::new())
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Main application loop
fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    controller: &mut Controller,
    view: &mut BrowserView,
    config: &AppConfig,
) -> io::Result<()> {
    let mut view_state = ViewState::Browsing;

    loop {
        terminal.draw(|frame| {
            render(frame, controller.listing(), view, &view_state);
        })?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let flow = handle_key(key, controller, view, &mut view_state, config)?;
                if flow == Flow::Quit {
                    break;
                }
            }
            Event::Mouse(mouse) if view_state == ViewState::Browsing => {
                handle_mouse(mouse, controller, view, &mut view_state, config)?;
            }
            _ => {}
        }
    }

    Ok(())
}

fn handle_key(
    key: KeyEvent,
    controller: &mut Controller,
    view: &mut BrowserView,
    view_state: &mut ViewState,
    config: &AppConfig,
) -> io::Result<Flow> {
    // Handle overlay-specific input
    match view_state {
        ViewState::Help | ViewState::Notice(_) => {
            // Any key closes the overlay
            *view_state = ViewState::Browsing;
            return Ok(Flow::Continue);
        }
        ViewState::ConfirmDelete(row) => {
            let row = *row;
            match handle_confirm_input(key) {
                KeyAction::ConfirmDelete => {
                    *view_state = ViewState::Browsing;
                    dispatch(controller, view, view_state, AppEvent::Delete(row))?;
                }
                KeyAction::CancelDelete => *view_state = ViewState::Browsing,
                _ => {}
            }
            return Ok(Flow::Continue);
        }
        ViewState::EditingPath => {
            match handle_path_input(key) {
                PathEditAction::Insert(c) => view.path_input.push(c),
                PathEditAction::Backspace => {
                    view.path_input.pop();
                }
                PathEditAction::Clear => view.path_input.clear(),
                PathEditAction::Submit => {
                    *view_state = ViewState::Browsing;
                    let path = view.path_input.clone();
                    dispatch(controller, view, view_state, AppEvent::SubmitPath(path))?;
                }
                PathEditAction::Cancel => *view_state = ViewState::Browsing,
                PathEditAction::None => {}
            }
            return Ok(Flow::Continue);
        }
        ViewState::Browsing => {}
    }

    let len = controller.listing().len();

    match handle_key_event(key) {
        KeyAction::Quit => return Ok(Flow::Quit),
        KeyAction::Up => {
            view.select_previous(len);
            autoplay(controller, view, view_state, config)?;
        }
        KeyAction::Down => {
            view.select_next(len);
            autoplay(controller, view, view_state, config)?;
        }
        KeyAction::Top => {
            view.select_first(len);
            autoplay(controller, view, view_state, config)?;
        }
        KeyAction::Bottom => {
            view.select_last(len);
            autoplay(controller, view, view_state, config)?;
        }
        KeyAction::Preview => {
            if let Some(row) = view.selected() {
                dispatch(controller, view, view_state, AppEvent::Select(row))?;
            }
        }
        KeyAction::Activate => {
            if let Some(row) = view.selected() {
                navigate(controller, view, view_state, AppEvent::Activate(row))?;
            }
        }
        KeyAction::Parent => navigate(controller, view, view_state, AppEvent::GoToParent)?,
        KeyAction::Delete => {
            if let Some(row) = view.selected() {
                request_delete(row, !config.skip_confirm, controller, view, view_state)?;
            }
        }
        KeyAction::OpenExplorer => {
            dispatch(controller, view, view_state, AppEvent::OpenInExplorer)?
        }
        KeyAction::EditPath => {
            view.begin_path_edit(controller.current_directory());
            *view_state = ViewState::EditingPath;
        }
        KeyAction::Refresh => dispatch(controller, view, view_state, AppEvent::Refresh)?,
        KeyAction::Help => *view_state = ViewState::Help,
        KeyAction::ConfirmDelete | KeyAction::CancelDelete => {
            // These actions are only handled in ConfirmDelete state
        }
        KeyAction::None => {}
    }

    Ok(Flow::Continue)
}

fn handle_mouse(
    mouse: MouseEvent,
    controller: &mut Controller,
    view: &mut BrowserView,
    view_state: &mut ViewState,
    config: &AppConfig,
) -> io::Result<()> {
    let len = controller.listing().len();

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(row) = view.row_at(mouse.column, mouse.row, len) {
                view.select(row);
                match view.click(row, Instant::now()) {
                    Click::Single(row) => {
                        dispatch(controller, view, view_state, AppEvent::Select(row))?
                    }
                    Click::Double(row) => {
                        navigate(controller, view, view_state, AppEvent::Activate(row))?
                    }
                }
            }
        }
        // Right click stands in for the context menu, so always confirm
        MouseEventKind::Down(MouseButton::Right) => {
            if let Some(row) = view.row_at(mouse.column, mouse.row, len) {
                view.select(row);
                request_delete(row, true, controller, view, view_state)?;
            }
        }
        MouseEventKind::ScrollUp => {
            view.select_previous(len);
            autoplay(controller, view, view_state, config)?;
        }
        MouseEventKind::ScrollDown => {
            view.select_next(len);
            autoplay(controller, view, view_state, config)?;
        }
        _ => {}
    }

    Ok(())
}

/// Asks for confirmation before deleting a file; directories go straight to
/// the controller so it can refuse them
fn request_delete(
    row: usize,
    confirm: bool,
    controller: &mut Controller,
    view: &mut BrowserView,
    view_state: &mut ViewState,
) -> io::Result<()> {
    let is_file = controller
        .listing()
        .get(row)
        .map(|entry| entry.is_file())
        .unwrap_or(false);

    if confirm && is_file {
        *view_state = ViewState::ConfirmDelete(row);
        Ok(())
    } else {
        dispatch(controller, view, view_state, AppEvent::Delete(row))
    }
}

/// Previews the file under the cursor when autoplay is on
fn autoplay(
    controller: &mut Controller,
    view: &mut BrowserView,
    view_state: &mut ViewState,
    config: &AppConfig,
) -> io::Result<()> {
    if !config.autoplay {
        return Ok(());
    }

    let row = match view.selected() {
        Some(row) => row,
        None => return Ok(()),
    };

    let is_file = controller
        .listing()
        .get(row)
        .map(|entry| entry.is_file())
        .unwrap_or(false);

    if is_file {
        dispatch(controller, view, view_state, AppEvent::Select(row))?;
    }
    Ok(())
}

/// Dispatches an event that may change directory. When it moves up, the
/// cursor lands on the directory that was left.
fn navigate(
    controller: &mut Controller,
    view: &mut BrowserView,
    view_state: &mut ViewState,
    event: AppEvent,
) -> io::Result<()> {
    let origin = controller.current_directory().to_path_buf();
    dispatch(controller, view, view_state, event)?;

    if let Some(row) = controller.listing().position_of(&origin) {
        view.select(row);
    }
    Ok(())
}

/// Sends an event to the controller and shows whatever it reports.
///
/// A row that doesn't exist in the listing is a logic error and ends the app.
fn dispatch(
    controller: &mut Controller,
    view: &mut BrowserView,
    view_state: &mut ViewState,
    event: AppEvent,
) -> io::Result<()> {
    view.status = None;

    let notice = controller.dispatch(event).map_err(|e| {
        tracing::error!(error = %e, "fatal error while handling input");
        io::Error::other(e)
    })?;

    view.sync(controller.listing());

    match notice {
        Some(notice) if notice.is_modal() => *view_state = ViewState::Notice(notice),
        Some(notice) => view.status = Some(notice),
        None => {}
    }

    Ok(())
}
