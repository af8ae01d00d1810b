//! duet, a dual-pane terminal file manager built with ratatui.
//!
//! This binary parses the command line, loads the configuration,
//! initialises the terminal, runs the main event loop, and restores the
//! terminal on exit or panic.

mod app;
mod external;
mod input;
mod render;
mod ui;

use std::env;
use std::io;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use duet_core::config::settings::Config;
use duet_core::config::theme::Theme;
use duet_core::{
    Command, Commander, CoreError, CoreResult, NullByteSniffer, PaneSide, SystemTrash,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use crate::app::{App, OpenTarget};
use crate::external::{Launch, Program};
use crate::input::{handle_key, InputAction};
use crate::render::{page_rows, render};

type Term = Terminal<CrosstermBackend<io::Stdout>>;

#[derive(Parser, Debug)]
#[command(name = "duet", version, about = "Dual-pane terminal file manager")]
struct Cli {
    /// Start directory of the left pane (defaults to the current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Start directory of the right pane (defaults to the home directory)
    #[arg(long, value_name = "DIR")]
    right: Option<PathBuf>,

    /// Configuration file to use instead of the default location
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Start with hidden files shown
    #[arg(long)]
    hidden: bool,
}

fn setup_terminal() -> anyhow::Result<Term> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Term) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Installs a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

/// `$DUET_LOG`, else `duet.log` in the temp directory.
fn log_path() -> PathBuf {
    env::var_os("DUET_LOG")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| env::temp_dir().join("duet.log"))
}

/// Logs go to a file; the terminal belongs to the UI.
fn init_logging() {
    let path = log_path();
    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("duet: logging disabled, cannot open {}: {e}", path.display());
            return;
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn config_dir() -> PathBuf {
    // Check for project-local config directory first, then fall back
    let local = PathBuf::from("config");
    if local.exists() {
        return local;
    }
    env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
        .join(".config")
        .join("duet")
}

/// `--config`, a project-local `config/config.toml`, `$DUET_CONFIG`, then
/// the per-user file.
fn config_path(cli_config: Option<&Path>) -> PathBuf {
    if let Some(path) = cli_config {
        return path.to_path_buf();
    }
    let local = Path::new("config").join("config.toml");
    if local.exists() {
        return local;
    }
    env::var_os("DUET_CONFIG")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| config_dir().join("config.toml"))
}

/// Loads a TOML file, falling back to defaults. A missing file is silent;
/// any other failure comes back as a warning for the status bar.
fn load_or_default<T: Default>(
    path: &Path,
    load: impl FnOnce(&Path) -> CoreResult<T>,
) -> (T, Option<String>) {
    match load(path) {
        Ok(value) => {
            tracing::info!(path = %path.display(), "loaded");
            (value, None)
        }
        Err(CoreError::NotFound(_)) => {
            tracing::debug!(path = %path.display(), "not found, using defaults");
            (T::default(), None)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "using defaults");
            (T::default(), Some(format!("{}: {e}", path.display())))
        }
    }
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .filter(|p| p.is_dir())
}

/// Left pane: `DIR` or the working directory. Right pane: `--right`, else
/// the home directory, else the working directory.
fn start_dirs(cli: &Cli, cwd: &Path, home: Option<PathBuf>) -> (PathBuf, PathBuf) {
    let left = cli.dir.as_ref().map_or_else(|| cwd.to_path_buf(), |d| cwd.join(d));
    let right = match &cli.right {
        Some(d) => cwd.join(d),
        None => home.unwrap_or_else(|| cwd.to_path_buf()),
    };
    (left, right)
}

fn build_app(cli: &Cli, terminal_height: u16) -> anyhow::Result<App> {
    let cfg_path = config_path(cli.config.as_deref());
    let (mut config, config_warning) = load_or_default(&cfg_path, Config::load);
    let theme_path = cfg_path
        .parent()
        .map(|dir| dir.join("theme.toml"))
        .unwrap_or_else(|| PathBuf::from("theme.toml"));
    let (theme, theme_warning) = load_or_default(&theme_path, Theme::load);
    if cli.hidden {
        config.general.show_hidden = true;
    }

    let (left, right) = start_dirs(cli, &env::current_dir()?, home_dir());

    let commander = Commander::open(
        &left,
        &right,
        config.commander_options(page_rows(terminal_height)),
        Box::new(SystemTrash),
        Arc::new(NullByteSniffer),
    )?;
    let (left_kind, right_kind) = (config.ui.left_pane, config.ui.right_pane);

    let app = App::new(commander, config, theme)
        .dispatch(Command::SetPaneKind(PaneSide::Left, left_kind))
        .dispatch(Command::SetPaneKind(PaneSide::Right, right_kind));
    Ok(match config_warning.or(theme_warning) {
        Some(warning) => app.with_error(warning),
        None => app,
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting duet");

    install_panic_hook();

    let mut terminal = setup_terminal()?;
    let result = terminal
        .size()
        .map_err(anyhow::Error::from)
        .and_then(|size| build_app(&cli, size.height))
        .and_then(|app| run_app(&mut terminal, app));

    restore_terminal(&mut terminal)?;

    if let Err(e) = result {
        tracing::error!(error = %e, "fatal");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}

fn run_app(terminal: &mut Term, mut app: App) -> anyhow::Result<()> {
    loop {
        let size = terminal.size()?;
        app = app.with_page_rows(page_rows(size.height));
        terminal.draw(|f| render(f, &app))?;

        if app.should_quit() {
            tracing::info!("quit");
            return Ok(());
        }

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let action = handle_key(key, app.mode(), app.page_rows());
            app = handle_action(terminal, app, action);
        }
    }
}

fn handle_action(terminal: &mut Term, app: App, action: InputAction) -> App {
    match action {
        InputAction::Command(command) => app.dispatch(command),
        InputAction::Open => match app.open_target() {
            OpenTarget::Directory => app.dispatch(Command::Enter),
            OpenTarget::File(path) => match external::native_open() {
                Some(opener) => launch(terminal, app, &opener, "Opener", Launch::WithPath(&path)),
                None => app.program_missing("Opener"),
            },
            OpenTarget::Nothing => app,
        },
        InputAction::RequestCopy => app.request_copy(),
        InputAction::RequestMove => app.request_move(),
        InputAction::RequestDelete => app.request_delete(),
        InputAction::RequestMkdir => app.request_mkdir(),
        InputAction::RequestFind => app.request_find(),
        InputAction::RequestQuit => app.request_quit(),
        InputAction::Quit => app.with_quit(),
        InputAction::SelectPane(side) => app.request_pane_select(side),
        InputAction::View => {
            let program = external::viewer(&app.config().programs);
            run_on_file(terminal, app, program, "Viewer")
        }
        InputAction::Edit => {
            let program = external::editor(&app.config().programs);
            run_on_file(terminal, app, program, "Editor")
        }
        InputAction::Shell => match external::shell(&app.config().programs) {
            Some(shell) => {
                let dir = app.commander().active().path().to_path_buf();
                launch(terminal, app, &shell, "Shell", Launch::InDir(&dir))
            }
            None => app.program_missing("Shell"),
        },
        InputAction::About => app.show_about(),
        InputAction::ToggleAppearance => app.toggle_appearance(),
        InputAction::InputChar(c) => app.input_push(c),
        InputAction::InputBackspace => app.input_pop(),
        InputAction::InputClear => app.input_clear(),
        InputAction::InputConfirm => app.input_confirm(),
        InputAction::ConfirmApproved => app.confirm_accept(),
        InputAction::SelectUp => app.pane_select_move(-1),
        InputAction::SelectDown => app.pane_select_move(1),
        InputAction::SelectConfirm => app.pane_select_confirm(),
        InputAction::Dismiss => app.dismiss(),
        InputAction::None => app,
    }
}

/// Runs a viewer or editor on the file under the cursor.
fn run_on_file(terminal: &mut Term, app: App, program: Option<Program>, label: &str) -> App {
    let OpenTarget::File(path) = app.open_target() else {
        return app.with_error("Not a file");
    };
    match program {
        Some(program) => launch(terminal, app, &program, label, Launch::WithPath(&path)),
        None => app.program_missing(label),
    }
}

/// Suspends the UI for `program`. Both panes are re-read afterwards, since
/// anything may have changed on disk meanwhile.
fn launch(terminal: &mut Term, app: App, program: &Program, label: &str, how: Launch<'_>) -> App {
    tracing::info!(program = program.name(), label, "launching");
    let outcome = external::run_suspended(terminal, program, how);
    app.after_external(label, outcome, true)
}
