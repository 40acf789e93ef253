//! account-admin binary entry point.
//!
//! Parses options, sets up file logging, initializes the terminal in raw
//! mode, runs the account screen, and restores the terminal state on exit.
//!
use std::path::Path;

use account_admin::app::{self, AppState, Exit, Keymap, Theme};
use account_admin::cli::Cli;
use account_admin::error::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

/// Send `tracing` output to `path`; the terminal belongs to the UI.
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_ctx(|| format!("open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()?;
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> std::io::Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let api = cli.build_api()?;
    let theme = Theme::load_or_init(&cli.theme_path());
    let keymap = Keymap::load_or_init(&cli.keymap_path());
    let mut state = AppState::new(cli.account_id(), api, theme, keymap);
    tracing::info!(account = %state.account_id, demo = cli.demo, "starting");

    let mut terminal = init_terminal().with_ctx(|| "init terminal".to_string())?;

    let res = app::run(&mut terminal, &mut state);
    // stops any countdown timer still running
    drop(state);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    match res {
        Ok(Exit::Deleted(id)) => println!("account {id} deleted"),
        Ok(Exit::Back) => {}
        Err(err) => {
            tracing::error!(error = %err, "application error");
            eprintln!("application error: {err}");
        }
    }
    Ok(())
}
