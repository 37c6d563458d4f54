//! todo-tui - Terminal To-Do List
//!
//! A TUI for keeping a short list of prioritized tasks.
//!
//! Features:
//! - Add todos with High / Normal / Low priority
//! - List sorted by name, priority shown as a colored dot
//! - Delete single todos or a marked selection
//! - Pink, Blue and Green accent themes
//! - Alternate application icons
//!
//! Usage: todo-tui [--db PATH] [--config PATH]

mod app;
mod config;
mod icons;
mod logging;
mod store;
mod types;
mod ui;

use anyhow::{bail, Context, Result};
use app::App;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use icons::DesktopEntryIcons;
use ratatui::prelude::*;
use std::io::stdout;
use std::path::PathBuf;
use std::time::Duration;
use store::TodoStore;

/// Command line options
#[derive(Debug, Default, PartialEq, Eq)]
struct Options {
    db: Option<PathBuf>,
    config: Option<PathBuf>,
    help: bool,
    version: bool,
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {:#}\n", e);
            print_help();
            std::process::exit(2);
        }
    };

    if options.help {
        print_help();
        return Ok(());
    }

    if options.version {
        println!("todo-tui {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Run the application
    let result = run_app(options);

    if let Err(e) = result {
        log::error!("Fatal: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => options.help = true,
            "-v" | "--version" => options.version = true,
            "--db" => {
                let path = iter.next().context("--db requires a path")?;
                options.db = Some(PathBuf::from(path));
            }
            "--config" => {
                let path = iter.next().context("--config requires a path")?;
                options.config = Some(PathBuf::from(path));
            }
            other => bail!("Unknown argument {:?}", other),
        }
    }

    Ok(options)
}

fn print_help() {
    println!(
        r#"todo-tui - Terminal To-Do List

USAGE:
    todo-tui [OPTIONS]

OPTIONS:
        --db PATH        Use a different todo database
        --config PATH    Use a different config file
    -h, --help           Print help information
    -v, --version        Print version information

KEYBINDINGS:
    j/k              Navigate up/down
    g/G              Jump to top/bottom
    a                Add a todo
    d                Delete todo (or marked todos in edit mode)
    e                Toggle edit mode
    Space            Mark todo (edit mode)
    s                Settings (theme and app icon)
    q                Quit

FILES:
    ~/.config/todo-tui/config.toml
    ~/.local/share/todo-tui/todos.db
    ~/.local/share/todo-tui/todo-tui.log

ENVIRONMENT:
    TODO_TUI_LOG     Log level (error, warn, info, debug, trace)
"#
    );
}

fn run_app(options: Options) -> Result<()> {
    // Logging is best effort; the app works without it
    match logging::init() {
        Ok(path) => log::info!("todo-tui {} starting, logging to {:?}", env!("CARGO_PKG_VERSION"), path),
        Err(e) => eprintln!("Warning: logging disabled: {:#}", e),
    }

    // Load configuration
    let config_path = match options.config {
        Some(path) => path,
        None => config::Config::path()?,
    };
    let config = config::Config::load_from(&config_path)
        .context("Failed to load configuration")?;

    // Open storage
    let db_path = match options.db {
        Some(path) => path,
        None => TodoStore::path()?,
    };
    let store = TodoStore::open(&db_path).context("Failed to open todo database")?;
    log::info!("Using database {:?}", db_path);

    let switcher = DesktopEntryIcons::new(DesktopEntryIcons::path()?);

    // Create application state
    let mut app = App::new(config, config_path, store, Box::new(switcher))
        .context("Failed to initialize application")?;

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)
        .context("Failed to setup terminal")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .context("Failed to create terminal")?;

    // Run main loop
    let result = main_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    log::info!("todo-tui exiting");
    result
}

fn main_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        // Render UI
        terminal.draw(|frame| {
            ui::render(frame, app);
        })?;

        // Expire flash messages
        app.tick();

        // Poll for events with timeout (for timer updates)
        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key)?;
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
