//! snipdeck - multi-file snippet viewer and editor
//!
//! A terminal user interface for browsing and editing code snippets made of
//! several named files. Each snippet is shown in a detail panel with its
//! metadata, one tab per file and a syntax-highlighted editor.

use crate::app::App;
use crate::config::Config;
use crate::detail::SnippetStore;
use crate::models::{JsonSnippetStore, StorageManager};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    crossterm::{
        event::{self, Event, KeyEventKind},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
};
use std::error::Error;
use std::io::{self, Stdout};
use std::time::Duration;

mod app;
mod cli;
mod config;
mod detail;
mod handlers;
mod logging;
mod models;
mod ui;

/// Application entry point and initialization
fn main() -> Result<(), Box<dyn Error>> {
    color_eyre::install()?;
    let log_guard = logging::init();
    if let Some(guard) = &log_guard {
        tracing::debug!(log_dir = %guard.log_dir().display(), "logging to file");
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let target = match cli::execute_cli(&args)? {
        cli::Invocation::Done => return Ok(()),
        cli::Invocation::Open(target) => target,
    };

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "config not loaded, using defaults");
        Config::default()
    });

    let mut store = JsonSnippetStore::open(StorageManager::new()?)?;
    store.seed_if_empty()?;
    if let Some(target) = target {
        let Some(id) = store.find(&target).map(|snippet| snippet.id) else {
            cli::print_not_found(&target);
            return Ok(());
        };
        store.select_snippet(Some(id));
    }

    let mut app = App::new(store, config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    while !app.should_quit {
        if app.needs_redraw {
            force_redraw(terminal, app)?;
            app.needs_redraw = false;
        } else {
            terminal.draw(|frame| app.render(frame))?;
        }

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && handlers::keys::handle_key_events(key, app)
                {
                    break;
                }
            }
        }
        app.tick();
    }
    Ok(())
}

/// Clears the terminal and draws a fresh frame
fn force_redraw<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    terminal.clear()?;
    terminal.draw(|frame| app.render(frame))?;
    Ok(())
}
