//! Terminal UI for scraps that lets users log food waste and browse where it goes.

mod app;
mod config;
mod content;
mod input;
mod ui;

use std::{
    fs::{self, OpenOptions},
    io,
    sync::{Arc, Mutex},
    time::Duration as StdDuration,
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;
use scraps_core::{Animation, JsonLinesStore, Ledger, ScrapsService};
use scraps_lottie::LottieClient;
use tokio::task::JoinHandle;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::config::{Cli, Config, LoggingConfig, StorageConfig};
use crate::input::Action;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(&cli)?;
    init_logging(&config.logging)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting scraps");

    // Ledger + service setup
    let (ledger, storage_label) = open_ledger(&config.storage)?;
    let mut service = ScrapsService::new(ledger);

    if config.animation.enabled {
        let client = Client::builder().user_agent("scraps/0.1").build()?;
        let lottie = LottieClient::with_url(client, config.animation.url.clone())
            .timeout(config.animation.timeout());
        service = service.with_animation(Arc::new(lottie));
    }
    let service = Arc::new(service);

    // Fire and forget: the UI starts immediately and picks the animation up if it arrives
    let animation_task = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.animation().await })
    };

    // App state
    let app = App::new(service, storage_label);

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app, animation_task).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    tracing::info!("scraps shut down");
    res
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    animation_task: JoinHandle<Option<Animation>>,
) -> Result<()> {
    let mut animation_task = Some(animation_task);

    loop {
        if let Some(task) = animation_task.take_if(|task| task.is_finished()) {
            app.set_animation(task.await.ok().flatten());
        }

        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            match input::handle_key_event(key, &mut app) {
                Action::Quit => break,
                Action::None => {}
                Action::SubmitEntry => app.submit_entry(),
            }
        }
    }

    if let Some(task) = animation_task {
        task.abort();
    }
    Ok(())
}

fn open_ledger(storage: &StorageConfig) -> Result<(Ledger, String)> {
    if storage.in_memory {
        tracing::info!("entries are kept for this session only");
        return Ok((Ledger::in_memory(), "in memory".to_owned()));
    }

    let path = &storage.data_file;
    let store = JsonLinesStore::open(path)
        .with_context(|| format!("Failed to open record file {}", path.display()))?;
    let ledger = Ledger::open(store)
        .with_context(|| format!("Failed to load entries from {}", path.display()))?;
    tracing::info!(path = %path.display(), entries = ledger.len(), "ledger ready");
    Ok((ledger, path.display().to_string()))
}

// The terminal belongs to the UI, so log lines go to a file.
fn init_logging(logging: &LoggingConfig) -> Result<()> {
    if let Some(parent) = logging.file.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&logging.file)
        .with_context(|| format!("Failed to open log file {}", logging.file.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}
