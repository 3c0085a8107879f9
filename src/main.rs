mod app;
use linkdeck_app::*;

use app::LinkdeckApp;
use clap::Parser;
use config::Config;
use database::storage::{open_in_memory, open_storage};
use models::review_state::now_millis;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rusqlite::Connection;
use state::AppState;
use std::path::PathBuf;
use tracing::{info, warn};

/// Flashcards that travel as a link.
#[derive(Parser, Debug)]
#[command(name = "linkdeck", version)]
struct Cli {
    /// Share link (or just its fragment) of the deck to open
    link: Option<String>,

    /// Config file to use instead of the platform default
    #[arg(long)]
    config: Option<PathBuf>,

    /// Progress store to use instead of the configured one
    #[arg(long)]
    data: Option<PathBuf>,
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

/// Opens the progress store, keeping progress in memory only if that fails
fn open_store(path: Option<PathBuf>) -> Connection {
    let opened = match &path {
        Some(path) => open_storage(path),
        None => {
            warn!("No data directory available, progress will not be kept");
            open_in_memory()
        }
    };

    match opened {
        Ok(conn) => {
            if let Some(path) = path {
                info!("Using progress store {}", path.display());
            }
            conn
        }
        Err(e) => {
            warn!("Could not open progress store, keeping progress in memory: {e}");
            open_in_memory().expect("Failed to open in-memory store")
        }
    }
}

fn main() -> eframe::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref());
    let conn = open_store(cli.data.or_else(|| config.storage_path()));

    let mut state = AppState::new(&config, conn, StdRng::from_entropy());
    if let Some(link) = &cli.link {
        state.open_link(link, now_millis());
    }
    info!("Loaded {} cards", state.deck().len());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([500.0, 700.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Linkdeck",
        options,
        Box::new(|_cc| Ok(Box::new(LinkdeckApp::new(state)))),
    )
}
