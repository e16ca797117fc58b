//! homebase entry point.
//!
//! Runs the dashboard terminal over stdin/stdout. End a line with TAB to
//! complete it; an empty line accepts the selected candidate. Ctrl-D quits.

mod frontend;

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use frontend::LineFrontend;
use homebase_store::FileStore;
use homebase_terminal::Terminal;
use homebase_terminal::services::{CachedWeather, Services};
use homebase_types::config::HomebaseConfig;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Resolve config from CLI arg, HOMEBASE_CONFIG env var, or defaults.
    let config = match std::env::args()
        .nth(1)
        .or_else(|| std::env::var("HOMEBASE_CONFIG").ok())
    {
        Some(path) => HomebaseConfig::load(Path::new(&path))
            .with_context(|| format!("loading config from {path}"))?,
        None => HomebaseConfig::default(),
    };
    log::info!("Starting homebase (store: {})", config.store.path.display());

    let store = FileStore::open(&config.store.path)
        .with_context(|| format!("opening store {}", config.store.path.display()))?;
    let mut services = Services::offline();
    services.weather = Arc::new(CachedWeather::from_store(&store));

    let terminal = Terminal::with_builtins(Box::new(store), services, config.terminal)?;
    let mut frontend = LineFrontend::new(terminal);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    write!(stdout, "{}", frontend.prompt_line())?;
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        for text in frontend.poll().into_iter().chain(frontend.feed(&line)) {
            writeln!(stdout, "{text}")?;
        }
        write!(stdout, "{}", frontend.prompt_line())?;
        stdout.flush()?;
    }
    writeln!(stdout)?;

    log::info!(
        "homebase exiting ({} history entries)",
        frontend.terminal().history().len()
    );
    Ok(())
}
