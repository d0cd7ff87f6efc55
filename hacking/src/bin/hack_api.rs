use std::env;

use clap::Parser;
use tracing::info;

use hacking::difficulty::Difficulty;
use hacking::remote_api::{resolve_api_addr, router};
use hacking::settings::SettingsStore;
use hacking::{HackSession, SessionDriver, logging};

/// Serves one hack session over a local JSON API.
#[derive(Parser, Debug)]
#[command(name = "hack_api", version, about, long_about = None)]
struct Cli {
    /// Starting difficulty (overrides the settings file)
    #[arg(short, long)]
    difficulty: Option<Difficulty>,

    /// Dice seed for a reproducible hack
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    let settings = SettingsStore::from_env().load();
    let difficulty = cli.difficulty.unwrap_or(settings.difficulty);
    let session = HackSession::for_difficulty(difficulty, cli.seed.or(settings.seed));
    let (handle, task) = SessionDriver::spawn(session, settings.tick_interval());

    let addr = resolve_api_addr(|k| env::var(k).ok());
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, %difficulty, "hack api listening");

    let app = router(handle.clone());
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;

    handle.shutdown();
    let _ = task.await;
    served
}
