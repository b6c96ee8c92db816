//! copyboard CLI: clipboard history monitor for the desktop clipboard.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use copyboard_engine::Config;
#[cfg(feature = "system")]
use copyboard_types::{Item, SignalKind, SignalState};
#[cfg(feature = "system")]
use tokio::sync::watch;

#[derive(Parser)]
#[command(
    name = "copyboard",
    about = "Keep a short history of everything you copy",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch the clipboard and print the history as it changes.
    Run {
        /// Path to configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Files to add to the history at start, as if dropped.
        #[arg(short, long)]
        ingest: Vec<PathBuf>,
    },

    /// Print the default configuration.
    DefaultConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, ingest } => {
            let config = Config::load(config.as_deref())?;
            init_logging(&config.monitor.log_level);
            run(config, ingest).await?;
        }
        Commands::DefaultConfig => {
            print!("{}", Config::default().to_toml()?);
        }
    }

    Ok(())
}

fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();
}

#[cfg(feature = "system")]
async fn run(config: Config, ingest: Vec<PathBuf>) -> anyhow::Result<()> {
    use copyboard_engine::{Daemon, DaemonEvent};
    use copyboard_types::DropPayload;

    let clipboard = copyboard_clipboard::system::SystemClipboard::new(config.clipboard.max_size)?;
    let mut daemon = Daemon::new(&config, Box::new(clipboard)).await;
    let events = daemon.event_sender();

    if !ingest.is_empty() {
        tracing::info!(files = ingest.len(), "ingesting files");
        let payloads = ingest.into_iter().map(DropPayload::FileUrl).collect();
        events.send(DaemonEvent::Ingest(payloads)).await?;
    }

    tokio::spawn(report(daemon.history_receiver(), daemon.signal_receiver()));

    let shutdown = events.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown.send(DaemonEvent::Shutdown).await;
        }
    });

    daemon.run().await?;
    Ok(())
}

#[cfg(not(feature = "system"))]
async fn run(_config: Config, _ingest: Vec<PathBuf>) -> anyhow::Result<()> {
    anyhow::bail!("copyboard was built without the system clipboard backend")
}

#[cfg(feature = "system")]
async fn report(
    mut history: watch::Receiver<Vec<Item>>,
    mut signals: watch::Receiver<SignalState>,
) {
    loop {
        tokio::select! {
            changed = history.changed() => {
                if changed.is_err() {
                    break;
                }
                print_history(&history.borrow_and_update());
            }
            changed = signals.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = *signals.borrow_and_update();
                for kind in SignalKind::ALL {
                    if state.get(kind) {
                        tracing::info!(signal = %kind, "feedback");
                    }
                }
            }
        }
    }
}

#[cfg(feature = "system")]
fn print_history(items: &[Item]) {
    println!("--- history ({} items) ---", items.len());
    for (index, item) in items.iter().enumerate() {
        println!("{index}. [{}] {}", item.content.kind(), item.content.summary());
    }
}
