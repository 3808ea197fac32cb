use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::warn;

use tfs_broker::MockBroker;
use tfs_daemon::{init_root, Controller, ControllerConfig};

#[derive(Parser)]
#[command(name = "tradefs", version, about = "Filesystem-driven trade controller")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Initialize the control-surface directory tree.
    Init {
        /// Control-surface root directory.
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Start the trade controller poll loop.
    Controller {
        /// Control-surface root directory.
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Poll interval in seconds.
        #[arg(long, default_value_t = 2)]
        interval: u64,
        /// Mock execution: no external brokerage calls.
        #[arg(long)]
        mock: bool,
        /// Compact after this many handled intents (0 disables).
        #[arg(long, default_value_t = 10)]
        compact_after: usize,
    },
    /// Print version information.
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    match Cli::parse().command {
        Command::Init { root } => init_root(&root),
        Command::Controller {
            root,
            interval,
            mock,
            compact_after,
        } => {
            if !mock {
                // The live brokerage adapter is an external integration;
                // this build carries only the deterministic mock.
                warn!("no live brokerage adapter wired in, falling back to mock execution");
            }
            let cfg = ControllerConfig {
                root,
                interval: Duration::from_secs(interval),
                compact_after,
            };
            Controller::new(cfg, Box::new(MockBroker::new())).run().await
        }
        Command::Version => {
            println!("tradefs {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
