//! Binary entry point that wires environment bootstrap, logging and
//! configuration, then launches the interactive chat loop.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use chatbuddy::cli::Cli;
use chatbuddy::config::Settings;
use chatbuddy::session;

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "warn";

/// Loads `.env`, initializes stderr logging, resolves settings and chats.
fn main() -> Result<()> {
    dotenv::dotenv().ok();
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(&cli);
    session::run_chat(&settings)
}
