//! Tiny LRU console
//!
//! Reads commands from stdin and applies them to an in-process LRU cache
//! holding JSON values. Type `help` for the command list.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tiny_lru::console::{Command, ConsoleCache, HELP};
use tiny_lru::LruConfig;

/// Entry point for the console.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging (stderr)
/// 2. Load configuration from environment variables
/// 3. Create the cache and process stdin line by line until EOF or `quit`
fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tiny_lru=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = LruConfig::from_env();
    info!(
        "Configuration loaded: capacity={}, copy_mode={}",
        config.capacity, config.copy_mode
    );

    let mut cache = ConsoleCache::from_config(&config);
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", HELP)?;

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                warn!("{}", err);
                writeln!(stdout, "ERR {}", err)?;
                continue;
            }
        };

        let quit = command == Command::Quit;
        match command.execute(&mut cache) {
            Ok(reply) => writeln!(stdout, "{}", reply)?,
            Err(err) => writeln!(stdout, "ERR {}", err)?,
        }
        stdout.flush()?;

        if quit {
            break;
        }
    }

    info!(entries = cache.len(), "Console closed");
    Ok(())
}
