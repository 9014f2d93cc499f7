//! `memopad` terminal front end.
//!
//! # Responsibility
//! - Parse command-line input and drive one memo store operation per run.
//! - Keep output deterministic for scripting.

mod cli;
mod commands;
mod render;

use clap::Parser;
use cli::Cli;
use memopad_core::{default_log_level, init_logging};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_ref() {
        let log_dir = if log_dir.is_absolute() {
            log_dir.clone()
        } else {
            std::env::current_dir()?.join(log_dir)
        };
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, &log_dir.to_string_lossy()).map_err(anyhow::Error::msg)?;
    }

    let stdout = std::io::stdout();
    commands::run(cli, &mut stdout.lock())
}
