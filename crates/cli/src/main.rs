//! Character sheet inspection tool.
//!
//! Builds a campaign ruleset from the embedded content packs (optionally
//! narrowed and overridden by a campaign file) and derives a character from
//! its TOML description.
//! Run with: `sheet <command> [--campaign campaign.toml] <character.toml>`

mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Check, Choices, Notes, Resolve};

/// Character sheet inspection tool
#[derive(Parser)]
#[command(name = "sheet")]
#[command(about = "Derive and inspect character sheets", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Resolve all attributes, or only the ones named
    Resolve(Resolve),

    /// Render the notes that currently apply
    Notes(Notes),

    /// List violated validation rules
    Check(Check),

    /// List the options a campaign offers
    Choices(Choices),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for SHEET_CAMPAIGN and RUST_LOG)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Resolve(cmd) => cmd.execute(),
        Command::Notes(cmd) => cmd.execute(),
        Command::Check(cmd) => cmd.execute(),
        Command::Choices(cmd) => cmd.execute(),
    }
}
