//! Command implementations for sheet
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod check;
mod choices;
mod notes;
mod resolve;

pub use check::Check;
pub use choices::Choices;
pub use notes::Notes;
pub use resolve::Resolve;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;
use tracing::warn;

use rules_content::{Campaign, ConfigLoader, ContentFactory};
use rules_core::Session;

/// Campaign selection shared by every command.
#[derive(clap::Args)]
pub struct CampaignArgs {
    /// Campaign file (TOML). Without one, every embedded option is loaded
    #[arg(short, long, value_name = "FILE", env = "SHEET_CAMPAIGN")]
    campaign: Option<PathBuf>,
}

impl CampaignArgs {
    pub fn build(&self) -> Result<Campaign> {
        load_campaign(self.campaign.as_deref())
    }

    /// Builds the campaign and seeds a session from a character file.
    pub fn session(&self, character: &Path) -> Result<Session> {
        let campaign = self.build()?;
        campaign
            .session_from_file(character)
            .with_context(|| format!("Failed to load character: {}", character.display()))
    }
}

#[derive(Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned, colored text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

pub fn load_campaign(path: Option<&Path>) -> Result<Campaign> {
    let factory = match path {
        Some(path) => {
            let config = ConfigLoader::load(path)
                .with_context(|| format!("Failed to load campaign: {}", path.display()))?;
            ContentFactory::new(config)
        }
        None => ContentFactory::embedded(),
    };

    let campaign = factory.build()?;
    for (category, key) in campaign.skipped() {
        warn!(category, key, "campaign names an option with no content");
    }
    Ok(campaign)
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
    println!("{}", json);
    Ok(())
}

pub fn print_header(title: &str) {
    println!("{}", style(title).bold().green());
}

/// Prints `name  value` rows with names padded to the widest one.
pub fn print_rows(rows: Vec<(String, String)>) {
    let width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, value) in rows {
        println!("  {:<width$}  {}", style(&name).cyan(), value, width = width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_campaign_without_file() {
        let campaign = load_campaign(None).unwrap();
        assert!(campaign.ruleset.choices.contains("races", "Dwarf"));
    }

    #[test]
    fn campaign_file_narrows_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campaign.toml");
        std::fs::write(&path, "name = \"Dwarves\"\n[content]\nraces = [\"Dwarf\"]\n").unwrap();

        let campaign = load_campaign(Some(&path)).unwrap();
        assert_eq!(campaign.name, "Dwarves");
        assert!(!campaign.ruleset.choices.contains("races", "Elf"));
    }

    #[test]
    fn missing_campaign_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_campaign(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(format!("{:#}", err).contains("missing.toml"));
    }
}
