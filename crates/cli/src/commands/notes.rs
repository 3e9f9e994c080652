//! Render the notes that currently apply to a character.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use super::{CampaignArgs, OutputFormat, print_header, print_json, print_rows};

/// Render the notes that currently apply
#[derive(Parser)]
pub struct Notes {
    /// Character file (TOML)
    #[arg(value_name = "CHARACTER")]
    character: PathBuf,

    /// Only notes in this namespace (e.g. `magicNotes`)
    #[arg(short, long, value_name = "NAMESPACE")]
    namespace: Option<String>,

    #[command(flatten)]
    campaign: CampaignArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl Notes {
    pub fn execute(self) -> Result<()> {
        let mut session = self.campaign.session(&self.character)?;
        let mut notes = session.active_notes()?;
        if let Some(namespace) = &self.namespace {
            notes.retain(|attr, _| attr.namespace() == namespace.as_str());
        }

        match self.format {
            OutputFormat::Json => print_json(&notes)?,
            OutputFormat::Text => {
                print_header("Notes");
                print_rows(
                    notes
                        .into_iter()
                        .map(|(attr, text)| (attr.to_string(), text))
                        .collect(),
                );
            }
        }
        Ok(())
    }
}
