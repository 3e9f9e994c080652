//! List validation rules a character violates.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use console::style;

use super::{CampaignArgs, OutputFormat, print_json};

/// List violated validation rules
#[derive(Parser)]
pub struct Check {
    /// Character file (TOML)
    #[arg(value_name = "CHARACTER")]
    character: PathBuf,

    #[command(flatten)]
    campaign: CampaignArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl Check {
    /// Fails when any rule is violated, so scripts can gate on the exit code.
    pub fn execute(self) -> Result<()> {
        let mut session = self.campaign.session(&self.character)?;
        let violations = session.violations()?;

        match self.format {
            OutputFormat::Json => print_json(&violations)?,
            OutputFormat::Text if violations.is_empty() => {
                println!("{}", style("No violations").bold().green());
            }
            OutputFormat::Text => {
                println!("{}", style("Violations:").bold().red());
                for attr in &violations {
                    println!("  {}", attr);
                }
            }
        }

        if !violations.is_empty() {
            anyhow::bail!("{} validation rule(s) violated", violations.len());
        }
        Ok(())
    }
}
