//! Resolve a character's attributes.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use rules_core::{AttrId, Value};

use super::{CampaignArgs, OutputFormat, print_header, print_json, print_rows};

/// Resolve all attributes, or only the ones named
#[derive(Parser)]
pub struct Resolve {
    /// Character file (TOML)
    #[arg(value_name = "CHARACTER")]
    character: PathBuf,

    /// Attributes to resolve (e.g. `saves.Will`); all when omitted
    #[arg(value_name = "ATTR")]
    attributes: Vec<String>,

    #[command(flatten)]
    campaign: CampaignArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl Resolve {
    pub fn execute(self) -> Result<()> {
        let mut session = self.campaign.session(&self.character)?;

        let values: BTreeMap<AttrId, Option<Value>> = if self.attributes.is_empty() {
            session.resolve_all()?.into_iter().map(|(attr, v)| (attr, Some(v))).collect()
        } else {
            let mut values = BTreeMap::new();
            for name in &self.attributes {
                let attr = AttrId::parse(name)
                    .with_context(|| format!("Invalid attribute name '{}'", name))?;
                let value = session.resolve(&attr)?;
                values.insert(attr, value);
            }
            values
        };

        match self.format {
            OutputFormat::Json => print_json(&values)?,
            OutputFormat::Text => {
                print_header(&format!("{} attributes", values.len()));
                print_rows(
                    values
                        .into_iter()
                        .map(|(attr, value)| {
                            let shown = value.map_or_else(|| "-".to_owned(), |v| v.to_string());
                            (attr.to_string(), shown)
                        })
                        .collect(),
                );
            }
        }
        Ok(())
    }
}
