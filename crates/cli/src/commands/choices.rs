//! List the options a campaign offers.

use std::collections::BTreeMap;

use anyhow::Result;
use clap::Parser;
use console::style;

use super::{CampaignArgs, OutputFormat, print_json, print_rows};

/// List the options a campaign offers
#[derive(Parser)]
pub struct Choices {
    /// Category to list (e.g. `races`, `feats`, `domains`, `levels`); all when omitted
    #[arg(value_name = "CATEGORY")]
    category: Option<String>,

    #[command(flatten)]
    campaign: CampaignArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl Choices {
    pub fn execute(self) -> Result<()> {
        let campaign = self.campaign.build()?;
        let choices = &campaign.ruleset.choices;

        let categories: Vec<&str> = match &self.category {
            Some(category) => {
                if choices.get_choices(category).is_empty() {
                    anyhow::bail!("Unknown or empty category: {}", category);
                }
                vec![category.as_str()]
            }
            None => choices.categories().collect(),
        };

        match self.format {
            OutputFormat::Json => {
                let listing: BTreeMap<&str, _> = categories
                    .iter()
                    .map(|category| (*category, choices.get_choices(category)))
                    .collect();
                print_json(&listing)?;
            }
            OutputFormat::Text => {
                for category in categories {
                    println!("{}", style(category).bold().yellow());
                    print_rows(
                        choices
                            .get_choices(category)
                            .iter()
                            .map(|(key, descriptor)| (key.clone(), descriptor.clone()))
                            .collect(),
                    );
                    println!();
                }
            }
        }
        Ok(())
    }
}
