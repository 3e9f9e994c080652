//! Campaign configuration loader.
//!
//! ```toml
//! name = "Greyhawk"
//! # Optional directory of override tables, relative to this file.
//! data_dir = "tables"
//!
//! [content]
//! races = ["Human", "Dwarf", "Elf", "Drow"]
//! feats = ["Power Attack", "Toughness"]
//! # Omitted categories load every embedded entry.
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CampaignConfig {
    pub name: String,
    pub data_dir: Option<PathBuf>,
    pub content: ContentSelection,
}

/// Keys to load per category; `None` loads the whole table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContentSelection {
    pub races: Option<Vec<String>>,
    pub feats: Option<Vec<String>>,
    pub domains: Option<Vec<String>>,
    pub classes: Option<Vec<String>>,
}

/// Loader for campaign configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a campaign from a TOML file.
    ///
    /// A relative `data_dir` is resolved against the file's directory.
    pub fn load(path: &Path) -> LoadResult<CampaignConfig> {
        let content = read_file(path)?;
        let mut config = Self::parse(&content)?;

        if let Some(dir) = config.data_dir.take() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            config.data_dir = Some(if dir.is_relative() { base.join(dir) } else { dir });
        }
        Ok(config)
    }

    pub fn parse(content: &str) -> LoadResult<CampaignConfig> {
        toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse campaign TOML: {}", e))
    }
}
