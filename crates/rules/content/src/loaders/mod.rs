//! Loaders for campaign configs, character files and on-disk content tables.
//!
//! Campaigns and characters are TOML; content tables are RON lists of
//! [`ContentEntry`](crate::packs::ContentEntry) and override the embedded pack.

pub mod character;
pub mod config;
pub mod factory;
pub mod tables;

pub use character::{CharacterLoader, CharacterSheet, FactValue};
pub use config::{CampaignConfig, ConfigLoader, ContentSelection};
pub use factory::{Campaign, ContentFactory};
pub use tables::TableLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
