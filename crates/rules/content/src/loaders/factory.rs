//! Content factory for building a campaign ruleset.

use std::path::Path;

use anyhow::Context;
use tracing::info;

use rules_core::{Ruleset, Session};

use crate::loaders::{CampaignConfig, CharacterLoader, CharacterSheet, LoadResult, TableLoader};
use crate::packs::{
    BaseTemplate, ContentPack, DomainPack, FeatPack, LoadReport, PrestigePack, RacePack,
};

/// Builds a [`Campaign`] from the embedded packs, a campaign selection and
/// optional override tables.
///
/// # Override Directory
///
/// ```text
/// data_dir/
/// ├── base.ron
/// ├── races.ron
/// ├── feats.ron
/// ├── domains.ron
/// └── classes.ron
/// ```
///
/// Every file is optional. Entries replace embedded entries with the same key
/// and new keys are appended.
pub struct ContentFactory {
    config: CampaignConfig,
}

impl ContentFactory {
    pub fn new(config: CampaignConfig) -> Self {
        Self { config }
    }

    /// Every embedded entry, no overrides.
    pub fn embedded() -> Self {
        Self::new(CampaignConfig::default())
    }

    pub fn config(&self) -> &CampaignConfig {
        &self.config
    }

    /// Loads the base template, then races, feats, domains and classes.
    pub fn build(&self) -> LoadResult<Campaign> {
        let mut ruleset = Ruleset::new();
        let selection = &self.config.content;

        let base = self.prepare(BaseTemplate::embedded()?)?;
        let mut reports = vec![base.load_all(&mut ruleset)?];
        reports.push(self.load_selected(RacePack::embedded()?, &selection.races, &mut ruleset)?);
        reports.push(self.load_selected(FeatPack::embedded()?, &selection.feats, &mut ruleset)?);
        reports.push(self.load_selected(
            DomainPack::embedded()?,
            &selection.domains,
            &mut ruleset,
        )?);
        reports.push(self.load_selected(
            PrestigePack::embedded()?,
            &selection.classes,
            &mut ruleset,
        )?);

        info!(
            campaign = %self.config.name,
            rules = ruleset.rules.len(),
            notes = ruleset.notes.len(),
            "campaign built"
        );
        Ok(Campaign {
            name: self.config.name.clone(),
            ruleset,
            reports,
        })
    }

    /// Merges the pack's override table from `data_dir`, if any.
    fn prepare<P: ContentPack>(&self, mut pack: P) -> LoadResult<P> {
        if let Some(dir) = self.config.data_dir.as_deref() {
            if let Some(table) = TableLoader::load_override(dir, pack.file_name())? {
                pack.table_mut().merge(table);
            }
        }
        Ok(pack)
    }

    fn load_selected<P: ContentPack>(
        &self,
        pack: P,
        selection: &Option<Vec<String>>,
        ruleset: &mut Ruleset,
    ) -> LoadResult<LoadReport> {
        let pack = self.prepare(pack)?;
        let keys: Vec<String> = match selection {
            Some(keys) => keys.clone(),
            None => pack.table().keys().map(str::to_owned).collect(),
        };
        pack.load(keys, ruleset)
    }
}

/// A built ruleset plus what went into it.
#[derive(Clone, Debug)]
pub struct Campaign {
    pub name: String,
    pub ruleset: Ruleset,
    pub reports: Vec<LoadReport>,
}

impl Campaign {
    /// Keys requested by the campaign that had no content.
    pub fn skipped(&self) -> impl Iterator<Item = (&str, &str)> {
        self.reports.iter().flat_map(|report| {
            report
                .skipped
                .iter()
                .map(|key| (report.category.as_str(), key.as_str()))
        })
    }

    /// A session over a copy of the ruleset, seeded with the character's facts.
    pub fn session(&self, sheet: &CharacterSheet) -> LoadResult<Session> {
        let facts = sheet
            .facts()
            .with_context(|| format!("Failed to read character '{}'", sheet.name))?;
        Ok(Session::with_facts(self.ruleset.clone(), facts))
    }

    /// Loads a character file into a session.
    pub fn session_from_file(&self, path: &Path) -> LoadResult<Session> {
        let sheet = CharacterLoader::load(path)?;
        self.session(&sheet)
    }
}
