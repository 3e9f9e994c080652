//! Base template: the default edges every other pack builds on.
//!
//! Race, feat, domain and class content retract and extend these attribute
//! names by convention (`strengthModifier`, `level`, `armorClass`,
//! `saves.*`, `turnUndead.*`, `featureNotes.darkvisionFeature`, …), so they
//! are loaded first.

use rules_core::Ruleset;

use super::{ContentEntry, ContentPack, ContentTable, LoadReport};
use crate::loaders::LoadResult;

const EMBEDDED: &str = include_str!("../../data/base.ron");

#[derive(Clone, Debug)]
pub struct BaseTemplate {
    table: ContentTable,
}

impl BaseTemplate {
    /// Template shipped with the crate.
    pub fn embedded() -> LoadResult<Self> {
        Ok(Self::new(ContentTable::from_ron(EMBEDDED, "base.ron")?))
    }

    pub fn new(table: ContentTable) -> Self {
        Self { table }
    }

    /// Loads every section of the template, in table order.
    pub fn load_all(&self, ruleset: &mut Ruleset) -> LoadResult<LoadReport> {
        let keys: Vec<String> = self.table.keys().map(str::to_owned).collect();
        self.load(keys, ruleset)
    }
}

impl ContentPack for BaseTemplate {
    fn category(&self) -> &'static str {
        "base"
    }

    fn file_name(&self) -> &'static str {
        "base.ron"
    }

    fn table(&self) -> &ContentTable {
        &self.table
    }

    fn table_mut(&mut self) -> &mut ContentTable {
        &mut self.table
    }

    /// Sections are plain rule lists; nothing derives from the descriptor.
    fn register(&self, _entry: &ContentEntry, _ruleset: &mut Ruleset) -> LoadResult<()> {
        Ok(())
    }
}
