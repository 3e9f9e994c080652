//! Feat loader.
//!
//! A selected feat is the fact `feats.<Feat>`; the loader turns it into
//! `features.<Feat>`. Prerequisites live in the table as
//! `validationNotes.*` rules, so an unmet one shows up as a violation
//! instead of blocking the feat.

use rules_core::{AttrId, Operator, Ruleset};

use super::{ContentEntry, ContentPack, ContentTable, define_edge};
use crate::descriptor::FeatDescriptor;
use crate::loaders::LoadResult;

const EMBEDDED: &str = include_str!("../../data/feats.ron");

#[derive(Clone, Debug)]
pub struct FeatPack {
    table: ContentTable,
}

impl FeatPack {
    pub fn embedded() -> LoadResult<Self> {
        Ok(Self::new(ContentTable::from_ron(EMBEDDED, "feats.ron")?))
    }

    pub fn new(table: ContentTable) -> Self {
        Self { table }
    }
}

impl ContentPack for FeatPack {
    fn category(&self) -> &'static str {
        "feats"
    }

    fn file_name(&self) -> &'static str {
        "feats.ron"
    }

    fn table(&self) -> &ContentTable {
        &self.table
    }

    fn table_mut(&mut self) -> &mut ContentTable {
        &mut self.table
    }

    fn register(&self, entry: &ContentEntry, ruleset: &mut Ruleset) -> LoadResult<()> {
        let feat: FeatDescriptor = entry.descriptor.parse()?;
        ruleset.define_choice(self.category(), &entry.key, &entry.descriptor);
        define_edge(
            ruleset,
            AttrId::new("features", &feat.name)?,
            AttrId::new("feats", &entry.key)?,
            Operator::Set,
            1_i64,
        );
        Ok(())
    }
}
