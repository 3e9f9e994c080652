//! Race loader.
//!
//! For each race: choice `races/<Race>`, the flag `isRace.<Race>` (set while
//! the `race` fact names it), the parent flag for subraces, one
//! `features.<Feature>` edge per racial feature and the ability adjustments.

use rules_core::{AttrId, Operator, Ruleset};

use super::{ContentEntry, ContentPack, ContentTable, define_edge, names};
use crate::descriptor::RaceDescriptor;
use crate::loaders::LoadResult;

const EMBEDDED: &str = include_str!("../../data/races.ron");

#[derive(Clone, Debug)]
pub struct RacePack {
    table: ContentTable,
}

impl RacePack {
    pub fn embedded() -> LoadResult<Self> {
        Ok(Self::new(ContentTable::from_ron(EMBEDDED, "races.ron")?))
    }

    pub fn new(table: ContentTable) -> Self {
        Self { table }
    }
}

impl ContentPack for RacePack {
    fn category(&self) -> &'static str {
        "races"
    }

    fn file_name(&self) -> &'static str {
        "races.ron"
    }

    fn table(&self) -> &ContentTable {
        &self.table
    }

    fn table_mut(&mut self) -> &mut ContentTable {
        &mut self.table
    }

    fn register(&self, entry: &ContentEntry, ruleset: &mut Ruleset) -> LoadResult<()> {
        let race: RaceDescriptor = entry.descriptor.parse()?;
        ruleset.define_choice(self.category(), &entry.key, &entry.descriptor);

        let flag = AttrId::new("isRace", &entry.key)?;
        define_edge(ruleset, flag.clone(), AttrId::root("race")?, Operator::Set, names(&entry.key));

        if let Some(parent) = &entry.parent {
            define_edge(ruleset, AttrId::new("isRace", parent)?, flag.clone(), Operator::Set, 1_i64);
        }

        for feature in &race.features {
            define_edge(ruleset, AttrId::new("features", feature)?, flag.clone(), Operator::Set, 1_i64);
        }

        for adjustment in &race.adjustments {
            define_edge(
                ruleset,
                AttrId::root(&adjustment.ability)?,
                flag.clone(),
                Operator::Add,
                adjustment.amount,
            );
        }
        Ok(())
    }
}
