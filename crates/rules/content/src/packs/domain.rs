//! Cleric domain loader.
//!
//! `domains.<Domain>` becomes `features.<Domain> Domain`, which in turn grants
//! the features named in the descriptor. Granted powers that feed shared
//! attributes (turning level, spell lists) use `^=` so several domains
//! compose as a maximum.

use rules_core::{AttrId, Operator, Ruleset};

use super::{ContentEntry, ContentPack, ContentTable, define_edge};
use crate::descriptor::DomainDescriptor;
use crate::loaders::LoadResult;

const EMBEDDED: &str = include_str!("../../data/domains.ron");

#[derive(Clone, Debug)]
pub struct DomainPack {
    table: ContentTable,
}

impl DomainPack {
    pub fn embedded() -> LoadResult<Self> {
        Ok(Self::new(ContentTable::from_ron(EMBEDDED, "domains.ron")?))
    }

    pub fn new(table: ContentTable) -> Self {
        Self { table }
    }
}

impl ContentPack for DomainPack {
    fn category(&self) -> &'static str {
        "domains"
    }

    fn file_name(&self) -> &'static str {
        "domains.ron"
    }

    fn table(&self) -> &ContentTable {
        &self.table
    }

    fn table_mut(&mut self) -> &mut ContentTable {
        &mut self.table
    }

    fn register(&self, entry: &ContentEntry, ruleset: &mut Ruleset) -> LoadResult<()> {
        let domain: DomainDescriptor = entry.descriptor.parse()?;
        ruleset.define_choice(self.category(), &entry.key, &entry.descriptor);

        let feature = AttrId::new("features", &format!("{} Domain", domain.name))?;
        define_edge(
            ruleset,
            feature.clone(),
            AttrId::new("domains", &entry.key)?,
            Operator::Set,
            1_i64,
        );
        for granted in &domain.granted {
            define_edge(
                ruleset,
                AttrId::new("features", granted)?,
                feature.clone(),
                Operator::Set,
                1_i64,
            );
        }
        Ok(())
    }
}
