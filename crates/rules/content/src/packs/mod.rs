//! Content packs: tables of options and the loaders that register them.
//!
//! Each pack owns a [`ContentTable`] for one category. Loading a key
//! registers, under registration id `<category>:<key>`:
//!
//! 1. the entry's retractions (`delete_rule`) and suppressed notes, so
//!    overrides strip generic defaults before anything else is installed,
//! 2. the choice and the edges derived from its descriptor,
//! 3. the entry's extra rules, in table order,
//! 4. its notes.
//!
//! A key without an entry is a content gap: it is skipped and logged.

pub mod base;
pub mod domain;
pub mod feat;
pub mod prestige;
pub mod race;

pub use base::BaseTemplate;
pub use domain::DomainPack;
pub use feat::FeatPack;
pub use prestige::PrestigePack;
pub use race::RacePack;

use anyhow::Context;
use serde::Deserialize;
use tracing::{debug, info, warn};

use rules_core::{AttrId, BinaryOp, Expr, Operand, Operator, RegistrationId, Ruleset, Selector};

use crate::loaders::LoadResult;

/// `(target, source)` of an edge to retract.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Retraction(pub String, pub String);

/// `(target, source, operator, operand)` of an extra edge.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RuleRow(pub String, pub String, pub String, pub String);

/// One option of a content table.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ContentEntry {
    pub key: String,
    #[serde(default)]
    pub descriptor: String,
    /// Option this one specializes (subrace → race).
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub retract: Vec<Retraction>,
    /// Default notes this option hides.
    #[serde(default)]
    pub suppress_notes: Vec<String>,
    #[serde(default)]
    pub rules: Vec<RuleRow>,
    #[serde(default)]
    pub notes: Vec<String>,
    /// Level-gated features, `Level:Feature/Feature`.
    #[serde(default)]
    pub levels: Vec<String>,
}

/// Entries of one category, in table order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentTable {
    entries: Vec<ContentEntry>,
}

impl ContentTable {
    pub fn new(entries: Vec<ContentEntry>) -> Self {
        Self { entries }
    }

    /// Parses a RON list of entries. `origin` names the source in errors.
    pub fn from_ron(text: &str, origin: &str) -> LoadResult<Self> {
        let entries: Vec<ContentEntry> = ron::from_str(text)
            .map_err(|e| anyhow::anyhow!("Failed to parse content table {}: {}", origin, e))?;
        Ok(Self::new(entries))
    }

    pub fn get(&self, key: &str) -> Option<&ContentEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replaces entries with the same key and appends new ones.
    pub fn merge(&mut self, overrides: ContentTable) {
        for entry in overrides.entries {
            match self.entries.iter_mut().find(|e| e.key == entry.key) {
                Some(existing) => {
                    debug!(key = %entry.key, "content entry overridden");
                    *existing = entry;
                }
                None => self.entries.push(entry),
            }
        }
    }
}

/// Outcome of loading a list of keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub category: String,
    pub loaded: Vec<String>,
    pub skipped: Vec<String>,
}

impl LoadReport {
    pub fn new(category: &str) -> Self {
        Self {
            category: category.to_owned(),
            ..Self::default()
        }
    }
}

/// A loader for one content category.
pub trait ContentPack {
    /// Category name, also the registration id prefix.
    fn category(&self) -> &'static str;

    /// Table file name, embedded and in override directories.
    fn file_name(&self) -> &'static str;

    fn table(&self) -> &ContentTable;

    fn table_mut(&mut self) -> &mut ContentTable;

    /// Registers the choice and the descriptor-derived edges of one entry.
    fn register(&self, entry: &ContentEntry, ruleset: &mut Ruleset) -> LoadResult<()>;

    /// Loads `keys` in order. Keys without an entry are skipped.
    fn load<I, S>(&self, keys: I, ruleset: &mut Ruleset) -> LoadResult<LoadReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        Self: Sized,
    {
        let category = self.category();
        let mut report = LoadReport::new(category);

        for key in keys {
            let key = key.as_ref();
            let Some(entry) = self.table().get(key) else {
                warn!(category, key, "no content for key, skipped");
                report.skipped.push(key.to_owned());
                continue;
            };

            ruleset
                .registering(RegistrationId::content(category, key), |ruleset| {
                    apply_entry(self, entry, ruleset)
                })
                .with_context(|| format!("Failed to load {} '{}'", category, key))?;
            report.loaded.push(key.to_owned());
        }

        info!(
            category,
            loaded = report.loaded.len(),
            skipped = report.skipped.len(),
            "content loaded"
        );
        Ok(report)
    }
}

fn apply_entry<P: ContentPack>(
    pack: &P,
    entry: &ContentEntry,
    ruleset: &mut Ruleset,
) -> LoadResult<()> {
    for Retraction(target, source) in &entry.retract {
        let removed = ruleset.delete_rule(target, source)?;
        debug!(key = %entry.key, target = %target, source = %source, removed, "retracted");
    }
    for note in &entry.suppress_notes {
        if ruleset.remove_note(note).is_none() {
            debug!(key = %entry.key, note = %note, "no note to suppress");
        }
    }

    pack.register(entry, ruleset)?;

    for RuleRow(target, source, operator, operand) in &entry.rules {
        ruleset
            .define_rule(target, source, operator, operand)
            .with_context(|| format!("Invalid rule {} <- {} {} {}", target, source, operator, operand))?;
    }

    ruleset.define_note(&entry.notes)?;
    Ok(())
}

/// Typed edge registration for descriptor-derived rules.
pub(crate) fn define_edge(
    ruleset: &mut Ruleset,
    target: AttrId,
    source: AttrId,
    operator: Operator,
    operand: impl Into<Operand>,
) {
    ruleset
        .rules
        .push(target, Selector::Attr(source), operator, operand.into());
}

/// `source == "<key>" ? 1 : null`: set only while the text source names `key`.
pub(crate) fn names(key: &str) -> Expr {
    Expr::cond(
        Expr::binary(BinaryOp::Eq, Expr::Source, Expr::lit(key)),
        Expr::lit(1),
        Expr::Null,
    )
}
