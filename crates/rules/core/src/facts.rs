//! Base facts: the sparse player choices everything else derives from.
//!
//! A fact is an attribute with a recorded value (`race = "Dwarf"`,
//! `levels.Cleric = 5`, `feats.Alertness = 1`). When rules also target a
//! fact attribute, the fact seeds the fold.

use std::collections::BTreeMap;

use tracing::debug;

use crate::attr::{AttrId, Value};
use crate::rule::ChangeLog;

#[derive(Clone, Debug, Default)]
pub struct Facts {
    values: BTreeMap<AttrId, Value>,
    changes: ChangeLog,
}

impl Facts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a fact, returning the previous value.
    pub fn set(&mut self, attr: AttrId, value: impl Into<Value>) -> Option<Value> {
        let value = value.into();
        if self.values.get(&attr) == Some(&value) {
            return Some(value);
        }
        debug!(attr = %attr, value = %value, "fact set");
        self.changes.record(attr.clone());
        self.values.insert(attr, value)
    }

    pub fn clear(&mut self, attr: &str) -> Option<Value> {
        let previous = self.values.remove_entry(attr)?;
        debug!(attr = %previous.0, "fact cleared");
        self.changes.record(previous.0);
        Some(previous.1)
    }

    pub fn get(&self, attr: &str) -> Option<&Value> {
        self.values.get(attr)
    }

    pub fn contains(&self, attr: &str) -> bool {
        self.values.contains_key(attr)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AttrId, &Value)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn changes(&self) -> &ChangeLog {
        &self.changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(name: &str) -> AttrId {
        AttrId::parse(name).unwrap()
    }

    #[test]
    fn unchanged_value_is_not_logged() {
        let mut facts = Facts::new();
        facts.set(attr("levels.Cleric"), 5);
        facts.set(attr("levels.Cleric"), 5);
        assert_eq!(facts.changes().len(), 1);

        assert_eq!(facts.set(attr("levels.Cleric"), 6), Some(Value::Int(5)));
        assert_eq!(facts.changes().len(), 2);
    }

    #[test]
    fn clear_logs_only_existing_facts() {
        let mut facts = Facts::new();
        assert!(facts.clear("race").is_none());
        facts.set(attr("race"), "Dwarf");
        assert_eq!(facts.clear("race"), Some(Value::from("Dwarf")));
        assert_eq!(facts.changes().len(), 2);
        assert!(facts.is_empty());
    }
}
