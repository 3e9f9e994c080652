//! Selectable options per category.
//!
//! The registry is a plain lookup store: the evaluator never reads it.
//! Descriptors are the formatted table strings content loaders parse
//! (e.g. `"Dwarf:Darkvision/Stonecunning:+2 constitution/-2 charisma"`).

use std::collections::BTreeMap;

use tracing::debug;

/// Options of one category: key → descriptor.
pub type ChoiceTable = BTreeMap<String, String>;

static EMPTY: ChoiceTable = ChoiceTable::new();

#[derive(Clone, Debug, Default)]
pub struct ChoiceRegistry {
    categories: BTreeMap<String, ChoiceTable>,
}

impl ChoiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an option. Duplicate keys are expected when
    /// several loaders extend one category; the last write wins.
    pub fn define_choice(
        &mut self,
        category: &str,
        key: impl Into<String>,
        descriptor: impl Into<String>,
    ) {
        let key = key.into();
        let previous = self
            .categories
            .entry(category.to_owned())
            .or_default()
            .insert(key.clone(), descriptor.into());
        if previous.is_some() {
            debug!(category, key = %key, "choice redefined");
        }
    }

    /// Options of a category, empty when the category is unknown.
    pub fn get_choices(&self, category: &str) -> &ChoiceTable {
        self.categories.get(category).unwrap_or(&EMPTY)
    }

    /// Live mutable view of a category, so callers may delete entries.
    pub fn get_choices_mut(&mut self, category: &str) -> &mut ChoiceTable {
        self.categories.entry(category.to_owned()).or_default()
    }

    pub fn descriptor(&self, category: &str, key: &str) -> Option<&str> {
        self.get_choices(category).get(key).map(String::as_str)
    }

    pub fn contains(&self, category: &str, key: &str) -> bool {
        self.get_choices(category).contains_key(key)
    }

    /// Categories that currently hold at least one option.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .filter(|(_, table)| !table.is_empty())
            .map(|(name, _)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let mut choices = ChoiceRegistry::new();
        choices.define_choice("weapons", "Longsword", "d8:19-20x2");
        choices.define_choice("weapons", "Longsword", "d8:19-20x2:Slashing");
        assert_eq!(
            choices.descriptor("weapons", "Longsword"),
            Some("d8:19-20x2:Slashing")
        );
        assert_eq!(choices.get_choices("weapons").len(), 1);
    }

    #[test]
    fn unknown_category_is_empty() {
        let choices = ChoiceRegistry::new();
        assert!(choices.get_choices("spells").is_empty());
        assert!(!choices.contains("spells", "Bless"));
    }

    #[test]
    fn mutable_view_allows_suppression() {
        let mut choices = ChoiceRegistry::new();
        choices.define_choice("feats", "Alertness", "General");
        choices.define_choice("feats", "Toughness", "General");
        choices.get_choices_mut("feats").remove("Alertness");

        assert!(!choices.contains("feats", "Alertness"));
        assert!(choices.contains("feats", "Toughness"));
    }

    #[test]
    fn empty_categories_are_not_listed() {
        let mut choices = ChoiceRegistry::new();
        choices.define_choice("races", "Dwarf", "");
        choices.get_choices_mut("domains");
        assert_eq!(choices.categories().collect::<Vec<_>>(), vec!["races"]);
    }
}
