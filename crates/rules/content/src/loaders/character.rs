//! Character description loader.
//!
//! A character file records the player's choices; everything else derives
//! from them.
//!
//! ```toml
//! name = "Kethra"
//! race = "Drow"
//! feats = ["Power Attack"]
//! domains = ["Sun", "War"]
//!
//! [abilities]
//! strength = 14
//! charisma = 12
//!
//! [levels]
//! Cleric = 5
//!
//! # Any other base fact, by attribute name.
//! [facts]
//! alignment = "Lawful Evil"
//! "features.Toughness" = true
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use rules_core::{AttrId, Facts, Value};

use crate::loaders::{LoadResult, read_file};

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CharacterSheet {
    pub name: String,
    pub race: Option<String>,
    pub abilities: BTreeMap<String, i64>,
    pub levels: BTreeMap<String, i64>,
    pub feats: Vec<String>,
    pub domains: Vec<String>,
    pub facts: BTreeMap<String, FactValue>,
}

/// A `[facts]` entry. Booleans are stored as `0`/`1`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    Flag(bool),
    Value(Value),
}

impl From<FactValue> for Value {
    fn from(value: FactValue) -> Self {
        match value {
            FactValue::Flag(flag) => Value::from(flag),
            FactValue::Value(value) => value,
        }
    }
}

impl CharacterSheet {
    /// Base facts for a session.
    pub fn facts(&self) -> LoadResult<Facts> {
        let mut facts = Facts::new();
        let mut set = |id: LoadResult<AttrId>, value: Value| -> LoadResult<()> {
            facts.set(id?, value);
            Ok(())
        };

        if let Some(race) = &self.race {
            set(attr(AttrId::root("race"), "race"), Value::from(race.as_str()))?;
        }
        for (ability, score) in &self.abilities {
            set(attr(AttrId::root(ability), ability), Value::Int(*score))?;
        }
        for (class, level) in &self.levels {
            set(attr(AttrId::new("levels", class), class), Value::Int(*level))?;
        }
        for feat in &self.feats {
            set(attr(AttrId::new("feats", feat), feat), Value::TRUE)?;
        }
        for domain in &self.domains {
            set(attr(AttrId::new("domains", domain), domain), Value::TRUE)?;
        }
        for (name, value) in &self.facts {
            set(attr(AttrId::parse(name), name), value.clone().into())?;
        }
        Ok(facts)
    }
}

fn attr<E>(id: Result<AttrId, E>, name: &str) -> LoadResult<AttrId>
where
    E: std::error::Error + Send + Sync + 'static,
{
    id.with_context(|| format!("Invalid character entry '{}'", name))
}

/// Loader for character descriptions from TOML files.
pub struct CharacterLoader;

impl CharacterLoader {
    pub fn load(path: &Path) -> LoadResult<CharacterSheet> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CharacterSheet> {
        toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse character TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KETHRA: &str = r#"
        name = "Kethra"
        race = "Drow"
        feats = ["Power Attack"]
        domains = ["Sun"]

        [abilities]
        strength = 14

        [levels]
        Cleric = 5

        [facts]
        alignment = "Lawful Evil"
        "languages.Undercommon" = 1
        "features.Toughness" = true
        "features.Endurance" = false
    "#;

    #[test]
    fn converts_choices_to_facts() {
        let facts = CharacterLoader::parse(KETHRA).unwrap().facts().unwrap();
        assert_eq!(facts.get("race"), Some(&Value::from("Drow")));
        assert_eq!(facts.get("strength"), Some(&Value::Int(14)));
        assert_eq!(facts.get("levels.Cleric"), Some(&Value::Int(5)));
        assert_eq!(facts.get("feats.Power Attack"), Some(&Value::TRUE));
        assert_eq!(facts.get("domains.Sun"), Some(&Value::TRUE));
        assert_eq!(facts.get("alignment"), Some(&Value::from("Lawful Evil")));
        assert_eq!(facts.get("languages.Undercommon"), Some(&Value::Int(1)));
    }

    #[test]
    fn boolean_facts_are_stored_as_integers() {
        let facts = CharacterLoader::parse(KETHRA).unwrap().facts().unwrap();
        assert_eq!(facts.get("features.Toughness"), Some(&Value::Int(1)));
        assert_eq!(facts.get("features.Endurance"), Some(&Value::Int(0)));
    }

    #[test]
    fn invalid_attribute_names_are_reported() {
        let sheet = CharacterLoader::parse("[facts]\n\"1st\" = 1\n").unwrap();
        let err = sheet.facts().unwrap_err();
        assert!(format!("{:#}", err).contains("1st"));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kethra.toml");
        std::fs::write(&path, KETHRA).unwrap();
        assert_eq!(CharacterLoader::load(&path).unwrap().name, "Kethra");
    }
}
