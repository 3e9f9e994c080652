//! Per-character state.
//!
//! A [`Session`] owns the registered content, the character's base facts and
//! the memoizing evaluator. Content is registered through [`Session::ruleset_mut`]
//! (or before the session is built); every read reflects the current rule
//! store, retractions included.

use std::collections::BTreeMap;

use tracing::warn;

use crate::attr::{AttrError, AttrId, Value};
use crate::error::RulesError;
use crate::eval::{Evaluator, Inputs, ResolveError};
use crate::facts::Facts;
use crate::ruleset::Ruleset;

/// Namespaces whose truthy attributes flag a rules violation.
pub const VIOLATION_NAMESPACES: [&str; 2] = ["validationNotes", "sanityNotes"];

#[derive(Clone, Debug, Default)]
pub struct Session {
    ruleset: Ruleset,
    facts: Facts,
    evaluator: Evaluator,
}

impl Session {
    pub fn new(ruleset: Ruleset) -> Self {
        Self {
            ruleset,
            facts: Facts::new(),
            evaluator: Evaluator::new(),
        }
    }

    pub fn with_facts(ruleset: Ruleset, facts: Facts) -> Self {
        Self {
            ruleset,
            facts,
            evaluator: Evaluator::new(),
        }
    }

    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    pub fn ruleset_mut(&mut self) -> &mut Ruleset {
        &mut self.ruleset
    }

    pub fn facts(&self) -> &Facts {
        &self.facts
    }

    pub fn facts_mut(&mut self) -> &mut Facts {
        &mut self.facts
    }

    /// Records a base fact, returning the previous value.
    pub fn set_fact(
        &mut self,
        attr: &str,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, AttrError> {
        Ok(self.facts.set(AttrId::parse(attr)?, value))
    }

    pub fn clear_fact(&mut self, attr: &str) -> Option<Value> {
        self.facts.clear(attr)
    }

    pub fn resolve(&mut self, attr: &AttrId) -> Result<Option<Value>, ResolveError> {
        self.evaluator
            .resolve(Inputs::new(&self.ruleset.rules, &self.facts), attr)
    }

    /// Every attribute that currently has a value.
    pub fn resolve_all(&mut self) -> Result<BTreeMap<AttrId, Value>, ResolveError> {
        self.evaluator
            .resolve_all(Inputs::new(&self.ruleset.rules, &self.facts))
    }

    /// Renders the note registered for `attr`, `None` when there is none.
    ///
    /// Rendering never fails: a placeholder whose attribute cannot be
    /// resolved renders empty.
    pub fn render_note(&mut self, attr: &AttrId) -> Option<String> {
        let Self {
            ruleset,
            facts,
            evaluator,
        } = self;
        let inputs = Inputs::new(&ruleset.rules, facts);
        ruleset.notes.render(attr, |id| {
            evaluator.resolve(inputs, id).unwrap_or_else(|err| {
                warn!(
                    note = %attr,
                    attr = %id,
                    code = err.error_code(),
                    severity = err.severity().as_str(),
                    error = %err,
                    "note placeholder unresolved"
                );
                None
            })
        })
    }

    /// Notes whose attribute currently has a truthy value, rendered.
    pub fn active_notes(&mut self) -> Result<BTreeMap<AttrId, String>, ResolveError> {
        let attrs: Vec<AttrId> = self.ruleset.notes.iter().map(|(id, _)| id.clone()).collect();
        let mut active = BTreeMap::new();
        for attr in attrs {
            if !self.resolve(&attr)?.is_some_and(|v| v.is_truthy()) {
                continue;
            }
            if let Some(text) = self.render_note(&attr) {
                active.insert(attr, text);
            }
        }
        Ok(active)
    }

    /// `validationNotes.*` and `sanityNotes.*` attributes with a truthy value.
    pub fn violations(&mut self) -> Result<Vec<AttrId>, ResolveError> {
        Ok(self
            .resolve_all()?
            .into_iter()
            .filter(|(attr, value)| {
                VIOLATION_NAMESPACES.contains(&attr.namespace()) && value.is_truthy()
            })
            .map(|(attr, _)| attr)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(name: &str) -> AttrId {
        AttrId::parse(name).unwrap()
    }

    fn cleric() -> Session {
        let mut ruleset = Ruleset::new();
        ruleset
            .define_rule("features.Turn Undead", "levels.Cleric", "=", "1")
            .unwrap();
        ruleset
            .define_rule("magicNotes.turnUndead", "features.Turn Undead", "=", "3")
            .unwrap();
        ruleset
            .define_rule("magicNotes.turnUndead.1", "levels.Cleric", "=", "source * 3 - 10")
            .unwrap();
        ruleset
            .define_note(["magicNotes.turnUndead:%V/day, max HD %1"])
            .unwrap();
        Session::new(ruleset)
    }

    #[test]
    fn notes_follow_facts() {
        let mut session = cleric();
        assert!(session.active_notes().unwrap().is_empty());

        session.set_fact("levels.Cleric", 5).unwrap();
        let notes = session.active_notes().unwrap();
        assert_eq!(
            notes.get("magicNotes.turnUndead").map(String::as_str),
            Some("3/day, max HD 5")
        );
    }

    #[test]
    fn render_note_survives_cycles() {
        let mut session = cleric();
        session.set_fact("levels.Cleric", 1).unwrap();
        session
            .ruleset_mut()
            .define_rule("magicNotes.turnUndead.1", "magicNotes.turnUndead.1", "+", "1")
            .unwrap();
        assert_eq!(
            session.render_note(&attr("magicNotes.turnUndead")).as_deref(),
            Some("3/day, max HD ")
        );
    }

    #[test]
    fn violations_are_truthy_validation_attributes() {
        let mut ruleset = Ruleset::new();
        ruleset
            .define_rule(
                "validationNotes.powerAttackFeatStrength",
                "feats.Power Attack",
                "=",
                "{strength} < 13",
            )
            .unwrap();
        ruleset
            .define_rule("sanityNotes.dodgeFeat", "feats.Dodge", "=", "0")
            .unwrap();
        let mut session = Session::new(ruleset);
        session.set_fact("feats.Power Attack", 1).unwrap();
        session.set_fact("feats.Dodge", 1).unwrap();
        session.set_fact("strength", 10).unwrap();

        assert_eq!(
            session.violations().unwrap(),
            vec![attr("validationNotes.powerAttackFeatStrength")]
        );

        session.set_fact("strength", 14).unwrap();
        assert!(session.violations().unwrap().is_empty());
    }

    #[test]
    fn removed_note_is_no_longer_rendered() {
        let mut session = cleric();
        session.set_fact("levels.Cleric", 5).unwrap();
        let turn_undead = attr("magicNotes.turnUndead");
        assert!(session.active_notes().unwrap().contains_key(&turn_undead));

        assert_eq!(
            session.ruleset_mut().remove_note("magicNotes.turnUndead").as_deref(),
            Some("%V/day, max HD %1")
        );
        assert!(session.active_notes().unwrap().is_empty());
        assert_eq!(session.render_note(&turn_undead), None);
        assert_eq!(session.resolve(&turn_undead).unwrap(), Some(Value::Int(3)));

        assert_eq!(session.ruleset_mut().remove_note("magicNotes.turnUndead"), None);
    }
}
