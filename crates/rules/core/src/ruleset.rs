//! Everything content loaders register: choices, rule edges and notes.

use crate::choice::{ChoiceRegistry, ChoiceTable};
use crate::note::{NoteCatalog, NoteError};
use crate::rule::{RegistrationId, RuleError, RuleStore};

#[derive(Clone, Debug, Default)]
pub struct Ruleset {
    pub choices: ChoiceRegistry,
    pub rules: RuleStore,
    pub notes: NoteCatalog,
}

impl Ruleset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define_choice(
        &mut self,
        category: &str,
        key: impl Into<String>,
        descriptor: impl Into<String>,
    ) {
        self.choices.define_choice(category, key, descriptor);
    }

    pub fn get_choices(&self, category: &str) -> &ChoiceTable {
        self.choices.get_choices(category)
    }

    pub fn get_choices_mut(&mut self, category: &str) -> &mut ChoiceTable {
        self.choices.get_choices_mut(category)
    }

    /// Registers an edge under the current registration scope.
    pub fn define_rule(
        &mut self,
        target: &str,
        source: &str,
        operator: &str,
        operand: &str,
    ) -> Result<u64, RuleError> {
        self.rules.define_rule(target, source, operator, operand)
    }

    /// Registers an edge tagged with an explicit registration id.
    pub fn define_rule_as(
        &mut self,
        registration: &RegistrationId,
        target: &str,
        source: &str,
        operator: &str,
        operand: &str,
    ) -> Result<u64, RuleError> {
        let previous = self.rules.set_registration(registration.clone());
        let result = self.rules.define_rule(target, source, operator, operand);
        self.rules.set_registration(previous);
        result
    }

    pub fn delete_rule(&mut self, target: &str, source: &str) -> Result<usize, RuleError> {
        self.rules.delete_rule(target, source)
    }

    pub fn delete_registration(&mut self, registration: &RegistrationId) -> usize {
        self.rules.delete_registration(registration)
    }

    pub fn define_note<I, S>(&mut self, notes: I) -> Result<(), NoteError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.notes.define_note(notes)
    }

    pub fn remove_note(&mut self, attr: &str) -> Option<String> {
        self.notes.remove(attr)
    }

    /// Runs `f` with every edge it defines tagged as `registration`.
    ///
    /// The previous scope is restored afterwards, also when `f` fails.
    pub fn registering<T, E>(
        &mut self,
        registration: RegistrationId,
        f: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<T, E> {
        let previous = self.rules.set_registration(registration);
        let result = f(self);
        self.rules.set_registration(previous);
        result
    }
}
