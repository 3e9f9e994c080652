use std::collections::BTreeMap;

use tracing::debug;

use super::{Operand, Operator, RegistrationId, RuleEdge, RuleError, RuleSpec};
use crate::attr::AttrId;
use crate::selector::Selector;

/// Append-only log of attributes whose definition changed.
///
/// Readers keep a cursor into the log and invalidate whatever was touched
/// since their last read.
#[derive(Clone, Debug, Default)]
pub struct ChangeLog {
    entries: Vec<AttrId>,
}

impl ChangeLog {
    pub fn record(&mut self, attr: AttrId) {
        self.entries.push(attr);
    }

    /// Entries recorded after `cursor`, and the cursor to use next time.
    pub fn since(&self, cursor: usize) -> (&[AttrId], usize) {
        let start = cursor.min(self.entries.len());
        (&self.entries[start..], self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rule edges grouped by target, in registration order.
#[derive(Clone, Debug, Default)]
pub struct RuleStore {
    edges: BTreeMap<AttrId, Vec<RuleEdge>>,
    next_sequence: u64,
    registration: RegistrationId,
    changes: ChangeLog,
}

impl RuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registration id attached to subsequently defined edges.
    pub fn set_registration(&mut self, registration: RegistrationId) -> RegistrationId {
        core::mem::replace(&mut self.registration, registration)
    }

    pub fn registration(&self) -> &RegistrationId {
        &self.registration
    }

    /// Parses and registers `target <- source op operand`.
    ///
    /// ```
    /// # use rules_core::RuleStore;
    /// let mut rules = RuleStore::new();
    /// rules.define_rule("featureNotes.darkvisionFeature", "features.Darkvision", "=", "60").unwrap();
    /// assert_eq!(rules.edges("featureNotes.darkvisionFeature").len(), 1);
    /// ```
    pub fn define_rule(
        &mut self,
        target: &str,
        source: &str,
        operator: &str,
        operand: &str,
    ) -> Result<u64, RuleError> {
        Ok(self.insert(RuleSpec::parse(target, source, operator, operand)?))
    }

    /// Registers a parsed rule and returns its sequence number.
    pub fn insert(&mut self, spec: RuleSpec) -> u64 {
        self.push(spec.target, spec.source, spec.operator, spec.operand)
    }

    /// Typed registration.
    pub fn push(
        &mut self,
        target: AttrId,
        source: Selector,
        operator: Operator,
        operand: Operand,
    ) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        debug!(
            attr = %target,
            source = %source,
            operator = %operator,
            registration = %self.registration,
            sequence,
            "rule defined"
        );

        self.changes.record(target.clone());
        self.edges.entry(target.clone()).or_default().push(RuleEdge {
            target,
            source,
            operator,
            operand,
            registration: self.registration.clone(),
            sequence,
        });
        sequence
    }

    /// Removes every edge with exactly this target and source, whoever registered it.
    ///
    /// Returns the number of removed edges; removing nothing is not an error.
    pub fn delete_rule(&mut self, target: &str, source: &str) -> Result<usize, RuleError> {
        let target = AttrId::parse(target)?;
        let source = Selector::parse(source)?;
        Ok(self.remove(&target, &source))
    }

    /// Typed retraction.
    pub fn remove(&mut self, target: &AttrId, source: &Selector) -> usize {
        let Some(edges) = self.edges.get_mut(target) else {
            return 0;
        };

        let before = edges.len();
        edges.retain(|edge| &edge.source != source);
        let removed = before - edges.len();
        if edges.is_empty() {
            self.edges.remove(target);
        }

        if removed > 0 {
            debug!(attr = %target, source = %source, removed, "rule retracted");
            self.changes.record(target.clone());
        }
        removed
    }

    /// Removes every edge a registration created.
    pub fn delete_registration(&mut self, registration: &RegistrationId) -> usize {
        let mut removed = 0;
        let mut touched = Vec::new();
        self.edges.retain(|target, edges| {
            let before = edges.len();
            edges.retain(|edge| &edge.registration != registration);
            if edges.len() != before {
                removed += before - edges.len();
                touched.push(target.clone());
            }
            !edges.is_empty()
        });

        for target in touched {
            self.changes.record(target);
        }
        if removed > 0 {
            debug!(registration = %registration, removed, "registration retracted");
        }
        removed
    }

    /// Edges targeting `target`, in ascending sequence order.
    pub fn edges(&self, target: &str) -> &[RuleEdge] {
        self.edges.get(target).map(Vec::as_slice).unwrap_or_default()
    }

    /// Attributes with at least one edge, in name order.
    pub fn targets(&self) -> impl Iterator<Item = &AttrId> {
        self.edges.keys()
    }

    pub fn is_target(&self, attr: &str) -> bool {
        self.edges.contains_key(attr)
    }

    pub fn len(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn changes(&self) -> &ChangeLog {
        &self.changes
    }
}
