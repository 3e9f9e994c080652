//! Attribute resolution.
//!
//! The evaluator folds each target's edges, in registration order, through
//! the operator semantics, after resolving everything those edges read.
//! Results are memoized. Mutations of the rule store or the facts are picked
//! up lazily from their change logs on the next read: the touched attribute
//! and everything that (transitively) read it are evicted, including
//! attributes whose pattern selectors match a created or removed name.
//!
//! ```text
//! resolve(A)
//!   ├─ sync change logs → evict stale memo entries
//!   ├─ Tarjan over unresolved dependencies → order (or fatal cycle)
//!   └─ fold each attribute in order → memo
//! ```

mod graph;

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use crate::attr::{AttrId, Value};
use crate::error::{ErrorSeverity, RulesError};
use crate::facts::Facts;
use crate::formula::{FormulaContext, evaluate};
use crate::rule::{Operand, RuleStore, Step};
use crate::selector::{AttrPattern, Selector};

/// Errors surfaced while resolving attributes.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("dependency cycle among attributes: {}", join(.attributes))]
    Cycle { attributes: Vec<AttrId> },
}

fn join(attributes: &[AttrId]) -> String {
    attributes
        .iter()
        .map(AttrId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl RulesError for ResolveError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Cycle { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Cycle { .. } => "resolve_cycle",
        }
    }
}

/// Read-only view of the state an evaluation pass works from.
#[derive(Clone, Copy)]
pub struct Inputs<'a> {
    pub rules: &'a RuleStore,
    pub facts: &'a Facts,
}

impl<'a> Inputs<'a> {
    pub fn new(rules: &'a RuleStore, facts: &'a Facts) -> Self {
        Self { rules, facts }
    }

    /// Attributes that exist right now: every rule target and every fact.
    pub fn known(&self) -> BTreeSet<&'a AttrId> {
        self.rules
            .targets()
            .chain(self.facts.iter().map(|(attr, _)| attr))
            .collect()
    }
}

#[derive(Clone, Debug)]
struct Memo {
    value: Option<Value>,
    patterns: Vec<AttrPattern>,
}

/// What one attribute reads during its fold.
struct Dependencies {
    reads: Vec<AttrId>,
    patterns: Vec<AttrPattern>,
}

/// Memoizing attribute resolver.
#[derive(Clone, Debug, Default)]
pub struct Evaluator {
    memo: BTreeMap<AttrId, Memo>,
    /// Attribute → memoized attributes that read it.
    readers: BTreeMap<AttrId, BTreeSet<AttrId>>,
    rules_cursor: usize,
    facts_cursor: usize,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves one attribute; unset when no edge produced a value or a gate closed.
    pub fn resolve(
        &mut self,
        inputs: Inputs<'_>,
        attr: &AttrId,
    ) -> Result<Option<Value>, ResolveError> {
        self.sync(inputs);
        self.resolve_synced(inputs, &inputs.known(), attr)
    }

    /// Resolves every attribute that has an edge or a fact. Unset attributes are omitted.
    pub fn resolve_all(
        &mut self,
        inputs: Inputs<'_>,
    ) -> Result<BTreeMap<AttrId, Value>, ResolveError> {
        self.sync(inputs);
        let known = inputs.known();
        let mut sheet = BTreeMap::new();
        for attr in &known {
            if let Some(value) = self.resolve_synced(inputs, &known, attr)? {
                sheet.insert((*attr).clone(), value);
            }
        }
        Ok(sheet)
    }

    fn resolve_synced(
        &mut self,
        inputs: Inputs<'_>,
        known: &BTreeSet<&AttrId>,
        attr: &AttrId,
    ) -> Result<Option<Value>, ResolveError> {
        if let Some(memo) = self.memo.get(attr) {
            return Ok(memo.value.clone());
        }

        let order = graph::resolution_order(
            attr,
            |a| self.memo.contains_key(a),
            |a| dependencies(inputs, known, a).reads,
        )
        .map_err(|attributes| {
            debug!(cycle = %join(&attributes), "dependency cycle");
            ResolveError::Cycle { attributes }
        })?;

        for next in order {
            let deps = dependencies(inputs, known, &next);
            let value = fold(inputs, known, &self.memo, &next);
            for read in deps.reads {
                self.readers.entry(read).or_default().insert(next.clone());
            }
            self.memo.insert(
                next,
                Memo {
                    value,
                    patterns: deps.patterns,
                },
            );
        }

        Ok(self.memo.get(attr).and_then(|memo| memo.value.clone()))
    }

    /// Evicts memo entries made stale by rule or fact changes since the last read.
    fn sync(&mut self, inputs: Inputs<'_>) {
        let (rule_changes, rules_cursor) = inputs.rules.changes().since(self.rules_cursor);
        let (fact_changes, facts_cursor) = inputs.facts.changes().since(self.facts_cursor);
        self.rules_cursor = rules_cursor;
        self.facts_cursor = facts_cursor;

        let mut pending: Vec<AttrId> = rule_changes.iter().chain(fact_changes).cloned().collect();
        if pending.is_empty() {
            return;
        }

        // Memoized attributes with pattern selectors; eviction never adds any.
        let watchers: Vec<(AttrId, Vec<AttrPattern>)> = self
            .memo
            .iter()
            .filter(|(_, memo)| !memo.patterns.is_empty())
            .map(|(attr, memo)| (attr.clone(), memo.patterns.clone()))
            .collect();

        let mut seen = BTreeSet::new();
        while let Some(name) = pending.pop() {
            if !seen.insert(name.clone()) {
                continue;
            }
            if self.memo.remove(&name).is_some() {
                trace!(attr = %name, "memo evicted");
            }
            if let Some(readers) = self.readers.remove(&name) {
                pending.extend(readers);
            }
            pending.extend(
                watchers
                    .iter()
                    .filter(|(_, patterns)| patterns.iter().any(|p| p.is_match(&name)))
                    .map(|(attr, _)| attr.clone()),
            );
        }
    }
}

/// Attributes `attr`'s edges read: literal sources, pattern matches among
/// known attributes (never `attr` itself), and formula references.
fn dependencies(inputs: Inputs<'_>, known: &BTreeSet<&AttrId>, attr: &AttrId) -> Dependencies {
    let mut reads = Vec::new();
    let mut patterns = Vec::new();
    let push = |id: &AttrId, reads: &mut Vec<AttrId>| {
        if !reads.contains(id) {
            reads.push(id.clone());
        }
    };

    for edge in inputs.rules.edges(attr.as_str()) {
        match &edge.source {
            Selector::Attr(id) => push(id, &mut reads),
            Selector::Pattern(pattern) => {
                for id in matching(known, pattern, attr) {
                    push(id, &mut reads);
                }
                patterns.push(pattern.clone());
            }
        }
        for id in edge.operand.references() {
            push(id, &mut reads);
        }
    }

    Dependencies { reads, patterns }
}

fn matching<'k>(
    known: &'k BTreeSet<&AttrId>,
    pattern: &'k AttrPattern,
    target: &'k AttrId,
) -> impl Iterator<Item = &'k AttrId> {
    known
        .iter()
        .copied()
        .filter(move |id| *id != target && pattern.is_match(id))
}

/// Folds `attr`'s edges. Every dependency is already memoized.
fn fold(
    inputs: Inputs<'_>,
    known: &BTreeSet<&AttrId>,
    memo: &BTreeMap<AttrId, Memo>,
    attr: &AttrId,
) -> Option<Value> {
    let value_of = |id: &AttrId| memo.get(id).and_then(|m| m.value.clone());
    let mut acc = inputs.facts.get(attr.as_str()).cloned();

    for edge in inputs.rules.edges(attr.as_str()) {
        let sources: Vec<Option<Value>> = match &edge.source {
            Selector::Attr(id) => vec![value_of(id)],
            Selector::Pattern(pattern) => matching(known, pattern, attr)
                .filter_map(|id| value_of(id))
                .map(Some)
                .collect(),
        };

        for source in sources {
            let operand = source.as_ref().and_then(|source| match &edge.operand {
                Operand::Literal(value) => Some(value.clone()),
                Operand::Formula(expr) => evaluate(
                    expr,
                    &FormulaContext {
                        source: Some(source),
                        current: acc.as_ref(),
                        lookup: &value_of,
                    },
                ),
            });

            trace!(
                attr = %attr,
                sequence = edge.sequence,
                operator = %edge.operator,
                operand = ?operand,
                "fold step"
            );

            match edge.operator.apply(acc, operand) {
                Step::Continue(next) => acc = next,
                Step::Abort => {
                    debug!(attr = %attr, source = %edge.source, "gate closed");
                    return None;
                }
            }
        }
    }

    acc
}
