//! Attribute derivation engine for d20 character sheets.
//!
//! `rules-core` computes a character's final attributes (armor class, saves,
//! turning frequency, feature notes, …) from a sparse set of base facts by
//! folding many small, independently registered rule edges. Content crates
//! register choices, edges and notes into a [`Ruleset`]; a [`Session`] pairs
//! that ruleset with a character's [`Facts`] and resolves attributes on
//! demand. The crate performs no I/O.
pub mod attr;
pub mod choice;
pub mod error;
pub mod eval;
pub mod facts;
pub mod formula;
pub mod note;
pub mod rule;
pub mod ruleset;
pub mod selector;
pub mod session;

pub use attr::{AttrError, AttrId, Value};
pub use choice::{ChoiceRegistry, ChoiceTable};
pub use error::{ErrorSeverity, RulesError};
pub use eval::{Evaluator, Inputs, ResolveError};
pub use facts::Facts;
pub use formula::{BinaryOp, Expr, FormulaError};
pub use note::{NoteCatalog, NoteError, render_template};
pub use rule::{
    ChangeLog, Operand, Operator, RegistrationId, RuleEdge, RuleError, RuleSpec, RuleStore, Step,
};
pub use ruleset::Ruleset;
pub use selector::{AttrPattern, Selector, SelectorError};
pub use session::{Session, VIOLATION_NAMESPACES};
