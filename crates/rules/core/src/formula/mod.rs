//! Formula system for rule operands.
//!
//! Formulas let a rule edge compute its contribution from:
//! - The matched source attribute (`source`)
//! - The value accumulated so far for the target (`value`)
//! - Any other attribute (`{levels.Cleric}`)
//! - Arithmetic, comparison, logic, ternary and `min`/`max` combinations
//!
//! The vocabulary is fixed; formulas are data, never evaluated as code.
//!
//! ## Examples
//!
//! ```text
//! source * 3 / 4                       three-quarter base attack progression
//! source >= 5 ? 1 : null               feature unlocked at level 5
//! max(1, {charismaModifier} + 3)       turning attempts, at least one
//! ```

mod evaluate;
mod parse;

pub use evaluate::{FormulaContext, evaluate};
pub use parse::parse;

use crate::attr::{AttrError, AttrId, Value};
use crate::error::{ErrorSeverity, RulesError};

/// Errors raised while parsing a formula.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormulaError {
    #[error("formula parse error: {0}")]
    Parse(String),

    #[error("integer literal '{0}' out of range")]
    IntegerOutOfRange(String),

    #[error("formula references an invalid attribute: {0}")]
    Attr(#[from] AttrError),
}

impl RulesError for FormulaError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "formula_parse",
            Self::IntegerOutOfRange(_) => "formula_integer_out_of_range",
            Self::Attr(e) => e.error_code(),
        }
    }
}

/// Binary operators of the formula language.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    /// Division rounding toward negative infinity.
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

// ============================================================================
// Formula Definition
// ============================================================================

/// Restricted expression evaluated for a rule operand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    /// Fixed literal value.
    Lit(Value),

    /// Explicitly unset.
    Null,

    /// Value of the matched source attribute.
    Source,

    /// Value accumulated so far for the rule's target.
    Current,

    /// Value of another attribute (a dependency of the target).
    Attr(AttrId),

    Neg(Box<Expr>),

    Not(Box<Expr>),

    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },

    /// `cond ? then : otherwise`
    Cond {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },

    /// Minimum of the defined sub-expressions.
    Min(Vec<Expr>),

    /// Maximum of the defined sub-expressions.
    Max(Vec<Expr>),
}

impl Expr {
    pub fn lit(value: impl Into<Value>) -> Self {
        Expr::Lit(value.into())
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn cond(cond: Expr, then: Expr, otherwise: Expr) -> Self {
        Expr::Cond {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    /// Attributes referenced through `{...}`, in first-appearance order.
    pub fn references(&self) -> Vec<&AttrId> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a AttrId>) {
        match self {
            Expr::Attr(id) => {
                if !out.contains(&id) {
                    out.push(id);
                }
            }
            Expr::Neg(inner) | Expr::Not(inner) => inner.collect_references(out),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_references(out);
                rhs.collect_references(out);
            }
            Expr::Cond {
                cond,
                then,
                otherwise,
            } => {
                cond.collect_references(out);
                then.collect_references(out);
                otherwise.collect_references(out);
            }
            Expr::Min(items) | Expr::Max(items) => {
                for item in items {
                    item.collect_references(out);
                }
            }
            Expr::Lit(_) | Expr::Null | Expr::Source | Expr::Current => {}
        }
    }
}
