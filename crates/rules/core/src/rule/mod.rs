//! Rule edges and the store that holds them.
//!
//! A rule edge says "fold this operand, computed from that source, into this
//! target with this operator". Content loaders register edges; specializing
//! loaders retract edges a generic loader registered before installing their
//! own.

mod operator;
mod store;

pub use operator::{Operator, Step};
pub use store::{ChangeLog, RuleStore};

use core::fmt;
use core::str::FromStr;

use crate::attr::{AttrError, AttrId, Value};
use crate::error::{ErrorSeverity, RulesError};
use crate::formula::{self, Expr, FormulaError};
use crate::selector::{Selector, SelectorError};

/// Errors raised while registering or retracting rules.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("invalid rule target: {0}")]
    Target(#[from] AttrError),

    #[error("invalid rule source: {0}")]
    Source(#[from] SelectorError),

    #[error("unknown rule operator '{0}'")]
    Operator(String),

    #[error("invalid rule operand '{text}': {source}")]
    Operand {
        text: String,
        #[source]
        source: FormulaError,
    },
}

impl RulesError for RuleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Target(_) => "rule_invalid_target",
            Self::Source(_) => "rule_invalid_source",
            Self::Operator(_) => "rule_unknown_operator",
            Self::Operand { .. } => "rule_invalid_operand",
        }
    }
}

/// Identifies the loader/content item that registered an edge.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegistrationId(String);

impl RegistrationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Conventional `<category>:<key>` id used by content loaders.
    pub fn content(category: &str, key: &str) -> Self {
        Self(format!("{category}:{key}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A rule edge operand: a literal value or a formula.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    Literal(Value),
    Formula(Expr),
}

impl Operand {
    /// Parses operand text. Bare integers and quoted strings become literals;
    /// everything else is parsed as a formula.
    ///
    /// ```
    /// # use rules_core::{Operand, Value};
    /// assert_eq!(Operand::parse("60").unwrap(), Operand::Literal(Value::Int(60)));
    /// assert!(matches!(Operand::parse("source * 2").unwrap(), Operand::Formula(_)));
    /// ```
    pub fn parse(text: &str) -> Result<Self, FormulaError> {
        match formula::parse(text)? {
            Expr::Lit(value) => Ok(Operand::Literal(value)),
            Expr::Neg(inner) => match *inner {
                Expr::Lit(Value::Int(n)) => Ok(Operand::Literal(Value::Int(-n))),
                other => Ok(Operand::Formula(Expr::Neg(Box::new(other)))),
            },
            expr => Ok(Operand::Formula(expr)),
        }
    }

    /// Attributes a formula operand reads besides the edge source.
    pub fn references(&self) -> Vec<&AttrId> {
        match self {
            Operand::Literal(_) => Vec::new(),
            Operand::Formula(expr) => expr.references(),
        }
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Literal(value)
    }
}

impl From<i64> for Operand {
    fn from(value: i64) -> Self {
        Operand::Literal(Value::Int(value))
    }
}

impl From<Expr> for Operand {
    fn from(value: Expr) -> Self {
        Operand::Formula(value)
    }
}

/// One registered contribution to a target attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleEdge {
    pub target: AttrId,
    pub source: Selector,
    pub operator: Operator,
    pub operand: Operand,
    pub registration: RegistrationId,
    /// Store-wide registration order; edges of one target fold in ascending order.
    pub sequence: u64,
}

/// Parsed, not yet registered, form of `(target, source, operator, operand)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleSpec {
    pub target: AttrId,
    pub source: Selector,
    pub operator: Operator,
    pub operand: Operand,
}

impl RuleSpec {
    pub fn parse(target: &str, source: &str, operator: &str, operand: &str) -> Result<Self, RuleError> {
        Ok(Self {
            target: AttrId::parse(target)?,
            source: Selector::parse(source)?,
            operator: Operator::from_str(operator)
                .map_err(|_| RuleError::Operator(operator.to_owned()))?,
            operand: Operand::parse(operand).map_err(|source| RuleError::Operand {
                text: operand.to_owned(),
                source,
            })?,
        })
    }
}
