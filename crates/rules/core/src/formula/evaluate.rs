//! Formula evaluation logic.
//!
//! Unset is a first-class result: a formula evaluates to `Option<Value>`.
//! Inside arithmetic and comparisons an unset side counts as `0` as long as
//! the other side is defined, which is how a reference to an attribute that
//! never received a value degrades to "no contribution".

use crate::attr::{AttrId, Value};
use crate::formula::{BinaryOp, Expr};

/// Inputs available to a formula while one fold step is applied.
pub struct FormulaContext<'a> {
    /// Value of the matched source attribute.
    pub source: Option<&'a Value>,
    /// Value accumulated so far for the target.
    pub current: Option<&'a Value>,
    /// Resolved value of any other attribute.
    pub lookup: &'a dyn Fn(&AttrId) -> Option<Value>,
}

// ============================================================================
// Formula Evaluation
// ============================================================================

/// Evaluate a formula to an optional value.
///
/// ## Semantics
/// - `Null` and undefined references are unset
/// - `Add` concatenates when either side is text
/// - `Div`/`Rem` round toward negative infinity; division by zero is unset
/// - Comparisons and logic produce `0`/`1`
/// - `Min`/`Max` ignore unset arguments and are unset when all are
pub fn evaluate(expr: &Expr, ctx: &FormulaContext<'_>) -> Option<Value> {
    match expr {
        Expr::Lit(value) => Some(value.clone()),
        Expr::Null => None,
        Expr::Source => ctx.source.cloned(),
        Expr::Current => ctx.current.cloned(),
        Expr::Attr(id) => (ctx.lookup)(id),

        Expr::Neg(inner) => evaluate(inner, ctx).map(|v| Value::Int(v.as_int().saturating_neg())),
        Expr::Not(inner) => Some(Value::from(
            !evaluate(inner, ctx).is_some_and(|v| v.is_truthy()),
        )),

        Expr::Binary { op, lhs, rhs } => binary(*op, evaluate(lhs, ctx), evaluate(rhs, ctx)),

        Expr::Cond {
            cond,
            then,
            otherwise,
        } => {
            if evaluate(cond, ctx).is_some_and(|v| v.is_truthy()) {
                evaluate(then, ctx)
            } else {
                evaluate(otherwise, ctx)
            }
        }

        Expr::Min(items) => items
            .iter()
            .filter_map(|item| evaluate(item, ctx))
            .reduce(Value::min),

        Expr::Max(items) => items
            .iter()
            .filter_map(|item| evaluate(item, ctx))
            .reduce(Value::max),
    }
}

fn binary(op: BinaryOp, lhs: Option<Value>, rhs: Option<Value>) -> Option<Value> {
    let zero = Value::Int(0);
    let (lhs, rhs) = match (lhs, rhs) {
        (None, None) if is_arithmetic(op) => return None,
        (lhs, rhs) => (lhs.unwrap_or_else(|| zero.clone()), rhs.unwrap_or(zero)),
    };

    match op {
        BinaryOp::Add => Some(lhs.add(&rhs)),
        BinaryOp::Sub => Some(Value::Int(lhs.as_int().saturating_sub(rhs.as_int()))),
        BinaryOp::Mul => Some(lhs.mul(&rhs)),
        BinaryOp::Div => floor_div(lhs.as_int(), rhs.as_int()).map(Value::Int),
        BinaryOp::Rem => floor_div(lhs.as_int(), rhs.as_int())
            .map(|q| Value::Int(lhs.as_int() - q.saturating_mul(rhs.as_int()))),
        BinaryOp::Eq => Some(Value::from(lhs == rhs)),
        BinaryOp::Ne => Some(Value::from(lhs != rhs)),
        BinaryOp::Lt => Some(Value::from(lhs < rhs)),
        BinaryOp::Le => Some(Value::from(lhs <= rhs)),
        BinaryOp::Gt => Some(Value::from(lhs > rhs)),
        BinaryOp::Ge => Some(Value::from(lhs >= rhs)),
        BinaryOp::And => Some(Value::from(lhs.is_truthy() && rhs.is_truthy())),
        BinaryOp::Or => Some(Value::from(lhs.is_truthy() || rhs.is_truthy())),
    }
}

fn is_arithmetic(op: BinaryOp) -> bool {
    matches!(
        op,
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem
    )
}

/// Integer division rounding toward negative infinity (d20 "round down").
fn floor_div(a: i64, b: i64) -> Option<i64> {
    let q = a.checked_div(b)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        Some(q - 1)
    } else {
        Some(q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::parse;

    fn eval_with(text: &str, source: Option<Value>, current: Option<Value>) -> Option<Value> {
        let expr = parse(text).unwrap();
        let lookup = |id: &AttrId| match id.as_str() {
            "levels.Cleric" => Some(Value::Int(5)),
            "race" => Some(Value::from("Drow")),
            _ => None,
        };
        let ctx = FormulaContext {
            source: source.as_ref(),
            current: current.as_ref(),
            lookup: &lookup,
        };
        evaluate(&expr, &ctx)
    }

    fn eval(text: &str) -> Option<Value> {
        eval_with(text, None, None)
    }

    #[test]
    fn arithmetic_rounds_down() {
        assert_eq!(eval("(7 - 10) / 2"), Some(Value::Int(-2)));
        assert_eq!(eval("(15 - 10) / 2"), Some(Value::Int(2)));
        assert_eq!(eval("7 % 3"), Some(Value::Int(1)));
        assert_eq!(eval("-7 % 3"), Some(Value::Int(2)));
        assert_eq!(eval("1 / 0"), None);
    }

    #[test]
    fn source_and_current_are_bound() {
        assert_eq!(
            eval_with("source * 3 / 4", Some(Value::Int(8)), None),
            Some(Value::Int(6))
        );
        assert_eq!(
            eval_with("value + source", Some(Value::Int(2)), Some(Value::Int(10))),
            Some(Value::Int(12))
        );
    }

    #[test]
    fn unknown_attributes_count_as_zero_inside_arithmetic() {
        assert_eq!(eval("{levels.Wizard} + 2"), Some(Value::Int(2)));
        assert_eq!(eval("{levels.Wizard}"), None);
        assert_eq!(eval("{levels.Wizard} + {levels.Sorcerer}"), None);
        assert_eq!(eval("{levels.Wizard} >= 1"), Some(Value::Int(0)));
    }

    #[test]
    fn ternary_and_text_comparison() {
        assert_eq!(eval("{race} == \"Drow\" ? 120 : 60"), Some(Value::Int(120)));
        assert_eq!(eval("{levels.Cleric} >= 5 ? 1 : null"), Some(Value::Int(1)));
        assert_eq!(eval("{levels.Cleric} >= 6 ? 1 : null"), None);
    }

    #[test]
    fn min_max_ignore_unset() {
        assert_eq!(eval("max(1, {levels.Wizard})"), Some(Value::Int(1)));
        assert_eq!(eval("min({levels.Cleric}, 3)"), Some(Value::Int(3)));
        assert_eq!(eval("max({levels.Wizard}, null)"), None);
    }

    #[test]
    fn logic_uses_truthiness() {
        assert_eq!(eval("{levels.Cleric} && !{levels.Wizard}"), Some(Value::Int(1)));
        assert_eq!(eval("null || 0"), Some(Value::Int(0)));
    }
}
