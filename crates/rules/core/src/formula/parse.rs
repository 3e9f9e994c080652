use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

use super::{BinaryOp, Expr, FormulaError};
use crate::attr::{AttrId, Value};

// ── Pest parser derive ─────────────────────────────────────

#[derive(Parser)]
#[grammar = "src/formula/grammar.pest"]
struct FormulaParser;

impl From<pest::error::Error<Rule>> for FormulaError {
    fn from(e: pest::error::Error<Rule>) -> Self {
        Self::Parse(e.to_string())
    }
}

// ── Public entry point ────────────────────────────────────

/// Parse formula text into an [`Expr`].
///
/// ```
/// # use rules_core::formula::{parse, Expr};
/// let expr = parse("source >= 5 ? 1 : null").unwrap();
/// assert!(matches!(expr, Expr::Cond { .. }));
/// ```
pub fn parse(input: &str) -> Result<Expr, FormulaError> {
    let formula = FormulaParser::parse(Rule::formula, input)?
        .next()
        .ok_or_else(|| FormulaError::Parse("empty input".into()))?;

    let expr = formula
        .into_inner()
        .next()
        .ok_or_else(|| FormulaError::Parse("empty formula".into()))?;

    parse_expr(expr)
}

// ── Precedence levels ─────────────────────────────────────

fn parse_expr(pair: Pair<Rule>) -> Result<Expr, FormulaError> {
    let mut inner = pair.into_inner();
    let cond = parse_or(next(&mut inner, "or_expr")?)?;
    match inner.next() {
        None => Ok(cond),
        Some(then) => {
            let then = parse_expr(then)?;
            let otherwise = parse_expr(next(&mut inner, "ternary else")?)?;
            Ok(Expr::cond(cond, then, otherwise))
        }
    }
}

fn parse_or(pair: Pair<Rule>) -> Result<Expr, FormulaError> {
    let mut inner = pair.into_inner();
    let mut result = parse_and(next(&mut inner, "and_expr")?)?;
    for next_pair in inner {
        result = Expr::binary(BinaryOp::Or, result, parse_and(next_pair)?);
    }
    Ok(result)
}

fn parse_and(pair: Pair<Rule>) -> Result<Expr, FormulaError> {
    let mut inner = pair.into_inner();
    let mut result = parse_cmp(next(&mut inner, "cmp_expr")?)?;
    for next_pair in inner {
        result = Expr::binary(BinaryOp::And, result, parse_cmp(next_pair)?);
    }
    Ok(result)
}

fn parse_cmp(pair: Pair<Rule>) -> Result<Expr, FormulaError> {
    let mut inner = pair.into_inner();
    let lhs = parse_chain(next(&mut inner, "sum")?)?;
    match inner.next() {
        None => Ok(lhs),
        Some(op) => {
            let op = match op.as_str() {
                "==" => BinaryOp::Eq,
                "!=" => BinaryOp::Ne,
                "<=" => BinaryOp::Le,
                ">=" => BinaryOp::Ge,
                "<" => BinaryOp::Lt,
                ">" => BinaryOp::Gt,
                other => return Err(FormulaError::Parse(format!("unknown comparison '{other}'"))),
            };
            let rhs = parse_chain(next(&mut inner, "comparison rhs")?)?;
            Ok(Expr::binary(op, lhs, rhs))
        }
    }
}

/// Left-associative `sum` / `product` chains: `operand (op operand)*`.
fn parse_chain(pair: Pair<Rule>) -> Result<Expr, FormulaError> {
    let rule = pair.as_rule();
    let mut inner = pair.into_inner();
    let operand = |pair: Pair<Rule>| match rule {
        Rule::sum => parse_chain(pair),
        _ => parse_unary(pair),
    };

    let mut result = operand(next(&mut inner, "chain operand")?)?;
    while let Some(op) = inner.next() {
        let op = match op.as_str() {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "%" => BinaryOp::Rem,
            other => return Err(FormulaError::Parse(format!("unknown operator '{other}'"))),
        };
        let rhs = operand(next(&mut inner, "chain rhs")?)?;
        result = Expr::binary(op, result, rhs);
    }
    Ok(result)
}

fn parse_unary(pair: Pair<Rule>) -> Result<Expr, FormulaError> {
    let mut ops = Vec::new();
    let mut primary = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::unary_op => ops.push(inner.as_str() == "!"),
            _ => primary = Some(parse_primary(inner)?),
        }
    }

    let mut expr = primary.ok_or_else(|| FormulaError::Parse("missing operand".into()))?;
    for is_not in ops.into_iter().rev() {
        expr = if is_not {
            Expr::Not(Box::new(expr))
        } else {
            Expr::Neg(Box::new(expr))
        };
    }
    Ok(expr)
}

fn parse_primary(pair: Pair<Rule>) -> Result<Expr, FormulaError> {
    match pair.as_rule() {
        Rule::expr => parse_expr(pair),
        Rule::integer => pair
            .as_str()
            .parse::<i64>()
            .map(|n| Expr::Lit(Value::Int(n)))
            .map_err(|_| FormulaError::IntegerOutOfRange(pair.as_str().to_owned())),
        Rule::string => {
            let text = pair.into_inner().next().map(|p| p.as_str()).unwrap_or("");
            Ok(Expr::Lit(Value::from(text)))
        }
        Rule::null => Ok(Expr::Null),
        Rule::source => Ok(Expr::Source),
        Rule::current => Ok(Expr::Current),
        Rule::attr_ref => {
            let name = next(&mut pair.into_inner(), "attribute name")?;
            Ok(Expr::Attr(AttrId::parse(name.as_str())?))
        }
        Rule::call => {
            let mut inner = pair.into_inner();
            let func = next(&mut inner, "function name")?;
            let args = inner.map(parse_expr).collect::<Result<Vec<_>, _>>()?;
            match func.as_str() {
                "min" => Ok(Expr::Min(args)),
                "max" => Ok(Expr::Max(args)),
                other => Err(FormulaError::Parse(format!("unknown function '{other}'"))),
            }
        }
        r => Err(FormulaError::Parse(format!("unexpected rule: {r:?}"))),
    }
}

fn next<'i>(
    pairs: &mut pest::iterators::Pairs<'i, Rule>,
    what: &str,
) -> Result<Pair<'i, Rule>, FormulaError> {
    pairs
        .next()
        .ok_or_else(|| FormulaError::Parse(format!("missing {what}")))
}
