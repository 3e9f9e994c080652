use crate::attr::Value;

/// How a rule edge combines its operand into the target's accumulated value.
///
/// Operators fold left-to-right over a target's edges in registration order.
/// The accumulator starts unset (or at the target's base fact, if recorded).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
pub enum Operator {
    /// Set only while still unset: the first writer wins.
    #[strum(serialize = "=")]
    Set,

    /// Sum of independent contributors; unset counts as 0.
    #[strum(serialize = "+=")]
    Accumulate,

    /// Flat modifier layered on a base; unset counts as 0.
    #[strum(serialize = "+")]
    Add,

    /// Multiplier; an unset accumulator stays unset.
    #[strum(serialize = "*")]
    Multiply,

    /// At least the operand; an unset accumulator stays unset.
    #[strum(serialize = "^")]
    Max,

    /// At least the operand, seeding an unset accumulator.
    #[strum(serialize = "^=")]
    MaxOrSet,

    /// At most the operand; an unset accumulator stays unset.
    #[strum(serialize = "v")]
    Min,

    /// At most the operand, seeding an unset accumulator.
    #[strum(serialize = "v=")]
    MinOrSet,

    /// Precondition: a falsy or absent operand aborts the target for this pass.
    #[strum(serialize = "?")]
    Gate,
}

/// Result of applying one fold step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Continue(Option<Value>),
    /// A gate failed; the target stays unset for this pass.
    Abort,
}

impl Operator {
    /// Applies one edge to the accumulated value.
    ///
    /// `operand` is the edge's evaluated contribution; `None` means the
    /// source or formula produced nothing, which only matters to gates.
    pub fn apply(self, acc: Option<Value>, operand: Option<Value>) -> Step {
        let Some(operand) = operand else {
            return match self {
                Operator::Gate => Step::Abort,
                _ => Step::Continue(acc),
            };
        };

        let next = match self {
            Operator::Set => Some(acc.unwrap_or(operand)),
            Operator::Accumulate | Operator::Add => {
                Some(acc.unwrap_or(Value::Int(0)).add(&operand))
            }
            Operator::Multiply => acc.map(|a| a.mul(&operand)),
            Operator::Max => acc.map(|a| a.max(operand)),
            Operator::MaxOrSet => Some(match acc {
                Some(a) => a.max(operand),
                None => operand,
            }),
            Operator::Min => acc.map(|a| a.min(operand)),
            Operator::MinOrSet => Some(match acc {
                Some(a) => a.min(operand),
                None => operand,
            }),
            Operator::Gate => {
                if !operand.is_truthy() {
                    return Step::Abort;
                }
                acc
            }
        };
        Step::Continue(next)
    }
}
