use core::fmt;

/// A resolved attribute value.
///
/// Numbers are integers: d20 arithmetic always rounds down, and integer-only
/// values keep resolution deterministic. Booleans are stored as `0`/`1`.
///
/// The derived ordering places every integer before every text value; it is
/// what the `^` (max) and `v` (min) operators compare with.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    Int(i64),
    Text(String),
}

impl Value {
    pub const TRUE: Value = Value::Int(1);

    /// `0` and `""` are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Text(s) => !s.is_empty(),
        }
    }

    /// Numeric view: text that parses as an integer counts as that integer, other text as 0.
    pub fn as_int(&self) -> i64 {
        match self {
            Value::Int(n) => *n,
            Value::Text(s) => s.trim().parse().unwrap_or(0),
        }
    }

    /// Integer addition, or concatenation when either side is text.
    pub fn add(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Value::Int(a.saturating_add(*b)),
            (a, b) => Value::Text(format!("{a}{b}")),
        }
    }

    pub fn mul(&self, other: &Value) -> Value {
        Value::Int(self.as_int().saturating_mul(other.as_int()))
    }

    pub fn max(self, other: Value) -> Value {
        Ord::max(self, other)
    }

    pub fn min(self, other: Value) -> Value {
        Ord::min(self, other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Int(value.into())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness() {
        assert!(!Value::Int(0).is_truthy());
        assert!(Value::Int(-1).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::from("Dwarf").is_truthy());
    }

    #[test]
    fn addition_concatenates_text() {
        assert_eq!(Value::Int(2).add(&Value::Int(3)), Value::Int(5));
        assert_eq!(Value::from("+").add(&Value::Int(2)), Value::from("+2"));
    }

    #[test]
    fn integers_order_before_text() {
        assert_eq!(Value::Int(5).max(Value::Int(8)), Value::Int(8));
        assert_eq!(Value::Int(99).max(Value::from("a")), Value::from("a"));
        assert_eq!(Value::Int(3).min(Value::Int(-2)), Value::Int(-2));
    }
}
