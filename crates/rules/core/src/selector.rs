//! Rule source selectors.
//!
//! A rule reads either one literal attribute or every attribute whose name
//! matches a pattern. Patterns are kept as selectors, never expanded at
//! registration time: the evaluator re-queries them against the live
//! attribute index on every resolution pass, so attributes created after the
//! rule was registered are picked up automatically.

use core::fmt;

use regex::Regex;

use crate::attr::{AttrError, AttrId};
use crate::error::{ErrorSeverity, RulesError};

/// Errors raised while parsing a [`Selector`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error(transparent)]
    Attr(#[from] AttrError),

    #[error("invalid attribute pattern /{pattern}/: {reason}")]
    Pattern { pattern: String, reason: String },
}

impl RulesError for SelectorError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Attr(e) => e.error_code(),
            Self::Pattern { .. } => "selector_invalid_pattern",
        }
    }
}

/// Regular expression over attribute names.
///
/// Equality compares the pattern source text, which is what `delete_rule`
/// matches on.
#[derive(Clone, Debug)]
pub struct AttrPattern {
    source: String,
    regex: Regex,
}

impl AttrPattern {
    pub fn new(source: &str) -> Result<Self, SelectorError> {
        let regex = Regex::new(source).map_err(|e| SelectorError::Pattern {
            pattern: source.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            source: source.to_owned(),
            regex,
        })
    }

    pub fn is_match(&self, attr: &AttrId) -> bool {
        self.regex.is_match(attr.as_str())
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl PartialEq for AttrPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for AttrPattern {}

/// Where a rule edge reads its source value(s) from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    /// A single named attribute.
    Attr(AttrId),
    /// Every currently known attribute whose name matches.
    Pattern(AttrPattern),
}

impl Selector {
    /// Parses `/regex/` as a pattern and anything else as a literal attribute name.
    ///
    /// ```
    /// # use rules_core::Selector;
    /// let literal = Selector::parse("levels.Cleric").unwrap();
    /// assert!(matches!(literal, Selector::Attr(_)));
    ///
    /// let pattern = Selector::parse(r"/^turn.*\.frequency$/").unwrap();
    /// assert!(matches!(pattern, Selector::Pattern(_)));
    /// ```
    pub fn parse(text: &str) -> Result<Self, SelectorError> {
        match text
            .strip_prefix('/')
            .and_then(|rest| rest.strip_suffix('/'))
        {
            Some(pattern) if text.len() >= 2 => Ok(Self::Pattern(AttrPattern::new(pattern)?)),
            _ => Ok(Self::Attr(AttrId::parse(text)?)),
        }
    }

    pub fn matches(&self, attr: &AttrId) -> bool {
        match self {
            Selector::Attr(id) => id == attr,
            Selector::Pattern(pattern) => pattern.is_match(attr),
        }
    }

    pub fn as_attr(&self) -> Option<&AttrId> {
        match self {
            Selector::Attr(id) => Some(id),
            Selector::Pattern(_) => None,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Attr(id) => write!(f, "{id}"),
            Selector::Pattern(pattern) => write!(f, "/{}/", pattern.as_str()),
        }
    }
}

impl From<AttrId> for Selector {
    fn from(value: AttrId) -> Self {
        Selector::Attr(value)
    }
}

impl From<AttrPattern> for Selector {
    fn from(value: AttrPattern) -> Self {
        Selector::Pattern(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(name: &str) -> AttrId {
        AttrId::parse(name).unwrap()
    }

    #[test]
    fn pattern_matches_attribute_names() {
        let selector = Selector::parse(r"/^turn.*\.frequency$/").unwrap();
        assert!(selector.matches(&attr("turnLycanthropes.frequency")));
        assert!(selector.matches(&attr("turnUndead.frequency")));
        assert!(!selector.matches(&attr("turnUndead.level")));
    }

    #[test]
    fn patterns_compare_by_source() {
        let a = Selector::parse("/^levels\\./").unwrap();
        let b = Selector::parse("/^levels\\./").unwrap();
        let c = Selector::parse("/^levels/").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn literal_and_pattern_never_compare_equal() {
        let literal = Selector::parse("level").unwrap();
        let pattern = Selector::parse("/level/").unwrap();
        assert_ne!(literal, pattern);
        assert_eq!(pattern.to_string(), "/level/");
    }

    #[test]
    fn bad_regex_is_rejected() {
        assert!(matches!(
            Selector::parse("/([a-z/"),
            Err(SelectorError::Pattern { .. })
        ));
    }

    #[test]
    fn lone_slash_is_not_a_pattern() {
        assert!(matches!(Selector::parse("/"), Err(SelectorError::Attr(_))));
    }
}
