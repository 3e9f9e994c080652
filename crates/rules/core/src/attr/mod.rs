//! Attribute identifiers and values.
//!
//! Every derived or base quantity on a character sheet is an *attribute*: a
//! named slot identified by an [`AttrId`] and holding an optional [`Value`].
//! Names follow the grammar `namespace[.key[.index]]`:
//!
//! ```text
//! level                               bare namespace
//! features.Weapon Focus (Longsword)   namespace + key
//! magicNotes.turnUndead.1             namespace + key + companion index
//! ```
//!
//! Names are built through the constructors here instead of ad-hoc string
//! concatenation so that a malformed name is rejected at registration time.

mod value;

pub use value::Value;

use core::borrow::Borrow;
use core::fmt;
use core::str::FromStr;

use crate::error::{ErrorSeverity, RulesError};

/// Errors raised while constructing an [`AttrId`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AttrError {
    #[error("attribute name is empty")]
    Empty,

    #[error("attribute '{name}' has {segments} segments (expected 1 to 3)")]
    TooManySegments { name: String, segments: usize },

    #[error("attribute '{name}': invalid namespace '{namespace}'")]
    InvalidNamespace { name: String, namespace: String },

    #[error("attribute '{name}': invalid key '{key}'")]
    InvalidKey { name: String, key: String },

    #[error("attribute '{name}': companion index '{index}' is not a number")]
    InvalidIndex { name: String, index: String },
}

impl RulesError for AttrError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "attr_empty",
            Self::TooManySegments { .. } => "attr_too_many_segments",
            Self::InvalidNamespace { .. } => "attr_invalid_namespace",
            Self::InvalidKey { .. } => "attr_invalid_key",
            Self::InvalidIndex { .. } => "attr_invalid_index",
        }
    }
}

/// Validated attribute name.
///
/// Ordering and hashing follow the underlying string so that sorted maps of
/// attributes iterate in attribute-name order and can be queried by `&str`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct AttrId(String);

impl AttrId {
    /// Parses and validates a full attribute name.
    pub fn parse(name: &str) -> Result<Self, AttrError> {
        if name.is_empty() {
            return Err(AttrError::Empty);
        }

        let segments: Vec<&str> = name.split('.').collect();
        if segments.len() > 3 {
            return Err(AttrError::TooManySegments {
                name: name.to_owned(),
                segments: segments.len(),
            });
        }

        if !is_namespace(segments[0]) {
            return Err(AttrError::InvalidNamespace {
                name: name.to_owned(),
                namespace: segments[0].to_owned(),
            });
        }
        if let Some(key) = segments.get(1).filter(|key| !is_key(key)) {
            return Err(AttrError::InvalidKey {
                name: name.to_owned(),
                key: (*key).to_owned(),
            });
        }
        if let Some(index) = segments.get(2).filter(|index| !is_index(index)) {
            return Err(AttrError::InvalidIndex {
                name: name.to_owned(),
                index: (*index).to_owned(),
            });
        }

        Ok(Self(name.to_owned()))
    }

    /// Builds `namespace.key`.
    ///
    /// ```
    /// # use rules_core::AttrId;
    /// let id = AttrId::new("features", "Weapon Focus (Longsword)").unwrap();
    /// assert_eq!(id.as_str(), "features.Weapon Focus (Longsword)");
    /// ```
    pub fn new(namespace: &str, key: &str) -> Result<Self, AttrError> {
        Self::parse(&format!("{namespace}.{key}"))
    }

    /// Builds a bare-namespace attribute such as `level`.
    pub fn root(namespace: &str) -> Result<Self, AttrError> {
        Self::parse(namespace)
    }

    /// Returns `self.key` for a bare-namespace attribute.
    pub fn child(&self, key: &str) -> Result<Self, AttrError> {
        Self::parse(&format!("{}.{key}", self.0))
    }

    /// Returns the companion attribute `self.index` used for secondary note values.
    ///
    /// Returns `None` when `self` already carries an index.
    pub fn companion(&self, index: u32) -> Option<Self> {
        Self::parse(&format!("{}.{index}", self.0)).ok()
    }

    pub fn namespace(&self) -> &str {
        self.segments().next().unwrap_or_default()
    }

    pub fn key(&self) -> Option<&str> {
        self.segments().nth(1)
    }

    pub fn index(&self) -> Option<u32> {
        self.segments().nth(2).and_then(|i| i.parse().ok())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

fn is_namespace(segment: &str) -> bool {
    let mut chars = segment.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_key(segment: &str) -> bool {
    !segment.is_empty()
        && segment.trim() == segment
        && !segment
            .chars()
            .any(|c| c.is_control() || matches!(c, ':' | '%' | '{' | '}'))
}

fn is_index(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit())
}

impl fmt::Display for AttrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AttrId {
    type Err = AttrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AttrId {
    type Error = AttrError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for AttrId {
    type Error = AttrError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<AttrId> for String {
    fn from(value: AttrId) -> Self {
        value.0
    }
}

impl AsRef<str> for AttrId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for AttrId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
