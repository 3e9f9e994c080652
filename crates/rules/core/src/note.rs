//! Human-readable notes attached to attributes.
//!
//! Notes are registered as `"key:template"` strings. Templates reference the
//! attribute's value as `%V` and companion attributes (`key.1`, `key.2`, …)
//! as `%1`, `%2`, …. A note is advisory text: a placeholder whose attribute
//! has no value renders as an empty string.

use std::collections::BTreeMap;
use std::iter::Peekable;
use std::str::Chars;

use tracing::debug;

use crate::attr::{AttrError, AttrId, Value};
use crate::error::{ErrorSeverity, RulesError};

/// Errors raised while registering notes.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NoteError {
    #[error("note '{0}' is missing the ':' between attribute and template")]
    MissingSeparator(String),

    #[error("note attribute is invalid: {0}")]
    Attr(#[from] AttrError),
}

impl RulesError for NoteError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingSeparator(_) => "note_missing_separator",
            Self::Attr(e) => e.error_code(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct NoteCatalog {
    notes: BTreeMap<AttrId, String>,
}

impl NoteCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers notes from `"key:template"` strings. A later note for the
    /// same attribute replaces the earlier one.
    ///
    /// ```
    /// # use rules_core::NoteCatalog;
    /// let mut notes = NoteCatalog::new();
    /// notes.define_note(["featureNotes.darkvisionFeature:%V' b/w vision in darkness"]).unwrap();
    /// assert!(notes.get("featureNotes.darkvisionFeature").is_some());
    /// ```
    pub fn define_note<I, S>(&mut self, notes: I) -> Result<(), NoteError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for note in notes {
            let note = note.as_ref();
            let (key, template) = note
                .split_once(':')
                .ok_or_else(|| NoteError::MissingSeparator(note.to_owned()))?;
            let attr = AttrId::parse(key.trim())?;
            debug!(attr = %attr, "note defined");
            self.notes.insert(attr, template.to_owned());
        }
        Ok(())
    }

    pub fn get(&self, attr: &str) -> Option<&str> {
        self.notes.get(attr).map(String::as_str)
    }

    /// Suppresses a note, returning its template.
    pub fn remove(&mut self, attr: &str) -> Option<String> {
        self.notes.remove(attr)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AttrId, &str)> {
        self.notes.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Renders the note for `attr`, or `None` if no note is registered.
    pub fn render<F>(&self, attr: &AttrId, lookup: F) -> Option<String>
    where
        F: FnMut(&AttrId) -> Option<Value>,
    {
        self.get(attr.as_str())
            .map(|template| render_template(attr, template, lookup))
    }
}

/// Substitutes `%V`, `%N` and `%%` in `template`.
pub fn render_template<F>(attr: &AttrId, template: &str, mut lookup: F) -> String
where
    F: FnMut(&AttrId) -> Option<Value>,
{
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('V') => {
                chars.next();
                push_value(&mut out, lookup(attr));
            }
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some(d) if d.is_ascii_digit() => {
                let index = take_index(&mut chars);
                let value = index
                    .and_then(|i| attr.companion(i))
                    .and_then(|companion| lookup(&companion));
                push_value(&mut out, value);
            }
            _ => out.push('%'),
        }
    }
    out
}

fn take_index(chars: &mut Peekable<Chars<'_>>) -> Option<u32> {
    let mut digits = String::new();
    while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
        digits.push(d);
        chars.next();
    }
    digits.parse().ok()
}

fn push_value(out: &mut String, value: Option<Value>) {
    if let Some(value) = value {
        out.push_str(&value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(name: &str) -> AttrId {
        AttrId::parse(name).unwrap()
    }

    fn lookup(id: &AttrId) -> Option<Value> {
        match id.as_str() {
            "magicNotes.turnUndead" => Some(Value::Int(3)),
            "magicNotes.turnUndead.1" => Some(Value::Int(8)),
            "magicNotes.turnUndead.2" => Some(Value::from("2d6+5")),
            _ => None,
        }
    }

    #[test]
    fn substitutes_value_and_companions() {
        let mut notes = NoteCatalog::new();
        notes
            .define_note(["magicNotes.turnUndead:Turn %V/day, max HD %1, damage %2"])
            .unwrap();
        let text = notes.render(&attr("magicNotes.turnUndead"), lookup).unwrap();
        assert_eq!(text, "Turn 3/day, max HD 8, damage 2d6+5");
    }

    #[test]
    fn unresolved_placeholders_render_empty() {
        let text = render_template(&attr("saveNotes.snakeBloodFeature"), "+%V Fortitude (%3)", lookup);
        assert_eq!(text, "+ Fortitude ()");
    }

    #[test]
    fn percent_escapes() {
        let text = render_template(&attr("magicNotes.turnUndead"), "%V%% chance, 100%", lookup);
        assert_eq!(text, "3% chance, 100%");
    }

    #[test]
    fn template_may_contain_colons() {
        let mut notes = NoteCatalog::new();
        notes
            .define_note(["combatNotes.dodgeFeature:+1 AC vs. designated foe: %V"])
            .unwrap();
        assert_eq!(
            notes.get("combatNotes.dodgeFeature"),
            Some("+1 AC vs. designated foe: %V")
        );
    }

    #[test]
    fn malformed_notes_are_rejected() {
        let mut notes = NoteCatalog::new();
        assert!(matches!(
            notes.define_note(["no separator"]),
            Err(NoteError::MissingSeparator(_))
        ));
        assert!(matches!(
            notes.define_note(["1bad:text"]),
            Err(NoteError::Attr(_))
        ));
    }

    #[test]
    fn missing_note_renders_none() {
        let notes = NoteCatalog::new();
        assert!(notes.render(&attr("featureNotes.x"), lookup).is_none());
    }
}
