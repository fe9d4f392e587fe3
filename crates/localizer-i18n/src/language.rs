#![forbid(unsafe_code)]

//! Language codes and ordered language sets.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Languages understood by a default configuration, in display order.
pub const DEFAULT_LANGUAGES: &[&str] = &["it", "en", "de"];

/// Longest accepted code (BCP 47 recommends supporting at least 35 chars).
const MAX_CODE_LEN: usize = 35;

/// Language code validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageError {
    /// The code was empty.
    Empty,
    /// The code exceeded the maximum length.
    TooLong { len: usize },
    /// The code contained a character outside `[A-Za-z0-9_-]`.
    InvalidChar { code: String, ch: char },
}

impl fmt::Display for LanguageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "language code is empty"),
            Self::TooLong { len } => {
                write!(f, "language code is {len} chars long (max {MAX_CODE_LEN})")
            }
            Self::InvalidChar { code, ch } => {
                write!(f, "language code {code:?} contains invalid character {ch:?}")
            }
        }
    }
}

impl std::error::Error for LanguageError {}

/// A validated language code such as `en` or `pt-BR`.
///
/// Codes end up inside generated field names (`notes[en]`) and attribute
/// values, so only ASCII alphanumerics, `-` and `_` are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Parse and validate a language code.
    pub fn new(code: impl Into<String>) -> Result<Self, LanguageError> {
        let code = code.into();
        if code.is_empty() {
            return Err(LanguageError::Empty);
        }
        if code.len() > MAX_CODE_LEN {
            return Err(LanguageError::TooLong { len: code.len() });
        }
        if let Some(ch) = code
            .chars()
            .find(|ch| !(ch.is_ascii_alphanumeric() || *ch == '-' || *ch == '_'))
        {
            return Err(LanguageError::InvalidChar { code, ch });
        }
        Ok(Self(code))
    }

    /// The code as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = LanguageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for LanguageCode {
    type Error = LanguageError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for LanguageCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for LanguageCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An insertion-ordered set of language codes.
///
/// Duplicates are dropped on insert; the first occurrence keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageSet {
    codes: Vec<LanguageCode>,
}

impl LanguageSet {
    /// Create an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { codes: Vec::new() }
    }

    /// Parse a list of raw codes, keeping the first occurrence of duplicates.
    pub fn parse<I, S>(codes: I) -> Result<Self, LanguageError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for code in codes {
            set.insert(LanguageCode::new(code)?);
        }
        Ok(set)
    }

    /// Append `code` unless already present. Returns `true` if inserted.
    pub fn insert(&mut self, code: LanguageCode) -> bool {
        if self.contains(code.as_str()) {
            return false;
        }
        self.codes.push(code);
        true
    }

    /// Position of `code` in the set.
    #[must_use]
    pub fn position(&self, code: &str) -> Option<usize> {
        self.codes.iter().position(|c| c.as_str() == code)
    }

    /// Whether `code` is a member.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.position(code).is_some()
    }

    /// Code at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LanguageCode> {
        self.codes.get(index)
    }

    /// First code in order.
    #[must_use]
    pub fn first(&self) -> Option<&LanguageCode> {
        self.codes.first()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, LanguageCode> {
        self.codes.iter()
    }
}

impl FromIterator<LanguageCode> for LanguageSet {
    fn from_iter<T: IntoIterator<Item = LanguageCode>>(iter: T) -> Self {
        let mut set = Self::new();
        for code in iter {
            set.insert(code);
        }
        set
    }
}

impl<'a> IntoIterator for &'a LanguageSet {
    type Item = &'a LanguageCode;
    type IntoIter = std::slice::Iter<'a, LanguageCode>;

    fn into_iter(self) -> Self::IntoIter {
        self.codes.iter()
    }
}

/// The language set of a default configuration.
///
/// Pure; does not require a widget instance or a document.
#[must_use]
pub fn all_languages() -> LanguageSet {
    DEFAULT_LANGUAGES
        .iter()
        .map(|code| LanguageCode(String::from(*code)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_simple_and_region_codes() {
        assert_eq!(LanguageCode::new("en").unwrap().as_str(), "en");
        assert_eq!(LanguageCode::new("pt-BR").unwrap().as_str(), "pt-BR");
        assert_eq!(LanguageCode::new("zh_Hant").unwrap().as_str(), "zh_Hant");
    }

    #[test]
    fn rejects_empty_and_markup_characters() {
        assert_eq!(LanguageCode::new(""), Err(LanguageError::Empty));
        assert_eq!(
            LanguageCode::new("e]n"),
            Err(LanguageError::InvalidChar {
                code: "e]n".into(),
                ch: ']'
            })
        );
        assert!(matches!(
            LanguageCode::new("a\"b"),
            Err(LanguageError::InvalidChar { ch: '"', .. })
        ));
    }

    #[test]
    fn rejects_overlong_code() {
        let long = "a".repeat(MAX_CODE_LEN + 1);
        assert_eq!(
            LanguageCode::new(long),
            Err(LanguageError::TooLong {
                len: MAX_CODE_LEN + 1
            })
        );
    }

    #[test]
    fn set_keeps_first_occurrence_order() {
        let set = LanguageSet::parse(["en", "it", "en", "de", "it"]).unwrap();
        let codes: Vec<&str> = set.iter().map(LanguageCode::as_str).collect();
        assert_eq!(codes, vec!["en", "it", "de"]);
        assert_eq!(set.position("de"), Some(2));
        assert!(!set.contains("fr"));
    }

    #[test]
    fn default_language_list() {
        let all = all_languages();
        assert_eq!(all.len(), 3);
        assert_eq!(all.first().map(LanguageCode::as_str), Some("it"));
        assert!(all.contains("en"));
        assert!(all.contains("de"));
    }

    #[test]
    fn serde_validates_on_deserialize() {
        let ok: LanguageCode = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(ok, "en");
        assert!(serde_json::from_str::<LanguageCode>("\"\"").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "\"en\"");
    }
}
