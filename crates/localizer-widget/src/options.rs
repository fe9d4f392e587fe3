#![forbid(unsafe_code)]

//! Widget options: defaults, shallow merge, and validation.
//!
//! Callers hand in an [`OptionsPatch`] where every key is optional. The patch
//! is merged over [`LocalizerOptions::default`] one top-level key at a time:
//! a provided `texts` or `customClasses` replaces the default wholesale, it is
//! never deep-merged. [`LocalizerOptions::resolve`] then validates the result
//! into the [`ResolvedOptions`] the editor runs on.

use std::fmt;

use localizer_i18n::{
    DEFAULT_ICON_BASE, DEFAULT_LANGUAGES, IconResolver, LanguageCode, LanguageError, LanguageSet,
};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::rows::{InvalidRowBounds, RowBounds};

/// Insertion-ordered `string -> string` mapping.
///
/// Deserializes from a JSON-style object without losing key order, which is
/// what defines the language order for `texts`. A repeated key keeps its
/// first position and takes the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringMap {
    entries: Vec<(String, String)>,
}

impl StringMap {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or replace `key`. Replacing keeps the original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StringMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl Serialize for StringMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StringMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StringMapVisitor;

        impl<'de> Visitor<'de> for StringMapVisitor {
            type Value = StringMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping language codes to strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<StringMap, A::Error> {
                let mut map = StringMap::new();
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    map.insert(k, v);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(StringMapVisitor)
    }
}

/// Cosmetic class overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomClasses {
    /// Extra classes appended to every generated surface.
    pub textarea: String,
}

/// Caller-supplied options. Absent keys fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptionsPatch {
    pub languages: Option<Vec<String>>,
    #[serde(alias = "default_language")]
    pub default_language: Option<String>,
    pub texts: Option<StringMap>,
    #[serde(alias = "language_icons")]
    pub language_icons: Option<StringMap>,
    #[serde(alias = "icon_base")]
    pub icon_base: Option<String>,
    pub rows: Option<u32>,
    #[serde(alias = "max_rows")]
    pub max_rows: Option<u32>,
    #[serde(alias = "custom_classes")]
    pub custom_classes: Option<CustomClasses>,
}

impl OptionsPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = Some(languages.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn default_language(mut self, lang: impl Into<String>) -> Self {
        self.default_language = Some(lang.into());
        self
    }

    #[must_use]
    pub fn texts(mut self, texts: StringMap) -> Self {
        self.texts = Some(texts);
        self
    }

    #[must_use]
    pub fn language_icons(mut self, icons: StringMap) -> Self {
        self.language_icons = Some(icons);
        self
    }

    #[must_use]
    pub fn icon_base(mut self, base: impl Into<String>) -> Self {
        self.icon_base = Some(base.into());
        self
    }

    #[must_use]
    pub fn rows(mut self, rows: u32) -> Self {
        self.rows = Some(rows);
        self
    }

    #[must_use]
    pub fn max_rows(mut self, max_rows: u32) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    #[must_use]
    pub fn textarea_class(mut self, class: impl Into<String>) -> Self {
        self.custom_classes = Some(CustomClasses {
            textarea: class.into(),
        });
        self
    }
}

/// Fully merged, not yet validated options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizerOptions {
    pub languages: Vec<String>,
    pub default_language: Option<String>,
    pub texts: StringMap,
    pub language_icons: StringMap,
    pub icon_base: String,
    pub rows: u32,
    pub max_rows: u32,
    pub custom_classes: CustomClasses,
}

impl Default for LocalizerOptions {
    fn default() -> Self {
        Self {
            languages: DEFAULT_LANGUAGES.iter().map(|s| (*s).to_owned()).collect(),
            default_language: None,
            texts: StringMap::new(),
            language_icons: StringMap::new(),
            icon_base: DEFAULT_ICON_BASE.to_owned(),
            rows: 3,
            max_rows: 3,
            custom_classes: CustomClasses::default(),
        }
    }
}

/// Options rejected during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    /// Neither `texts` nor `languages` named any language.
    EmptyLanguages,
    /// A configured language code is malformed.
    Language(LanguageError),
    /// `defaultLanguage` is not one of the configured languages.
    UnknownDefaultLanguage(String),
    /// `rows`/`maxRows` do not form a valid range.
    Rows(InvalidRowBounds),
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLanguages => write!(f, "no languages configured"),
            Self::Language(err) => write!(f, "invalid language: {err}"),
            Self::UnknownDefaultLanguage(lang) => {
                write!(f, "default language {lang:?} is not configured")
            }
            Self::Rows(err) => write!(f, "invalid row bounds: {err}"),
        }
    }
}

impl std::error::Error for OptionsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Language(err) => Some(err),
            Self::Rows(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LanguageError> for OptionsError {
    fn from(err: LanguageError) -> Self {
        Self::Language(err)
    }
}

impl From<InvalidRowBounds> for OptionsError {
    fn from(err: InvalidRowBounds) -> Self {
        Self::Rows(err)
    }
}

/// Validated options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub languages: LanguageSet,
    pub default_language: LanguageCode,
    /// Seed text per language, indexed like `languages`.
    pub texts: Vec<String>,
    pub icons: IconResolver,
    pub rows: RowBounds,
    /// Extra classes for each surface, already split on whitespace.
    pub textarea_classes: Vec<String>,
}

impl LocalizerOptions {
    /// Apply `patch` over `self`, replacing each provided key wholesale.
    #[must_use]
    pub fn merge(self, patch: OptionsPatch) -> Self {
        Self {
            languages: patch.languages.unwrap_or(self.languages),
            default_language: patch.default_language.or(self.default_language),
            texts: patch.texts.unwrap_or(self.texts),
            language_icons: patch.language_icons.unwrap_or(self.language_icons),
            icon_base: patch.icon_base.unwrap_or(self.icon_base),
            rows: patch.rows.unwrap_or(self.rows),
            max_rows: patch.max_rows.unwrap_or(self.max_rows),
            custom_classes: patch.custom_classes.unwrap_or(self.custom_classes),
        }
    }

    /// Defaults merged with `patch`.
    #[must_use]
    pub fn from_patch(patch: OptionsPatch) -> Self {
        Self::default().merge(patch)
    }

    fn raw_languages(&self) -> Vec<&str> {
        if self.texts.is_empty() {
            self.languages.iter().map(String::as_str).collect()
        } else {
            self.texts.keys().collect()
        }
    }

    /// Language set, skipping malformed codes. Used by inert editors, which
    /// still report their configured languages.
    #[must_use]
    pub fn languages_lenient(&self) -> LanguageSet {
        self.raw_languages()
            .into_iter()
            .filter_map(|raw| LanguageCode::new(raw).ok())
            .collect()
    }

    /// Validate into [`ResolvedOptions`].
    ///
    /// The language set comes from the keys of `texts` when present, else
    /// from `languages`. Icon overrides for unconfigured languages are
    /// ignored.
    pub fn resolve(&self) -> Result<ResolvedOptions, OptionsError> {
        let languages = LanguageSet::parse(self.raw_languages())?;
        let Some(first) = languages.first() else {
            return Err(OptionsError::EmptyLanguages);
        };

        let default_language = match &self.default_language {
            Some(lang) => languages
                .iter()
                .find(|code| code.as_str() == lang)
                .ok_or_else(|| OptionsError::UnknownDefaultLanguage(lang.clone()))?,
            None => first,
        }
        .clone();

        let rows = RowBounds::new(self.rows, self.max_rows)?;

        let texts = languages
            .iter()
            .map(|code| self.texts.get(code.as_str()).unwrap_or_default().to_owned())
            .collect();

        let icons = self
            .language_icons
            .iter()
            .filter_map(|(lang, src)| {
                let code = languages.iter().find(|code| code.as_str() == lang)?;
                Some((code.clone(), src.to_owned()))
            })
            .fold(IconResolver::new(self.icon_base.clone()), |r, (code, src)| {
                r.with_override(code, src)
            });

        let textarea_classes = self
            .custom_classes
            .textarea
            .split_whitespace()
            .map(str::to_owned)
            .collect();

        Ok(ResolvedOptions {
            languages,
            default_language,
            texts,
            icons,
            rows,
            textarea_classes,
        })
    }
}
