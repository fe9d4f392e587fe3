#![forbid(unsafe_code)]

//! Per-language icon resolution.
//!
//! An explicit override wins; otherwise the icon lives at the conventional
//! `<base>/<lang>.png`. The resolver never checks that the asset exists.

use crate::language::LanguageCode;

/// Default directory for language icons, relative to the page.
pub const DEFAULT_ICON_BASE: &str = "./images/icons";

/// Resolves the icon source for each language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconResolver {
    base: String,
    overrides: Vec<(LanguageCode, String)>,
}

impl Default for IconResolver {
    fn default() -> Self {
        Self::new(DEFAULT_ICON_BASE)
    }
}

impl IconResolver {
    /// Create a resolver rooted at `base`. Trailing slashes are ignored.
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.len() > 1 && base.ends_with('/') {
            base.pop();
        }
        Self {
            base,
            overrides: Vec::new(),
        }
    }

    /// Set an explicit icon source for `lang`, replacing any earlier one.
    #[must_use]
    pub fn with_override(mut self, lang: LanguageCode, src: impl Into<String>) -> Self {
        let src = src.into();
        match self.overrides.iter_mut().find(|(code, _)| *code == lang) {
            Some(entry) => entry.1 = src,
            None => self.overrides.push((lang, src)),
        }
        self
    }

    /// Icon source for `lang`.
    #[must_use]
    pub fn resolve(&self, lang: &LanguageCode) -> String {
        if let Some((_, src)) = self.overrides.iter().find(|(code, _)| code == lang) {
            return src.clone();
        }
        if self.base == "/" {
            return format!("/{lang}.png");
        }
        if self.base.is_empty() {
            return format!("{lang}.png");
        }
        format!("{}/{lang}.png", self.base)
    }
}
