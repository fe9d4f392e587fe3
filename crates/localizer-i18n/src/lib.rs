#![forbid(unsafe_code)]

//! Language primitives for textarea-localizer.
//!
//! Provides validated language codes, ordered language sets, the default
//! supported-language list, and per-language icon resolution.
//!
//! # Role in textarea-localizer
//! `localizer-i18n` isolates the language vocabulary so the widget crate can
//! stay focused on its state machine. It does not depend on any document or
//! rendering layer and is usable without constructing a widget.

pub mod icons;
pub mod language;

pub use icons::{DEFAULT_ICON_BASE, IconResolver};
pub use language::{DEFAULT_LANGUAGES, LanguageCode, LanguageError, LanguageSet, all_languages};
