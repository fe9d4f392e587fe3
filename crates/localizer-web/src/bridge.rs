#![forbid(unsafe_code)]

//! JSON bridge between JS option objects and widget types.
//!
//! The wasm layer stringifies whatever the page passed as `options` and hands
//! the text here, which keeps decoding testable on native targets. Key order
//! of `texts` survives the trip because [`StringMap`] decodes objects in
//! source order.

use std::fmt;

use localizer_widget::{HostDocument, LocalizedTextEditor, OptionsPatch, StringMap};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

/// Options payload that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The payload is not valid JSON or has mistyped keys.
    Json(String),
    /// The payload is valid JSON but not an object.
    NotAnObject(&'static str),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "invalid options: {msg}"),
            Self::NotAnObject(kind) => write!(f, "options must be an object, got {kind}"),
        }
    }
}

impl std::error::Error for BridgeError {}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Decode a stringified options object.
///
/// An empty payload or `null` means "no options" and yields the default patch.
pub fn parse_options(json: &str) -> Result<OptionsPatch, BridgeError> {
    let trimmed = json.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(OptionsPatch::default());
    }
    // Check the shape first so the error names what was passed.
    let shape: serde_json::Value =
        serde_json::from_str(trimmed).map_err(|err| BridgeError::Json(err.to_string()))?;
    if !shape.is_object() {
        return Err(BridgeError::NotAnObject(json_kind(&shape)));
    }
    // Decode from the text, not the Value, so `texts` keeps its key order.
    serde_json::from_str(trimmed).map_err(|err| BridgeError::Json(err.to_string()))
}

/// A field that decodes as `T` or is skipped.
#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Valid(T),
    Invalid(IgnoredAny),
}

impl<T> Lenient<T> {
    fn into_valid(self) -> Option<T> {
        match self {
            Self::Valid(value) => Some(value),
            Self::Invalid(_) => None,
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct LanguageFields {
    texts: Option<Lenient<StringMap>>,
    languages: Option<Lenient<Vec<String>>>,
}

/// Pull the language-defining keys out of a payload [`parse_options`]
/// rejected, so an inert editor still reports the caller's languages.
///
/// Keys that do not decode are dropped; a payload that is not an object
/// yields the default patch.
#[must_use]
pub fn recover_languages(json: &str) -> OptionsPatch {
    let Ok(fields) = serde_json::from_str::<LanguageFields>(json.trim()) else {
        return OptionsPatch::default();
    };
    OptionsPatch {
        texts: fields.texts.and_then(Lenient::into_valid),
        languages: fields.languages.and_then(Lenient::into_valid),
        ..OptionsPatch::default()
    }
}

/// Serializable view of an editor, for host-side inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorSnapshot {
    pub inert: bool,
    pub languages: Vec<String>,
    pub active: Option<String>,
    pub values: StringMap,
    pub rows: Vec<Option<u32>>,
}

impl EditorSnapshot {
    #[must_use]
    pub fn capture<D: HostDocument>(editor: &LocalizedTextEditor<D>) -> Self {
        let languages: Vec<String> = editor
            .languages()
            .iter()
            .map(|c| c.as_str().to_owned())
            .collect();
        let rows = languages.iter().map(|lang| editor.rows(lang)).collect();
        Self {
            inert: editor.is_inert(),
            active: editor.active_language().map(|c| c.as_str().to_owned()),
            values: editor.values(),
            rows,
            languages,
        }
    }

    /// Compact JSON encoding.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }
}
