#![forbid(unsafe_code)]

//! The multi-language text editor.
//!
//! [`LocalizedTextEditor`] wraps one host field, renders a surface per
//! language through a [`HostDocument`], and keeps exactly one language
//! active. The active index is the only source of truth for visibility; the
//! document is written from it and never queried for it.
//!
//! Construction never fails loudly. A missing host, invalid options, or a
//! document error during mount logs a warning and yields an *inert* editor:
//! it still reports its configured languages, every other call is a no-op or
//! returns an empty result. Use [`LocalizedTextEditor::try_mount`] to get the
//! error instead.

use std::fmt;

use localizer_i18n::{LanguageCode, LanguageSet};
use tracing::{debug, debug_span, trace, warn};

use crate::document::HostDocument;
use crate::options::{LocalizerOptions, OptionsError, OptionsPatch, ResolvedOptions, StringMap};
use crate::view::{self, DEFAULT_NAMESPACE, View};

/// Reasons a mount did not produce a live editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountError {
    /// No element matched the host selector.
    HostNotFound(String),
    /// The merged options failed validation.
    Options(OptionsError),
    /// The host document rejected a query or mutation.
    Document(String),
}

impl fmt::Display for MountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HostNotFound(selector) => write!(f, "element {selector} not found"),
            Self::Options(err) => write!(f, "{err}"),
            Self::Document(msg) => write!(f, "document error: {msg}"),
        }
    }
}

impl std::error::Error for MountError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Options(err) => Some(err),
            _ => None,
        }
    }
}

impl From<OptionsError> for MountError {
    fn from(err: OptionsError) -> Self {
        Self::Options(err)
    }
}

/// User interaction forwarded by the host environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetEvent<'a> {
    /// A selector icon was clicked.
    IconClicked(&'a str),
    /// The surface of a language was edited.
    SurfaceInput(&'a str),
}

/// Result of [`LocalizedTextEditor::change_language`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The active language changed.
    Switched,
    /// The language was already active; the view was rewritten unchanged.
    AlreadyActive,
    /// The language is not configured; nothing happened.
    UnknownLanguage,
    /// The editor is inert; nothing happened.
    Inert,
    /// The document rejected a write. The view was restored and the active
    /// language did not change.
    DocumentError,
}

/// What an interaction target does when the user acts on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    /// Clicking switches to the target's language.
    Select,
    /// Editing recomputes the target surface's row count.
    Edit,
}

/// An element the host should forward events from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionTarget<N> {
    pub language: LanguageCode,
    pub kind: InteractionKind,
    pub node: N,
}

impl<N> InteractionTarget<N> {
    /// The [`WidgetEvent`] this target produces.
    #[must_use]
    pub fn event(&self) -> WidgetEvent<'_> {
        match self.kind {
            InteractionKind::Select => WidgetEvent::IconClicked(self.language.as_str()),
            InteractionKind::Edit => WidgetEvent::SurfaceInput(self.language.as_str()),
        }
    }
}

#[derive(Debug)]
struct Live<N> {
    options: ResolvedOptions,
    namespace: String,
    view: View<N>,
    active: usize,
    rows: Vec<u32>,
}

/// A host field augmented with one text surface per language.
#[derive(Debug)]
pub struct LocalizedTextEditor<D: HostDocument> {
    document: D,
    languages: LanguageSet,
    live: Option<Live<D::Node>>,
}

impl<D: HostDocument> LocalizedTextEditor<D> {
    /// Mount onto the first element matching `selector`.
    ///
    /// On any failure this logs a warning and returns an inert editor.
    pub fn mount(document: D, selector: &str, patch: OptionsPatch) -> Self {
        let options = LocalizerOptions::from_patch(patch);
        match Self::mount_live(&document, selector, &options) {
            Ok(live) => Self {
                document,
                languages: live.options.languages.clone(),
                live: Some(live),
            },
            Err(err) => {
                warn!(selector, error = %err, "textarea localizer left inert");
                Self {
                    document,
                    languages: options.languages_lenient(),
                    live: None,
                }
            }
        }
    }

    /// Mount onto the first element matching `selector`, reporting failures.
    pub fn try_mount(document: D, selector: &str, patch: OptionsPatch) -> Result<Self, MountError> {
        let options = LocalizerOptions::from_patch(patch);
        let live = Self::mount_live(&document, selector, &options)?;
        Ok(Self {
            document,
            languages: live.options.languages.clone(),
            live: Some(live),
        })
    }

    /// An editor that never mounted. Carries the languages `patch` names.
    ///
    /// For hosts that fail before a mount can be attempted, e.g. options
    /// that could not be decoded.
    pub fn inert(document: D, patch: OptionsPatch) -> Self {
        Self {
            document,
            languages: LocalizerOptions::from_patch(patch).languages_lenient(),
            live: None,
        }
    }

    fn mount_live(
        doc: &D,
        selector: &str,
        options: &LocalizerOptions,
    ) -> Result<Live<D::Node>, MountError> {
        let _span = debug_span!("localizer.mount", selector).entered();

        // Validate before touching the document so a bad config leaves no markup.
        let resolved = options.resolve()?;
        let host = doc
            .query_selector(selector)
            .map_err(|err| MountError::Document(err.to_string()))?
            .ok_or_else(|| MountError::HostNotFound(selector.to_owned()))?;

        let namespace = doc
            .attribute(&host, "name")
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_owned());
        let active = resolved
            .languages
            .position(resolved.default_language.as_str())
            .unwrap_or(0);
        let rows: Vec<u32> = resolved
            .texts
            .iter()
            .map(|text| resolved.rows.rows_for(text))
            .collect();

        let view = view::build(doc, &host, &resolved, &namespace, active, &rows)
            .map_err(|err| MountError::Document(err.to_string()))?;

        debug!(
            languages = resolved.languages.len(),
            active = %resolved.default_language,
            namespace = namespace.as_str(),
            "textarea localizer mounted"
        );

        Ok(Live {
            options: resolved,
            namespace,
            view,
            active,
            rows,
        })
    }

    /// Configured languages in order. Available on inert editors too.
    #[must_use]
    pub fn languages(&self) -> &LanguageSet {
        &self.languages
    }

    /// Whether mounting failed.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        self.live.is_none()
    }

    /// The document this editor renders into.
    #[must_use]
    pub fn document(&self) -> &D {
        &self.document
    }

    /// The wrapper element around the host field.
    #[must_use]
    pub fn wrapper(&self) -> Option<&D::Node> {
        self.live.as_ref().map(|live| &live.view.wrapper)
    }

    /// The active language.
    #[must_use]
    pub fn active_language(&self) -> Option<&LanguageCode> {
        let live = self.live.as_ref()?;
        live.options.languages.get(live.active)
    }

    /// Form field name of the surface for `lang`.
    #[must_use]
    pub fn field_name(&self, lang: &str) -> Option<String> {
        let live = self.live.as_ref()?;
        let code = live.options.languages.iter().find(|c| c.as_str() == lang)?;
        Some(view::field_name(&live.namespace, code))
    }

    /// Current row count of the surface for `lang`.
    #[must_use]
    pub fn rows(&self, lang: &str) -> Option<u32> {
        let live = self.live.as_ref()?;
        let idx = live.options.languages.position(lang)?;
        live.rows.get(idx).copied()
    }

    /// Current text of the surface for `lang`; `None` if not configured.
    #[must_use]
    pub fn value(&self, lang: &str) -> Option<String> {
        let live = self.live.as_ref()?;
        let idx = live.options.languages.position(lang)?;
        let surface = live.view.surfaces.get(idx)?;
        Some(self.document.value(surface))
    }

    /// Snapshot of every language's text, in configured order.
    #[must_use]
    pub fn values(&self) -> StringMap {
        let Some(live) = self.live.as_ref() else {
            return StringMap::new();
        };
        live.options
            .languages
            .iter()
            .zip(&live.view.surfaces)
            .map(|(lang, surface)| (lang.as_str(), self.document.value(surface)))
            .collect()
    }

    /// Overwrite the text for `lang` and recompute its row count.
    ///
    /// Returns `false` (and does nothing) if `lang` is not configured.
    pub fn set_value(&mut self, lang: &str, text: &str) -> bool {
        let Some(live) = self.live.as_ref() else {
            return false;
        };
        let Some(surface) = live
            .options
            .languages
            .position(lang)
            .and_then(|idx| live.view.surfaces.get(idx))
        else {
            return false;
        };
        if let Err(err) = self.document.set_value(surface, text) {
            warn!(language = lang, error = %err, "failed to set surface text");
            return false;
        }
        self.resize(lang);
        true
    }

    /// Make `lang` the active language.
    ///
    /// Unconfigured languages are refused with a warning and leave the view
    /// untouched. A switch the document rejects halfway is rolled back.
    pub fn change_language(&mut self, lang: &str) -> SwitchOutcome {
        let Some(live) = self.live.as_mut() else {
            return SwitchOutcome::Inert;
        };
        let Some(next) = live.options.languages.position(lang) else {
            warn!(language = lang, "cannot switch to an unconfigured language");
            return SwitchOutcome::UnknownLanguage;
        };

        let previous = live.active;
        let from = live
            .options
            .languages
            .get(previous)
            .map_or("", LanguageCode::as_str);
        let _span = debug_span!("localizer.switch", from, to = lang).entered();

        if let Err(err) = view::apply(&self.document, &live.view, &live.options, previous, next) {
            warn!(error = %err, "language switch could not update the document");
            if let Err(err) =
                view::apply(&self.document, &live.view, &live.options, next, previous)
            {
                warn!(error = %err, "language switch could not be rolled back");
            }
            return SwitchOutcome::DocumentError;
        }
        live.active = next;

        if previous == next {
            SwitchOutcome::AlreadyActive
        } else {
            debug!("active language changed");
            SwitchOutcome::Switched
        }
    }

    /// Handle one forwarded interaction. Returns `true` if state changed.
    pub fn handle_event(&mut self, event: WidgetEvent<'_>) -> bool {
        match event {
            WidgetEvent::IconClicked(lang) => self.change_language(lang) == SwitchOutcome::Switched,
            WidgetEvent::SurfaceInput(lang) => self.resize(lang),
        }
    }

    /// Elements the host should listen on: one select target per icon, one
    /// edit target per surface. Empty when inert.
    #[must_use]
    pub fn interaction_targets(&self) -> Vec<InteractionTarget<D::Node>> {
        let Some(live) = self.live.as_ref() else {
            return Vec::new();
        };
        let langs = live.options.languages.iter();
        let selects = langs
            .clone()
            .zip(&live.view.icons)
            .map(|(lang, node)| InteractionTarget {
                language: lang.clone(),
                kind: InteractionKind::Select,
                node: node.clone(),
            });
        let edits = langs
            .zip(&live.view.surfaces)
            .map(|(lang, node)| InteractionTarget {
                language: lang.clone(),
                kind: InteractionKind::Edit,
                node: node.clone(),
            });
        selects.chain(edits).collect()
    }

    /// Recompute the row count of `lang`'s surface from its current text.
    fn resize(&mut self, lang: &str) -> bool {
        let Some(live) = self.live.as_mut() else {
            return false;
        };
        let Some(idx) = live.options.languages.position(lang) else {
            return false;
        };
        let (Some(surface), Some(current)) = (live.view.surfaces.get(idx), live.rows.get_mut(idx))
        else {
            return false;
        };

        let rows = live.options.rows.rows_for(&self.document.value(surface));
        if *current == rows {
            return false;
        }
        if let Err(err) = self.document.set_attribute(surface, "rows", &rows.to_string()) {
            warn!(language = lang, error = %err, "failed to resize surface");
            return false;
        }
        trace!(language = lang, from = *current, to = rows, "surface resized");
        *current = rows;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::StringMap;
    use crate::view::classes;
    use crate::virtual_dom::VirtualDocument;
    use pretty_assertions::assert_eq;

    fn fixture(name: Option<&str>) -> VirtualDocument {
        let doc = VirtualDocument::new();
        let mut attrs = vec![("id", "notes")];
        if let Some(name) = name {
            attrs.push(("name", name));
        }
        doc.append_element(doc.body(), "textarea", &attrs).unwrap();
        doc
    }

    fn it_en() -> OptionsPatch {
        OptionsPatch::new().texts(StringMap::new().with("it", "ciao").with("en", "hello"))
    }

    #[test]
    fn mount_wraps_and_hides_host() {
        let doc = fixture(Some("description"));
        let editor = LocalizedTextEditor::mount(doc.clone(), "#notes", it_en());
        assert!(!editor.is_inert());

        let host = doc.query_selector("#notes").unwrap().unwrap();
        let wrapper = *editor.wrapper().unwrap();
        assert_eq!(doc.parent(host), Some(wrapper));
        assert_eq!(doc.parent(wrapper), Some(doc.body()));
        assert!(doc.has_class(wrapper, classes::WRAPPER));
        assert_eq!(doc.style_property(host, "display").as_deref(), Some("none"));
        assert_eq!(doc.value(&host), "");
    }

    #[test]
    fn surfaces_are_named_by_host_namespace() {
        let doc = fixture(Some("description"));
        let editor = LocalizedTextEditor::mount(doc.clone(), "#notes", it_en());
        assert_eq!(editor.field_name("en").as_deref(), Some("description[en]"));
        let names: Vec<String> = doc
            .query_selector_all(".textarea-localizer-textarea")
            .unwrap()
            .iter()
            .filter_map(|n| doc.attribute(n, "name"))
            .collect();
        assert_eq!(names, vec!["description[it]", "description[en]"]);
    }

    #[test]
    fn unnamed_host_uses_default_namespace() {
        let doc = fixture(None);
        let editor = LocalizedTextEditor::mount(doc, "#notes", it_en());
        assert_eq!(editor.field_name("it").as_deref(), Some("textarea[it]"));
        assert_eq!(editor.field_name("fr"), None);
    }

    #[test]
    fn try_mount_reports_missing_host() {
        let doc = fixture(None);
        let err = LocalizedTextEditor::try_mount(doc, "#nope", it_en()).unwrap_err();
        assert_eq!(err, MountError::HostNotFound("#nope".into()));
        assert_eq!(err.to_string(), "element #nope not found");
    }

    #[test]
    fn invalid_options_leave_document_untouched() {
        let doc = fixture(None);
        let before = doc.to_html(doc.body());
        let editor =
            LocalizedTextEditor::mount(doc.clone(), "#notes", it_en().default_language("fr"));
        assert!(editor.is_inert());
        assert_eq!(doc.to_html(doc.body()), before);
        let langs: Vec<&str> = editor.languages().iter().map(LanguageCode::as_str).collect();
        assert_eq!(langs, vec!["it", "en"]);
    }

    #[test]
    fn explicit_default_language_starts_active() {
        let doc = fixture(None);
        let editor = LocalizedTextEditor::mount(doc, "#notes", it_en().default_language("en"));
        assert_eq!(editor.active_language().map(LanguageCode::as_str), Some("en"));
    }

    #[test]
    fn icon_click_event_switches_language() {
        let doc = fixture(None);
        let mut editor = LocalizedTextEditor::mount(doc, "#notes", it_en());
        assert!(editor.handle_event(WidgetEvent::IconClicked("en")));
        assert!(!editor.handle_event(WidgetEvent::IconClicked("en")));
        assert!(!editor.handle_event(WidgetEvent::IconClicked("fr")));
        assert_eq!(editor.active_language().map(LanguageCode::as_str), Some("en"));
    }

    #[test]
    fn set_value_recomputes_rows() {
        let doc = fixture(None);
        let mut editor =
            LocalizedTextEditor::mount(doc, "#notes", it_en().rows(1).max_rows(4));
        assert_eq!(editor.rows("en"), Some(1));
        assert!(editor.set_value("en", "a\nb\nc"));
        assert_eq!(editor.rows("en"), Some(3));
        assert!(!editor.set_value("fr", "x"));
    }

    #[test]
    fn interaction_targets_cover_icons_then_surfaces() {
        let doc = fixture(None);
        let editor = LocalizedTextEditor::mount(doc.clone(), "#notes", it_en());
        let targets = editor.interaction_targets();
        let kinds: Vec<(InteractionKind, &str)> = targets
            .iter()
            .map(|t| (t.kind, t.language.as_str()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (InteractionKind::Select, "it"),
                (InteractionKind::Select, "en"),
                (InteractionKind::Edit, "it"),
                (InteractionKind::Edit, "en"),
            ]
        );
        assert!(doc.has_class(targets[0].node, classes::LANGUAGE));
        assert_eq!(targets[3].event(), WidgetEvent::SurfaceInput("en"));
    }

    #[test]
    fn inert_editor_is_empty_and_safe() {
        let doc = VirtualDocument::new();
        let mut editor = LocalizedTextEditor::mount(doc, "#missing", it_en());
        assert!(editor.is_inert());
        assert_eq!(editor.values(), StringMap::new());
        assert_eq!(editor.value("it"), None);
        assert!(!editor.set_value("it", "x"));
        assert_eq!(editor.change_language("en"), SwitchOutcome::Inert);
        assert!(!editor.handle_event(WidgetEvent::SurfaceInput("it")));
        assert!(editor.interaction_targets().is_empty());
        assert_eq!(editor.languages().len(), 2);
    }
}
