#![forbid(unsafe_code)]

//! Markup built around the host field, and the projection of the active
//! language onto it.
//!
//! Layout produced by [`build`]:
//!
//! ```text
//! div.textarea-localizer
//! ├── div.textarea-localizer-languages      (tabindex=0, --width)
//! │   ├── div.textarea-localizer-current    (indicator)
//! │   │   └── img
//! │   └── div.textarea-localizer-language   (one per language)
//! │       └── img[data-lang]
//! ├── <host field>                          (display: none)
//! └── div.textarea-localizer-textarea-wrapper
//!     └── textarea.textarea-localizer-textarea[data-lang]  (one per language)
//! ```
//!
//! Visibility is never read back from the tree. [`apply`] derives the
//! suppressed icon, the indicator, and the visible surface from the active
//! language index and writes all three in one call.

use localizer_i18n::LanguageCode;

use crate::document::HostDocument;
use crate::options::ResolvedOptions;

/// Class names that make up the styling contract.
pub mod classes {
    pub const WRAPPER: &str = "textarea-localizer";
    pub const SELECTOR: &str = "textarea-localizer-languages";
    pub const INDICATOR: &str = "textarea-localizer-current";
    pub const LANGUAGE: &str = "textarea-localizer-language";
    pub const SURFACES: &str = "textarea-localizer-textarea-wrapper";
    pub const SURFACE: &str = "textarea-localizer-textarea";
    /// Shared class toggled to hide icons and surfaces.
    pub const HIDDEN: &str = "textarea-hidden";
}

/// Field namespace used when the host has no `name`.
pub const DEFAULT_NAMESPACE: &str = "textarea";

/// Icon width in px used for the selector's `--width` variable.
const ICON_WIDTH_PX: usize = 17;
/// Gap between icons in px.
const ICON_GAP_PX: usize = 10;

/// Form field name for one language surface: `<namespace>[<lang>]`.
#[must_use]
pub fn field_name(namespace: &str, lang: &LanguageCode) -> String {
    format!("{namespace}[{lang}]")
}

/// Value of the selector's `--width` custom property for `count` icons.
#[must_use]
pub fn selector_width(count: usize) -> String {
    let px = count * ICON_WIDTH_PX + count.saturating_sub(1) * ICON_GAP_PX;
    format!("{px}px")
}

/// Handles to everything the editor mutates after mount.
#[derive(Debug, Clone)]
pub struct View<N> {
    pub wrapper: N,
    pub indicator_icon: N,
    /// Per-language icon wrappers, indexed like the language set.
    pub icons: Vec<N>,
    /// Per-language surfaces, indexed like the language set.
    pub surfaces: Vec<N>,
}

fn point_indicator<D: HostDocument>(
    doc: &D,
    img: &D::Node,
    options: &ResolvedOptions,
    index: usize,
) -> Result<(), D::Error> {
    let Some(lang) = options.languages.get(index) else {
        return Ok(());
    };
    doc.set_attribute(img, "src", &options.icons.resolve(lang))?;
    doc.set_attribute(img, "alt", lang.as_str())?;
    doc.set_attribute(img, "data-lang", lang.as_str())
}

/// Build the selector and surfaces and wrap `host` in them.
///
/// The subtree is assembled detached and only then put in the host's place,
/// so a failed write leaves the page as it was. `rows[i]` is the initial row
/// count of surface `i`.
pub fn build<D: HostDocument>(
    doc: &D,
    host: &D::Node,
    options: &ResolvedOptions,
    namespace: &str,
    active: usize,
    rows: &[u32],
) -> Result<View<D::Node>, D::Error> {
    let wrapper = doc.create_element("div")?;
    doc.toggle_class(&wrapper, classes::WRAPPER, true)?;

    let selector = doc.create_element("div")?;
    doc.toggle_class(&selector, classes::SELECTOR, true)?;
    doc.set_attribute(&selector, "tabindex", "0")?;
    doc.set_style_property(&selector, "--width", &selector_width(options.languages.len()))?;
    doc.append_child(&wrapper, &selector)?;

    let indicator = doc.create_element("div")?;
    doc.toggle_class(&indicator, classes::INDICATOR, true)?;
    doc.append_child(&selector, &indicator)?;
    let indicator_icon = doc.create_element("img")?;
    doc.append_child(&indicator, &indicator_icon)?;
    point_indicator(doc, &indicator_icon, options, active)?;

    let mut icons = Vec::with_capacity(options.languages.len());
    for (idx, lang) in options.languages.iter().enumerate() {
        let item = doc.create_element("div")?;
        doc.toggle_class(&item, classes::LANGUAGE, true)?;
        doc.toggle_class(&item, classes::HIDDEN, idx == active)?;
        let img = doc.create_element("img")?;
        doc.set_attribute(&img, "src", &options.icons.resolve(lang))?;
        doc.set_attribute(&img, "alt", lang.as_str())?;
        doc.set_attribute(&img, "data-lang", lang.as_str())?;
        doc.append_child(&item, &img)?;
        doc.append_child(&selector, &item)?;
        icons.push(item);
    }

    let surface_wrapper = doc.create_element("div")?;
    doc.toggle_class(&surface_wrapper, classes::SURFACES, true)?;
    doc.append_child(&wrapper, &surface_wrapper)?;

    let mut surfaces = Vec::with_capacity(options.languages.len());
    for (idx, lang) in options.languages.iter().enumerate() {
        let surface = doc.create_element("textarea")?;
        doc.toggle_class(&surface, classes::SURFACE, true)?;
        for class in &options.textarea_classes {
            doc.toggle_class(&surface, class, true)?;
        }
        doc.toggle_class(&surface, classes::HIDDEN, idx != active)?;
        doc.set_attribute(&surface, "data-lang", lang.as_str())?;
        doc.set_attribute(&surface, "name", &field_name(namespace, lang))?;
        let rows = rows.get(idx).copied().unwrap_or(options.rows.min());
        doc.set_attribute(&surface, "rows", &rows.to_string())?;
        doc.set_value(&surface, options.texts.get(idx).map_or("", String::as_str))?;
        doc.append_child(&surface_wrapper, &surface)?;
        surfaces.push(surface);
    }

    attach(doc, host, &wrapper, &surface_wrapper)?;

    Ok(View {
        wrapper,
        indicator_icon,
        icons,
        surfaces,
    })
}

/// Put `wrapper` where `host` stands, move `host` in front of `before` and
/// hide it. Undoes the moves if a later step fails.
fn attach<D: HostDocument>(
    doc: &D,
    host: &D::Node,
    wrapper: &D::Node,
    before: &D::Node,
) -> Result<(), D::Error> {
    doc.insert_before(wrapper, host)?;
    let moved = doc
        .insert_before(host, before)
        .and_then(|()| doc.set_style_property(host, "display", "none"));
    if let Err(err) = moved {
        // Best effort: the original error is the one worth reporting.
        let _ = doc.insert_before(host, wrapper);
        let _ = doc.remove(wrapper);
        return Err(err);
    }
    Ok(())
}

/// Move every projection from `previous` to `active`.
///
/// Only the elements of the two languages involved are written, and each is
/// set to its state under `active`. A call that stops early can therefore be
/// undone by applying `active` to `previous`, and `previous == active`
/// rewrites the same state.
pub fn apply<D: HostDocument>(
    doc: &D,
    view: &View<D::Node>,
    options: &ResolvedOptions,
    previous: usize,
    active: usize,
) -> Result<(), D::Error> {
    let pair = [previous, active];
    let touched = if previous == active {
        &pair[1..]
    } else {
        &pair[..]
    };

    for &idx in touched {
        if let Some(icon) = view.icons.get(idx) {
            doc.toggle_class(icon, classes::HIDDEN, idx == active)?;
        }
    }
    point_indicator(doc, &view.indicator_icon, options, active)?;
    for &idx in touched {
        if let Some(surface) = view.surfaces.get(idx) {
            doc.toggle_class(surface, classes::HIDDEN, idx != active)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_width_matches_icon_grid() {
        assert_eq!(selector_width(0), "0px");
        assert_eq!(selector_width(1), "17px");
        assert_eq!(selector_width(3), "71px");
    }

    #[test]
    fn field_names_are_namespaced() {
        let en = LanguageCode::new("en").unwrap();
        assert_eq!(field_name("description", &en), "description[en]");
        assert_eq!(field_name(DEFAULT_NAMESPACE, &en), "textarea[en]");
    }
}
