#![forbid(unsafe_code)]

//! [`HostDocument`] over the browser DOM. Only compiled on `wasm32` targets.

use std::fmt;

use localizer_widget::HostDocument;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlTextAreaElement};

/// A DOM call that threw.
#[derive(Debug, Clone)]
pub struct DomError(String);

impl DomError {
    fn from_js(context: &str, value: &JsValue) -> Self {
        let detail = value
            .as_string()
            .or_else(|| {
                value
                    .dyn_ref::<js_sys::Error>()
                    .map(|err| String::from(err.message()))
            })
            .unwrap_or_else(|| format!("{value:?}"));
        Self(format!("{context}: {detail}"))
    }
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for DomError {}

/// The page's document, if the global scope has one.
#[derive(Debug, Clone)]
pub struct WebDocument {
    document: Option<Document>,
}

impl WebDocument {
    /// Bind to `window.document`. Workers and other windowless scopes yield
    /// a document on which every query comes back empty.
    #[must_use]
    pub fn current() -> Self {
        Self {
            document: web_sys::window().and_then(|w| w.document()),
        }
    }

    fn document(&self) -> Result<&Document, DomError> {
        self.document
            .as_ref()
            .ok_or_else(|| DomError(String::from("no document in this global scope")))
    }
}

impl HostDocument for WebDocument {
    type Node = Element;
    type Error = DomError;

    fn query_selector(&self, selector: &str) -> Result<Option<Element>, DomError> {
        let Some(document) = self.document.as_ref() else {
            return Ok(None);
        };
        document
            .query_selector(selector)
            .map_err(|err| DomError::from_js("querySelector", &err))
    }

    fn create_element(&self, tag: &str) -> Result<Element, DomError> {
        self.document()?
            .create_element(tag)
            .map_err(|err| DomError::from_js("createElement", &err))
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) -> Result<(), DomError> {
        node.set_attribute(name, value)
            .map_err(|err| DomError::from_js("setAttribute", &err))
    }

    fn toggle_class(&self, node: &Element, class: &str, present: bool) -> Result<(), DomError> {
        node.class_list()
            .toggle_with_force(class, present)
            .map(|_| ())
            .map_err(|err| DomError::from_js("classList.toggle", &err))
    }

    fn set_style_property(
        &self,
        node: &Element,
        property: &str,
        value: &str,
    ) -> Result<(), DomError> {
        let Some(html) = node.dyn_ref::<HtmlElement>() else {
            return Err(DomError(String::from("style on a non-HTML element")));
        };
        html.style()
            .set_property(property, value)
            .map_err(|err| DomError::from_js("style.setProperty", &err))
    }

    fn insert_before(&self, node: &Element, reference: &Element) -> Result<(), DomError> {
        let parent = reference
            .parent_node()
            .ok_or_else(|| DomError(String::from("reference element has no parent")))?;
        parent
            .insert_before(node, Some(reference))
            .map(|_| ())
            .map_err(|err| DomError::from_js("insertBefore", &err))
    }

    fn append_child(&self, parent: &Element, child: &Element) -> Result<(), DomError> {
        parent
            .append_child(child)
            .map(|_| ())
            .map_err(|err| DomError::from_js("appendChild", &err))
    }

    fn remove(&self, node: &Element) -> Result<(), DomError> {
        node.remove();
        Ok(())
    }

    fn value(&self, node: &Element) -> String {
        if let Some(area) = node.dyn_ref::<HtmlTextAreaElement>() {
            return area.value();
        }
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            return input.value();
        }
        node.text_content().unwrap_or_default()
    }

    fn set_value(&self, node: &Element, value: &str) -> Result<(), DomError> {
        if let Some(area) = node.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
        } else if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else {
            node.set_text_content(Some(value));
        }
        Ok(())
    }
}
