#![forbid(unsafe_code)]

//! In-memory element tree implementing [`HostDocument`].
//!
//! Deterministic and headless: used natively and by every test that drives
//! the editor. Handles are indices into a shared arena, so cloning a
//! [`VirtualDocument`] yields another handle onto the same tree, the same way
//! two `web_sys::Document` values refer to one page.
//!
//! Selector support is deliberately small: a compound selector made of an
//! optional tag name followed by any number of `#id` and `.class` parts
//! (`textarea`, `#notes`, `div.card`, `textarea#notes.big`).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::document::HostDocument;

/// Handle to an element in a [`VirtualDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Virtual document error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VirtualDomError {
    /// The handle does not belong to this document.
    UnknownNode(NodeId),
    /// The reference node has no parent to insert next to.
    Detached(NodeId),
    /// The move would make a node its own ancestor.
    Cycle(NodeId),
    /// The selector is empty or uses unsupported syntax.
    InvalidSelector(String),
    /// The tag name is empty or not alphanumeric.
    InvalidTag(String),
}

impl fmt::Display for VirtualDomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode(id) => write!(f, "unknown node {}", id.0),
            Self::Detached(id) => write!(f, "node {} has no parent", id.0),
            Self::Cycle(id) => write!(f, "moving node {} would create a cycle", id.0),
            Self::InvalidSelector(sel) => write!(f, "invalid selector {sel:?}"),
            Self::InvalidTag(tag) => write!(f, "invalid tag name {tag:?}"),
        }
    }
}

impl std::error::Error for VirtualDomError {}

#[derive(Debug, Clone, Default)]
struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    classes: Vec<String>,
    style: Vec<(String, String)>,
    value: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    fn id(&self) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == "id")
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Default)]
struct Arena {
    nodes: Vec<Element>,
}

impl Arena {
    fn get(&self, id: NodeId) -> Result<&Element, VirtualDomError> {
        self.nodes.get(id.0).ok_or(VirtualDomError::UnknownNode(id))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Element, VirtualDomError> {
        self.nodes.get_mut(id.0).ok_or(VirtualDomError::UnknownNode(id))
    }

    fn is_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.nodes.get(node.0).and_then(|el| el.parent) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    fn detach(&mut self, id: NodeId) -> Result<(), VirtualDomError> {
        if let Some(parent) = self.get(id)?.parent {
            self.get_mut(parent)?.children.retain(|&c| c != id);
        }
        self.get_mut(id)?.parent = None;
        Ok(())
    }

    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(el) = self.nodes.get(id.0) {
                stack.extend(el.children.iter().rev().copied());
            }
        }
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    fn parse(raw: &str) -> Result<Self, VirtualDomError> {
        let invalid = || VirtualDomError::InvalidSelector(raw.to_owned());
        let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_';
        if raw.is_empty() {
            return Err(invalid());
        }

        let mut sel = Self::default();
        let tag_end = raw.find(['#', '.']).unwrap_or(raw.len());
        let tag = &raw[..tag_end];
        if !tag.is_empty() {
            if !tag.chars().all(is_ident) {
                return Err(invalid());
            }
            sel.tag = Some(tag.to_ascii_lowercase());
        }

        let mut rest = &raw[tag_end..];
        while let Some(marker) = rest.chars().next() {
            rest = &rest[1..];
            let end = rest.find(['#', '.']).unwrap_or(rest.len());
            let name = &rest[..end];
            if name.is_empty() || !name.chars().all(is_ident) {
                return Err(invalid());
            }
            match marker {
                '#' if sel.id.is_none() => sel.id = Some(name.to_owned()),
                '.' => sel.classes.push(name.to_owned()),
                _ => return Err(invalid()),
            }
            rest = &rest[end..];
        }
        Ok(sel)
    }

    fn matches(&self, el: &Element) -> bool {
        self.tag.as_deref().is_none_or(|tag| el.tag == tag)
            && self.id.as_deref().is_none_or(|id| el.id() == Some(id))
            && self.classes.iter().all(|c| el.classes.contains(c))
    }
}

/// Shared in-memory document with a `body` root.
#[derive(Debug, Clone)]
pub struct VirtualDocument {
    arena: Rc<RefCell<Arena>>,
}

impl Default for VirtualDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualDocument {
    /// Create a document holding an empty `body`.
    #[must_use]
    pub fn new() -> Self {
        let arena = Arena {
            nodes: vec![Element::new("body")],
        };
        Self {
            arena: Rc::new(RefCell::new(arena)),
        }
    }

    /// The root element.
    #[must_use]
    pub const fn body(&self) -> NodeId {
        NodeId(0)
    }

    /// Create an element with `attributes` and append it to `parent`.
    ///
    /// Fixture helper; `class` and `style` attributes are parsed like the
    /// browser would.
    pub fn append_element(
        &self,
        parent: NodeId,
        tag: &str,
        attributes: &[(&str, &str)],
    ) -> Result<NodeId, VirtualDomError> {
        let node = self.create_element(tag)?;
        for (name, value) in attributes {
            self.set_attribute(&node, name, value)?;
        }
        self.append_child(&parent, &node)?;
        Ok(node)
    }

    /// All elements matching `selector`, in document order.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, VirtualDomError> {
        let sel = Selector::parse(selector)?;
        let arena = self.arena.borrow();
        Ok(arena
            .descendants(self.body())
            .into_iter()
            .filter(|id| arena.nodes.get(id.0).is_some_and(|el| sel.matches(el)))
            .collect())
    }

    /// Whether `node` carries `class`.
    #[must_use]
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.arena
            .borrow()
            .get(node)
            .is_ok_and(|el| el.classes.iter().any(|c| c == class))
    }

    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena.borrow().get(node).ok().and_then(|el| el.parent)
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.arena
            .borrow()
            .get(node)
            .map(|el| el.children.clone())
            .unwrap_or_default()
    }

    /// Inline style property value.
    #[must_use]
    pub fn style_property(&self, node: NodeId, property: &str) -> Option<String> {
        let arena = self.arena.borrow();
        let el = arena.get(node).ok()?;
        el.style
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.clone())
    }

    /// Simulate the user replacing the text of an editable element.
    ///
    /// Only the text changes; whoever dispatches input events must notify the
    /// editor afterwards, as a browser `input` listener would.
    pub fn type_text(&self, node: NodeId, text: &str) -> Result<(), VirtualDomError> {
        self.set_value(&node, text)
    }

    /// Serialize the subtree rooted at `node` as HTML.
    #[must_use]
    pub fn to_html(&self, node: NodeId) -> String {
        let arena = self.arena.borrow();
        let mut out = String::new();
        write_html(&arena, node, &mut out);
        out
    }
}

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

fn write_html(arena: &Arena, node: NodeId, out: &mut String) {
    let Ok(el) = arena.get(node) else {
        return;
    };
    out.push('<');
    out.push_str(&el.tag);
    if !el.classes.is_empty() {
        out.push_str(" class=\"");
        escape_into(out, &el.classes.join(" "));
        out.push('"');
    }
    if !el.style.is_empty() {
        let style: Vec<String> = el.style.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        out.push_str(" style=\"");
        escape_into(out, &style.join("; "));
        out.push('"');
    }
    for (k, v) in &el.attributes {
        out.push(' ');
        out.push_str(k);
        out.push_str("=\"");
        escape_into(out, v);
        out.push('"');
    }
    if el.tag == "img" {
        out.push('>');
        return;
    }
    out.push('>');
    escape_into(out, &el.value);
    for &child in &el.children {
        write_html(arena, child, out);
    }
    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
}

fn parse_style(raw: &str) -> Vec<(String, String)> {
    raw.split(';')
        .filter_map(|decl| {
            let (k, v) = decl.split_once(':')?;
            let (k, v) = (k.trim(), v.trim());
            (!k.is_empty()).then(|| (k.to_owned(), v.to_owned()))
        })
        .collect()
}

impl HostDocument for VirtualDocument {
    type Node = NodeId;
    type Error = VirtualDomError;

    fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, VirtualDomError> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    fn create_element(&self, tag: &str) -> Result<NodeId, VirtualDomError> {
        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(VirtualDomError::InvalidTag(tag.to_owned()));
        }
        let mut arena = self.arena.borrow_mut();
        arena.nodes.push(Element::new(tag));
        Ok(NodeId(arena.nodes.len() - 1))
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        let arena = self.arena.borrow();
        let el = arena.get(*node).ok()?;
        match name {
            "class" if !el.classes.is_empty() => Some(el.classes.join(" ")),
            "class" => None,
            _ => el
                .attributes
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone()),
        }
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) -> Result<(), VirtualDomError> {
        let mut arena = self.arena.borrow_mut();
        let el = arena.get_mut(*node)?;
        match name {
            "class" => el.classes = value.split_whitespace().map(str::to_owned).collect(),
            "style" => el.style = parse_style(value),
            _ => match el.attributes.iter_mut().find(|(k, _)| k == name) {
                Some(entry) => entry.1 = value.to_owned(),
                None => el.attributes.push((name.to_owned(), value.to_owned())),
            },
        }
        Ok(())
    }

    fn toggle_class(&self, node: &NodeId, class: &str, present: bool) -> Result<(), VirtualDomError> {
        let mut arena = self.arena.borrow_mut();
        let el = arena.get_mut(*node)?;
        let has = el.classes.iter().any(|c| c == class);
        if present && !has {
            el.classes.push(class.to_owned());
        } else if !present && has {
            el.classes.retain(|c| c != class);
        }
        Ok(())
    }

    fn set_style_property(
        &self,
        node: &NodeId,
        property: &str,
        value: &str,
    ) -> Result<(), VirtualDomError> {
        let mut arena = self.arena.borrow_mut();
        let el = arena.get_mut(*node)?;
        match el.style.iter_mut().find(|(k, _)| k == property) {
            Some(entry) => entry.1 = value.to_owned(),
            None => el.style.push((property.to_owned(), value.to_owned())),
        }
        Ok(())
    }

    fn insert_before(&self, node: &NodeId, reference: &NodeId) -> Result<(), VirtualDomError> {
        let mut arena = self.arena.borrow_mut();
        let parent = arena
            .get(*reference)?
            .parent
            .ok_or(VirtualDomError::Detached(*reference))?;
        arena.get(*node)?;
        if arena.is_ancestor(*node, parent) {
            return Err(VirtualDomError::Cycle(*node));
        }
        arena.detach(*node)?;
        let siblings = &mut arena.get_mut(parent)?.children;
        let at = siblings
            .iter()
            .position(|c| c == reference)
            .unwrap_or(siblings.len());
        siblings.insert(at, *node);
        arena.get_mut(*node)?.parent = Some(parent);
        Ok(())
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<(), VirtualDomError> {
        let mut arena = self.arena.borrow_mut();
        arena.get(*parent)?;
        arena.get(*child)?;
        if arena.is_ancestor(*child, *parent) {
            return Err(VirtualDomError::Cycle(*child));
        }
        arena.detach(*child)?;
        arena.get_mut(*parent)?.children.push(*child);
        arena.get_mut(*child)?.parent = Some(*parent);
        Ok(())
    }

    fn remove(&self, node: &NodeId) -> Result<(), VirtualDomError> {
        self.arena.borrow_mut().detach(*node)
    }

    fn value(&self, node: &NodeId) -> String {
        self.arena
            .borrow()
            .get(*node)
            .map(|el| el.value.clone())
            .unwrap_or_default()
    }

    fn set_value(&self, node: &NodeId, value: &str) -> Result<(), VirtualDomError> {
        let mut arena = self.arena.borrow_mut();
        arena.get_mut(*node)?.value = value.to_owned();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn selector_parsing() {
        assert_eq!(
            Selector::parse("textarea#notes.big.wide").unwrap(),
            Selector {
                tag: Some("textarea".into()),
                id: Some("notes".into()),
                classes: vec!["big".into(), "wide".into()],
            }
        );
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("#").is_err());
        assert!(Selector::parse("div > p").is_err());
        assert!(Selector::parse("#a#b").is_err());
    }

    #[test]
    fn query_finds_first_match_in_document_order() {
        let doc = VirtualDocument::new();
        let outer = doc
            .append_element(doc.body(), "div", &[("class", "card")])
            .unwrap();
        let inner = doc
            .append_element(outer, "textarea", &[("id", "a"), ("class", "field")])
            .unwrap();
        let later = doc
            .append_element(doc.body(), "textarea", &[("id", "b"), ("class", "field")])
            .unwrap();

        assert_eq!(doc.query_selector(".field").unwrap(), Some(inner));
        assert_eq!(doc.query_selector("#b").unwrap(), Some(later));
        assert_eq!(doc.query_selector("textarea#missing").unwrap(), None);
        assert_eq!(doc.query_selector_all("textarea").unwrap(), vec![inner, later]);
    }

    #[test]
    fn insert_before_moves_node_next_to_reference() {
        let doc = VirtualDocument::new();
        let a = doc.append_element(doc.body(), "p", &[]).unwrap();
        let b = doc.append_element(doc.body(), "p", &[]).unwrap();
        let wrapper = doc.create_element("div").unwrap();

        doc.insert_before(&wrapper, &b).unwrap();
        assert_eq!(doc.children(doc.body()), vec![a, wrapper, b]);

        doc.append_child(&wrapper, &b).unwrap();
        assert_eq!(doc.children(doc.body()), vec![a, wrapper]);
        assert_eq!(doc.children(wrapper), vec![b]);
        assert_eq!(doc.parent(b), Some(wrapper));
    }

    #[test]
    fn remove_detaches_subtree() {
        let doc = VirtualDocument::new();
        let outer = doc.append_element(doc.body(), "div", &[]).unwrap();
        let inner = doc.append_element(outer, "p", &[("id", "x")]).unwrap();

        doc.remove(&outer).unwrap();
        assert!(doc.children(doc.body()).is_empty());
        assert_eq!(doc.parent(outer), None);
        assert_eq!(doc.parent(inner), Some(outer));
        assert_eq!(doc.query_selector("#x").unwrap(), None);
        doc.remove(&outer).unwrap();
    }

    #[test]
    fn cycles_and_detached_references_are_rejected() {
        let doc = VirtualDocument::new();
        let outer = doc.append_element(doc.body(), "div", &[]).unwrap();
        let inner = doc.append_element(outer, "div", &[]).unwrap();
        assert_eq!(
            doc.append_child(&inner, &outer),
            Err(VirtualDomError::Cycle(outer))
        );
        let loose = doc.create_element("div").unwrap();
        assert_eq!(
            doc.insert_before(&outer, &loose),
            Err(VirtualDomError::Detached(loose))
        );
    }

    #[test]
    fn class_toggle_is_idempotent() {
        let doc = VirtualDocument::new();
        let n = doc.append_element(doc.body(), "div", &[("class", "a")]).unwrap();
        doc.toggle_class(&n, "hidden", true).unwrap();
        doc.toggle_class(&n, "hidden", true).unwrap();
        assert_eq!(doc.attribute(&n, "class").as_deref(), Some("a hidden"));
        doc.toggle_class(&n, "hidden", false).unwrap();
        doc.toggle_class(&n, "hidden", false).unwrap();
        assert_eq!(doc.attribute(&n, "class").as_deref(), Some("a"));
    }

    #[test]
    fn html_serialization_escapes_values() {
        let doc = VirtualDocument::new();
        let ta = doc
            .append_element(doc.body(), "textarea", &[("name", "a\"b"), ("style", "display: none")])
            .unwrap();
        doc.type_text(ta, "<hi> & bye").unwrap();
        assert_eq!(
            doc.to_html(ta),
            r#"<textarea style="display: none" name="a&quot;b">&lt;hi&gt; &amp; bye</textarea>"#
        );
        assert_eq!(doc.style_property(ta, "display").as_deref(), Some("none"));
    }
}
