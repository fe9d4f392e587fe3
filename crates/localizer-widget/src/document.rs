#![forbid(unsafe_code)]

//! Host document abstraction.
//!
//! This is the boundary between the editor state machine and the tree it
//! renders into. The browser binding implements it over `web-sys`; the
//! in-memory [`VirtualDocument`](crate::virtual_dom::VirtualDocument) backs
//! native use and tests. The editor never touches a DOM API directly.
//!
//! Methods take `&self`: document handles are shared references to a tree
//! owned elsewhere (the page, or an `Rc` arena).

use core::fmt;

/// Minimal element-tree operations the editor needs.
pub trait HostDocument {
    /// Handle to one element. Cheap to clone.
    type Node: Clone + fmt::Debug;

    /// Platform-specific error type.
    type Error: fmt::Debug + fmt::Display;

    /// First element matching `selector` in document order.
    ///
    /// `Ok(None)` when nothing matches; `Err` when the selector is invalid.
    fn query_selector(&self, selector: &str) -> Result<Option<Self::Node>, Self::Error>;

    /// Create a detached element.
    fn create_element(&self, tag: &str) -> Result<Self::Node, Self::Error>;

    /// Read an attribute.
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Set an attribute, replacing any previous value.
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str)
    -> Result<(), Self::Error>;

    /// Add (`present = true`) or remove a class. Idempotent.
    fn toggle_class(&self, node: &Self::Node, class: &str, present: bool)
    -> Result<(), Self::Error>;

    /// Set one inline style property (including custom properties like `--width`).
    fn set_style_property(
        &self,
        node: &Self::Node,
        property: &str,
        value: &str,
    ) -> Result<(), Self::Error>;

    /// Move `node` so it becomes the sibling immediately before `reference`.
    fn insert_before(&self, node: &Self::Node, reference: &Self::Node) -> Result<(), Self::Error>;

    /// Move `child` to the end of `parent`'s children.
    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;

    /// Detach `node` from its parent. A detached node is left as is.
    fn remove(&self, node: &Self::Node) -> Result<(), Self::Error>;

    /// Current text of an editable element.
    fn value(&self, node: &Self::Node) -> String;

    /// Replace the text of an editable element.
    fn set_value(&self, node: &Self::Node, value: &str) -> Result<(), Self::Error>;
}
