#![forbid(unsafe_code)]

//! Multi-language text editor widget for textarea-localizer.
//!
//! The widget wraps a single host text field and renders, next to it, one
//! text surface per configured language plus an icon selector to switch the
//! visible one. All rendering goes through the [`HostDocument`] trait, so the
//! same state machine drives a browser DOM (see `localizer-web`) and the
//! in-memory [`VirtualDocument`] used natively and in tests.
//!
//! # Example
//!
//! ```
//! use localizer_widget::{LocalizedTextEditor, OptionsPatch, StringMap, VirtualDocument};
//!
//! let doc = VirtualDocument::new();
//! doc.append_element(doc.body(), "textarea", &[("id", "bio"), ("name", "bio")])
//!     .unwrap();
//!
//! let texts = StringMap::new().with("it", "").with("en", "hello\nworld");
//! let mut editor = LocalizedTextEditor::mount(
//!     doc,
//!     "#bio",
//!     OptionsPatch::new().texts(texts).rows(3).max_rows(5),
//! );
//!
//! editor.change_language("en");
//! assert_eq!(editor.value("en").as_deref(), Some("hello\nworld"));
//! assert_eq!(editor.field_name("en").as_deref(), Some("bio[en]"));
//! ```

pub mod document;
pub mod editor;
pub mod options;
pub mod rows;
pub mod view;
pub mod virtual_dom;

pub use document::HostDocument;
pub use editor::{
    InteractionKind, InteractionTarget, LocalizedTextEditor, MountError, SwitchOutcome,
    WidgetEvent,
};
pub use localizer_i18n::{LanguageCode, LanguageSet, all_languages};
pub use options::{CustomClasses, LocalizerOptions, OptionsError, OptionsPatch, StringMap};
pub use rows::{RowBounds, line_count};
pub use virtual_dom::{NodeId, VirtualDocument, VirtualDomError};
