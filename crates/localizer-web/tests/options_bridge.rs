#![forbid(unsafe_code)]

//! Host-side flow without a browser: JS-style option payloads decoded by the
//! bridge and mounted onto the virtual document.

use localizer_web::bridge::{BridgeError, EditorSnapshot, parse_options};
use localizer_widget::{LocalizedTextEditor, VirtualDocument, WidgetEvent};
use pretty_assertions::assert_eq;

fn page() -> VirtualDocument {
    let doc = VirtualDocument::new();
    doc.append_element(doc.body(), "textarea", &[("id", "desc"), ("name", "description")])
        .unwrap();
    doc
}

#[test]
fn payload_drives_initial_state() {
    let patch = parse_options(r#"{"texts":{"it":"","en":"hello\nworld"},"rows":3,"maxRows":5}"#)
        .unwrap();
    let editor = LocalizedTextEditor::mount(page(), "#desc", patch);
    let snap = EditorSnapshot::capture(&editor);

    assert!(!snap.inert);
    assert_eq!(snap.languages, vec!["it", "en"]);
    assert_eq!(snap.active.as_deref(), Some("it"));
    assert_eq!(snap.rows, vec![Some(3), Some(3)]);
    assert_eq!(editor.field_name("en").as_deref(), Some("description[en]"));
}

#[test]
fn legacy_languages_key_still_mounts() {
    let patch = parse_options(r#"{"languages":["en","fr"],"custom_classes":{"textarea":"x"}}"#)
        .unwrap();
    let mut editor = LocalizedTextEditor::mount(page(), "#desc", patch);
    assert!(editor.handle_event(WidgetEvent::IconClicked("fr")));

    let snap = EditorSnapshot::capture(&editor);
    assert_eq!(snap.languages, vec!["en", "fr"]);
    assert_eq!(snap.active.as_deref(), Some("fr"));
    assert_eq!(snap.values.get("fr"), Some(""));
}

#[test]
fn undecodable_payload_yields_typed_error() {
    assert_eq!(parse_options("42"), Err(BridgeError::NotAnObject("number")));
    let err = parse_options(r#"{"maxRows":-1}"#).unwrap_err();
    assert!(err.to_string().starts_with("invalid options:"), "{err}");
}

#[test]
fn inert_causes_are_distinguishable() {
    let missing = LocalizedTextEditor::try_mount(page(), "#other", parse_options("{}").unwrap())
        .unwrap_err();
    assert_eq!(missing.to_string(), "element #other not found");

    let bad_default = parse_options(r#"{"texts":{"it":""},"defaultLanguage":"en"}"#).unwrap();
    let rejected = LocalizedTextEditor::try_mount(page(), "#desc", bad_default).unwrap_err();
    assert_eq!(rejected.to_string(), r#"default language "en" is not configured"#);

    let undecodable = parse_options(r#"{"rows":"3"}"#).unwrap_err();
    assert!(undecodable.to_string().starts_with("invalid options:"), "{undecodable}");
}
