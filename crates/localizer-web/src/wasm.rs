#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the localized text editor.
//!
//! Wraps [`LocalizedTextEditor`] over [`WebDocument`] in a JS class and
//! attaches one DOM listener per interaction target. Only compiled on
//! `wasm32` targets.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::{Array, Object, Reflect};
use localizer_widget::{InteractionKind, LocalizedTextEditor, OptionsPatch, WidgetEvent};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::bridge::{EditorSnapshot, parse_options, recover_languages};
use crate::dom::WebDocument;

type SharedEditor = Rc<RefCell<LocalizedTextEditor<WebDocument>>>;

fn console_call(method: &str, msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(func) = Reflect::get(&console, &method.into()) else {
        return;
    };
    let Ok(func) = func.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = func.call1(&console, &JsValue::from_str(msg));
}

fn console_warn(msg: &str) {
    console_call("warn", msg);
}

/// Route Rust panics to `console.error`. Installed once per module.
fn install_panic_hook() {
    static HOOK: std::sync::Once = std::sync::Once::new();
    HOOK.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            console_call("error", &format!("TextareaLocalizer: {info}"));
        }));
    });
}

/// Build the inert fallback for a constructor that could not mount.
fn left_inert(
    document: WebDocument,
    selector: &str,
    reason: &str,
    patch: OptionsPatch,
) -> LocalizedTextEditor<WebDocument> {
    tracing::warn!(selector, reason, "textarea localizer left inert");
    console_warn(&format!("TextareaLocalizer: {selector} left inert: {reason}"));
    LocalizedTextEditor::inert(document, patch)
}

fn js_array_from_strings<'a>(items: impl IntoIterator<Item = &'a str>) -> Array {
    let arr = Array::new();
    for item in items {
        arr.push(&JsValue::from_str(item));
    }
    arr
}

/// Stringify a JS options value; `undefined`/`null` become an empty payload.
fn options_json(options: &JsValue) -> Result<String, String> {
    if options.is_undefined() || options.is_null() {
        return Ok(String::new());
    }
    js_sys::JSON::stringify(options)
        .map(String::from)
        .map_err(|err| format!("options could not be stringified: {err:?}"))
}

/// One registered DOM listener, removed again on drop.
struct Listener {
    target: Element,
    event: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self.target.remove_event_listener_with_callback(
            self.event,
            self.callback.as_ref().unchecked_ref(),
        );
    }
}

fn listen(editor: &SharedEditor) -> Vec<Listener> {
    let targets = editor.borrow().interaction_targets();
    let mut listeners = Vec::with_capacity(targets.len());
    for target in targets {
        let weak: Weak<RefCell<_>> = Rc::downgrade(editor);
        let language = target.language.as_str().to_owned();
        let kind = target.kind;
        let event = match kind {
            InteractionKind::Select => "click",
            InteractionKind::Edit => "input",
        };
        let callback = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            let Some(editor) = weak.upgrade() else {
                return;
            };
            // A handler re-entered from inside another handler is dropped.
            let Ok(mut editor) = editor.try_borrow_mut() else {
                return;
            };
            let event = match kind {
                InteractionKind::Select => WidgetEvent::IconClicked(&language),
                InteractionKind::Edit => WidgetEvent::SurfaceInput(&language),
            };
            editor.handle_event(event);
        }) as Box<dyn FnMut(web_sys::Event)>);

        if let Err(err) = target
            .node
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        {
            console_warn(&format!(
                "TextareaLocalizer: failed to attach {event} listener: {err:?}"
            ));
            continue;
        }
        listeners.push(Listener {
            target: target.node,
            event,
            callback,
        });
    }
    listeners
}

/// Multi-language text editor bound to one host field.
///
/// ```js
/// const editor = new TextareaLocalizer("#description", {
///   texts: { it: "", en: "" },
///   rows: 3,
///   maxRows: 8,
/// });
/// editor.changeLanguage("en");
/// ```
#[wasm_bindgen]
pub struct TextareaLocalizer {
    // Declared first so listeners detach before the editor is dropped.
    _listeners: Vec<Listener>,
    editor: SharedEditor,
}

#[wasm_bindgen]
impl TextareaLocalizer {
    /// Mount onto the first element matching `selector`.
    ///
    /// Never throws. A missing element or unusable options log a console
    /// warning naming the cause and produce an inert instance. Options that
    /// fail to decode still contribute their language list.
    #[wasm_bindgen(constructor)]
    pub fn new(selector: &str, options: JsValue) -> Self {
        install_panic_hook();
        let document = WebDocument::current();

        let editor = match options_json(&options) {
            Err(reason) => left_inert(document, selector, &reason, OptionsPatch::default()),
            Ok(json) => match parse_options(&json) {
                Err(err) => left_inert(
                    document,
                    selector,
                    &err.to_string(),
                    recover_languages(&json),
                ),
                Ok(patch) => {
                    match LocalizedTextEditor::try_mount(document.clone(), selector, patch.clone())
                    {
                        Ok(editor) => editor,
                        Err(err) => left_inert(document, selector, &err.to_string(), patch),
                    }
                }
            },
        };

        let editor = Rc::new(RefCell::new(editor));
        let listeners = listen(&editor);
        Self {
            _listeners: listeners,
            editor,
        }
    }

    /// Languages understood by a default configuration.
    #[wasm_bindgen(js_name = getAllLanguages)]
    pub fn get_all_languages() -> Array {
        let all = localizer_i18n::all_languages();
        js_array_from_strings(all.iter().map(|c| c.as_str()))
    }

    /// Configured languages in order.
    #[wasm_bindgen(js_name = getLanguages)]
    pub fn get_languages(&self) -> Array {
        let editor = self.editor.borrow();
        js_array_from_strings(editor.languages().iter().map(|c| c.as_str()))
    }

    /// Text of `lang`, or `undefined` when not configured.
    #[wasm_bindgen(js_name = getValue)]
    pub fn get_value(&self, lang: &str) -> Option<String> {
        self.editor.borrow().value(lang)
    }

    /// Object mapping every language to its text, in configured order.
    #[wasm_bindgen(js_name = getValues)]
    pub fn get_values(&self) -> Object {
        let out = Object::new();
        for (lang, text) in self.editor.borrow().values().iter() {
            let _ = Reflect::set(&out, &JsValue::from_str(lang), &JsValue::from_str(text));
        }
        out
    }

    /// Overwrite the text of `lang`. Returns `false` when not configured.
    #[wasm_bindgen(js_name = setValue)]
    pub fn set_value(&self, lang: &str, text: &str) -> bool {
        self.editor.borrow_mut().set_value(lang, text)
    }

    /// Make `lang` active. Returns `true` if `lang` is active afterwards.
    #[wasm_bindgen(js_name = changeLanguage)]
    pub fn change_language(&self, lang: &str) -> bool {
        use localizer_widget::SwitchOutcome;

        matches!(
            self.editor.borrow_mut().change_language(lang),
            SwitchOutcome::Switched | SwitchOutcome::AlreadyActive
        )
    }

    /// The active language, or `undefined` on an inert instance.
    #[wasm_bindgen(js_name = activeLanguage)]
    pub fn active_language(&self) -> Option<String> {
        self.editor
            .borrow()
            .active_language()
            .map(|c| c.as_str().to_owned())
    }

    /// Whether mounting failed.
    #[wasm_bindgen(js_name = isInert)]
    pub fn is_inert(&self) -> bool {
        self.editor.borrow().is_inert()
    }

    /// JSON snapshot of languages, active language, values, and row counts.
    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> String {
        let editor = self.editor.borrow();
        EditorSnapshot::capture(&*editor).to_json()
    }
}
