#![forbid(unsafe_code)]

//! Browser binding for textarea-localizer.
//!
//! This crate provides `TextareaLocalizer`, a `wasm-bindgen`-exported class
//! that mounts a [`localizer_widget::LocalizedTextEditor`] onto the page DOM
//! and forwards clicks and edits to it.
//!
//! The option decoding in [`bridge`] is plain Rust and compiled everywhere so
//! it can be tested natively; the DOM binding and exports only exist on
//! `wasm32`.

pub mod bridge;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use dom::{DomError, WebDocument};
#[cfg(target_arch = "wasm32")]
pub use wasm::TextareaLocalizer;
