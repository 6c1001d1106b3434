//! Retouch WASM - WebAssembly bindings for the Retouch editing engine
//!
//! This crate exposes `retouch-core`'s edit engine to a browser UI.
//!
//! # Module Structure
//!
//! - `engine` - `JsEditEngine`: load, apply, undo/redo, save, history inspection
//! - `types` - WASM-compatible wrapper for image buffers, output format metadata
//! - `display` - Conversion of any buffer layout to RGBA for a canvas
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditEngine } from '@retouch/wasm';
//!
//! await init();
//!
//! const engine = new JsEditEngine();
//! const image = engine.load(new Uint8Array(await file.arrayBuffer()));
//! console.log(`Loaded ${image.width}x${image.height}`);
//! ```

use wasm_bindgen::prelude::*;

pub mod display;
mod engine;
mod types;

pub use engine::JsEditEngine;
pub use types::{format_extension, format_mime_type, JsImageBuffer};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
