//! Edit engine bindings.
//!
//! `JsEditEngine` owns one document. Every method that changes the image
//! returns a fresh `JsImageBuffer` copy of the new current image.
//!
//! # Example
//!
//! ```typescript
//! import { JsEditEngine } from '@retouch/wasm';
//!
//! const engine = new JsEditEngine({ history_limit: 50 });
//! engine.load(new Uint8Array(await file.arrayBuffer()));
//!
//! engine.apply({ kind: 'blur', kernel_size: 5 });
//! const img = engine.rotate(15);
//! ctx.putImageData(new ImageData(new Uint8ClampedArray(img.rgba()), img.width), 0, 0);
//!
//! engine.undo(); // undefined when there is nothing to undo
//! const png = engine.save('png');
//! ```

use retouch_core::{
    load_font, Color, EditEngine, EditError, EditOperation, EditorConfig, EncodeError,
    HistoryStep, Point, StandardOps,
};
use wasm_bindgen::prelude::*;

use crate::types::{format_from_str, JsImageBuffer};

fn js_error(err: EditError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// `undefined`/`null` give the defaults; anything else must deserialize
/// as a (partial) `EditorConfig`.
fn parse_config(config: JsValue) -> Result<EditorConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(EditorConfig::default());
    }
    serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))
}

/// Image editing session with linear undo/redo.
#[wasm_bindgen]
pub struct JsEditEngine {
    inner: EditEngine,
}

#[wasm_bindgen]
impl JsEditEngine {
    /// Create an engine. `config` may be `undefined` or a partial
    /// `EditorConfig` object; missing fields use their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsEditEngine, JsValue> {
        Self::with_config(parse_config(config)?).map_err(js_error)
    }

    /// Create an engine that renders text annotations with a TrueType or
    /// OpenType font instead of the built-in bitmap glyphs.
    pub fn with_font(config: JsValue, font: Vec<u8>) -> Result<JsEditEngine, JsValue> {
        Self::with_config_and_font(parse_config(config)?, font).map_err(js_error)
    }

    /// Decode and open an image (PNG, JPEG or BMP).
    pub fn load(&mut self, bytes: &[u8]) -> Result<JsImageBuffer, JsValue> {
        self.inner.load(bytes).map(JsImageBuffer::from).map_err(js_error)
    }

    /// Open raw pixels as a new document.
    pub fn load_image(&mut self, image: &JsImageBuffer) -> JsImageBuffer {
        JsImageBuffer::from(self.inner.load_buffer(image.as_buffer().clone()))
    }

    /// Apply an operation object such as `{ kind: 'rotate', angle: 30 }`.
    pub fn apply(&mut self, op: JsValue) -> Result<JsImageBuffer, JsValue> {
        let op: EditOperation = serde_wasm_bindgen::from_value(op)
            .map_err(|e| JsValue::from_str(&format!("Invalid operation: {}", e)))?;
        self.run(op).map_err(js_error)
    }

    pub fn grayscale(&mut self) -> Result<JsImageBuffer, JsValue> {
        self.run(EditOperation::Grayscale).map_err(js_error)
    }

    /// Gaussian blur. Even sizes are rounded up to the next odd size.
    pub fn blur(&mut self, kernel_size: u32) -> Result<JsImageBuffer, JsValue> {
        self.run(EditOperation::Blur { kernel_size }).map_err(js_error)
    }

    /// Canny edge map (single channel).
    pub fn edge_detect(
        &mut self,
        threshold1: f32,
        threshold2: f32,
    ) -> Result<JsImageBuffer, JsValue> {
        self.run(EditOperation::EdgeDetect {
            threshold1,
            threshold2,
        })
        .map_err(js_error)
    }

    /// Rotate by `angle` degrees counter-clockwise, keeping the canvas size.
    pub fn rotate(&mut self, angle: f64) -> Result<JsImageBuffer, JsValue> {
        self.run(EditOperation::Rotate { angle }).map_err(js_error)
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<JsImageBuffer, JsValue> {
        self.run(EditOperation::Resize { width, height })
            .map_err(js_error)
    }

    /// Brightness in [-255, 255], contrast in [-127, 127].
    pub fn brightness_contrast(
        &mut self,
        brightness: f64,
        contrast: f64,
    ) -> Result<JsImageBuffer, JsValue> {
        self.run(EditOperation::BrightnessContrast {
            brightness,
            contrast,
        })
        .map_err(js_error)
    }

    /// Draw text with its bottom-left corner at `(x, y)`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_text(
        &mut self,
        text: String,
        x: i32,
        y: i32,
        font_scale: f64,
        r: u8,
        g: u8,
        b: u8,
    ) -> Result<JsImageBuffer, JsValue> {
        self.run(EditOperation::DrawText {
            text,
            origin: Point::new(x, y),
            font_scale,
            color: Color::new(r, g, b),
        })
        .map_err(js_error)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_line(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        r: u8,
        g: u8,
        b: u8,
    ) -> Result<JsImageBuffer, JsValue> {
        self.run(EditOperation::DrawLine {
            from: Point::new(x0, y0),
            to: Point::new(x1, y1),
            color: Color::new(r, g, b),
        })
        .map_err(js_error)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        r: u8,
        g: u8,
        b: u8,
    ) -> Result<JsImageBuffer, JsValue> {
        self.run(EditOperation::DrawRect {
            origin: Point::new(x, y),
            width,
            height,
            color: Color::new(r, g, b),
        })
        .map_err(js_error)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_circle(
        &mut self,
        cx: i32,
        cy: i32,
        radius: u32,
        r: u8,
        g: u8,
        b: u8,
    ) -> Result<JsImageBuffer, JsValue> {
        self.run(EditOperation::DrawCircle {
            center: Point::new(cx, cy),
            radius,
            color: Color::new(r, g, b),
        })
        .map_err(js_error)
    }

    /// Step back. Returns `undefined` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<JsImageBuffer> {
        step(self.inner.undo())
    }

    /// Step forward. Returns `undefined` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<JsImageBuffer> {
        step(self.inner.redo())
    }

    /// Encode the current image as "png", "jpeg"/"jpg" or "bmp".
    pub fn save(&self, format: &str) -> Result<Vec<u8>, JsValue> {
        self.save_as(format).map_err(js_error)
    }

    /// Drop the current image and its history.
    pub fn close(&mut self) {
        self.inner.close();
    }

    /// Copy of the current image, `undefined` when nothing is loaded.
    pub fn current(&self) -> Option<JsImageBuffer> {
        self.inner.current().map(JsImageBuffer::from)
    }

    #[wasm_bindgen(getter)]
    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }

    #[wasm_bindgen(getter)]
    pub fn can_redo(&self) -> bool {
        self.inner.can_redo()
    }

    #[wasm_bindgen(getter)]
    pub fn history_length(&self) -> usize {
        self.inner.history().len()
    }

    /// Index of the current history entry, `undefined` when empty.
    #[wasm_bindgen(getter)]
    pub fn history_cursor(&self) -> Option<usize> {
        self.inner.history().cursor()
    }

    /// Labels of all history entries, oldest first.
    pub fn history_labels(&self) -> Vec<String> {
        self.inner.history().labels().map(str::to_string).collect()
    }

    /// Label for an "Undo ..." menu item.
    pub fn undo_label(&self) -> Option<String> {
        self.inner.history().undo_label().map(str::to_string)
    }

    /// Label for a "Redo ..." menu item.
    pub fn redo_label(&self) -> Option<String> {
        self.inner.history().redo_label().map(str::to_string)
    }

    /// Pixel bytes held by the history snapshots.
    #[wasm_bindgen(getter)]
    pub fn memory_bytes(&self) -> usize {
        self.inner.history().memory_bytes()
    }
}

impl JsEditEngine {
    pub(crate) fn with_config(config: EditorConfig) -> Result<Self, EditError> {
        Ok(Self {
            inner: EditEngine::with_config(config)?,
        })
    }

    pub(crate) fn with_config_and_font(
        config: EditorConfig,
        font: Vec<u8>,
    ) -> Result<Self, EditError> {
        let ops = StandardOps::from_config(&config).with_font(load_font(font)?);
        Ok(Self {
            inner: EditEngine::with_ops(ops, config)?,
        })
    }

    pub(crate) fn run(&mut self, op: EditOperation) -> Result<JsImageBuffer, EditError> {
        self.inner.apply(op).map(JsImageBuffer::from)
    }

    pub(crate) fn save_as(&self, format: &str) -> Result<Vec<u8>, EditError> {
        let format = format_from_str(format)
            .ok_or_else(|| EncodeError::UnsupportedFormat(format.to_string()))?;
        self.inner.save(format)
    }
}

fn step(moved: HistoryStep<'_>) -> Option<JsImageBuffer> {
    moved.image().map(JsImageBuffer::from)
}
