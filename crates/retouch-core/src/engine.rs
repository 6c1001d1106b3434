//! The edit engine: current image, history and the apply/undo/redo cycle.
//!
//! # Lifecycle
//!
//! An engine starts empty. `load` decodes an image, resets history and
//! commits the decoded image as entry 0. Each `apply` validates the
//! operation, runs it through the [`ImageOps`] implementation and commits
//! the result. `undo`/`redo` only move the history cursor; no pixel work is
//! repeated.
//!
//! Every failing call leaves the current image and history untouched.

use std::path::Path;

use tracing::{debug, info, instrument, warn};

use crate::buffer::ImageBuffer;
use crate::config::EditorConfig;
use crate::decode::decode_image;
use crate::encode::{encode, OutputFormat};
use crate::error::EditError;
use crate::face::FaceScan;
use crate::history::HistoryStack;
use crate::operation::EditOperation;
use crate::ops::{ImageOps, OpsError, StandardOps};

/// History label of the entry created by a load.
pub const OPEN_IMAGE_LABEL: &str = "Open image";

/// Result of an undo or redo request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryStep<'a> {
    /// The cursor moved; this is the new current image.
    Moved(&'a ImageBuffer),
    /// Already at the boundary; nothing changed.
    NoOp,
}

impl<'a> HistoryStep<'a> {
    pub fn is_moved(&self) -> bool {
        matches!(self, HistoryStep::Moved(_))
    }

    pub fn image(&self) -> Option<&'a ImageBuffer> {
        match self {
            HistoryStep::Moved(image) => Some(image),
            HistoryStep::NoOp => None,
        }
    }
}

/// Owns one document: the current image and its edit history.
#[derive(Debug)]
pub struct EditEngine<O: ImageOps = StandardOps> {
    current: Option<ImageBuffer>,
    history: HistoryStack,
    ops: O,
    config: EditorConfig,
}

impl Default for EditEngine<StandardOps> {
    fn default() -> Self {
        let config = EditorConfig::default();
        Self {
            current: None,
            history: HistoryStack::with_limit(config.history_limit),
            ops: StandardOps::from_config(&config),
            config,
        }
    }
}

impl EditEngine<StandardOps> {
    /// Empty engine with the default configuration and no face detector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty engine using [`StandardOps`] built from `config`.
    pub fn with_config(config: EditorConfig) -> Result<Self, EditError> {
        let ops = StandardOps::from_config(&config);
        Self::with_ops(ops, config)
    }
}

impl<O: ImageOps> EditEngine<O> {
    /// Empty engine delegating pixel work to `ops`.
    pub fn with_ops(ops: O, config: EditorConfig) -> Result<Self, EditError> {
        config.validate()?;
        Ok(Self {
            current: None,
            history: HistoryStack::with_limit(config.history_limit),
            ops,
            config,
        })
    }

    /// Decode `bytes` and start a new history with it.
    ///
    /// On failure the previous image and history are kept.
    #[instrument(skip_all, fields(len = bytes.len()))]
    pub fn load(&mut self, bytes: &[u8]) -> Result<&ImageBuffer, EditError> {
        let image = decode_image(bytes).inspect_err(|e| warn!(error = %e, "Load failed"))?;
        Ok(self.load_buffer(image))
    }

    /// Start a new history with an already decoded image.
    pub fn load_buffer(&mut self, image: ImageBuffer) -> &ImageBuffer {
        info!(
            width = image.width(),
            height = image.height(),
            channels = ?image.channels(),
            "Loaded image"
        );
        self.history.reset();
        self.history.commit(&image, OPEN_IMAGE_LABEL);
        self.current.insert(image)
    }

    /// Read and load an image file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<&ImageBuffer, EditError> {
        let bytes = std::fs::read(path.as_ref())?;
        self.load(&bytes)
    }

    /// Validate and run `op` on the current image, then commit the result.
    ///
    /// Even blur kernels are rounded up to the next odd size; every other
    /// out-of-range parameter fails with `InvalidParameter` before any pixel
    /// work happens.
    #[instrument(skip_all, fields(kind = op.kind()))]
    pub fn apply(&mut self, op: EditOperation) -> Result<&ImageBuffer, EditError> {
        let Some(image) = self.current.as_ref() else {
            return Err(EditError::NoImageLoaded);
        };

        let op = op
            .validate()
            .inspect_err(|e| warn!(reason = %e.reason, "Rejected parameters"))?;
        let label = op.label();

        let result = run(&self.ops, image, &op)?;
        debug!(
            width = result.width(),
            height = result.height(),
            "Operation applied"
        );

        self.history.commit(&result, label);
        info!(
            entries = self.history.len(),
            bytes = self.history.memory_bytes(),
            "Committed edit"
        );
        Ok(self.current.insert(result))
    }

    /// Step back one entry.
    pub fn undo(&mut self) -> HistoryStep<'_> {
        match self.history.undo() {
            Some(image) => {
                debug!(cursor = ?self.history.cursor(), "Undo");
                HistoryStep::Moved(self.current.insert(image))
            }
            None => {
                debug!("Nothing to undo");
                HistoryStep::NoOp
            }
        }
    }

    /// Step forward one entry.
    pub fn redo(&mut self) -> HistoryStep<'_> {
        match self.history.redo() {
            Some(image) => {
                debug!(cursor = ?self.history.cursor(), "Redo");
                HistoryStep::Moved(self.current.insert(image))
            }
            None => {
                debug!("Nothing to redo");
                HistoryStep::NoOp
            }
        }
    }

    /// Encode the current image. JPEG uses the configured quality.
    #[instrument(skip(self))]
    pub fn save(&self, format: OutputFormat) -> Result<Vec<u8>, EditError> {
        let image = self.current.as_ref().ok_or(EditError::NoImageLoaded)?;
        let bytes = encode(image, format, self.config.jpeg_quality)?;
        info!(len = bytes.len(), "Encoded image");
        Ok(bytes)
    }

    /// Encode the current image in the format named by the file extension
    /// and write it to `path`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<(), EditError> {
        let format = OutputFormat::from_path(path.as_ref())?;
        let bytes = self.save(format)?;
        std::fs::write(path.as_ref(), bytes)?;
        Ok(())
    }

    /// Probe the current image for faces at the configured angles.
    ///
    /// Read-only: history and the current image are never touched.
    #[instrument(skip(self))]
    pub fn detect_faces(&self) -> Result<FaceScan, EditError> {
        let image = self.current.as_ref().ok_or(EditError::NoImageLoaded)?;
        let scan = self
            .ops
            .detect_faces(image, &self.config.face_probe_angles)?;
        info!(
            detections = scan.detections(),
            found = scan.found(),
            "Face probe finished"
        );
        Ok(scan)
    }

    /// Drop the current image and its history.
    pub fn close(&mut self) {
        debug!(entries = self.history.len(), "Closing document");
        self.current = None;
        self.history.reset();
    }

    pub fn current(&self) -> Option<&ImageBuffer> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn ops(&self) -> &O {
        &self.ops
    }
}

/// Dispatch a validated operation to its `ImageOps` function.
fn run<O: ImageOps>(
    ops: &O,
    image: &ImageBuffer,
    op: &EditOperation,
) -> Result<ImageBuffer, OpsError> {
    match op {
        EditOperation::Grayscale => ops.grayscale(image),
        EditOperation::Blur { kernel_size } => ops.blur(image, *kernel_size),
        EditOperation::EdgeDetect {
            threshold1,
            threshold2,
        } => ops.edge_detect(image, *threshold1, *threshold2),
        EditOperation::Rotate { angle } => ops.rotate(image, *angle),
        EditOperation::Resize { width, height } => ops.resize(image, *width, *height),
        EditOperation::BrightnessContrast {
            brightness,
            contrast,
        } => ops.brightness_contrast(image, *brightness, *contrast),
        EditOperation::DrawText {
            text,
            origin,
            font_scale,
            color,
        } => ops.draw_text(image, text, *origin, *font_scale, *color),
        EditOperation::DrawLine { from, to, color } => ops.draw_line(image, *from, *to, *color),
        EditOperation::DrawRect {
            origin,
            width,
            height,
            color,
        } => ops.draw_rect(image, *origin, *width, *height, *color),
        EditOperation::DrawCircle {
            center,
            radius,
            color,
        } => ops.draw_circle(image, *center, *radius, *color),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::buffer::Channels;
    use crate::operation::{Color, Point};
    use proptest::prelude::*;

    fn op_strategy() -> impl Strategy<Value = EditOperation> {
        prop_oneof![
            Just(EditOperation::Grayscale),
            (1u32..=7).prop_map(|kernel_size| EditOperation::Blur { kernel_size }),
            (-180.0f64..180.0).prop_map(|angle| EditOperation::Rotate { angle }),
            (1u32..=12, 1u32..=12)
                .prop_map(|(width, height)| EditOperation::Resize { width, height }),
            (-255.0f64..=255.0, -127.0f64..=127.0).prop_map(|(brightness, contrast)| {
                EditOperation::BrightnessContrast {
                    brightness,
                    contrast,
                }
            }),
            (-5i32..15, -5i32..15, -5i32..15, -5i32..15).prop_map(|(x0, y0, x1, y1)| {
                EditOperation::DrawLine {
                    from: Point::new(x0, y0),
                    to: Point::new(x1, y1),
                    color: Color::new(255, 0, 0),
                }
            }),
        ]
    }

    fn start() -> ImageBuffer {
        let pixels: Vec<u8> = (0..10 * 8 * 3).map(|i| (i * 7 % 256) as u8).collect();
        ImageBuffer::new(10, 8, Channels::Rgb, pixels).unwrap()
    }

    proptest! {
        /// N applies then N undos return to the loaded image; N redos
        /// return to the last result.
        #[test]
        fn prop_round_trip(ops in prop::collection::vec(op_strategy(), 0..8)) {
            let mut engine = EditEngine::new();
            engine.load_buffer(start());

            for op in &ops {
                engine.apply(op.clone()).unwrap();
            }
            let last = engine.current().cloned().unwrap();

            for _ in 0..ops.len() {
                prop_assert!(engine.undo().is_moved());
            }
            prop_assert_eq!(engine.undo(), HistoryStep::NoOp);
            prop_assert_eq!(engine.current(), Some(&start()));

            for _ in 0..ops.len() {
                prop_assert!(engine.redo().is_moved());
            }
            prop_assert_eq!(engine.redo(), HistoryStep::NoOp);
            prop_assert_eq!(engine.current(), Some(&last));
        }

        /// Applying the same operations twice gives the same image.
        #[test]
        fn prop_apply_deterministic(ops in prop::collection::vec(op_strategy(), 1..5)) {
            let mut a = EditEngine::new();
            let mut b = EditEngine::new();
            a.load_buffer(start());
            b.load_buffer(start());
            for op in ops {
                a.apply(op.clone()).unwrap();
                b.apply(op).unwrap();
            }
            prop_assert_eq!(a.current(), b.current());
        }
    }
}
