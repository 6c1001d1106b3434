//! Retouch Core - edit-history engine for a raster image editor
//!
//! This crate provides the engine behind the Retouch editor: load an image,
//! apply destructive edits (filters, geometric transforms, annotations), and
//! step backward and forward through a linear edit history.
//!
//! Pixel work goes through the [`ImageOps`] trait. [`StandardOps`] is the
//! implementation built on the `image` and `imageproc` crates.
//!
//! The crate logs through `tracing` and never installs a subscriber.

pub mod buffer;
pub mod config;
pub mod decode;
pub mod encode;
pub mod engine;
pub mod error;
pub mod face;
pub mod history;
pub mod luminance;
pub mod operation;
pub mod ops;

pub use buffer::{BufferError, Channels, ImageBuffer};
pub use config::{ConfigError, EditorConfig};
pub use decode::{decode_image, DecodeError};
pub use encode::{encode, EncodeError, OutputFormat};
pub use engine::{EditEngine, HistoryStep, OPEN_IMAGE_LABEL};
pub use error::EditError;
pub use face::{FaceBounds, FaceDetector, FaceScan};
pub use history::{HistoryEntry, HistoryStack};
pub use operation::{Color, EditOperation, ParameterError, Point};
pub use ops::{load_font, FilterType, ImageOps, OpsError, StandardOps};

pub use ab_glyph::FontArc;
