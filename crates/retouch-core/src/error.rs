//! Engine-level error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::operation::ParameterError;
use crate::ops::OpsError;

/// Errors surfaced by [`crate::EditEngine`].
///
/// Any error leaves the current image and history exactly as they were.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    /// The operation needs an image and none is loaded.
    #[error("No image loaded")]
    NoImageLoaded,

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    InvalidParameter(#[from] ParameterError),

    #[error("Operation failed: {0}")]
    Ops(#[from] OpsError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for EditError {
    fn from(err: std::io::Error) -> Self {
        EditError::Io(err.to_string())
    }
}
