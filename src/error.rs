//! Engine error type.
//!
//! Recoverable and construction-fatal failures are reported through
//! [`EngineError`]. Caller contract violations (for example asking for the
//! single active engine while several are running) panic instead, and absent
//! values are plain `Option`s.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to read image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),
    #[error("invalid image data: {0}")]
    InvalidImage(String),
    #[error("invalid color '{0}'")]
    InvalidColor(String),
    #[error("drawing surface error: {0}")]
    Surface(String),
    #[error("window host error: {0}")]
    Host(String),
    #[error("configuration error: {0}")]
    Config(String),
}
