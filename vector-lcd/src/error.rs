//! Error types for the LCD pipeline

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the panel driver, frame handoff and configuration
#[derive(Debug, Error)]
pub enum LcdError {
    /// The SPI character device could not be opened. Nothing can be shown.
    #[error("can't open SPI device {path}: {source}")]
    TransportOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A chunked write stopped before the whole buffer went out
    #[error("SPI transfer abandoned after {written} of {total} bytes")]
    Transfer {
        written: usize,
        total: usize,
        #[source]
        source: Option<io::Error>,
    },

    /// A frame's pixel storage does not cover the 240×160 source image
    #[error("frame holds {len} pixels, stride {stride} needs at least {required}")]
    FrameTooSmall {
        len: usize,
        stride: usize,
        required: usize,
    },

    /// Row stride shorter than the source width
    #[error("frame stride {stride} is narrower than the {width}-pixel source")]
    InvalidStride { stride: usize, width: usize },

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to spawn output thread: {0}")]
    ThreadSpawn(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, LcdError>;
