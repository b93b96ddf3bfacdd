//! Frame sources feeding the display pipeline

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use vector_lcd::display::{SOURCE_HEIGHT, SOURCE_WIDTH};
use vector_lcd::Frame;

/// Bytes in one 240×160 frame of 32-bit pixels
pub const FRAME_BYTES: usize = SOURCE_WIDTH * SOURCE_HEIGHT * 4;

/// Anything that can produce the next frame for the panel
pub trait FrameSource {
    fn next_frame(&mut self) -> Frame;
}

/// Raw frame dump played in a loop
///
/// The file is a plain concatenation of 240×160 frames, each pixel a
/// little-endian `u32` (`0x00RRGGBB`). A trailing partial frame is ignored.
pub struct RawFrameFile {
    path: PathBuf,
    frames: Vec<Frame>,
    next: usize,
}

impl RawFrameFile {
    pub fn open(path: &Path) -> Result<Self> {
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_bytes(path, &bytes)
    }

    /// Split `bytes` into frames; `path` is only used in messages
    pub fn from_bytes(path: &Path, bytes: &[u8]) -> Result<Self> {
        let whole = bytes.len() / FRAME_BYTES;
        if whole == 0 {
            bail!(
                "{} holds {} bytes, less than one {}x{} frame ({} bytes)",
                path.display(),
                bytes.len(),
                SOURCE_WIDTH,
                SOURCE_HEIGHT,
                FRAME_BYTES
            );
        }

        let trailing = bytes.len() % FRAME_BYTES;
        if trailing != 0 {
            log::warn!(
                "{}: ignoring {} trailing bytes after frame {}",
                path.display(),
                trailing,
                whole
            );
        }

        let frames = bytes
            .chunks_exact(FRAME_BYTES)
            .map(|chunk| {
                let pixels: Arc<[u32]> = chunk
                    .chunks_exact(4)
                    .map(|p| u32::from_le_bytes([p[0], p[1], p[2], p[3]]))
                    .collect();
                Frame::packed(pixels).map_err(anyhow::Error::from)
            })
            .collect::<Result<Vec<_>>>()?;

        log::info!("Loaded {} frame(s) from {}", frames.len(), path.display());
        Ok(Self {
            path: path.to_path_buf(),
            frames,
            next: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for RawFrameFile {
    fn next_frame(&mut self) -> Frame {
        let frame = self.frames[self.next].clone();
        self.next = (self.next + 1) % self.frames.len();
        frame
    }
}
