//! Single-slot frame mailbox between the producer and the output thread
//!
//! The slot is either empty (idle) or holds exactly one boxed [`Frame`]
//! (pending). Both sides only ever `swap` the pointer, so a frame's pixels
//! and stride are published together and each frame has exactly one owner
//! at any time.

use std::ptr;
use std::sync::atomic::{AtomicPtr, AtomicU64, Ordering};
use std::sync::Arc;

use crate::display::{SOURCE_HEIGHT, SOURCE_WIDTH};
use crate::error::{LcdError, Result};

/// Read-only view of one 240×160 source frame
///
/// Rows start `stride` pixels apart. The pixel storage is shared with the
/// producer, which must not write into it again while a frame built on it
/// may still be rendering; handing over a fresh buffer per frame is always
/// safe.
#[derive(Debug, Clone)]
pub struct Frame {
    pixels: Arc<[u32]>,
    stride: usize,
}

impl Frame {
    pub fn new(pixels: Arc<[u32]>, stride: usize) -> Result<Self> {
        if stride < SOURCE_WIDTH {
            return Err(LcdError::InvalidStride {
                stride,
                width: SOURCE_WIDTH,
            });
        }

        let required = (SOURCE_HEIGHT - 1) * stride + SOURCE_WIDTH;
        if pixels.len() < required {
            return Err(LcdError::FrameTooSmall {
                len: pixels.len(),
                stride,
                required,
            });
        }

        Ok(Self { pixels, stride })
    }

    /// Frame whose rows are packed back to back
    pub fn packed(pixels: Arc<[u32]>) -> Result<Self> {
        Self::new(pixels, SOURCE_WIDTH)
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Distance between row starts, in pixels
    pub fn stride(&self) -> usize {
        self.stride
    }
}

/// Last-write-wins mailbox holding at most one unconsumed frame
///
/// Neither side blocks. A submit that lands before the consumer took the
/// previous frame drops that frame and counts it as superseded.
///
/// Each [`FrameSlot::submit`] boxes the frame, so the producer pays one
/// small allocation per frame. Whoever drops the last [`Frame`] frees the
/// box, and the pixels too when no other `Arc` is left; that can be the
/// output thread. Producers should keep their own reference to the pixel
/// storage so the real-time side never frees a whole frame buffer.
pub struct FrameSlot {
    pending: AtomicPtr<Frame>,
    superseded: AtomicU64,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self {
            pending: AtomicPtr::new(ptr::null_mut()),
            superseded: AtomicU64::new(0),
        }
    }

    /// Publish `frame`, replacing any frame not yet taken
    pub fn submit(&self, frame: Frame) {
        let new = Box::into_raw(Box::new(frame));
        let old = self.pending.swap(new, Ordering::AcqRel);

        if !old.is_null() {
            // SAFETY: non-null pointers in the slot always come from
            // Box::into_raw above, and the swap made us their only owner.
            drop(unsafe { Box::from_raw(old) });
            self.superseded.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Take the pending frame, leaving the slot idle
    pub fn take(&self) -> Option<Frame> {
        let taken = self.pending.swap(ptr::null_mut(), Ordering::AcqRel);

        if taken.is_null() {
            None
        } else {
            // SAFETY: see `submit`; the swap transferred ownership to us.
            Some(*unsafe { Box::from_raw(taken) })
        }
    }

    pub fn is_pending(&self) -> bool {
        !self.pending.load(Ordering::Acquire).is_null()
    }

    /// Frames overwritten before the consumer got to them
    pub fn superseded(&self) -> u64 {
        self.superseded.load(Ordering::Relaxed)
    }
}

impl Default for FrameSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FrameSlot {
    fn drop(&mut self) {
        drop(self.take());
    }
}
