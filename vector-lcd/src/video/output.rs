//! Real-time output thread
//!
//! One thread owns the panel driver and the display buffer. It polls the
//! [`FrameSlot`], yielding while idle, and for every frame it takes runs
//! the scanner and writes the result to the panel. A frame that is being
//! transmitted when shutdown is requested is finished first.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::display::{DisplayBuffer, PanelDriver, Scanner, VideoContext};
use crate::error::{LcdError, Result};
use crate::hal::gpio::OutputLine;

use super::slot::FrameSlot;

/// Counters reported when the output thread stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames converted and sent (including ones whose transfer faulted)
    pub frames_rendered: u64,
    /// Frames whose SPI transfer was abandoned part way
    pub transfer_faults: u64,
    /// Frames replaced in the slot before the thread took them
    pub frames_superseded: u64,
}

/// Consumer side of the pipeline, independent of the thread running it
pub(crate) struct OutputLoop<T: Write, L: OutputLine> {
    driver: PanelDriver<T, L>,
    scanner: Scanner,
    buffer: DisplayBuffer,
    slot: Arc<FrameSlot>,
    frames_rendered: u64,
    transfer_faults: u64,
}

impl<T: Write, L: OutputLine> OutputLoop<T, L> {
    pub(crate) fn new(driver: PanelDriver<T, L>, context: VideoContext, slot: Arc<FrameSlot>) -> Self {
        Self {
            driver,
            scanner: Scanner::new(context.mode, context.geometry),
            // Zeroed once; decimation relies on the untouched columns staying black
            buffer: DisplayBuffer::new(context.geometry),
            slot,
            frames_rendered: 0,
            transfer_faults: 0,
        }
    }

    /// Handle the pending frame, if any. Returns whether one was handled.
    pub(crate) fn step(&mut self) -> bool {
        let Some(frame) = self.slot.take() else {
            return false;
        };

        self.scanner
            .render(frame.pixels(), frame.stride(), &mut self.buffer);
        // The frame's pixels are released before the transfer starts
        drop(frame);

        if let Err(e) = self.driver.write_frame(&self.buffer) {
            self.transfer_faults += 1;
            log::warn!("frame transfer failed: {}", e);
        }
        self.frames_rendered += 1;
        log::trace!("frame {} sent", self.frames_rendered);
        true
    }

    fn run(mut self, running: &AtomicBool) -> (u64, u64) {
        while running.load(Ordering::Acquire) {
            if !self.step() {
                thread::yield_now();
            }
        }
        (self.frames_rendered, self.transfer_faults)
    }
}

/// Handle to the running output thread
pub struct OutputThread {
    running: Arc<AtomicBool>,
    slot: Arc<FrameSlot>,
    handle: Option<JoinHandle<(u64, u64)>>,
}

impl OutputThread {
    /// Start the output thread
    ///
    /// `priority` is the SCHED_FIFO priority to request; 0 or less leaves
    /// the thread on the default scheduler. A refused request is logged and
    /// the thread runs anyway.
    pub fn spawn<T, L>(
        driver: PanelDriver<T, L>,
        context: VideoContext,
        slot: Arc<FrameSlot>,
        priority: i32,
    ) -> Result<Self>
    where
        T: Write + Send + 'static,
        L: OutputLine + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let output = OutputLoop::new(driver, context, Arc::clone(&slot));

        let handle = {
            let running = Arc::clone(&running);
            thread::Builder::new()
                .name("lcd-output".to_string())
                .spawn(move || {
                    if priority > 0 {
                        set_realtime_priority(priority);
                    }
                    output.run(&running)
                })
                .map_err(LcdError::ThreadSpawn)?
        };

        log::debug!("output thread started ({} mode)", context.mode);
        Ok(Self {
            running,
            slot,
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Ask the thread to exit, wait for it, and collect its counters
    pub fn stop(mut self) -> FrameStats {
        self.shutdown()
    }

    fn shutdown(&mut self) -> FrameStats {
        self.running.store(false, Ordering::Release);

        let (frames_rendered, transfer_faults) = match self.handle.take().map(JoinHandle::join) {
            Some(Ok(counts)) => counts,
            Some(Err(_)) => {
                log::error!("output thread panicked");
                (0, 0)
            }
            None => (0, 0),
        };

        FrameStats {
            frames_rendered,
            transfer_faults,
            frames_superseded: self.slot.superseded(),
        }
    }
}

impl Drop for OutputThread {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.shutdown();
        }
    }
}

#[cfg(target_os = "linux")]
fn set_realtime_priority(priority: i32) {
    // SAFETY: sched_param is plain data; all-zero is a valid value.
    let mut param: libc::sched_param = unsafe { std::mem::zeroed() };
    param.sched_priority = priority;

    // SAFETY: pthread_self() is always a valid handle for the calling
    // thread and `param` outlives the call.
    let rc = unsafe { libc::pthread_setschedparam(libc::pthread_self(), libc::SCHED_FIFO, &param) };

    if rc == 0 {
        log::debug!("output thread running SCHED_FIFO at priority {}", priority);
    } else {
        log::warn!(
            "Failed to set real-time priority {}: {}",
            priority,
            std::io::Error::from_raw_os_error(rc)
        );
    }
}

#[cfg(not(target_os = "linux"))]
fn set_realtime_priority(priority: i32) {
    log::warn!(
        "real-time priority {} not supported on this platform",
        priority
    );
}
