//! Frame handoff and the output pipeline
//!
//! [`Video`] is the entry point for producers: it detects the panel, brings
//! it up, starts the output thread and then accepts frames through
//! [`Video::submit`], which never blocks.

pub mod output;
pub mod slot;

use std::io::Write;
use std::sync::Arc;

pub use output::{FrameStats, OutputThread};
pub use slot::{Frame, FrameSlot};

use crate::config::LcdConfig;
use crate::detect::VariantProbe;
use crate::display::{panel, PanelDriver, VideoContext};
use crate::error::Result;
use crate::hal::gpio::{OutputLine, StdDelay};

/// Running display pipeline
pub struct Video {
    context: VideoContext,
    slot: Arc<FrameSlot>,
    output: OutputThread,
}

impl Video {
    /// Detect the panel, initialize it and start the output thread
    ///
    /// Fails only when the SPI device can't be opened or the thread can't be
    /// created. Every other hardware problem is logged and tolerated.
    pub fn start(config: &LcdConfig) -> Result<Self> {
        let variant = VariantProbe::from_settings(&config.probe).detect();
        let context = VideoContext::new(variant, config.output.scaled);
        log::info!("Panel {} using {} mode", variant, context.mode);

        let driver = panel::initialize(variant, config, &mut StdDelay)?;
        Self::with_driver(driver, context, config.output.priority)
    }

    /// Start the output thread on an already initialized driver
    pub fn with_driver<T, L>(
        driver: PanelDriver<T, L>,
        context: VideoContext,
        priority: i32,
    ) -> Result<Self>
    where
        T: Write + Send + 'static,
        L: OutputLine + 'static,
    {
        let slot = Arc::new(FrameSlot::new());
        let output = OutputThread::spawn(driver, context, Arc::clone(&slot), priority)?;

        Ok(Self {
            context,
            slot,
            output,
        })
    }

    /// Hand a frame to the output thread, replacing one it hasn't taken yet
    pub fn submit(&self, frame: Frame) {
        self.slot.submit(frame);
    }

    pub fn context(&self) -> VideoContext {
        self.context
    }

    /// Stop the output thread after its current frame and report counters
    pub fn stop(self) -> FrameStats {
        let stats = self.output.stop();
        log::debug!("video stopped: {:?}", stats);
        stats
    }
}
