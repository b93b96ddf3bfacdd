//! Real-time SPI LCD output for the Vector panel family
//!
//! This crate drives a small SPI-connected LCD from a stream of 240×160
//! 32-bit frames produced by an external renderer. Two panel controllers
//! exist in the field and are told apart at runtime.
//!
//! # Architecture
//!
//! ```text
//!  Producer (renderer loop)
//!     │ submit(Frame)            non-blocking, last-write-wins
//!     ▼
//! ┌─────────────┐
//! │  FrameSlot  │
//! └──────┬──────┘
//!        │ take()                busy-poll + yield
//!        ▼
//! ┌──────────────────────────────┐
//! │ Output Thread (SCHED_FIFO)   │
//! │   Scanner ──► DisplayBuffer  │
//! └──────┬───────────────────────┘
//!        ▼
//! ┌─────────────┐    ┌─────────────┐
//! │ PanelDriver │───►│  sysfs GPIO │  reset, data/command
//! └──────┬──────┘    └─────────────┘
//!        ▼
//!   spidev (chunked writes, bounded transfer unit)
//! ```
//!
//! Startup order is [`detect`] → [`display::panel::initialize`] →
//! [`video::OutputThread::spawn`]; [`Video`] wires the three together.

pub mod config;
pub mod detect;
pub mod display;
pub mod error;
pub mod hal;
pub mod video;

pub use config::LcdConfig;
pub use detect::VariantProbe;
pub use display::{PanelGeometry, PanelVariant, RenderMode, VideoContext};
pub use error::{LcdError, Result};
pub use video::{Frame, FrameSlot, FrameStats, Video};
