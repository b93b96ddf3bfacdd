//! Hardware access for Linux userspace
//!
//! Provides:
//! - sysfs GPIO output lines (reset, data/command)
//! - spidev transport with chunked writes

pub mod gpio;
pub mod spi;

#[cfg(test)]
pub(crate) mod mock;

pub use gpio::{ControlLines, Delay, OutputLine, StdDelay, SysfsPin};
pub use spi::{read_max_transfer, write_chunked, SpiTransport};
