//! sysfs GPIO output lines
//!
//! Controls the panel's reset and data/command (D/C) lines through the
//! kernel's `/sys/class/gpio` interface.
//!
//! # Pin Assignments
//!
//! | GPIO | Function              | Controller |
//! |------|-----------------------|------------|
//! | 110  | D/C (Data/Command)    | both       |
//! | 55   | RST (Reset)           | Santek     |
//! | 96   | RST (Reset)           | Midas      |
//!
//! All GPIO access is best effort: a missing export file or a refused write
//! is logged at debug level and otherwise ignored, since some boards run
//! without the lines wired through sysfs.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A single push-pull output
pub trait OutputLine: Send {
    fn set_level(&mut self, high: bool);

    #[inline]
    fn set_high(&mut self) {
        self.set_level(true);
    }

    #[inline]
    fn set_low(&mut self) {
        self.set_level(false);
    }
}

/// Blocking millisecond delay
pub trait Delay: Send {
    fn delay_ms(&mut self, ms: u32);
}

/// [`Delay`] backed by `std::thread::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl Delay for StdDelay {
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

/// A GPIO exported through sysfs and configured as an output
#[derive(Debug, Clone)]
pub struct SysfsPin {
    value_path: PathBuf,
    pin: u32,
}

impl SysfsPin {
    /// Export `pin` under `root` and switch it to output
    pub fn export(root: &Path, pin: u32) -> Self {
        write_best_effort(&root.join("export"), pin.to_string().as_bytes());

        let pin_dir = root.join(format!("gpio{}", pin));
        write_best_effort(&pin_dir.join("direction"), b"out");

        Self {
            value_path: pin_dir.join("value"),
            pin,
        }
    }

    pub fn pin(&self) -> u32 {
        self.pin
    }
}

impl OutputLine for SysfsPin {
    fn set_level(&mut self, high: bool) {
        write_best_effort(&self.value_path, if high { b"1" } else { b"0" });
    }
}

fn write_best_effort(path: &Path, contents: &[u8]) {
    let result = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .and_then(|mut file| file.write_all(contents));

    if let Err(e) = result {
        log::debug!("gpio write to {} skipped: {}", path.display(), e);
    }
}

/// The two control lines every panel needs
pub struct ControlLines<L: OutputLine> {
    pub dc: L,
    pub reset: L,
}

/// Display control helper functions
impl<L: OutputLine> ControlLines<L> {
    pub fn new(dc: L, reset: L) -> Self {
        Self { dc, reset }
    }

    /// Set D/C for command mode (low)
    #[inline]
    pub fn dc_command(&mut self) {
        self.dc.set_low();
    }

    /// Set D/C for data mode (high)
    #[inline]
    pub fn dc_data(&mut self) {
        self.dc.set_high();
    }

    /// Assert reset (active low)
    #[inline]
    pub fn reset_assert(&mut self) {
        self.reset.set_low();
    }

    /// Deassert reset
    #[inline]
    pub fn reset_deassert(&mut self) {
        self.reset.set_high();
    }
}
