//! Panel driver: bring-up and RAM writes over SPI
//!
//! The D/C line selects how the controller interprets the bytes on the
//! bus: low for an opcode, high for parameters and pixel data.

use std::io::Write;

use super::framebuffer::DisplayBuffer;
use super::init::{cmd, InitCommand};
use super::PanelVariant;
use crate::config::LcdConfig;
use crate::error::Result;
use crate::hal::gpio::{ControlLines, Delay, OutputLine, SysfsPin};
use crate::hal::spi::{read_max_transfer, write_chunked, SpiTransport};

/// Reset held low, then settle time after release. Panel requirement.
const RESET_LOW_MS: u32 = 50;
const RESET_RELEASE_MS: u32 = 120;

/// Pulse the reset line low then high
pub fn hardware_reset<L: OutputLine>(lines: &mut ControlLines<L>, delay: &mut dyn Delay) {
    lines.reset_assert();
    delay.delay_ms(RESET_LOW_MS);
    lines.reset_deassert();
    delay.delay_ms(RESET_RELEASE_MS);
}

/// Driver for an initialized panel
///
/// Owned by the output thread once the panel is up; nothing else writes to
/// the bus.
pub struct PanelDriver<T: Write, L: OutputLine> {
    transport: T,
    lines: ControlLines<L>,
    max_transfer: usize,
}

impl<T: Write, L: OutputLine> PanelDriver<T, L> {
    pub fn new(transport: T, lines: ControlLines<L>, max_transfer: usize) -> Self {
        Self {
            transport,
            lines,
            max_transfer: max_transfer.max(1),
        }
    }

    pub fn max_transfer(&self) -> usize {
        self.max_transfer
    }

    /// Send `bytes` as one command or data phase
    ///
    /// D/C is set once for the whole call. On a failed chunk the rest of the
    /// buffer is dropped; what already went out is not undone.
    pub fn transmit(&mut self, is_command: bool, bytes: &[u8]) -> Result<()> {
        if is_command {
            self.lines.dc_command();
        } else {
            self.lines.dc_data();
        }

        write_chunked(&mut self.transport, bytes, self.max_transfer)
    }

    pub fn send_command(&mut self, command: u8) -> Result<()> {
        self.transmit(true, &[command])
    }

    /// Replay a bring-up script
    ///
    /// A failed step is logged and the script carries on, the same way a
    /// torn frame does not stop the output loop.
    pub fn run_script(&mut self, script: &[InitCommand], delay: &mut dyn Delay) {
        for step in script {
            if let Err(e) = self.send_command(step.command) {
                log::warn!("init command {:#04x} failed: {}", step.command, e);
            }

            if !step.payload.is_empty() {
                if let Err(e) = self.transmit(false, step.payload) {
                    log::warn!("init payload for {:#04x} failed: {}", step.command, e);
                }
            }

            if step.delay_ms > 0 {
                delay.delay_ms(step.delay_ms);
            }
        }
    }

    /// Write a converted frame into panel RAM
    pub fn write_frame(&mut self, buffer: &DisplayBuffer) -> Result<()> {
        self.send_command(cmd::RAMWR)?;
        self.transmit(false, buffer.as_bytes())
    }

    /// Give back the transport and control lines
    pub fn into_parts(self) -> (T, ControlLines<L>) {
        (self.transport, self.lines)
    }
}

/// Bring up the panel for `variant` on the real hardware
///
/// GPIO is exported first and the reset pulse runs before the SPI device
/// is opened. Only the SPI open can fail.
pub fn initialize(
    variant: PanelVariant,
    config: &LcdConfig,
    delay: &mut dyn Delay,
) -> Result<PanelDriver<SpiTransport, SysfsPin>> {
    log::info!("Initializing {} LCD...", variant);

    let gpio = &config.gpio;
    let mut lines = ControlLines::new(
        SysfsPin::export(&gpio.sysfs_root, gpio.dc_pin),
        SysfsPin::export(&gpio.sysfs_root, variant.reset_pin(gpio)),
    );

    hardware_reset(&mut lines, delay);

    let transport = SpiTransport::open(&config.spi)?;
    log::debug!("SPI device {} open", transport.path().display());
    let max_transfer =
        read_max_transfer(&config.spi.bufsiz_path, config.spi.default_max_transfer);

    let mut driver = PanelDriver::new(transport, lines, max_transfer);
    driver.run_script(variant.init_script(), delay);

    log::info!("{} LCD initialized!", variant.controller());
    Ok(driver)
}
