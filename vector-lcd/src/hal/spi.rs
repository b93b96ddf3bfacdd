//! spidev transport
//!
//! The panel sits on a Linux spidev character device. spidev rejects
//! writes larger than its `bufsiz` module parameter, so every payload goes
//! out through [`write_chunked`].

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use spidev::{SpiModeFlags, Spidev, SpidevOptions};

use crate::config::SpiSettings;
use crate::error::{LcdError, Result};

/// Open spidev handle for the panel bus
pub struct SpiTransport {
    device: Spidev,
    path: PathBuf,
}

impl SpiTransport {
    /// Open the device and put it in mode 0
    ///
    /// A failed open is fatal for the caller. A refused mode/speed ioctl is
    /// only logged; the controller default usually works.
    pub fn open(settings: &SpiSettings) -> Result<Self> {
        let mut device = Spidev::open(&settings.device).map_err(|source| LcdError::TransportOpen {
            path: settings.device.clone(),
            source,
        })?;

        let mut options = SpidevOptions::new();
        options.mode(SpiModeFlags::SPI_MODE_0);
        if let Some(hz) = settings.speed_hz {
            options.max_speed_hz(hz);
        }

        if let Err(e) = device.configure(&options.build()) {
            log::warn!(
                "SPI mode configuration refused on {}: {}",
                settings.device.display(),
                e
            );
        }

        Ok(Self {
            device,
            path: settings.device.clone(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Write for SpiTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.device.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.device.flush()
    }
}

/// Largest single write the spidev driver accepts
///
/// Reads the module parameter file; falls back to `default` when the file
/// is missing, unparseable or reports zero.
pub fn read_max_transfer(bufsiz_path: &Path, default: usize) -> usize {
    let reported = fs::read_to_string(bufsiz_path)
        .ok()
        .and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|&n| n > 0);

    match reported {
        Some(n) => {
            log::info!("SPI max transfer: {} bytes", n);
            n
        }
        None => {
            log::debug!(
                "{} unavailable, using {} byte transfers",
                bufsiz_path.display(),
                default
            );
            default
        }
    }
}

/// Write `bytes` in pieces no larger than `max_transfer`
///
/// Stops at the first failed or zero-length write. Bytes already sent stay
/// sent; the error reports how far the transfer got.
pub fn write_chunked<W: Write + ?Sized>(
    transport: &mut W,
    bytes: &[u8],
    max_transfer: usize,
) -> Result<()> {
    let total = bytes.len();
    let max_transfer = max_transfer.max(1);
    let mut written = 0;

    while written < total {
        let end = total.min(written + max_transfer);

        match transport.write(&bytes[written..end]) {
            Ok(0) => {
                return Err(LcdError::Transfer {
                    written,
                    total,
                    source: None,
                })
            }
            Ok(n) => written += n,
            Err(e) => {
                return Err(LcdError::Transfer {
                    written,
                    total,
                    source: Some(e),
                })
            }
        }
    }

    Ok(())
}
