//! In-memory stand-ins for the panel hardware, shared by unit tests
//!
//! Every line change, bus write and delay lands in one ordered log so tests
//! can check the exact wire sequence.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use super::gpio::{Delay, OutputLine};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusEvent {
    Line { name: &'static str, high: bool },
    Write(Vec<u8>),
    Delay(u32),
}

/// One D/C phase: everything written between two D/C changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub is_command: bool,
    pub bytes: Vec<u8>,
}

pub type EventLog = Arc<Mutex<Vec<BusEvent>>>;

pub fn new_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn events(log: &EventLog) -> Vec<BusEvent> {
    log.lock().unwrap().clone()
}

/// Regroup bus writes by the D/C level they were sent under
pub fn transfers(log: &EventLog) -> Vec<Transfer> {
    let mut out: Vec<Transfer> = Vec::new();
    let mut is_command = true;
    let mut open = false;

    for event in events(log) {
        match event {
            BusEvent::Line { name: "dc", high } => {
                is_command = !high;
                open = false;
            }
            BusEvent::Write(bytes) => {
                if open {
                    if let Some(last) = out.last_mut() {
                        last.bytes.extend_from_slice(&bytes);
                    }
                } else {
                    out.push(Transfer {
                        is_command,
                        bytes,
                    });
                    open = true;
                }
            }
            _ => {}
        }
    }

    out
}

pub struct MockLine {
    name: &'static str,
    log: EventLog,
}

impl MockLine {
    pub fn new(name: &'static str, log: &EventLog) -> Self {
        Self {
            name,
            log: Arc::clone(log),
        }
    }
}

impl OutputLine for MockLine {
    fn set_level(&mut self, high: bool) {
        self.log.lock().unwrap().push(BusEvent::Line {
            name: self.name,
            high,
        });
    }
}

pub struct MockDelay {
    log: EventLog,
}

impl MockDelay {
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: Arc::clone(log),
        }
    }
}

impl Delay for MockDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.log.lock().unwrap().push(BusEvent::Delay(ms));
    }
}

/// SPI bus that records writes and can be told to fail
pub struct MockBus {
    log: EventLog,
    /// Writes fail once this many bytes have gone through
    pub fail_after: Option<usize>,
    written: usize,
}

impl MockBus {
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: Arc::clone(log),
            fail_after: None,
            written: 0,
        }
    }
}

impl Write for MockBus {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(limit) = self.fail_after {
            if self.written >= limit {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "bus fault"));
            }
        }
        self.written += buf.len();
        self.log.lock().unwrap().push(BusEvent::Write(buf.to_vec()));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
