//! Shutdown on SIGINT, SIGTERM and SIGHUP
//!
//! The handler only raises a flag; the main loop polls it between frames.

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

pub fn shutdown_requested() -> bool {
    SHUTDOWN.load(Ordering::SeqCst)
}

#[cfg(unix)]
extern "C" fn handle_signal(_: libc::c_int) {
    SHUTDOWN.store(true, Ordering::SeqCst);
}

/// Install the shutdown handler for all three signals
#[cfg(unix)]
pub fn install() -> Result<()> {
    for signal in [libc::SIGINT, libc::SIGTERM, libc::SIGHUP] {
        let handler = handle_signal as extern "C" fn(libc::c_int);
        // SAFETY: the handler only touches an atomic, which is
        // async-signal-safe.
        let previous = unsafe { libc::signal(signal, handler as libc::sighandler_t) };
        if previous == libc::SIG_ERR {
            anyhow::bail!(
                "Failed to install handler for signal {}: {}",
                signal,
                std::io::Error::last_os_error()
            );
        }
    }
    Ok(())
}

#[cfg(not(unix))]
pub fn install() -> Result<()> {
    log::warn!("signal handling not supported on this platform");
    Ok(())
}
