// Signal trapping for a graceful server stop

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shutdown flag shared by the signal handlers and the HTTP server
#[derive(Clone, Default)]
pub struct ShutdownState {
    requested: Arc<AtomicBool>,
}

impl ShutdownState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the server to stop accepting connections and drain
    pub fn request_shutdown(&self) {
        self.requested.store(true, Ordering::SeqCst);
        log::info!("[shutdown] Shutdown requested");
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

/// Request shutdown on SIGINT, SIGTERM or SIGHUP
#[cfg(unix)]
pub fn register_signal_handlers(state: ShutdownState) -> Result<()> {
    use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP])
        .map_err(|e| anyhow::anyhow!("Failed to register signal handlers: {}", e))?;

    std::thread::spawn(move || {
        for signal in signals.forever() {
            let name = match signal {
                SIGINT => "SIGINT",
                SIGTERM => "SIGTERM",
                _ => "SIGHUP",
            };
            log::info!("[shutdown] Received {}", name);
            state.request_shutdown();
        }
    });

    log::debug!("[shutdown] Listening for SIGINT, SIGTERM and SIGHUP");
    Ok(())
}

/// Request shutdown on Ctrl+C
#[cfg(windows)]
pub fn register_signal_handlers(state: ShutdownState) -> Result<()> {
    ctrlc::set_handler(move || {
        log::info!("[shutdown] Received Ctrl+C");
        state.request_shutdown();
    })
    .map_err(|e| anyhow::anyhow!("Failed to register Ctrl+C handler: {}", e))?;

    log::debug!("[shutdown] Listening for Ctrl+C");
    Ok(())
}
