//! Signal handling for graceful shutdown

use anyhow::{Context, Result};
use signal_hook::consts::{SIGINT, SIGTERM};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Set once the first SIGINT or SIGTERM arrives
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    /// Whether a stop was requested
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Request a stop (used by tests)
    pub fn request(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// Setup signal handlers for graceful shutdown
///
/// The first signal only raises the flag; batch loops stop after the current
/// row. A second signal exits the process immediately.
pub fn setup_signal_handlers() -> Result<ShutdownFlag> {
    let flag = ShutdownFlag::default();

    for signal in [SIGINT, SIGTERM] {
        // Registered first so it sees the flag before this signal sets it
        signal_hook::flag::register_conditional_shutdown(signal, 1, Arc::clone(&flag.0))
            .with_context(|| format!("Failed to register forced shutdown for signal {signal}"))?;
        signal_hook::flag::register(signal, Arc::clone(&flag.0))
            .with_context(|| format!("Failed to register handler for signal {signal}"))?;
    }

    info!("Signal handlers configured");
    Ok(flag)
}

/// Log and report whether the loop should stop
pub fn should_stop(flag: &ShutdownFlag) -> bool {
    if flag.is_requested() {
        warn!("Shutdown requested, stopping after the current row");
        return true;
    }
    false
}
