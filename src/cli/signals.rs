//! Ctrl+C handling for the record loop

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shutdown flag raised by Ctrl+C
pub struct ShutdownSignal {
    shutdown: Arc<AtomicBool>,
}

impl ShutdownSignal {
    /// Create a new shutdown signal handler
    pub fn new() -> Self {
        Self {
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get a clone of the shutdown flag
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Check if shutdown was requested
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Request shutdown without a signal
    pub fn trigger(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Setup signal handler
    pub async fn setup(&self) -> Result<(), std::io::Error> {
        let shutdown = Arc::clone(&self.shutdown);

        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    log::debug!("Ctrl+C received, stopping recording");
                    shutdown.store(true, Ordering::SeqCst);
                }
                Err(e) => log::error!("Failed to listen for Ctrl+C: {}", e),
            }
        });

        Ok(())
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
