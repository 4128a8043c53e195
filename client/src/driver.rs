use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use crate::{engine::ClientEngine, error::EngineError, simulation::Simulation};

// Upper bound on one wait, so a stop request is noticed promptly
const MAX_WAIT: Duration = Duration::from_millis(5);

/// Requests a running driver loop to stop. Cloneable and usable from any thread.
#[derive(Clone, Debug, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

impl<S: Simulation> ClientEngine<S> {
    /// Ticks the engine on the current thread, sleeping between deadlines,
    /// until `stop_handle` fires or the engine is stopped. The engine must
    /// already be started.
    pub fn run(&mut self, stop_handle: &StopHandle) -> Result<(), EngineError> {
        loop {
            if stop_handle.is_stopped() {
                self.stop();
                return Ok(());
            }
            self.poll(Instant::now())?;
            let Some(deadline) = self.next_deadline() else {
                return Ok(());
            };
            let wait = deadline
                .saturating_duration_since(Instant::now())
                .min(MAX_WAIT);
            if !wait.is_zero() {
                std::thread::sleep(wait);
            }
        }
    }
}

cfg_if! {
    if #[cfg(feature = "tokio_driver")] {
        impl<S: Simulation> ClientEngine<S> {
            /// Async counterpart of `run`, waiting on the tokio timer.
            pub async fn run_async(&mut self, stop_handle: &StopHandle) -> Result<(), EngineError> {
                loop {
                    if stop_handle.is_stopped() {
                        self.stop();
                        return Ok(());
                    }
                    self.poll(Instant::now())?;
                    let Some(deadline) = self.next_deadline() else {
                        return Ok(());
                    };
                    let deadline = deadline.min(Instant::now() + MAX_WAIT);
                    tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
                }
            }
        }
    }
}
