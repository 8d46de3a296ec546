use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

const LOG_TARGET: &str = "voxbot::session::timer";

/// Resettable single-shot inactivity timer.
///
/// Each `reset` supersedes any armed deadline, so a burst of N resets
/// produces at most one expiry, from the last reset only. A stale task that
/// escapes `abort` still checks the generation before firing.
#[derive(Debug, Default)]
pub struct InactivityTimer {
    generation: Arc<AtomicU64>,
    handle: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl InactivityTimer {
    pub fn new() -> Self {
        InactivityTimer {
            generation: Arc::new(AtomicU64::new(0)),
            handle: Arc::new(Mutex::new(None)),
        }
    }

    /// Arms the timer to run `on_expiry` after `duration`, discarding any
    /// previously armed deadline.
    pub fn reset<F, Fut>(&self, duration: Duration, on_expiry: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let armed = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = self.generation.clone();
        let slot = self.handle.clone();

        let mut guard = self.handle.lock().unwrap();
        if let Some(old) = guard.take() {
            old.abort();
        }
        debug!(target: LOG_TARGET, generation = armed, ?duration, "Inactivity timer armed");
        *guard = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            // An awake task detaches its own handle before firing, so
            // `cancel` and `reset` only ever abort tasks still asleep.
            // The callback itself may cancel the timer without being
            // aborted mid-flight.
            {
                let mut guard = slot.lock().unwrap();
                if generation.load(Ordering::SeqCst) != armed {
                    return;
                }
                guard.take();
            }
            debug!(target: LOG_TARGET, generation = armed, "Inactivity timer expired");
            on_expiry().await;
        }));
    }

    /// Disarms the timer. A later `reset` re-arms it. An expiry callback
    /// already past its deadline check is not interrupted.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(old) = self.handle.lock().unwrap().take() {
            old.abort();
            debug!(target: LOG_TARGET, "Inactivity timer cancelled");
        }
    }
}
