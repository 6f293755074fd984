//! Ingest pause controller: paused flag + in-flight counter with one-shot
//! waiters.

use std::sync::{Mutex, MutexGuard};

use tokio::sync::oneshot;

#[derive(Debug, Default)]
struct PauseState {
    paused: bool,
    in_flight: usize,
    resume_waiters: Vec<oneshot::Sender<()>>,
    zero_waiters: Vec<oneshot::Sender<()>>,
}

/// Coordination object between the ingest path and the consolidator.
///
/// Waiters are one-shot completions: `resume()` drains every resume waiter,
/// and the in-flight counter's zero crossing drains every zero waiter, so
/// multiple waiters observe the same transition. `pause()` never blocks
/// work that is already counted in flight.
#[derive(Debug, Default)]
pub struct IngestPauseController {
    state: Mutex<PauseState>,
}

impl IngestPauseController {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, PauseState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of the paused flag.
    pub fn is_paused(&self) -> bool {
        self.lock().paused
    }

    /// Current in-flight count; observable for tests and diagnostics.
    pub fn in_flight(&self) -> usize {
        self.lock().in_flight
    }

    pub fn pause(&self) {
        self.lock().paused = true;
    }

    /// Clear the paused flag and release every resume waiter.
    pub fn resume(&self) {
        let waiters = {
            let mut state = self.lock();
            state.paused = false;
            std::mem::take(&mut state.resume_waiters)
        };
        for waiter in waiters {
            let _ = waiter.send(());
        }
    }

    /// Returns immediately when not paused, otherwise suspends until the
    /// next `resume()`.
    pub async fn wait_for_resume(&self) {
        let receiver = {
            let mut state = self.lock();
            if !state.paused {
                return;
            }
            let (tx, rx) = oneshot::channel();
            state.resume_waiters.push(tx);
            rx
        };
        // A dropped sender also releases the waiter; either way we proceed.
        let _ = receiver.await;
    }

    pub fn register_in_flight(&self) {
        self.lock().in_flight += 1;
    }

    /// Decrement the counter; the transition to zero releases every
    /// in-flight waiter.
    pub fn complete_in_flight(&self) {
        let waiters = {
            let mut state = self.lock();
            state.in_flight = state.in_flight.saturating_sub(1);
            if state.in_flight == 0 {
                std::mem::take(&mut state.zero_waiters)
            } else {
                Vec::new()
            }
        };
        for waiter in waiters {
            let _ = waiter.send(());
        }
    }

    /// Returns immediately when nothing is in flight, otherwise suspends
    /// until the counter reaches zero.
    pub async fn wait_for_in_flight(&self) {
        let receiver = {
            let mut state = self.lock();
            if state.in_flight == 0 {
                return;
            }
            let (tx, rx) = oneshot::channel();
            state.zero_waiters.push(tx);
            rx
        };
        let _ = receiver.await;
    }
}
