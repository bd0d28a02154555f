//! Handoff between the interactive display thread and the profiling worker.
//!
//! The worker walks a fixed sequence of user-interaction phases (crop,
//! grid marking, generation) and blocks between them until the display
//! side signals that the current phase is confirmed. A cancellation can be
//! asserted from any thread at any time; the worker's pending and future
//! waits then fail so it unwinds without performing further side effects.

use std::sync::{Condvar, Mutex, MutexGuard};

/// The interactive workflow was cancelled.
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq, Eq)]
#[error("interactive workflow cancelled")]
pub struct Cancelled;

#[derive(Debug, Default)]
struct GateState {
    pending: usize,
    cancelled: bool,
}

/// One-flag producer/consumer gate: the display side completes phases, the
/// worker waits on them.
#[derive(Debug, Default)]
pub struct PhaseGate {
    state: Mutex<GateState>,
    signal: Condvar,
}

impl PhaseGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal that the current interactive phase is confirmed.
    pub fn complete_phase(&self) {
        let mut state = self.lock();
        state.pending += 1;
        self.signal.notify_all();
    }

    /// Cancel the workflow; wakes every waiter with an error.
    pub fn cancel(&self) {
        let mut state = self.lock();
        state.cancelled = true;
        self.signal.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        self.lock().cancelled
    }

    /// Block until a phase completion arrives, or fail once cancelled.
    pub fn wait_phase(&self) -> Result<(), Cancelled> {
        let mut state = self.lock();
        loop {
            if state.cancelled {
                return Err(Cancelled);
            }
            if state.pending > 0 {
                state.pending -= 1;
                return Ok(());
            }
            state = self
                .signal
                .wait(state)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn completion_releases_a_pending_wait() {
        let gate = Arc::new(PhaseGate::new());
        let worker = {
            let gate = Arc::clone(&gate);
            thread::spawn(move || gate.wait_phase())
        };
        thread::sleep(Duration::from_millis(20));
        gate.complete_phase();
        assert_eq!(worker.join().unwrap(), Ok(()));
    }

    #[test]
    fn completion_before_wait_is_not_lost() {
        let gate = PhaseGate::new();
        gate.complete_phase();
        assert_eq!(gate.wait_phase(), Ok(()));
    }

    #[test]
    fn cancel_unblocks_and_stays_sticky() {
        let gate = Arc::new(PhaseGate::new());
        let worker = {
            let gate = Arc::clone(&gate);
            thread::spawn(move || {
                gate.wait_phase()?;
                gate.wait_phase()
            })
        };
        thread::sleep(Duration::from_millis(20));
        gate.complete_phase();
        gate.cancel();
        assert_eq!(worker.join().unwrap(), Err(Cancelled));
        // Future waits keep failing after cancellation.
        assert_eq!(gate.wait_phase(), Err(Cancelled));
        assert!(gate.is_cancelled());
    }

    #[test]
    fn cancellation_wins_over_queued_completions() {
        let gate = PhaseGate::new();
        gate.complete_phase();
        gate.cancel();
        assert_eq!(gate.wait_phase(), Err(Cancelled));
    }
}
