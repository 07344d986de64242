//! Counting admission gate for the blocking client.
//!
//! The async client leans on `tokio::sync::Semaphore`; the blocking
//! variant gets the same contract from a mutex-and-condvar counter: at
//! most `capacity` permits out at once, waiters parked until a permit
//! returns. No fairness guarantee beyond the condvar's wake order.

use std::sync::{Condvar, Mutex};

pub(crate) struct AdmissionGate {
    permits: Mutex<usize>,
    available: Condvar,
}

impl AdmissionGate {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            permits: Mutex::new(capacity),
            available: Condvar::new(),
        }
    }

    /// Block until a permit is free, then take it.
    pub(crate) fn acquire(&self) -> GatePermit<'_> {
        let mut permits = self
            .permits
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        while *permits == 0 {
            permits = self
                .available
                .wait(permits)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
        *permits -= 1;
        GatePermit { gate: self }
    }

    /// Take a permit if one is free right now.
    pub(crate) fn try_acquire(&self) -> Option<GatePermit<'_>> {
        let mut permits = self
            .permits
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if *permits == 0 {
            None
        } else {
            *permits -= 1;
            Some(GatePermit { gate: self })
        }
    }

    fn release(&self) {
        let mut permits = self
            .permits
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *permits += 1;
        self.available.notify_one();
    }
}

/// A held admission slot; returned to the gate on drop.
pub(crate) struct GatePermit<'a> {
    gate: &'a AdmissionGate,
}

impl Drop for GatePermit<'_> {
    fn drop(&mut self) {
        self.gate.release();
    }
}
