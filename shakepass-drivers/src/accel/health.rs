//! Setup retry and fault tracking for a polled sensor
//!
//! The sampling loop keeps running while the part is missing or failing.
//! Setup is retried every few ticks, and a run of failures is reported once
//! when it starts and once when it ends.

/// Reportable change in sensor health
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HealthChange {
    /// First failure after a good run
    Fault,
    /// First success after a fault
    Recovered,
}

/// Health of one sensor, advanced once per sample tick
#[derive(Debug, Clone)]
pub struct SensorHealth {
    ready: bool,
    faulted: bool,
    retry_every: u16,
    wait: u16,
}

impl SensorHealth {
    /// Retry setup every `retry_every` ticks until it succeeds
    pub fn new(retry_every: u16) -> Self {
        Self {
            ready: false,
            faulted: false,
            retry_every: retry_every.max(1),
            wait: 0,
        }
    }

    /// Setup has succeeded
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Inside a run of failures
    pub fn is_faulted(&self) -> bool {
        self.faulted
    }

    /// Called each tick before setup; true when an attempt is due
    pub fn init_due(&mut self) -> bool {
        if self.ready {
            return false;
        }
        if self.wait > 0 {
            self.wait -= 1;
            return false;
        }
        true
    }

    /// Record the outcome of a setup attempt
    pub fn init_done(&mut self, ok: bool) -> Option<HealthChange> {
        if ok {
            self.ready = true;
        } else {
            self.wait = self.retry_every - 1;
        }
        self.record(ok)
    }

    /// Record the outcome of a read
    pub fn read_done(&mut self, ok: bool) -> Option<HealthChange> {
        self.record(ok)
    }

    fn record(&mut self, ok: bool) -> Option<HealthChange> {
        match (ok, self.faulted) {
            (false, false) => {
                self.faulted = true;
                Some(HealthChange::Fault)
            }
            (true, true) => {
                self.faulted = false;
                Some(HealthChange::Recovered)
            }
            _ => None,
        }
    }
}
