use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::validation::outcome::CheckOutcome;
use crate::validation::report::BatchReport;

/// Collects outcomes from concurrent checks.
///
/// `record` may be called from any number of tasks at once; the outcome
/// list is the only shared mutable state of a run.
#[derive(Debug, Default)]
pub struct Aggregator {
    outcomes: Mutex<Vec<CheckOutcome>>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            outcomes: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    /// Append one finished outcome.
    pub fn record(&self, outcome: CheckOutcome) {
        self.lock().push(outcome);
    }

    /// Number of outcomes recorded so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Build the report from everything recorded, leaving the aggregator empty.
    pub fn finalize(&self) -> BatchReport {
        let outcomes = std::mem::take(&mut *self.lock());
        BatchReport::from_outcomes(outcomes)
    }

    // A panic while holding the lock cannot leave the Vec half-written
    fn lock(&self) -> MutexGuard<'_, Vec<CheckOutcome>> {
        self.outcomes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
