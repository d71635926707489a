use serde::Serialize;

use crate::validation::outcome::{Bucket, CheckOutcome};

/// Final result of a batch: bucket counts plus every outcome in completion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    total: usize,
    working: usize,
    broken: usize,
    errors: usize,
    cancelled: bool,
    outcomes: Vec<CheckOutcome>,
}

impl BatchReport {
    /// Count buckets over the given outcomes, keeping their order.
    pub fn from_outcomes(outcomes: Vec<CheckOutcome>) -> Self {
        let mut report = Self {
            total: outcomes.len(),
            ..Default::default()
        };
        for outcome in &outcomes {
            match outcome.bucket() {
                Bucket::Working => report.working += 1,
                Bucket::Broken => report.broken += 1,
                Bucket::Error => report.errors += 1,
            }
        }
        report.outcomes = outcomes;
        report
    }

    pub(crate) fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn working(&self) -> usize {
        self.working
    }

    pub fn broken(&self) -> usize {
        self.broken
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    /// True when the batch stopped before every target was checked.
    pub fn cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn outcomes(&self) -> &[CheckOutcome] {
        &self.outcomes
    }

    pub fn into_outcomes(self) -> Vec<CheckOutcome> {
        self.outcomes
    }

    pub fn in_bucket(&self, bucket: Bucket) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes
            .iter()
            .filter(move |outcome| outcome.bucket() == bucket)
    }

    /// Share of `count` in the total, rounded to one decimal. Zero for an empty report.
    pub fn percentage(&self, count: usize) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (count as f64 / self.total as f64 * 1000.0).round() / 10.0
    }

    /// True when anything is broken or erroring.
    pub fn has_failures(&self) -> bool {
        self.broken + self.errors > 0
    }
}
