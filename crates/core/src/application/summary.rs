// Result summary over stored records
use std::collections::BTreeMap;

use crate::domain::{IterationRecord, Scenario, Status};

/// Per-status counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pass: usize,
    pub partial: usize,
    pub fail: usize,
}

impl StatusCounts {
    fn add(&mut self, status: Status) {
        match status {
            Status::Pass => self.pass += 1,
            Status::Partial => self.partial += 1,
            Status::Fail => self.fail += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.pass + self.partial + self.fail
    }

    /// Fraction of iterations that fully passed (0.0 when empty)
    pub fn pass_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.pass as f64 / total as f64,
        }
    }
}

/// Aggregate view of a result store, overall and per scenario
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSummary {
    pub overall: StatusCounts,
    pub by_scenario: BTreeMap<Scenario, StatusCounts>,
}

impl ResultSummary {
    pub fn from_records(records: &[IterationRecord]) -> Self {
        let mut summary = Self::default();
        for record in records {
            summary.overall.add(record.status);
            summary
                .by_scenario
                .entry(record.scenario)
                .or_default()
                .add(record.status);
        }
        summary
    }
}
