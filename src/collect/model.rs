// src/collect/model.rs

/// How a single invocation ended. Every variant is a clean exit.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// No region is flagged active; nothing was queried or written.
    NoActiveRegion,
    /// The interval has not elapsed yet.
    Skipped { hours_since: f64, hours_remaining: f64 },
    Completed(CollectionSummary),
}

/// Per-run tallies. `successful + failed` always equals the segments attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollectionSummary {
    pub successful: i32,
    pub failed: i32,
}

impl CollectionSummary {
    pub fn total(&self) -> i32 {
        self.successful + self.failed
    }

    /// Percentage of successful queries, `None` when nothing was attempted.
    pub fn success_rate(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(f64::from(self.successful) / f64::from(total) * 100.0),
        }
    }
}
