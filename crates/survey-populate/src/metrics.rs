//! Per-stage seeding metrics.

use std::time::Duration;
use tracing::info;

/// Result of one seeding stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedOutcome {
    /// Items the stage tried to submit.
    pub attempted: usize,
    /// Items the platform accepted.
    pub succeeded: usize,
    /// Items that failed and were skipped.
    pub failed: usize,
    /// Wall time of the stage, pacing included.
    pub duration: Duration,
}

impl SeedOutcome {
    pub(crate) fn record(&mut self, ok: bool) {
        self.attempted += 1;
        if ok {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    /// Items per second.
    pub fn rate(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.attempted as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

impl std::fmt::Display for SeedOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} succeeded, {} failed in {:?} ({:.1}/s)",
            self.succeeded,
            self.attempted,
            self.failed,
            self.duration,
            self.rate()
        )
    }
}

/// Summary of a full seeding run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: SeedOutcome,
    pub surveys: SeedOutcome,
    pub responses: SeedOutcome,
    /// Responses or answers that reference unknown surveys or questions.
    pub dangling_references: usize,
}

impl SeedReport {
    pub fn total_failed(&self) -> usize {
        self.users.failed + self.surveys.failed + self.responses.failed
    }

    pub fn log_summary(&self, url: &str) {
        info!("Users:     {}", self.users);
        info!("Surveys:   {}", self.surveys);
        info!("Responses: {}", self.responses);
        if self.dangling_references > 0 {
            info!(
                "{} dangling references were submitted as-is",
                self.dangling_references
            );
        }
        info!("Seeding complete. View your data at: {}", url);
    }
}
