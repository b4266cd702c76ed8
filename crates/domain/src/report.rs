//! Run report types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scenario::ScenarioId;
use crate::testing::ScenarioOutcome;

/// Result of one scenario within a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Which scenario ran.
    pub scenario: ScenarioId,
    /// How it ended.
    pub outcome: ScenarioOutcome,
    /// Wall time spent, in milliseconds.
    pub duration_ms: u64,
}

impl ScenarioResult {
    /// Creates a new result.
    #[must_use]
    pub const fn new(scenario: ScenarioId, outcome: ScenarioOutcome, duration_ms: u64) -> Self {
        Self {
            scenario,
            outcome,
            duration_ms,
        }
    }
}

/// Results from one run of the suite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Run identifier.
    pub run_id: Uuid,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
    /// Scenario results in execution order.
    pub results: Vec<ScenarioResult>,
    /// Number of passed scenarios.
    pub passed: usize,
    /// Number of failed scenarios.
    pub failed: usize,
    /// Number of skipped scenarios.
    pub skipped: usize,
}

impl RunReport {
    /// Builds a report and tallies the outcomes.
    #[must_use]
    pub fn new(
        run_id: Uuid,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        results: Vec<ScenarioResult>,
    ) -> Self {
        let passed = results.iter().filter(|r| r.outcome.is_passed()).count();
        let failed = results.iter().filter(|r| r.outcome.is_failed()).count();
        let skipped = results.iter().filter(|r| r.outcome.is_skipped()).count();

        Self {
            run_id,
            started_at,
            finished_at,
            results,
            passed,
            failed,
            skipped,
        }
    }

    /// Total number of scenarios that reported a result.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// True when no scenario failed. Skips do not count as failures.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.failed == 0
    }

    /// Result for a given scenario, if it ran.
    #[must_use]
    pub fn result_for(&self, scenario: ScenarioId) -> Option<&ScenarioResult> {
        self.results.iter().find(|r| r.scenario == scenario)
    }
}
