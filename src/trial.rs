//! Trial scoring for the drag-to-target task.

use tracing::debug;

use crate::config::TrialConfig;
use crate::error::Result;

/// Where the steered object is relative to the target zone this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoneContact {
    /// Outside the zone.
    Outside,
    /// Inside the zone, `distance` from its centre.
    Inside { distance: f64 },
}

/// Outcome of a completed trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialResult {
    /// Final score; can be negative for slow or imprecise trials.
    pub score: f64,
    /// Seconds from the start of the trial until completion.
    pub elapsed: f64,
    /// Distance to the zone centre when the trial completed.
    pub distance: f64,
}

/// Times one trial and scores it once the object has rested in the target
/// zone for the dwell period.
///
/// Leaving the zone resets the dwell clock but not the trial clock.
#[derive(Debug, Clone)]
pub struct TrialScorer {
    config: TrialConfig,
    elapsed: f64,
    dwell: f64,
    result: Option<TrialResult>,
}

impl TrialScorer {
    /// Starts a new trial.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: TrialConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            elapsed: 0.0,
            dwell: 0.0,
            result: None,
        })
    }

    /// Advances the clocks by `dt` seconds.
    ///
    /// Returns the result on the tick the trial completes. Once complete,
    /// further ticks are ignored until [`reset`](Self::reset). Negative or
    /// non-finite steps count as zero.
    pub fn tick(&mut self, dt: f64, contact: ZoneContact) -> Option<TrialResult> {
        if self.result.is_some() {
            return None;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.elapsed += dt;

        match contact {
            ZoneContact::Outside => {
                self.dwell = 0.0;
                None
            }
            ZoneContact::Inside { distance } => {
                self.dwell += dt;
                if self.dwell < self.config.dwell_seconds {
                    return None;
                }
                let result = TrialResult {
                    score: self.score(self.elapsed, distance),
                    elapsed: self.elapsed,
                    distance,
                };
                debug!(
                    score = result.score,
                    elapsed = result.elapsed,
                    distance,
                    "trial complete"
                );
                self.result = Some(result);
                Some(result)
            }
        }
    }

    /// Score for a trial completed after `elapsed` seconds at `distance`
    /// from the zone centre.
    #[must_use]
    pub fn score(&self, elapsed: f64, distance: f64) -> f64 {
        self.config.base_score
            - (elapsed * self.config.time_weight + distance * self.config.distance_weight)
    }

    /// Restarts both clocks for the next trial.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.dwell = 0.0;
        self.result = None;
    }

    /// Seconds since the trial started.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Seconds the object has rested in the zone without leaving.
    #[must_use]
    pub fn dwell(&self) -> f64 {
        self.dwell
    }

    /// Result of the trial once complete.
    #[must_use]
    pub fn result(&self) -> Option<TrialResult> {
        self.result
    }

    /// Returns `true` once the trial has been scored.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }
}

/// What follows a recorded round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Another round should be started; `completed` rounds are done.
    Next { completed: u32 },
    /// All rounds are done.
    Finished,
}

/// Counts completed rounds of an experiment run.
#[derive(Debug, Clone)]
pub struct ExperimentProgress {
    max_rounds: u32,
    results: Vec<TrialResult>,
}

impl ExperimentProgress {
    /// Creates a run of `max_rounds` rounds with none recorded.
    #[must_use]
    pub fn new(max_rounds: u32) -> Self {
        Self {
            max_rounds,
            results: Vec::new(),
        }
    }

    /// Records a completed trial. Results arriving after the run finished
    /// are dropped.
    pub fn record(&mut self, result: TrialResult) -> RoundOutcome {
        if self.is_finished() {
            return RoundOutcome::Finished;
        }
        self.results.push(result);
        if self.is_finished() {
            debug!(rounds = self.completed(), "experiment finished");
            RoundOutcome::Finished
        } else {
            RoundOutcome::Next {
                completed: self.completed(),
            }
        }
    }

    /// Number of recorded rounds.
    #[must_use]
    pub fn completed(&self) -> u32 {
        u32::try_from(self.results.len()).unwrap_or(u32::MAX)
    }

    /// Rounds in the run.
    #[must_use]
    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// Returns `true` once every round has been recorded.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.completed() >= self.max_rounds
    }

    /// Recorded results in round order.
    #[must_use]
    pub fn results(&self) -> &[TrialResult] {
        &self.results
    }

    /// Mean score over recorded rounds, or `None` before the first.
    #[must_use]
    pub fn mean_score(&self) -> Option<f64> {
        if self.results.is_empty() {
            return None;
        }
        let total: f64 = self.results.iter().map(|r| r.score).sum();
        Some(total / f64::from(self.completed()))
    }
}
