use log::{debug, info, warn};

use stepsync_shared::StepCount;

use crate::scheduler::StepScheduler;

/// Milliseconds credited to the correction accumulator per delayed tick
pub const STEP_DELAY_MSEC: i64 = 12;
/// Milliseconds debited from the correction accumulator per hurried tick
pub const STEP_HURRY_MSEC: i64 = 8;
/// Lag beyond which the local step counter is re-seated instead of nudged
pub const CLIENT_RESET_THRESHOLD: StepCount = 20;

/// Allowed drift before a nudge is issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DriftThresholds {
    pub max_lead: StepCount,
    pub max_lag: StepCount,
}

/// Points in the step at which drift is evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Checkpoint {
    /// Right after an authoritative sync was drained
    OnServerSync,
    /// Once per step, whether or not a sync arrived
    OnEveryStep,
}

impl Checkpoint {
    pub fn thresholds(&self) -> DriftThresholds {
        match self {
            Checkpoint::OnServerSync => DriftThresholds {
                max_lead: 1,
                max_lag: 3,
            },
            Checkpoint::OnEveryStep => DriftThresholds {
                max_lead: 10,
                max_lag: 10,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriftOutcome {
    InSync,
    /// Client was ahead; the next tick was delayed
    Delayed,
    /// Client was behind; the next tick was hurried
    Hurried,
    /// Drift was found but the same nudge is already pending for the next tick
    NudgePending,
    /// Client was too far behind; the step counter must be re-seated
    Reset {
        old_step: StepCount,
        new_step: StepCount,
    },
}

/// Compares the local step counter against the highest authoritative step and
/// nudges the scheduler accordingly.
#[derive(Debug, Default)]
pub struct DriftCorrector {
    remote_step: Option<StepCount>,
    correction: i64,
    delays: u64,
    hurries: u64,
    resets: u64,
}

impl DriftCorrector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest authoritative step count seen so far
    pub fn remote_step(&self) -> Option<StepCount> {
        self.remote_step
    }

    /// Records the step count carried by a sync header. Older steps arriving
    /// after newer ones do not move the remote counter back.
    pub fn observe_remote(&mut self, step_count: StepCount) {
        match self.remote_step {
            Some(highest) if highest >= step_count => {
                debug!(
                    "ignoring stale authoritative step {} (highest {})",
                    step_count, highest
                );
            }
            _ => self.remote_step = Some(step_count),
        }
    }

    /// Signed sum of all nudges applied, in milliseconds
    pub fn correction(&self) -> i64 {
        self.correction
    }

    pub fn delay_count(&self) -> u64 {
        self.delays
    }

    pub fn hurry_count(&self) -> u64 {
        self.hurries
    }

    pub fn reset_count(&self) -> u64 {
        self.resets
    }

    /// Evaluates drift at `checkpoint` and nudges `scheduler` if needed.
    ///
    /// A `Reset` outcome is not applied here; the caller owns the step counter
    /// and must set it to `new_step`.
    pub fn check(
        &mut self,
        checkpoint: Checkpoint,
        local: StepCount,
        scheduler: &mut StepScheduler,
    ) -> DriftOutcome {
        let Some(remote) = self.remote_step else {
            return DriftOutcome::InSync;
        };

        if remote > local.saturating_add(CLIENT_RESET_THRESHOLD) {
            info!(
                "local step {} is more than {} steps behind authority step {}, resetting",
                local, CLIENT_RESET_THRESHOLD, remote
            );
            self.resets += 1;
            return DriftOutcome::Reset {
                old_step: local,
                new_step: remote,
            };
        }

        let thresholds = checkpoint.thresholds();
        if local > remote.saturating_add(thresholds.max_lead) {
            warn!(
                "{:?}: local step {} leads authority step {} by more than {}, delaying",
                checkpoint, local, remote, thresholds.max_lead
            );
            if !scheduler.delay_tick() {
                return DriftOutcome::NudgePending;
            }
            self.correction += STEP_DELAY_MSEC;
            self.delays += 1;
            DriftOutcome::Delayed
        } else if remote > local.saturating_add(thresholds.max_lag) {
            warn!(
                "{:?}: local step {} lags authority step {} by more than {}, hurrying",
                checkpoint, local, remote, thresholds.max_lag
            );
            if !scheduler.hurry_tick() {
                return DriftOutcome::NudgePending;
            }
            self.correction -= STEP_HURRY_MSEC;
            self.hurries += 1;
            DriftOutcome::Hurried
        } else {
            DriftOutcome::InSync
        }
    }
}
