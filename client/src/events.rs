use std::vec::IntoIter;

use stepsync_shared::{PlayerId, StepCount, SyncEvent};

use crate::drift::Checkpoint;

/// Notification that an authoritative sync was drained.
#[derive(Clone, Debug, PartialEq)]
pub struct SyncReceived {
    pub sync_events: Vec<SyncEvent>,
    pub step_count: StepCount,
    pub full_update: bool,
}

/// Notification that the local step counter was re-seated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepReset {
    pub old_step: StepCount,
    pub new_step: StepCount,
}

/// A scheduler nudge issued by drift correction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DriftCorrection {
    pub checkpoint: Checkpoint,
    pub local_step: StepCount,
    pub remote_step: StepCount,
    /// Signed milliseconds: positive for a delay, negative for a hurry
    pub correction: i64,
}

/// Events collected by the engine while it ticks, in firing order per kind.
///
/// Within one step they fire in this order: `SyncReceivedEvent` and any
/// `DriftCorrectionEvent`/`StepResetEvent` it caused (once per drained
/// message), then the every-step `DriftCorrectionEvent`/`StepResetEvent`,
/// then `LoopRunningSlowEvent`.
pub struct EngineEvents {
    player_joined: Vec<PlayerId>,
    syncs: Vec<SyncReceived>,
    corrections: Vec<DriftCorrection>,
    resets: Vec<StepReset>,
    running_slow: Vec<StepCount>,
    empty: bool,
}

impl Default for EngineEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineEvents {
    pub(crate) fn new() -> Self {
        Self {
            player_joined: Vec::new(),
            syncs: Vec::new(),
            corrections: Vec::new(),
            resets: Vec::new(),
            running_slow: Vec::new(),
            empty: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn read<V: EngineEvent>(&mut self) -> V::Iter {
        V::iter(self)
    }

    pub fn has<V: EngineEvent>(&self) -> bool {
        V::has(self)
    }

    pub(crate) fn push_player_joined(&mut self, player_id: PlayerId) {
        self.player_joined.push(player_id);
        self.empty = false;
    }

    pub(crate) fn push_sync(&mut self, sync: SyncReceived) {
        self.syncs.push(sync);
        self.empty = false;
    }

    pub(crate) fn push_correction(&mut self, correction: DriftCorrection) {
        self.corrections.push(correction);
        self.empty = false;
    }

    pub(crate) fn push_reset(&mut self, reset: StepReset) {
        self.resets.push(reset);
        self.empty = false;
    }

    pub(crate) fn push_running_slow(&mut self, step: StepCount) {
        self.running_slow.push(step);
        self.empty = false;
    }
}

// Event Trait
pub trait EngineEvent {
    type Iter;

    fn iter(events: &mut EngineEvents) -> Self::Iter;

    fn has(events: &EngineEvents) -> bool;
}

// Player Joined Event
pub struct PlayerJoinedEvent;
impl EngineEvent for PlayerJoinedEvent {
    type Iter = IntoIter<PlayerId>;

    fn iter(events: &mut EngineEvents) -> Self::Iter {
        let list = std::mem::take(&mut events.player_joined);
        IntoIterator::into_iter(list)
    }

    fn has(events: &EngineEvents) -> bool {
        !events.player_joined.is_empty()
    }
}

// Sync Received Event
pub struct SyncReceivedEvent;
impl EngineEvent for SyncReceivedEvent {
    type Iter = IntoIter<SyncReceived>;

    fn iter(events: &mut EngineEvents) -> Self::Iter {
        let list = std::mem::take(&mut events.syncs);
        IntoIterator::into_iter(list)
    }

    fn has(events: &EngineEvents) -> bool {
        !events.syncs.is_empty()
    }
}

// Drift Correction Event
pub struct DriftCorrectionEvent;
impl EngineEvent for DriftCorrectionEvent {
    type Iter = IntoIter<DriftCorrection>;

    fn iter(events: &mut EngineEvents) -> Self::Iter {
        let list = std::mem::take(&mut events.corrections);
        IntoIterator::into_iter(list)
    }

    fn has(events: &EngineEvents) -> bool {
        !events.corrections.is_empty()
    }
}

// Step Reset Event
pub struct StepResetEvent;
impl EngineEvent for StepResetEvent {
    type Iter = IntoIter<StepReset>;

    fn iter(events: &mut EngineEvents) -> Self::Iter {
        let list = std::mem::take(&mut events.resets);
        IntoIterator::into_iter(list)
    }

    fn has(events: &EngineEvents) -> bool {
        !events.resets.is_empty()
    }
}

// Loop Running Slow Event, carries the local step at which it was raised
pub struct LoopRunningSlowEvent;
impl EngineEvent for LoopRunningSlowEvent {
    type Iter = IntoIter<StepCount>;

    fn iter(events: &mut EngineEvents) -> Self::Iter {
        let list = std::mem::take(&mut events.running_slow);
        IntoIterator::into_iter(list)
    }

    fn has(events: &EngineEvents) -> bool {
        !events.running_slow.is_empty()
    }
}
