use std::time::Duration;

use stepsync_shared::{PlayerId, StepCount};

use crate::{
    events::{StepReset, SyncReceived},
    sequencer::PendingInput,
};

/// Lifecycle notifications delivered to the simulation, in step order.
#[derive(Debug)]
pub enum LifecycleEvent<'a> {
    /// A sync was drained; fires before the drift check it triggers
    SyncReceived(&'a SyncReceived),
    /// The step counter was re-seated by drift correction
    StepReset(StepReset),
    /// Delayed input has been released and the step is about to run
    PreStep { step: StepCount },
    /// The step finished; `step` is the new step count
    PostStep { step: StepCount },
}

/// The stepped simulation the engine keeps in time with the authority.
///
/// The simulation owns the step counter: `step()` must advance it by exactly
/// one, and only the engine's hard reset writes it through `set_step_count`.
pub trait Simulation {
    fn step_count(&self) -> StepCount;

    fn set_step_count(&mut self, step_count: StepCount);

    fn step(&mut self, is_replay: bool, time: Duration, delta: Duration, physics_only: bool);

    /// Applies one local input on behalf of `player_id`
    fn process_input(&mut self, input: &PendingInput, player_id: PlayerId);

    fn emit(&mut self, _event: LifecycleEvent<'_>) {}
}

/// Renderer attached to the engine. The frame loop itself lives elsewhere;
/// the engine only requires that one exists and is initialized before ticking.
pub trait Renderer {
    fn init(&mut self);
}

/// Objects that may be owned by a player.
pub trait Owned {
    fn owner(&self) -> Option<PlayerId>;
}
