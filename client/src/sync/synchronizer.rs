use log::debug;

use stepsync_shared::{PlayerId, StepCount, SyncEvent};

use super::{Blend, SyncStrategy};
use crate::{client_config::SyncOptions, events::SyncReceived};

/// Local object store that authoritative updates are folded into.
pub trait SyncTarget {
    /// Mutable state of a locally known object
    fn object_state_mut(&mut self, object_id: u32) -> Option<&mut Vec<f32>>;

    /// Called for objects the authority knows about but the client does not
    fn spawn_object(&mut self, object_id: u32, owner: Option<PlayerId>, state: Vec<f32>);

    fn destroy_object(&mut self, object_id: u32);
}

/// Holds the selected strategy and the latest accepted sync until the
/// reconciliation layer applies it.
pub struct Synchronizer {
    strategy: SyncStrategy,
    options: SyncOptions,
    pending: Option<SyncReceived>,
    last_accepted_step: Option<StepCount>,
}

impl Synchronizer {
    pub fn new(options: &SyncOptions) -> Self {
        Self {
            strategy: SyncStrategy::from_mode(options.mode),
            options: options.clone(),
            pending: None,
            last_accepted_step: None,
        }
    }

    pub fn strategy(&self) -> SyncStrategy {
        self.strategy
    }

    /// Whether the authority's positions should be drawn as markers
    pub fn show_sync_markers(&self) -> bool {
        matches!(self.strategy, SyncStrategy::Interpolate { reflect: true })
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn last_accepted_step(&self) -> Option<StepCount> {
        self.last_accepted_step
    }

    /// Accepts a sync unless one for the same or a later step was already
    /// accepted. A newer sync replaces one still pending.
    pub fn on_sync_received(&mut self, sync: &SyncReceived) -> bool {
        if let Some(last) = self.last_accepted_step {
            if sync.step_count <= last {
                debug!(
                    "{}: dropping sync for step {}, already at {}",
                    self.strategy.name(),
                    sync.step_count,
                    last
                );
                return false;
            }
        }
        self.last_accepted_step = Some(sync.step_count);
        self.pending = Some(sync.clone());
        true
    }

    /// Fraction of the distance to the authoritative value applied per sync
    pub fn bending(&self, owned: bool) -> f32 {
        match self.strategy {
            SyncStrategy::FrameSync => 1.0,
            SyncStrategy::Interpolate { .. } => self.options.remote_obj_bending,
            SyncStrategy::Extrapolate => {
                if owned {
                    self.options.local_obj_bending
                } else {
                    self.options.remote_obj_bending
                }
            }
        }
    }

    pub fn blend<T: Blend>(&self, local: &mut T, authoritative: &T, owned: bool) {
        local.blend_toward(authoritative, self.bending(owned));
    }

    /// Folds the pending sync into `world`. Returns the number of objects that
    /// were blended, spawned or destroyed.
    pub fn apply_pending<W: SyncTarget>(
        &mut self,
        world: &mut W,
        player_id: Option<PlayerId>,
    ) -> usize {
        let Some(sync) = self.pending.take() else {
            return 0;
        };

        let mut touched = 0;
        for event in sync.sync_events {
            match event {
                SyncEvent::SyncHeader(_) => continue,
                SyncEvent::ObjectUpdate(update) => {
                    let owned = player_id.is_some() && update.owner == player_id;
                    let bending = self.bending(owned);
                    match world.object_state_mut(update.object_id) {
                        Some(state) => state.blend_toward(&update.state, bending),
                        None => world.spawn_object(update.object_id, update.owner, update.state),
                    }
                }
                SyncEvent::ObjectDestroy { object_id } => world.destroy_object(object_id),
            }
            touched += 1;
        }
        touched
    }
}
