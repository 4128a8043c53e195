//! # Stepsync Client
//! Keeps a locally running, stepped simulation in temporal agreement with an
//! authoritative remote simulation: a fixed-period step scheduler, drift
//! detection and correction against the authority's step count, an input
//! delay buffer, message sequencing and a pluggable synchronization strategy.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

#[macro_use]
extern crate cfg_if;

pub use stepsync_shared::{
    ClientMessage, InputMessage, InputOptions, MessageIndex, ObjectUpdate, PayloadSerializer,
    PlayerId, SerializerError, ServerMessage, StepCount, SyncEvent, SyncHeader,
};

cfg_if! {
    if #[cfg(feature = "json")] {
        pub use stepsync_shared::JsonSerializer;
    }
}

mod client_config;
mod connection;
mod delay_buffer;
mod driver;
mod drift;
mod engine;
mod error;
mod events;
mod scheduler;
mod sequencer;
mod simulation;
mod sync;

pub mod transport;

pub use client_config::{ClientConfig, SyncMode, SyncOptions};
pub use connection::health_check::HealthCheck;
pub use delay_buffer::InputDelayBuffer;
pub use driver::StopHandle;
pub use drift::{
    Checkpoint, DriftCorrector, DriftOutcome, DriftThresholds, CLIENT_RESET_THRESHOLD,
    STEP_DELAY_MSEC, STEP_HURRY_MSEC,
};
pub use engine::ClientEngine;
pub use error::{ConfigError, ConnectionError, EngineError, InputError};
pub use events::{
    DriftCorrection, DriftCorrectionEvent, EngineEvent, EngineEvents, LoopRunningSlowEvent,
    PlayerJoinedEvent, StepReset, StepResetEvent, SyncReceived, SyncReceivedEvent,
};
pub use scheduler::{SchedulerConfig, StepScheduler, TickInfo};
pub use sequencer::{InboundSync, MessageSequencer, PendingInput};
pub use simulation::{LifecycleEvent, Owned, Renderer, Simulation};
pub use sync::{Blend, SyncStrategy, SyncTarget, Synchronizer};
