//! # Stepsync Shared
//! Wire types shared between the stepsync client engine and an authoritative
//! simulation.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

#[macro_use]
extern crate cfg_if;

mod message;
mod serializer;
mod sync_event;
mod types;

pub use message::{ClientMessage, InputMessage, InputOptions, ServerMessage};
pub use serializer::{PayloadSerializer, SerializerError};
pub use sync_event::{find_sync_header, ObjectUpdate, SyncEvent, SyncHeader};
pub use types::{MessageIndex, PlayerId, RttQueryId, StepCount, MESSAGE_INDEX_NAMESPACE};

cfg_if! {
    if #[cfg(feature = "json")] {
        pub use serializer::JsonSerializer;
    }
}
