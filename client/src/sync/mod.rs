mod blend;
mod strategy;
mod synchronizer;

pub use blend::Blend;
pub use strategy::SyncStrategy;
pub use synchronizer::{SyncTarget, Synchronizer};
