use std::fmt;

use serde::{Deserialize, Serialize};

pub type StepCount = u64;
pub type MessageIndex = u64;
pub type RttQueryId = u32;

/// Size of the message index namespace reserved for each player.
pub const MESSAGE_INDEX_NAMESPACE: MessageIndex = 10_000;

/// Identity assigned to a client by the authority, once per connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl PlayerId {
    /// First message index of this player's namespace.
    pub fn message_index_base(&self) -> MessageIndex {
        MessageIndex::from(self.0) * MESSAGE_INDEX_NAMESPACE
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player#{}", self.0)
    }
}
