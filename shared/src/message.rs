use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{MessageIndex, PlayerId, RttQueryId, StepCount};

/// Free-form options attached to a local input, e.g. `movement = "true"`.
pub type InputOptions = BTreeMap<String, String>;

/// A single local input as it travels to the authority.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputMessage {
    pub message_index: MessageIndex,
    /// Local step count at the time the input was submitted
    pub step: StepCount,
    pub input: String,
    #[serde(default)]
    pub options: InputOptions,
}

/// Messages sent from the client to the authority
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    Move(InputMessage),
    RttQuery { query_id: RttQueryId },
}

impl ClientMessage {
    /// Name of the command as the authority sees it.
    pub fn command(&self) -> &'static str {
        match self {
            ClientMessage::Move(_) => "move",
            ClientMessage::RttQuery { .. } => "rttQuery",
        }
    }
}

/// Messages sent from the authority to the client
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Opaque sync payload, decoded by a `PayloadSerializer`
    WorldUpdate { payload: Vec<u8> },
    PlayerJoined { player_id: PlayerId },
    RttResponse { query_id: RttQueryId },
}
