use serde::{Deserialize, Serialize};

use crate::types::{PlayerId, StepCount};

/// Header record carried by every authoritative sync payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncHeader {
    pub step_count: StepCount,
    pub full_update: bool,
}

/// Authoritative state of one object at the header's step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectUpdate {
    pub object_id: u32,
    pub owner: Option<PlayerId>,
    pub state: Vec<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "eventName", rename_all = "camelCase")]
pub enum SyncEvent {
    SyncHeader(SyncHeader),
    ObjectUpdate(ObjectUpdate),
    ObjectDestroy { object_id: u32 },
}

impl SyncEvent {
    pub fn as_header(&self) -> Option<&SyncHeader> {
        match self {
            SyncEvent::SyncHeader(header) => Some(header),
            _ => None,
        }
    }
}

/// Finds the header record among decoded sync events.
pub fn find_sync_header(events: &[SyncEvent]) -> Option<SyncHeader> {
    events.iter().find_map(SyncEvent::as_header).copied()
}
