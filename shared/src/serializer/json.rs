use log::trace;

use super::{PayloadSerializer, SerializerError};
use crate::sync_event::SyncEvent;

/// Sync payloads as a JSON array of tagged events.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonSerializer;

impl JsonSerializer {
    pub fn new() -> Self {
        Self
    }
}

impl PayloadSerializer for JsonSerializer {
    fn deserialize_payload(&self, raw: &[u8]) -> Result<Vec<SyncEvent>, SerializerError> {
        let events: Vec<SyncEvent> =
            serde_json::from_slice(raw).map_err(|err| SerializerError::Malformed {
                payload_size: raw.len(),
                reason: err.to_string(),
            })?;
        trace!("decoded {} sync events from {} bytes", events.len(), raw.len());
        Ok(events)
    }

    fn serialize_payload(&self, events: &[SyncEvent]) -> Result<Vec<u8>, SerializerError> {
        serde_json::to_vec(events).map_err(|err| SerializerError::EncodeFailed {
            event_count: events.len(),
            reason: err.to_string(),
        })
    }
}
