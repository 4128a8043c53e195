mod error;

cfg_if! {
    if #[cfg(feature = "json")] {
        mod json;
        pub use json::JsonSerializer;
    }
}

pub use error::SerializerError;

use crate::sync_event::SyncEvent;

/// Converts authoritative sync payloads to and from their wire form.
///
/// Decoded payloads must contain exactly one `SyncEvent::SyncHeader`; the
/// serializer itself does not enforce this, the consumer of the events does.
pub trait PayloadSerializer {
    fn deserialize_payload(&self, raw: &[u8]) -> Result<Vec<SyncEvent>, SerializerError>;

    /// Used for outbound traces and by authorities producing payloads
    fn serialize_payload(&self, events: &[SyncEvent]) -> Result<Vec<u8>, SerializerError>;
}
