use thiserror::Error;

/// Errors that can occur while encoding or decoding a sync payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializerError {
    /// Payload bytes could not be decoded into sync events
    #[error("Failed to decode sync payload of {payload_size} bytes: {reason}")]
    Malformed {
        payload_size: usize,
        reason: String,
    },

    /// Sync events could not be encoded
    #[error("Failed to encode {event_count} sync events: {reason}")]
    EncodeFailed {
        event_count: usize,
        reason: String,
    },
}
