use thiserror::Error;

use stepsync_shared::{PlayerId, SerializerError};

use crate::transport::TransportError;

/// Errors raised while establishing the connection to the authority
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    /// No transport was supplied to the engine
    #[error("No transport configured. Supply one with ClientEngine::with_transport() or enable standalone mode")]
    NoTransport,

    /// `connect()` was called on an engine that already holds a connection
    #[error("Already connected to {address}")]
    AlreadyConnected {
        address: String,
    },

    /// The transport failed to connect
    #[error("Failed to connect to {address}: {source}")]
    Transport {
        address: String,
        #[source]
        source: TransportError,
    },
}

/// Errors raised by engine lifecycle and step processing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// `start()` was called without a renderer
    #[error("No renderer configured. A renderer must be supplied before the engine starts ticking")]
    MissingRenderer,

    /// An inbound sync payload decoded without a header record (protocol violation)
    #[error("Inbound sync payload carries no sync header ({event_count} events decoded)")]
    MissingSyncHeader {
        event_count: usize,
    },

    /// An inbound sync payload could not be decoded
    #[error("Inbound sync payload could not be decoded: {0}")]
    Payload(#[from] SerializerError),

    /// Connection error while starting
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
}

/// Errors raised when submitting local input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// The authority has not assigned a player identity yet
    #[error("Player identity not yet assigned by the authority; input cannot be sequenced")]
    IdentityPending,

    /// Every message index in the player's namespace has been issued
    #[error("Message index namespace of {player_id} is exhausted after {issued} inputs")]
    NamespaceExhausted {
        player_id: PlayerId,
        issued: u64,
    },
}

/// Errors raised while reading configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Sync mode name is not one of interpolate, extrapolate, frameSync, reflect
    #[error("Unknown sync mode '{name}'. Expected one of: interpolate, extrapolate, frameSync, reflect")]
    UnknownSyncMode {
        name: String,
    },
}
