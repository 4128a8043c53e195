pub use inner::{
    ConnectOptions, MessageReceiver, MessageSender, RecvError, SendError, Transport,
    TransportError,
};

mod inner {

    use std::collections::BTreeMap;

    use thiserror::Error;

    use stepsync_shared::{ClientMessage, ServerMessage};

    /// Options handed to the transport at connect time.
    #[derive(Clone, Debug, Default, PartialEq, Eq)]
    pub struct ConnectOptions {
        /// Extra headers/query values the transport forwards to the authority
        pub params: BTreeMap<String, String>,
    }

    /// Errors that can occur while a transport connects
    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum TransportError {
        /// Authority could not be reached
        #[error("Authority unreachable: {reason}")]
        Unreachable { reason: String },

        /// Authority refused the connection
        #[error("Connection rejected by authority: {reason}")]
        Rejected { reason: String },
    }

    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    #[error("Failed to send {command} message to the authority")]
    pub struct SendError {
        pub command: &'static str,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    #[error("Failed to receive from the authority: {reason}")]
    pub struct RecvError {
        pub reason: String,
    }

    pub trait Transport {
        /// Connects to the authority, yielding the two halves of the link.
        ///
        /// The player identity is not part of the result; it arrives later as a
        /// `ServerMessage::PlayerJoined` on the receiver.
        fn connect(
            self: Box<Self>,
            address: &str,
            options: &ConnectOptions,
        ) -> Result<(Box<dyn MessageSender>, Box<dyn MessageReceiver>), TransportError>;
    }

    pub trait MessageSender: Send + Sync {
        /// Sends a message to the authority
        fn send(&self, message: &ClientMessage) -> Result<(), SendError>;
    }

    pub trait MessageReceiver: Send + Sync {
        /// Receives the next message delivered by the authority, if any
        fn receive(&mut self) -> Result<Option<ServerMessage>, RecvError>;
    }
}
