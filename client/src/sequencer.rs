use log::{debug, error, warn};

use stepsync_shared::{
    find_sync_header, ClientMessage, InputMessage, InputOptions, MessageIndex, PayloadSerializer,
    PlayerId, StepCount, SyncEvent, SyncHeader, MESSAGE_INDEX_NAMESPACE,
};

use crate::{
    error::{EngineError, InputError},
    transport::MessageSender,
};

/// A local input once it has been given its message index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingInput {
    pub message_index: MessageIndex,
    /// Local step count when the input was submitted
    pub step: StepCount,
    pub input: String,
    pub options: InputOptions,
}

impl PendingInput {
    pub fn to_message(&self) -> ClientMessage {
        ClientMessage::Move(InputMessage {
            message_index: self.message_index,
            step: self.step,
            input: self.input.clone(),
            options: self.options.clone(),
        })
    }
}

/// A drained sync payload with its header located.
#[derive(Clone, Debug, PartialEq)]
pub struct InboundSync {
    pub header: SyncHeader,
    pub events: Vec<SyncEvent>,
}

/// Orders traffic between the engine and the transport.
///
/// Outbound messages are sent in the order they were queued. Inbound payloads
/// are drained most-recent-first.
#[derive(Default)]
pub struct MessageSequencer {
    player_id: Option<PlayerId>,
    issued: u64,
    outbound: Vec<ClientMessage>,
    inbound: Vec<Vec<u8>>,
}

impl MessageSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player_id(&self) -> Option<PlayerId> {
        self.player_id
    }

    /// Fixes the message index namespace. Only the first identity of a
    /// connection is accepted; returns whether this call assigned it.
    pub fn assign_identity(&mut self, player_id: PlayerId) -> bool {
        match self.player_id {
            None => {
                debug!(
                    "message indices for {} start at {}",
                    player_id,
                    player_id.message_index_base()
                );
                self.player_id = Some(player_id);
                self.issued = 0;
                true
            }
            Some(current) => {
                if current != player_id {
                    warn!(
                        "ignoring identity {} for a connection already identified as {}",
                        player_id, current
                    );
                }
                false
            }
        }
    }

    /// Gives a local input the next message index of this player's namespace
    pub fn stamp_input(
        &mut self,
        step: StepCount,
        input: String,
        options: InputOptions,
    ) -> Result<PendingInput, InputError> {
        let player_id = self.player_id.ok_or(InputError::IdentityPending)?;
        if self.issued >= MESSAGE_INDEX_NAMESPACE {
            return Err(InputError::NamespaceExhausted {
                player_id,
                issued: self.issued,
            });
        }
        let message_index = player_id.message_index_base() + self.issued;
        self.issued += 1;

        Ok(PendingInput {
            message_index,
            step,
            input,
            options,
        })
    }

    // Outgoing

    pub fn enqueue(&mut self, message: ClientMessage) {
        self.outbound.push(message);
    }

    pub fn outbound_len(&self) -> usize {
        self.outbound.len()
    }

    /// Hands every queued message to `sender` in queue order. The queue is
    /// emptied before the first send, so nothing is ever sent twice. Returns
    /// the number of messages the sender accepted.
    pub fn flush(&mut self, sender: &dyn MessageSender) -> usize {
        let outbound = std::mem::take(&mut self.outbound);
        let mut sent = 0;
        for message in &outbound {
            match sender.send(message) {
                Ok(()) => sent += 1,
                Err(err) => warn!("Client Error: {}", err),
            }
        }
        sent
    }

    // Incoming

    pub fn enqueue_inbound(&mut self, raw: Vec<u8>) {
        self.inbound.push(raw);
    }

    pub fn inbound_len(&self) -> usize {
        self.inbound.len()
    }

    /// Removes the most recently queued payload and decodes it.
    pub fn drain_one(
        &mut self,
        serializer: &dyn PayloadSerializer,
    ) -> Option<Result<InboundSync, EngineError>> {
        let raw = self.inbound.pop()?;
        Some(Self::decode(serializer, &raw))
    }

    fn decode(serializer: &dyn PayloadSerializer, raw: &[u8]) -> Result<InboundSync, EngineError> {
        let events = serializer.deserialize_payload(raw).map_err(|err| {
            error!("Client Error: {}", err);
            EngineError::from(err)
        })?;
        let Some(header) = find_sync_header(&events) else {
            error!(
                "Client Error: sync payload without header ({} events)",
                events.len()
            );
            return Err(EngineError::MissingSyncHeader {
                event_count: events.len(),
            });
        };
        Ok(InboundSync { header, events })
    }
}
