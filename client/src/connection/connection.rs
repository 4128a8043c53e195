use std::time::{Duration, Instant};

use log::{debug, warn};

use stepsync_shared::{ClientMessage, PlayerId, ServerMessage};

use crate::{
    connection::health_check::HealthCheck,
    sequencer::MessageSequencer,
    transport::{MessageReceiver, MessageSender},
};

/// An established link to the authority.
pub struct Connection {
    pub address: String,
    sender: Box<dyn MessageSender>,
    receiver: Box<dyn MessageReceiver>,
    health_check: HealthCheck,
}

impl Connection {
    pub fn new(
        address: String,
        sender: Box<dyn MessageSender>,
        receiver: Box<dyn MessageReceiver>,
        health_check: HealthCheck,
    ) -> Self {
        Self {
            address,
            sender,
            receiver,
            health_check,
        }
    }

    pub fn rtt(&self) -> Option<Duration> {
        self.health_check.rtt()
    }

    // Incoming data

    /// Pulls everything the transport has delivered. Sync payloads are only
    /// queued on `sequencer`; identities are returned to the caller.
    pub fn receive_messages(
        &mut self,
        now: Instant,
        sequencer: &mut MessageSequencer,
    ) -> Vec<PlayerId> {
        let mut identities = Vec::new();
        loop {
            match self.receiver.receive() {
                Ok(Some(ServerMessage::WorldUpdate { payload })) => {
                    sequencer.enqueue_inbound(payload);
                }
                Ok(Some(ServerMessage::PlayerJoined { player_id })) => {
                    identities.push(player_id);
                }
                Ok(Some(ServerMessage::RttResponse { query_id })) => {
                    if self.health_check.on_response(query_id, now).is_none() {
                        debug!("rtt response for unknown query {}", query_id);
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    warn!("Client Error: {}", err);
                    break;
                }
            }
        }
        identities
    }

    // Outgoing data

    /// Queues a health check if one is due, then flushes the outbound queue.
    /// Returns the number of messages sent.
    pub fn send_messages(&mut self, now: Instant, sequencer: &mut MessageSequencer) -> usize {
        if self.health_check.should_query(now) {
            let query_id = self.health_check.start_query(now);
            sequencer.enqueue(ClientMessage::RttQuery { query_id });
        }
        sequencer.flush(self.sender.as_ref())
    }
}
