/// In-memory transport for driving the client engine in tests.
/// Routes messages between the engine and a scripted authority without network I/O.
use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use stepsync_client::transport::{
    ConnectOptions, MessageReceiver, MessageSender, RecvError, SendError, Transport,
    TransportError,
};
use stepsync_shared::{ClientMessage, PlayerId, ServerMessage};

/// Client half, handed to `ClientEngine::with_transport`
pub struct LocalTransport {
    to_client: Arc<Mutex<VecDeque<ServerMessage>>>,
    to_server: Arc<Mutex<Vec<ClientMessage>>>,
    refuse_sends: Arc<AtomicBool>,
    connect_addresses: Arc<Mutex<Vec<String>>>,
}

/// Authority half, kept by the test
#[derive(Clone)]
pub struct LocalServer {
    to_client: Arc<Mutex<VecDeque<ServerMessage>>>,
    to_server: Arc<Mutex<Vec<ClientMessage>>>,
    refuse_sends: Arc<AtomicBool>,
    connect_addresses: Arc<Mutex<Vec<String>>>,
}

impl LocalTransport {
    pub fn pair() -> (LocalTransport, LocalServer) {
        let to_client = Arc::new(Mutex::new(VecDeque::new()));
        let to_server = Arc::new(Mutex::new(Vec::new()));
        let refuse_sends = Arc::new(AtomicBool::new(false));
        let connect_addresses = Arc::new(Mutex::new(Vec::new()));

        let transport = LocalTransport {
            to_client: to_client.clone(),
            to_server: to_server.clone(),
            refuse_sends: refuse_sends.clone(),
            connect_addresses: connect_addresses.clone(),
        };
        let server = LocalServer {
            to_client,
            to_server,
            refuse_sends,
            connect_addresses,
        };
        (transport, server)
    }
}

impl Transport for LocalTransport {
    fn connect(
        self: Box<Self>,
        address: &str,
        _options: &ConnectOptions,
    ) -> Result<(Box<dyn MessageSender>, Box<dyn MessageReceiver>), TransportError> {
        self.connect_addresses
            .lock()
            .unwrap()
            .push(address.to_string());
        let sender = LocalSender {
            queue: self.to_server,
            refuse_sends: self.refuse_sends,
        };
        let receiver = LocalReceiver {
            queue: self.to_client,
        };
        Ok((Box::new(sender), Box::new(receiver)))
    }
}

impl LocalServer {
    /// Queues an arbitrary message for the client
    pub fn send(&self, message: ServerMessage) {
        self.to_client.lock().unwrap().push_back(message);
    }

    pub fn assign_identity(&self, player_id: PlayerId) {
        self.send(ServerMessage::PlayerJoined { player_id });
    }

    pub fn send_world_update(&self, payload: Vec<u8>) {
        self.send(ServerMessage::WorldUpdate { payload });
    }

    /// Takes everything the client has sent so far
    pub fn take_received(&self) -> Vec<ClientMessage> {
        std::mem::take(&mut *self.to_server.lock().unwrap())
    }

    /// Makes every client send fail until called again with `false`
    pub fn refuse_sends(&self, refuse: bool) {
        self.refuse_sends.store(refuse, Ordering::SeqCst);
    }

    pub fn connect_addresses(&self) -> Vec<String> {
        self.connect_addresses.lock().unwrap().clone()
    }
}

struct LocalSender {
    queue: Arc<Mutex<Vec<ClientMessage>>>,
    refuse_sends: Arc<AtomicBool>,
}

impl MessageSender for LocalSender {
    fn send(&self, message: &ClientMessage) -> Result<(), SendError> {
        if self.refuse_sends.load(Ordering::SeqCst) {
            return Err(SendError {
                command: message.command(),
            });
        }
        self.queue.lock().unwrap().push(message.clone());
        Ok(())
    }
}

struct LocalReceiver {
    queue: Arc<Mutex<VecDeque<ServerMessage>>>,
}

impl MessageReceiver for LocalReceiver {
    fn receive(&mut self) -> Result<Option<ServerMessage>, RecvError> {
        Ok(self.queue.lock().unwrap().pop_front())
    }
}

/// A transport whose connect always fails with the given error
pub struct FailingTransport {
    pub error: TransportError,
}

impl FailingTransport {
    pub fn unreachable() -> Self {
        Self {
            error: TransportError::Unreachable {
                reason: "connection refused".to_string(),
            },
        }
    }
}

impl Transport for FailingTransport {
    fn connect(
        self: Box<Self>,
        _address: &str,
        _options: &ConnectOptions,
    ) -> Result<(Box<dyn MessageSender>, Box<dyn MessageReceiver>), TransportError> {
        Err(self.error)
    }
}
