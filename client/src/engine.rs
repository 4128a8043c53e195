use std::time::{Duration, Instant};

use log::{debug, error, info, warn};

use stepsync_shared::{InputOptions, MessageIndex, PayloadSerializer, PlayerId, StepCount};

use crate::{
    client_config::ClientConfig,
    connection::{connection::Connection, health_check::HealthCheck},
    delay_buffer::InputDelayBuffer,
    drift::{Checkpoint, DriftCorrector, DriftOutcome, STEP_DELAY_MSEC, STEP_HURRY_MSEC},
    error::{ConnectionError, EngineError, InputError},
    events::{DriftCorrection, EngineEvents, StepReset, SyncReceived},
    scheduler::{SchedulerConfig, StepScheduler, TickInfo},
    sequencer::{InboundSync, MessageSequencer, PendingInput},
    simulation::{LifecycleEvent, Owned, Renderer, Simulation},
    sync::{SyncTarget, Synchronizer},
    transport::Transport,
};

/// Identity used when running without an authority
const STANDALONE_PLAYER_ID: PlayerId = PlayerId(0);

/// Keeps a local `Simulation` stepping in time with an authoritative one.
///
/// Every tick runs, in order: transport deliveries are queued, queued syncs are
/// drained (each followed by a sync-checkpoint drift check), the every-step
/// drift check, release of delayed input, the simulation step, and finally the
/// outbound flush.
pub struct ClientEngine<S: Simulation> {
    config: ClientConfig,
    simulation: S,
    renderer: Option<Box<dyn Renderer>>,
    renderer_initialized: bool,
    transport: Option<Box<dyn Transport>>,
    connection: Option<Connection>,
    serializer: Box<dyn PayloadSerializer>,
    scheduler: StepScheduler,
    drift: DriftCorrector,
    delay_buffer: Option<InputDelayBuffer<PendingInput>>,
    sequencer: MessageSequencer,
    synchronizer: Synchronizer,
    events: EngineEvents,
}

cfg_if! {
    if #[cfg(feature = "json")] {
        impl<S: Simulation> ClientEngine<S> {
            /// Creates an engine decoding sync payloads as JSON
            pub fn new(config: ClientConfig, simulation: S) -> Self {
                Self::with_serializer(config, simulation, Box::new(stepsync_shared::JsonSerializer))
            }
        }
    }
}

impl<S: Simulation> ClientEngine<S> {
    pub fn with_serializer(
        config: ClientConfig,
        simulation: S,
        serializer: Box<dyn PayloadSerializer>,
    ) -> Self {
        let scheduler = StepScheduler::new(SchedulerConfig {
            period: config.step_period,
            delay: Duration::from_millis(STEP_DELAY_MSEC.unsigned_abs()),
            hurry: Duration::from_millis(STEP_HURRY_MSEC.unsigned_abs()),
            max_catch_up: config.max_catch_up_steps,
        });
        let delay_buffer = InputDelayBuffer::from_delay_count(config.delay_input_count);
        let synchronizer = Synchronizer::new(&config.sync_options);

        Self {
            config,
            simulation,
            renderer: None,
            renderer_initialized: false,
            transport: None,
            connection: None,
            serializer,
            scheduler,
            drift: DriftCorrector::new(),
            delay_buffer,
            sequencer: MessageSequencer::new(),
            synchronizer,
            events: EngineEvents::new(),
        }
    }

    pub fn with_renderer<R: Renderer + 'static>(mut self, renderer: R) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn with_transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.set_transport(transport);
        self
    }

    /// Supplies the transport for the next `connect()`, e.g. after a failed one
    pub fn set_transport<T: Transport + 'static>(&mut self, transport: T) {
        self.transport = Some(Box::new(transport));
    }

    // Lifecycle

    /// Connects to the authority. The transport is consumed by the attempt; a
    /// failed connect is not retried, supply a new transport to try again.
    pub fn connect(&mut self) -> Result<(), ConnectionError> {
        if self.config.standalone_mode {
            debug!("standalone mode, not connecting");
            return Ok(());
        }
        if let Some(connection) = &self.connection {
            return Err(ConnectionError::AlreadyConnected {
                address: connection.address.clone(),
            });
        }
        let transport = self.transport.take().ok_or(ConnectionError::NoTransport)?;
        let address = self.config.server_address.clone();

        let (sender, receiver) = transport
            .connect(&address, &self.config.connect_options)
            .map_err(|source| {
                warn!("Client Error: failed to connect to {}: {}", address, source);
                ConnectionError::Transport {
                    address: address.clone(),
                    source,
                }
            })?;

        info!("connected to {}", address);
        let health_check = HealthCheck::new(
            self.config.health_check_interval,
            self.config.health_check_rtt_sample,
        );
        self.connection = Some(Connection::new(address, sender, receiver, health_check));
        Ok(())
    }

    /// Starts ticking. Fails before any tick if no renderer was supplied.
    pub fn start(&mut self, now: Instant) -> Result<(), EngineError> {
        let Some(renderer) = self.renderer.as_mut() else {
            error!("Client Error: cannot start without a renderer");
            return Err(EngineError::MissingRenderer);
        };
        if self.scheduler.is_running() {
            return Ok(());
        }
        if !self.renderer_initialized {
            renderer.init();
            self.renderer_initialized = true;
        }

        if self.config.standalone_mode {
            self.assign_identity(STANDALONE_PLAYER_ID);
        } else if self.config.auto_connect && self.connection.is_none() {
            self.connect()?;
        }

        self.scheduler.start(now);
        info!(
            "client engine started at step {} with a {:?} step period",
            self.simulation.step_count(),
            self.config.step_period
        );
        Ok(())
    }

    /// Stops ticking. Safe to call at any point; queued outbound messages are
    /// kept and go out with the first flush after a restart.
    pub fn stop(&mut self) {
        if self.scheduler.is_running() {
            info!("client engine stopped at step {}", self.simulation.step_count());
        }
        self.scheduler.stop();
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Runs every tick that is due at `now`, returning how many ran
    pub fn poll(&mut self, now: Instant) -> Result<usize, EngineError> {
        let mut steps = 0;
        while let Some(tick) = self.scheduler.poll(now) {
            self.step(now, tick)?;
            steps += 1;
        }
        Ok(steps)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    // Input

    /// Submits a local input. It is queued for the authority and applied
    /// locally, either immediately or after the configured input delay.
    pub fn send_input<I: Into<String>>(
        &mut self,
        input: I,
        options: InputOptions,
    ) -> Result<MessageIndex, InputError> {
        let step = self.simulation.step_count();
        let pending = self.sequencer.stamp_input(step, input.into(), options)?;
        let message_index = pending.message_index;
        debug!(
            "input #{} '{}' at step {}",
            message_index, pending.input, pending.step
        );

        if !self.config.standalone_mode {
            self.sequencer.enqueue(pending.to_message());
        }
        match self.delay_buffer.as_mut() {
            Some(buffer) => buffer.push(pending),
            None => self.process_input_locally(&pending),
        }
        Ok(message_index)
    }

    /// Queues a raw sync payload; it is drained on the next tick
    pub fn enqueue_inbound(&mut self, raw: Vec<u8>) {
        self.sequencer.enqueue_inbound(raw);
    }

    pub fn is_owned_by_player<O: Owned + ?Sized>(&self, object: &O) -> bool {
        match (object.owner(), self.player_id()) {
            (Some(owner), Some(player_id)) => owner == player_id,
            _ => false,
        }
    }

    /// Folds the latest accepted sync into `world` using the configured strategy
    pub fn apply_pending_sync<W: SyncTarget>(&mut self, world: &mut W) -> usize {
        let player_id = self.player_id();
        self.synchronizer.apply_pending(world, player_id)
    }

    // Accessors

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn simulation(&self) -> &S {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut S {
        &mut self.simulation
    }

    pub fn synchronizer(&self) -> &Synchronizer {
        &self.synchronizer
    }

    pub fn drift(&self) -> &DriftCorrector {
        &self.drift
    }

    pub fn step_count(&self) -> StepCount {
        self.simulation.step_count()
    }

    /// Highest authoritative step seen, unset until the first sync
    pub fn remote_step_count(&self) -> Option<StepCount> {
        self.drift.remote_step()
    }

    /// Signed sum of scheduler nudges in milliseconds
    pub fn correction(&self) -> i64 {
        self.drift.correction()
    }

    pub fn player_id(&self) -> Option<PlayerId> {
        self.sequencer.player_id()
    }

    pub fn rtt(&self) -> Option<Duration> {
        self.connection.as_ref().and_then(Connection::rtt)
    }

    pub fn outbound_len(&self) -> usize {
        self.sequencer.outbound_len()
    }

    pub fn inbound_len(&self) -> usize {
        self.sequencer.inbound_len()
    }

    /// Takes the events collected since the last call
    pub fn take_events(&mut self) -> EngineEvents {
        std::mem::take(&mut self.events)
    }

    // Step

    fn step(&mut self, now: Instant, tick: TickInfo) -> Result<(), EngineError> {
        if let Some(connection) = self.connection.as_mut() {
            for player_id in connection.receive_messages(now, &mut self.sequencer) {
                self.assign_identity(player_id);
            }
        }

        while let Some(inbound) = self.sequencer.drain_one(self.serializer.as_ref()) {
            self.handle_sync(inbound?);
        }

        self.check_drift(Checkpoint::OnEveryStep);
        self.apply_delayed_inputs();

        let step = self.simulation.step_count();
        self.simulation.emit(LifecycleEvent::PreStep { step });
        self.simulation
            .step(false, tick.time, tick.delta, tick.physics_only);
        let step = self.simulation.step_count();
        self.simulation.emit(LifecycleEvent::PostStep { step });

        if self.scheduler.take_running_slow() {
            self.events.push_running_slow(step);
        }

        if let Some(connection) = self.connection.as_mut() {
            connection.send_messages(now, &mut self.sequencer);
        }
        Ok(())
    }

    fn assign_identity(&mut self, player_id: PlayerId) {
        if self.sequencer.assign_identity(player_id) {
            info!("joined as {}", player_id);
            self.events.push_player_joined(player_id);
        }
    }

    fn handle_sync(&mut self, inbound: InboundSync) {
        let InboundSync { header, events } = inbound;
        debug!(
            "sync for step {} (full: {}) at local step {}",
            header.step_count,
            header.full_update,
            self.simulation.step_count()
        );
        self.drift.observe_remote(header.step_count);

        let sync = SyncReceived {
            sync_events: events,
            step_count: header.step_count,
            full_update: header.full_update,
        };
        self.synchronizer.on_sync_received(&sync);
        self.simulation.emit(LifecycleEvent::SyncReceived(&sync));
        self.events.push_sync(sync);

        self.check_drift(Checkpoint::OnServerSync);
    }

    fn check_drift(&mut self, checkpoint: Checkpoint) {
        let local_step = self.simulation.step_count();
        let correction = match self.drift.check(checkpoint, local_step, &mut self.scheduler) {
            DriftOutcome::InSync | DriftOutcome::NudgePending => return,
            DriftOutcome::Delayed => STEP_DELAY_MSEC,
            DriftOutcome::Hurried => -STEP_HURRY_MSEC,
            DriftOutcome::Reset { old_step, new_step } => {
                self.simulation.set_step_count(new_step);
                let reset = StepReset { old_step, new_step };
                self.simulation.emit(LifecycleEvent::StepReset(reset));
                self.events.push_reset(reset);
                return;
            }
        };
        self.events.push_correction(DriftCorrection {
            checkpoint,
            local_step,
            remote_step: self.drift.remote_step().unwrap_or_default(),
            correction,
        });
    }

    fn apply_delayed_inputs(&mut self) {
        let Some(buffer) = self.delay_buffer.as_mut() else {
            return;
        };
        for input in buffer.release_oldest() {
            self.process_input_locally(&input);
        }
    }

    fn process_input_locally(&mut self, input: &PendingInput) {
        if let Some(player_id) = self.sequencer.player_id() {
            self.simulation.process_input(input, player_id);
        }
    }
}
