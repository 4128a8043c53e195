use std::{fmt, str::FromStr, time::Duration};

use crate::{error::ConfigError, transport::ConnectOptions};

/// Contains Config properties which will be used by the ClientEngine
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Address handed to the transport on connect
    pub server_address: String,
    pub connect_options: ConnectOptions,
    /// Nominal time between two simulation steps
    pub step_period: Duration,
    /// Number of steps local input is held back before it is applied locally.
    /// 0 applies input immediately.
    pub delay_input_count: usize,
    /// Connect to the authority as part of `start()`
    pub auto_connect: bool,
    /// Run without an authority: no transport, local identity, nothing sent
    pub standalone_mode: bool,
    /// Interval between two round-trip-time queries
    pub health_check_interval: Duration,
    /// Number of round-trip samples averaged into the reported RTT
    pub health_check_rtt_sample: usize,
    /// Overdue ticks the scheduler replays before re-seating its schedule
    pub max_catch_up_steps: u32,
    pub sync_options: SyncOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_address: "127.0.0.1:3000".to_string(),
            connect_options: ConnectOptions::default(),
            step_period: Duration::from_micros(16_667),
            delay_input_count: 0,
            auto_connect: true,
            standalone_mode: false,
            health_check_interval: Duration::from_millis(1000),
            health_check_rtt_sample: 10,
            max_catch_up_steps: 5,
            sync_options: SyncOptions::default(),
        }
    }
}

/// Selects how authoritative object state is blended into local state.
#[derive(Clone, Debug, PartialEq)]
pub struct SyncOptions {
    pub mode: SyncMode,
    /// Bending applied to objects owned by this client
    pub local_obj_bending: f32,
    /// Bending applied to objects owned by anyone else
    pub remote_obj_bending: f32,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            mode: SyncMode::Extrapolate,
            local_obj_bending: 0.1,
            remote_obj_bending: 0.6,
        }
    }
}

/// Sync mode as named in configuration. `Reflect` is normalized into
/// interpolation with sync markers when the synchronizer is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyncMode {
    Interpolate,
    Extrapolate,
    FrameSync,
    Reflect,
}

impl SyncMode {
    pub fn name(&self) -> &'static str {
        match self {
            SyncMode::Interpolate => "interpolate",
            SyncMode::Extrapolate => "extrapolate",
            SyncMode::FrameSync => "frameSync",
            SyncMode::Reflect => "reflect",
        }
    }
}

impl FromStr for SyncMode {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "interpolate" => Ok(SyncMode::Interpolate),
            "extrapolate" => Ok(SyncMode::Extrapolate),
            "frameSync" => Ok(SyncMode::FrameSync),
            "reflect" => Ok(SyncMode::Reflect),
            _ => Err(ConfigError::UnknownSyncMode {
                name: name.to_string(),
            }),
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
