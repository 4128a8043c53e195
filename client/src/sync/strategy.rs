use crate::client_config::SyncMode;

/// How authoritative object state is folded into local state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyncStrategy {
    /// Every object follows the authority, trailing it. With `reflect` the
    /// authority's positions are also surfaced as visible markers.
    Interpolate { reflect: bool },
    /// Objects are simulated ahead locally and bent toward the authority,
    /// owned and remote objects by separate coefficients.
    Extrapolate,
    /// Authoritative state replaces local state outright.
    FrameSync,
}

impl SyncStrategy {
    /// Normalizes a configured mode; `reflect` is interpolation plus markers.
    pub fn from_mode(mode: SyncMode) -> Self {
        match mode {
            SyncMode::Interpolate => SyncStrategy::Interpolate { reflect: false },
            SyncMode::Reflect => SyncStrategy::Interpolate { reflect: true },
            SyncMode::Extrapolate => SyncStrategy::Extrapolate,
            SyncMode::FrameSync => SyncStrategy::FrameSync,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SyncStrategy::Interpolate { .. } => "interpolate",
            SyncStrategy::Extrapolate => "extrapolate",
            SyncStrategy::FrameSync => "frameSync",
        }
    }
}
