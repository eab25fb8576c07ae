use std::time::Duration;

use airchat_frame::MAX_FRAME_LEN;

/// Minimum gap between two transmissions on the half-duplex link.
pub const DEFAULT_PACING_INTERVAL: Duration = Duration::from_secs(3);

/// How often a consumer is expected to drain inbound events.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Tuning for the transmit and receive workers.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Delay after each frame written before the next one may go out.
    pub pacing_interval: Duration,
    /// Upper bound on one read from the link.
    pub read_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pacing_interval: DEFAULT_PACING_INTERVAL,
            read_limit: MAX_FRAME_LEN,
        }
    }
}
