use framesync_serde::MTU_SIZE_BYTES;

use crate::ParticipantId;

/// Contains config properties which will be used by a sync session
#[derive(Clone, Debug)]
pub struct SyncConfig {
    /// This participant
    pub local: ParticipantId,
    /// Participant that writes every MasterSend entity
    pub master: ParticipantId,
    /// Default number of frame records kept per stream
    pub buffer_capacity: usize,
    /// How many frames playback trails the newest received frame, to absorb jitter
    pub interpolation_delay: f32,
    /// Coalescing of unchanged captures. `None` sends every captured frame.
    pub heartbeat: Option<HeartbeatConfig>,
    /// Upper bound on the size of each outbound packet
    pub max_packet_bytes: usize,
}

impl SyncConfig {
    pub fn new(local: ParticipantId, master: ParticipantId) -> Self {
        Self {
            local,
            master,
            ..Default::default()
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            local: ParticipantId(0),
            master: ParticipantId(0),
            buffer_capacity: 32,
            interpolation_delay: 2.0,
            heartbeat: None,
            max_packet_bytes: MTU_SIZE_BYTES,
        }
    }
}

/// Once a stream has been unchanged for `idle_ticks` captures, only every
/// `interval`-th unchanged capture is sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeartbeatConfig {
    pub idle_ticks: u32,
    pub interval: u32,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            idle_ticks: 10,
            interval: 10,
        }
    }
}
