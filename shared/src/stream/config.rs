use crate::{authority::ReplicationMode, quantize::PrecisionSpec, Realm};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InterpolationMode {
    /// Snapshots are applied as-is; the interpolator skips the stream.
    None,
    Linear,
    /// Four-point spline, falling back to `Linear` where a neighbour is missing.
    CatmullRom,
}

/// Per-stream settings, fixed at registration.
#[derive(Clone, Debug, PartialEq)]
pub struct StreamConfig {
    pub realm: Realm,
    pub replication_mode: ReplicationMode,
    pub interpolation_mode: InterpolationMode,
    /// Lower values are snapshotted first within a dispatch batch
    pub apply_order: i32,
    pub precision: PrecisionSpec,
    /// Overrides `SyncConfig::buffer_capacity` for this stream
    pub capacity: Option<usize>,
}

impl StreamConfig {
    pub fn new(precision: PrecisionSpec) -> Self {
        Self {
            realm: Realm::Primary,
            replication_mode: ReplicationMode::OwnerSend,
            interpolation_mode: InterpolationMode::Linear,
            apply_order: 0,
            precision,
            capacity: None,
        }
    }

    pub fn with_realm(mut self, realm: Realm) -> Self {
        self.realm = realm;
        self
    }

    pub fn with_replication_mode(mut self, replication_mode: ReplicationMode) -> Self {
        self.replication_mode = replication_mode;
        self
    }

    pub fn with_interpolation(mut self, interpolation_mode: InterpolationMode) -> Self {
        self.interpolation_mode = interpolation_mode;
        self
    }

    pub fn with_apply_order(mut self, apply_order: i32) -> Self {
        self.apply_order = apply_order;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }
}
