use thiserror::Error;

use crate::{authority::ReplicationMode, quantize::QuantizeError, EntityId, StreamId};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StreamError {
    #[error("{stream} is already registered")]
    DuplicateStream { stream: StreamId },

    #[error("{stream} is not registered")]
    UnknownStream { stream: StreamId },

    #[error("{entity} is not registered")]
    UnknownEntity { entity: EntityId },

    #[error("{entity} is already registered")]
    DuplicateEntity { entity: EntityId },

    /// A stream must replicate the same way as the entity it belongs to
    #[error("{stream} declares {declared:?} but its entity {entity} replicates as {entity_mode:?}")]
    ReplicationModeMismatch {
        stream: StreamId,
        entity: EntityId,
        declared: ReplicationMode,
        entity_mode: ReplicationMode,
    },

    /// Interpolation needs at least two records to bracket a target
    #[error("{stream} buffer capacity {capacity} is below the minimum of 2")]
    InvalidCapacity { stream: StreamId, capacity: usize },

    #[error("invalid precision: {0}")]
    InvalidPrecision(#[from] QuantizeError),

    #[error("{stream} has no captured record yet")]
    NoRecord { stream: StreamId },
}
