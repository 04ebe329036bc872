use thiserror::Error;

use crate::{
    authority::AuthorityError, quantize::QuantizeError, stream::StreamError, wire::PacketError,
    EntityId, StreamId,
};

/// Errors returned by session operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyncError {
    #[error(transparent)]
    Authority(#[from] AuthorityError),

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error(transparent)]
    Quantize(#[from] QuantizeError),

    #[error(transparent)]
    Packet(#[from] PacketError),

    /// Only the acting authority may encode a stream for sending
    #[error("{stream} of {entity} is not written by this participant")]
    NotAuthoritative { stream: StreamId, entity: EntityId },
}
