use framesync_serde::SerdeErr;
use thiserror::Error;

use crate::StreamId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PacketError {
    #[error("malformed packet: {0}")]
    Serde(#[from] SerdeErr),

    /// Without the stream's precision spec the rest of the packet can't be parsed
    #[error("packet references unregistered {stream}")]
    UnknownStream { stream: StreamId },
}
