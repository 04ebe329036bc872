//! # Framesync Shared
//! Frame-based state synchronization: authoritative capture, bit-packed
//! quantization, single-writer authority hand-off, ordered snapshot dispatch
//! and interpolated playback.

#![deny(unstable_features, unused_import_braces)]

pub use framesync_serde::{
    BitCounter, BitReader, BitWrite, BitWriter, ConstBitLength, Serde, SerdeErr,
    UnsignedVariableInteger, MTU_SIZE_BITS, MTU_SIZE_BYTES,
};

mod capture;
mod config;
mod diagnostics;
mod dispatch;
mod error;
mod realm;
mod session;
mod types;

pub mod authority;
pub mod frame;
pub mod interpolation;
pub mod quantize;
pub mod stream;
pub mod value;
pub mod wire;

pub use authority::{
    AuthorityChange, AuthorityError, AuthorityManager, AuthorityState, ReplicationMode,
    TransferTicket,
};
pub use capture::{CapturePipeline, CapturedFrame};
pub use config::{HeartbeatConfig, SyncConfig};
pub use diagnostics::{ClampEvent, SyncDiagnostics};
pub use dispatch::{DispatchReport, SnapshotDispatcher};
pub use error::SyncError;
pub use frame::{FrameBuffer, FrameRecord, Surrounding};
pub use interpolation::Interpolator;
pub use quantize::{dequantize, quantize, PrecisionSpec, QuantizeError, QuantizeOutcome, RangeSpec};
pub use realm::Realm;
pub use session::SyncSession;
pub use stream::{
    Capabilities, InterpolationMode, StreamConfig, StreamError, StreamHandler, SyncRegistry,
    SyncStream,
};
pub use types::{EntityId, FrameId, ParticipantId, StreamId};
pub use value::{normalize_rotation, Quat, SyncValue, ValueKind, Vec3};
pub use wire::{read_packet, FramePacketWriter, InboundBatch, InboundFrame, PacketError};
