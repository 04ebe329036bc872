//! Packet layout, all fields bit-packed:
//!
//! ```text
//! sender: varint
//! repeated { continue: bit = 1, frame_id: varint, stream_id: varint, claims_authority: bit, value }
//! terminator: bit = 0
//! ```
//!
//! The value layout is fixed by the stream's precision spec, so the reader
//! needs the registry to find where each entry ends.

mod error;
mod packet_reader;
mod packet_writer;

pub use error::PacketError;
pub use packet_reader::{read_packet, InboundBatch, InboundFrame};
pub use packet_writer::FramePacketWriter;
