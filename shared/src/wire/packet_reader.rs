use framesync_serde::{BitReader, Serde, UnsignedVariableInteger};

use crate::{
    quantize::dequantize, stream::SyncRegistry, value::SyncValue, wire::PacketError, FrameId,
    ParticipantId, StreamId,
};

/// One decoded entry, already dequantized
#[derive(Clone, Debug, PartialEq)]
pub struct InboundFrame {
    pub stream: StreamId,
    pub frame_id: FrameId,
    pub claims_authority: bool,
    pub value: SyncValue,
}

/// Everything that could be read from one packet
#[derive(Clone, Debug, PartialEq)]
pub struct InboundBatch {
    pub sender: ParticipantId,
    pub frames: Vec<InboundFrame>,
    /// Set when decoding stopped early. `frames` still holds the entries read before it.
    pub error: Option<PacketError>,
}

impl InboundBatch {
    pub fn new(sender: ParticipantId) -> Self {
        Self {
            sender,
            frames: Vec::new(),
            error: None,
        }
    }
}

/// Decodes a packet written by [`FramePacketWriter`](crate::wire::FramePacketWriter).
///
/// Fails outright only if the sender header is unreadable.
pub fn read_packet(bytes: &[u8], registry: &SyncRegistry) -> Result<InboundBatch, PacketError> {
    let mut reader = BitReader::new(bytes);
    let sender: u16 = UnsignedVariableInteger::<7>::de(&mut reader)?.try_to()?;
    let mut batch = InboundBatch::new(ParticipantId(sender));

    loop {
        match read_entry(&mut reader, registry) {
            Ok(Some(frame)) => batch.frames.push(frame),
            Ok(None) => break,
            Err(error) => {
                batch.error = Some(error);
                break;
            }
        }
    }

    Ok(batch)
}

fn read_entry(
    reader: &mut BitReader,
    registry: &SyncRegistry,
) -> Result<Option<InboundFrame>, PacketError> {
    let continue_read = bool::de(reader)?;
    if !continue_read {
        return Ok(None);
    }

    let frame_id: FrameId = UnsignedVariableInteger::<7>::de(reader)?.try_to()?;
    let stream = StreamId(UnsignedVariableInteger::<7>::de(reader)?.try_to()?);
    let claims_authority = bool::de(reader)?;

    let precision = registry
        .stream(&stream)
        .map(|registered| registered.config().precision)
        .ok_or(PacketError::UnknownStream { stream })?;
    let value = dequantize(reader, &precision)?;

    Ok(Some(InboundFrame {
        stream,
        frame_id,
        claims_authority,
        value,
    }))
}
