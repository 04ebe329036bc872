use framesync_serde::{BitCounter, BitWrite, BitWriter, Serde, UnsignedVariableInteger};
use log::warn;

use crate::{
    quantize::{quantize, PrecisionSpec, QuantizeError, QuantizeOutcome},
    value::SyncValue,
    FrameId, ParticipantId, StreamId,
};

/// Packs frame entries into as many packets as needed to stay under the
/// configured packet size.
pub struct FramePacketWriter {
    sender: ParticipantId,
    max_bits: u32,
    packets: Vec<Vec<u8>>,
    current: BitWriter,
    entries_in_current: usize,
    entries: usize,
}

impl FramePacketWriter {
    pub fn new(sender: ParticipantId, max_packet_bytes: usize) -> Self {
        let max_bits = (max_packet_bytes.saturating_mul(8)).min(u32::MAX as usize) as u32;
        Self {
            sender,
            max_bits,
            packets: Vec::new(),
            current: Self::start_packet(sender, max_packet_bytes),
            entries_in_current: 0,
            entries: 0,
        }
    }

    /// Number of entries written so far, across all packets
    pub fn entry_count(&self) -> usize {
        self.entries
    }

    pub fn write_entry(
        &mut self,
        stream: StreamId,
        frame_id: FrameId,
        claims_authority: bool,
        value: &SyncValue,
        precision: &PrecisionSpec,
    ) -> Result<QuantizeOutcome, QuantizeError> {
        // check that the entry fits, keeping room for the terminator bit
        let budget = self.max_bits.saturating_sub(1);
        let mut counter = BitCounter::new(self.current.bits_written(), budget);
        Self::write_entry_bits(
            &mut counter,
            stream,
            frame_id,
            claims_authority,
            value,
            precision,
        )?;

        if counter.overflowed() {
            if self.entries_in_current > 0 {
                self.flush_current();
            } else {
                warn!(
                    "Packet Write Error: {} at frame {} requires {} bits, but a packet only has {} bits available. Sending it oversized.",
                    stream,
                    frame_id,
                    counter.bits_needed(),
                    budget.saturating_sub(self.current.bits_written()),
                );
            }
        }

        let outcome = Self::write_entry_bits(
            &mut self.current,
            stream,
            frame_id,
            claims_authority,
            value,
            precision,
        )?;
        self.entries_in_current += 1;
        self.entries += 1;

        Ok(outcome)
    }

    /// Closes the open packet and returns every packet that holds at least one entry
    pub fn finish(mut self) -> Vec<Vec<u8>> {
        if self.entries_in_current > 0 {
            self.flush_current();
        }
        self.packets
    }

    fn flush_current(&mut self) {
        let next = Self::start_packet(self.sender, (self.max_bits / 8) as usize);
        let mut finished = std::mem::replace(&mut self.current, next);
        // finish entries
        false.ser(&mut finished);
        self.packets.push(finished.to_bytes());
        self.entries_in_current = 0;
    }

    fn start_packet(sender: ParticipantId, max_packet_bytes: usize) -> BitWriter {
        let mut writer = BitWriter::with_capacity(max_packet_bytes);
        UnsignedVariableInteger::<7>::new(sender.0).ser(&mut writer);
        writer
    }

    fn write_entry_bits(
        writer: &mut dyn BitWrite,
        stream: StreamId,
        frame_id: FrameId,
        claims_authority: bool,
        value: &SyncValue,
        precision: &PrecisionSpec,
    ) -> Result<QuantizeOutcome, QuantizeError> {
        if !precision.accepts(value) {
            return Err(QuantizeError::KindMismatch {
                expected: precision.kind().name(),
                actual: value.kind().name(),
            });
        }

        // write continue bit
        true.ser(writer);
        UnsignedVariableInteger::<7>::new(frame_id).ser(writer);
        UnsignedVariableInteger::<7>::new(stream.0).ser(writer);
        claims_authority.ser(writer);
        quantize(value, precision, writer)
    }
}
