use crate::BitWrite;

/// A BitWrite that only counts, used to measure an entry before committing
/// it to a size-limited packet.
pub struct BitCounter {
    start_bits: u32,
    current_bits: u32,
    max_bits: u32,
}

impl BitCounter {
    pub fn new(start_bits: u32, max_bits: u32) -> Self {
        Self {
            start_bits,
            current_bits: start_bits,
            max_bits,
        }
    }

    pub fn overflowed(&self) -> bool {
        self.current_bits > self.max_bits
    }

    pub fn bits_needed(&self) -> u32 {
        self.current_bits - self.start_bits
    }

    pub fn total_bits(&self) -> u32 {
        self.current_bits
    }
}

impl BitWrite for BitCounter {
    fn write_bit(&mut self, _: bool) {
        self.current_bits += 1;
    }

    fn write_byte(&mut self, _: u8) {
        self.current_bits += 8;
    }

    fn write_bits(&mut self, _: u64, bits: u8) {
        self.current_bits += bits as u32;
    }

    fn is_counter(&self) -> bool {
        true
    }
}
