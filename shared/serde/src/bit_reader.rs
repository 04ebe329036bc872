use crate::SerdeErr;

/// Reads bits back out of a buffer produced by [`BitWriter`](crate::BitWriter).
pub struct BitReader<'b> {
    buffer: &'b [u8],
    state: BitReaderState,
}

#[derive(Copy, Clone)]
pub struct BitReaderState {
    scratch: u8,
    scratch_index: u8,
    buffer_index: usize,
}

impl<'b> BitReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self {
            buffer,
            state: BitReaderState {
                scratch: 0,
                scratch_index: 0,
                buffer_index: 0,
            },
        }
    }

    pub fn bits_read(&self) -> usize {
        if self.state.scratch_index == 0 {
            self.state.buffer_index * 8
        } else {
            (self.state.buffer_index - 1) * 8 + self.state.scratch_index as usize
        }
    }

    pub fn bits_remaining(&self) -> usize {
        self.buffer.len() * 8 - self.bits_read()
    }

    pub fn read_bit(&mut self) -> Result<bool, SerdeErr> {
        if self.state.scratch_index == 0 {
            if self.state.buffer_index >= self.buffer.len() {
                return Err(SerdeErr::EndOfBuffer {
                    bits_read: self.bits_read(),
                    bits_available: self.buffer.len() * 8,
                });
            }

            self.state.scratch = self.buffer[self.state.buffer_index];
            self.state.buffer_index += 1;
        }

        let value = self.state.scratch & 1;

        self.state.scratch >>= 1;
        self.state.scratch_index = (self.state.scratch_index + 1) % 8;

        Ok(value != 0)
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        let mut output = 0;
        for _ in 0..7 {
            if self.read_bit()? {
                output |= 128;
            }
            output >>= 1;
        }
        if self.read_bit()? {
            output |= 128;
        }
        Ok(output)
    }

    /// Reads `bits` bits written by [`BitWrite::write_bits`](crate::BitWrite::write_bits).
    pub fn read_bits(&mut self, bits: u8) -> Result<u64, SerdeErr> {
        let mut output: u64 = 0;
        for index in 0..bits {
            if self.read_bit()? {
                output |= 1 << index;
            }
        }
        Ok(output)
    }
}
