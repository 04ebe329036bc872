use thiserror::Error;

use crate::{BitReader, BitWrite, ConstBitLength, Serde, SerdeErr};

/// Raised when a value does not fit the integer encoding it was given
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegerRangeError {
    #[error("can't encode negative value {value} with an unsigned integer")]
    NegativeUnsigned { value: i128 },

    #[error("value {value} does not fit in {bits} bits")]
    TooWide { value: i128, bits: u8 },
}

pub type UnsignedInteger<const BITS: u8> = SerdeInteger<false, false, BITS>;
pub type SignedInteger<const BITS: u8> = SerdeInteger<true, false, BITS>;
pub type UnsignedVariableInteger<const BITS: u8> = SerdeInteger<false, true, BITS>;
pub type SignedVariableInteger<const BITS: u8> = SerdeInteger<true, true, BITS>;

// The generic wrapper forwards to a non-generic inner type to keep monomorphized code small.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct SerdeInteger<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> {
    inner: SerdeIntegerInner,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
struct SerdeIntegerInner {
    value: i128,
    signed: bool,
    variable: bool,
    bits: u8,
}

impl SerdeIntegerInner {
    fn try_new(signed: bool, variable: bool, bits: u8, value: i128) -> Result<Self, IntegerRangeError> {
        assert!(bits > 0 && bits <= 64, "integer encodings must use 1..=64 bits");

        if !signed && value < 0 {
            return Err(IntegerRangeError::NegativeUnsigned { value });
        }

        if !variable {
            let limit: i128 = 1_i128 << bits;
            if value.abs() >= limit {
                return Err(IntegerRangeError::TooWide { value, bits });
            }
        }

        Ok(Self {
            value,
            signed,
            variable,
            bits,
        })
    }

    fn ser(&self, writer: &mut dyn BitWrite) {
        if self.signed {
            writer.write_bit(self.value < 0);
        }

        let mut magnitude = self.value.unsigned_abs();

        if !self.variable {
            writer.write_bits(magnitude as u64, self.bits);
            return;
        }

        let chunk_mask: u128 = (1_u128 << self.bits) - 1;
        loop {
            let proceed = magnitude > chunk_mask;
            writer.write_bit(proceed);
            writer.write_bits((magnitude & chunk_mask) as u64, self.bits);
            magnitude >>= self.bits;
            if !proceed {
                return;
            }
        }
    }

    fn de(reader: &mut BitReader, signed: bool, variable: bool, bits: u8) -> Result<Self, SerdeErr> {
        let negative = if signed { reader.read_bit()? } else { false };

        let magnitude: u128 = if variable {
            let mut output: u128 = 0;
            let mut shift: u32 = 0;
            loop {
                let proceed = reader.read_bit()?;
                let chunk = reader.read_bits(bits)? as u128;
                // bits shifted past the top would be lost
                if shift >= 128 || (chunk != 0 && chunk.leading_zeros() < shift) {
                    return Err(SerdeErr::InvalidValue {
                        type_name: "SerdeInteger",
                        reason: "variable-length integer is longer than 128 bits",
                    });
                }
                output |= chunk << shift;
                shift += bits as u32;
                if !proceed {
                    break;
                }
            }
            output
        } else {
            reader.read_bits(bits)? as u128
        };

        let value = i128::try_from(magnitude)
            .ok()
            .and_then(|value| if negative { value.checked_neg() } else { Some(value) })
            .ok_or(SerdeErr::InvalidValue {
                type_name: "SerdeInteger",
                reason: "decoded magnitude does not fit in an i128",
            })?;
        Ok(Self {
            value,
            signed,
            variable,
            bits,
        })
    }

    fn bit_length(&self) -> u32 {
        let mut output: u32 = if self.signed { 1 } else { 0 };

        if !self.variable {
            return output + self.bits as u32;
        }

        let chunk_mask: u128 = (1_u128 << self.bits) - 1;
        let mut magnitude = self.value.unsigned_abs();
        loop {
            output += 1 + self.bits as u32;
            if magnitude <= chunk_mask {
                return output;
            }
            magnitude >>= self.bits;
        }
    }
}

impl<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> SerdeInteger<SIGNED, VARIABLE, BITS> {
    /// # Panics
    ///
    /// Panics if `value` can't be represented by this encoding.
    /// Consider using `try_new` for non-panicking error handling.
    pub fn new<T: Into<i128>>(value: T) -> Self {
        Self::try_new(value).expect("value out of range for SerdeInteger")
    }

    pub fn try_new<T: Into<i128>>(value: T) -> Result<Self, IntegerRangeError> {
        Ok(Self {
            inner: SerdeIntegerInner::try_new(SIGNED, VARIABLE, BITS, value.into())?,
        })
    }

    pub fn get(&self) -> i128 {
        self.inner.value
    }

    /// Converts into a narrower integer type, failing if the decoded value does not fit
    pub fn try_to<T: TryFrom<i128>>(&self) -> Result<T, SerdeErr> {
        T::try_from(self.inner.value).map_err(|_| SerdeErr::InvalidValue {
            type_name: "SerdeInteger",
            reason: "decoded value is out of range for the target type",
        })
    }
}

impl<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> Serde for SerdeInteger<SIGNED, VARIABLE, BITS> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.inner.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let inner = SerdeIntegerInner::de(reader, SIGNED, VARIABLE, BITS)?;
        Ok(Self { inner })
    }

    fn bit_length(&self) -> u32 {
        self.inner.bit_length()
    }
}

impl<const SIGNED: bool, const BITS: u8> ConstBitLength for SerdeInteger<SIGNED, false, BITS> {
    fn const_bit_length() -> u32 {
        let sign_bit = if SIGNED { 1 } else { 0 };
        sign_bit + BITS as u32
    }
}
