//! # Framesync Serde
//! Bit-level serialization for the framesync wire format.

#![deny(unstable_features, unused_import_braces)]

mod bit_counter;
mod bit_reader;
mod bit_writer;
mod constants;
mod error;
mod integer;
mod serde;

pub use bit_counter::BitCounter;
pub use bit_reader::{BitReader, BitReaderState};
pub use bit_writer::{BitWrite, BitWriter};
pub use constants::{MTU_SIZE_BITS, MTU_SIZE_BYTES};
pub use error::SerdeErr;
pub use integer::{
    IntegerRangeError, SerdeInteger, SignedInteger, SignedVariableInteger, UnsignedInteger,
    UnsignedVariableInteger,
};
pub use serde::{ConstBitLength, Serde};
