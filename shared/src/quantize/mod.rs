mod codec;
mod error;
mod precision;

pub use codec::{dequantize, quantize, QuantizeOutcome};
pub use error::QuantizeError;
pub use precision::{PrecisionSpec, RangeSpec};
