use thiserror::Error;

/// Errors that can occur while quantizing a value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantizeError {
    /// The value's kind does not match what the precision spec encodes
    #[error("cannot quantize a {actual} value with a {expected} precision spec")]
    KindMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// The precision spec itself is unusable
    #[error("invalid precision spec: {reason}")]
    InvalidPrecision { reason: &'static str },
}
