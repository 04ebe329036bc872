use thiserror::Error;

/// Errors produced while reading a bit stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// The reader ran out of bits before the value was complete
    #[error("attempted to read past the end of the buffer ({bits_read} of {bits_available} bits consumed)")]
    EndOfBuffer {
        bits_read: usize,
        bits_available: usize,
    },

    /// A value was read that is not valid for its type
    #[error("invalid value while reading {type_name}: {reason}")]
    InvalidValue {
        type_name: &'static str,
        reason: &'static str,
    },
}
