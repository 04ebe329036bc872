use crate::{
    quantize::QuantizeError,
    value::{Quat, SyncValue, ValueKind, Vec3},
};

/// N-bit fixed point over an explicit `[min, max]` range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeSpec {
    pub min: f32,
    pub max: f32,
    pub bits: u8,
}

impl RangeSpec {
    pub fn new(min: f32, max: f32, bits: u8) -> Result<Self, QuantizeError> {
        let spec = Self { min, max, bits };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<(), QuantizeError> {
        if self.bits == 0 || self.bits > 32 {
            return Err(QuantizeError::InvalidPrecision {
                reason: "range precision must use between 1 and 32 bits",
            });
        }
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(QuantizeError::InvalidPrecision {
                reason: "range bounds must be finite",
            });
        }
        if self.max <= self.min {
            return Err(QuantizeError::InvalidPrecision {
                reason: "range max must be greater than min",
            });
        }
        Ok(())
    }

    /// Largest encoded step index
    pub fn steps(&self) -> u64 {
        (1_u64 << self.bits) - 1
    }

    pub fn step_size(&self) -> f32 {
        ((self.max as f64 - self.min as f64) / self.steps() as f64) as f32
    }

    /// Maximum round-trip error for an in-range value
    pub fn tolerance(&self) -> f32 {
        self.step_size() / 2.0
    }

    /// Clamps into range. Returns the clamped value and whether clamping happened.
    pub fn clamp(&self, value: f32) -> (f32, bool) {
        if value.is_nan() {
            return (self.min, true);
        }
        if value < self.min {
            return (self.min, true);
        }
        if value > self.max {
            return (self.max, true);
        }
        (value, false)
    }

    pub(crate) fn encode(&self, value: f32) -> (u64, bool) {
        let (value, clamped) = self.clamp(value);
        let steps = self.steps();
        let normalized = (value as f64 - self.min as f64) / (self.max as f64 - self.min as f64);
        let step = (normalized * steps as f64).round() as u64;
        (step.min(steps), clamped)
    }

    pub(crate) fn decode(&self, step: u64) -> f32 {
        let steps = self.steps();
        // range ends decode exactly so clamped values round-trip
        if step == 0 {
            return self.min;
        }
        if step >= steps {
            return self.max;
        }
        let normalized = step as f64 / steps as f64;
        (self.min as f64 + normalized * (self.max as f64 - self.min as f64)) as f32
    }
}

/// How a stream's value is laid out on the wire.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PrecisionSpec {
    Bool,
    /// Enum index in `bits` bits; indices past the top are clamped.
    Enum { bits: u8 },
    /// Integer in the inclusive range `[min, max]`, lossless.
    Integer { min: i32, max: i32 },
    Scalar(RangeSpec),
    /// Raw f32 bit pattern, lossless.
    FullScalar,
    /// Every axis shares one range.
    Vector(RangeSpec),
    FullVector,
    /// Each quaternion component quantized over [-1, 1], renormalized on decode.
    Rotation { bits: u8 },
}

impl PrecisionSpec {
    pub fn scalar(min: f32, max: f32, bits: u8) -> Result<Self, QuantizeError> {
        Ok(PrecisionSpec::Scalar(RangeSpec::new(min, max, bits)?))
    }

    pub fn vector(min: f32, max: f32, bits: u8) -> Result<Self, QuantizeError> {
        Ok(PrecisionSpec::Vector(RangeSpec::new(min, max, bits)?))
    }

    pub fn validate(&self) -> Result<(), QuantizeError> {
        match self {
            PrecisionSpec::Bool | PrecisionSpec::FullScalar | PrecisionSpec::FullVector => Ok(()),
            PrecisionSpec::Enum { bits } => {
                if *bits == 0 || *bits > 32 {
                    return Err(QuantizeError::InvalidPrecision {
                        reason: "enum precision must use between 1 and 32 bits",
                    });
                }
                Ok(())
            }
            PrecisionSpec::Integer { min, max } => {
                if max < min {
                    return Err(QuantizeError::InvalidPrecision {
                        reason: "integer max must not be less than min",
                    });
                }
                Ok(())
            }
            PrecisionSpec::Scalar(range) | PrecisionSpec::Vector(range) => range.validate(),
            PrecisionSpec::Rotation { bits } => {
                if *bits < 2 || *bits > 32 {
                    return Err(QuantizeError::InvalidPrecision {
                        reason: "rotation precision must use between 2 and 32 bits",
                    });
                }
                Ok(())
            }
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            PrecisionSpec::Bool => ValueKind::Bool,
            PrecisionSpec::Enum { .. } => ValueKind::Enum,
            PrecisionSpec::Integer { .. } => ValueKind::Integer,
            PrecisionSpec::Scalar(_) | PrecisionSpec::FullScalar => ValueKind::Scalar,
            PrecisionSpec::Vector(_) | PrecisionSpec::FullVector => ValueKind::Vector,
            PrecisionSpec::Rotation { .. } => ValueKind::Rotation,
        }
    }

    pub fn accepts(&self, value: &SyncValue) -> bool {
        self.kind() == value.kind()
    }

    /// Value used before any record exists
    pub fn neutral_value(&self) -> SyncValue {
        match self {
            PrecisionSpec::Bool => SyncValue::Bool(false),
            PrecisionSpec::Enum { .. } => SyncValue::Enum(0),
            PrecisionSpec::Integer { min, max } => SyncValue::Integer(0.clamp(*min, *max)),
            PrecisionSpec::Scalar(range) => SyncValue::Scalar(range.clamp(0.0).0),
            PrecisionSpec::FullScalar => SyncValue::Scalar(0.0),
            PrecisionSpec::Vector(range) => {
                let axis = range.clamp(0.0).0;
                SyncValue::Vector(Vec3::new(axis, axis, axis))
            }
            PrecisionSpec::FullVector => SyncValue::Vector(Vec3::ZERO),
            PrecisionSpec::Rotation { .. } => SyncValue::Rotation(Quat::IDENTITY),
        }
    }

    pub(crate) fn integer_bits(min: i32, max: i32) -> u8 {
        let span = (max as i64 - min as i64) as u64;
        (64 - span.leading_zeros()) as u8
    }

    pub(crate) fn rotation_range(bits: u8) -> RangeSpec {
        RangeSpec {
            min: -1.0,
            max: 1.0,
            bits,
        }
    }

    /// Encoded size in bits; every spec has a fixed size
    pub fn bit_length(&self) -> u32 {
        match self {
            PrecisionSpec::Bool => 1,
            PrecisionSpec::Enum { bits } => *bits as u32,
            PrecisionSpec::Integer { min, max } => Self::integer_bits(*min, *max) as u32,
            PrecisionSpec::Scalar(range) => range.bits as u32,
            PrecisionSpec::FullScalar => 32,
            PrecisionSpec::Vector(range) => 3 * range.bits as u32,
            PrecisionSpec::FullVector => 96,
            PrecisionSpec::Rotation { bits } => 4 * *bits as u32,
        }
    }

    /// Maximum per-component round-trip error for in-range values
    pub fn tolerance(&self) -> f32 {
        match self {
            PrecisionSpec::Bool
            | PrecisionSpec::Enum { .. }
            | PrecisionSpec::Integer { .. }
            | PrecisionSpec::FullScalar
            | PrecisionSpec::FullVector => 0.0,
            PrecisionSpec::Scalar(range) | PrecisionSpec::Vector(range) => range.tolerance(),
            // renormalization can move a component by up to a full step
            PrecisionSpec::Rotation { bits } => Self::rotation_range(*bits).step_size(),
        }
    }
}
