//! Stateless value codec. Both directions are pure functions of the value and
//! the precision spec, so streams never share codec state.

use framesync_serde::{BitReader, BitWrite, SerdeErr};

use crate::{
    quantize::{PrecisionSpec, QuantizeError, RangeSpec},
    value::{normalize_rotation, Quat, SyncValue, Vec3},
};

/// What happened while quantizing one value
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuantizeOutcome {
    /// Number of components that were outside the declared range and clamped
    pub clamped_components: u8,
}

impl QuantizeOutcome {
    pub fn is_clamped(&self) -> bool {
        self.clamped_components > 0
    }

    fn clamp_if(&mut self, clamped: bool) {
        if clamped {
            self.clamped_components += 1;
        }
    }
}

/// Writes `value` in the layout declared by `spec`.
///
/// Out-of-range components are clamped, never wrapped; the returned outcome
/// reports how many were clamped. Nothing is written when the value kind does
/// not match the spec.
pub fn quantize(
    value: &SyncValue,
    spec: &PrecisionSpec,
    writer: &mut dyn BitWrite,
) -> Result<QuantizeOutcome, QuantizeError> {
    if !spec.accepts(value) {
        return Err(QuantizeError::KindMismatch {
            expected: spec.kind().name(),
            actual: value.kind().name(),
        });
    }

    let mut outcome = QuantizeOutcome::default();

    match (spec, value) {
        (PrecisionSpec::Bool, SyncValue::Bool(flag)) => {
            writer.write_bit(*flag);
        }
        (PrecisionSpec::Enum { bits }, SyncValue::Enum(index)) => {
            let top = ((1_u64 << bits) - 1) as u32;
            outcome.clamp_if(*index > top);
            writer.write_bits((*index).min(top) as u64, *bits);
        }
        (PrecisionSpec::Integer { min, max }, SyncValue::Integer(number)) => {
            outcome.clamp_if(number < min || number > max);
            let clamped = (*number).clamp(*min, *max);
            let offset = (clamped as i64 - *min as i64) as u64;
            writer.write_bits(offset, PrecisionSpec::integer_bits(*min, *max));
        }
        (PrecisionSpec::Scalar(range), SyncValue::Scalar(scalar)) => {
            write_ranged(range, *scalar, writer, &mut outcome);
        }
        (PrecisionSpec::FullScalar, SyncValue::Scalar(scalar)) => {
            writer.write_bits(scalar.to_bits() as u64, 32);
        }
        (PrecisionSpec::Vector(range), SyncValue::Vector(vector)) => {
            for axis in vector.to_array() {
                write_ranged(range, axis, writer, &mut outcome);
            }
        }
        (PrecisionSpec::FullVector, SyncValue::Vector(vector)) => {
            for axis in vector.to_array() {
                writer.write_bits(axis.to_bits() as u64, 32);
            }
        }
        (PrecisionSpec::Rotation { bits }, SyncValue::Rotation(rotation)) => {
            let range = PrecisionSpec::rotation_range(*bits);
            // canonical hemisphere keeps w non-negative
            let mut rotation = normalize_rotation(*rotation);
            if rotation.w < 0.0 {
                rotation = -rotation;
            }
            // unit components are in range by construction, rounding noise is not a clamp
            for component in rotation.to_array() {
                let (step, _) = range.encode(component);
                writer.write_bits(step, range.bits);
            }
        }
        _ => unreachable!("value kind already checked against precision spec"),
    }

    Ok(outcome)
}

/// Reads a value written by [`quantize`] with the same spec
pub fn dequantize(reader: &mut BitReader, spec: &PrecisionSpec) -> Result<SyncValue, SerdeErr> {
    let value = match spec {
        PrecisionSpec::Bool => SyncValue::Bool(reader.read_bit()?),
        PrecisionSpec::Enum { bits } => SyncValue::Enum(reader.read_bits(*bits)? as u32),
        PrecisionSpec::Integer { min, max } => {
            let offset = reader.read_bits(PrecisionSpec::integer_bits(*min, *max))?;
            let number = *min as i64 + offset as i64;
            if number > *max as i64 {
                return Err(SerdeErr::InvalidValue {
                    type_name: "Integer",
                    reason: "decoded integer is above the declared maximum",
                });
            }
            SyncValue::Integer(number as i32)
        }
        PrecisionSpec::Scalar(range) => SyncValue::Scalar(read_ranged(range, reader)?),
        PrecisionSpec::FullScalar => SyncValue::Scalar(f32::from_bits(reader.read_bits(32)? as u32)),
        PrecisionSpec::Vector(range) => SyncValue::Vector(Vec3::new(
            read_ranged(range, reader)?,
            read_ranged(range, reader)?,
            read_ranged(range, reader)?,
        )),
        PrecisionSpec::FullVector => SyncValue::Vector(Vec3::new(
            f32::from_bits(reader.read_bits(32)? as u32),
            f32::from_bits(reader.read_bits(32)? as u32),
            f32::from_bits(reader.read_bits(32)? as u32),
        )),
        PrecisionSpec::Rotation { bits } => {
            let range = PrecisionSpec::rotation_range(*bits);
            let rotation = Quat::from_xyzw(
                read_ranged(&range, reader)?,
                read_ranged(&range, reader)?,
                read_ranged(&range, reader)?,
                read_ranged(&range, reader)?,
            );
            SyncValue::Rotation(normalize_rotation(rotation))
        }
    };

    Ok(value)
}

fn write_ranged(
    range: &RangeSpec,
    value: f32,
    writer: &mut dyn BitWrite,
    outcome: &mut QuantizeOutcome,
) {
    let (step, clamped) = range.encode(value);
    outcome.clamp_if(clamped);
    writer.write_bits(step, range.bits);
}

fn read_ranged(range: &RangeSpec, reader: &mut BitReader) -> Result<f32, SerdeErr> {
    Ok(range.decode(reader.read_bits(range.bits)?))
}
