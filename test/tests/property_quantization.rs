/// PROPERTY-BASED TESTS: quantization round trip
///
/// 1. In-range values come back within the declared tolerance
/// 2. Out-of-range values come back as exactly the clamped bound
use framesync_shared::{
    dequantize, quantize, BitReader, BitWriter, PrecisionSpec, Quat, SyncValue, Vec3,
};
use proptest::prelude::*;

// f32 rounding on top of the fixed-point step
const FLOAT_SLACK: f32 = 1e-4;

fn round_trip(value: SyncValue, spec: &PrecisionSpec) -> (SyncValue, bool) {
    let mut writer = BitWriter::new();
    let outcome = quantize(&value, spec, &mut writer).unwrap();
    let bytes = writer.to_bytes();
    let mut reader = BitReader::new(&bytes);
    (dequantize(&mut reader, spec).unwrap(), outcome.is_clamped())
}

fn bounds() -> impl Strategy<Value = (f32, f32)> {
    (-1000.0f32..1000.0, 0.5f32..1000.0).prop_map(|(min, span)| (min, min + span))
}

proptest! {
    #[test]
    fn prop_in_range_scalar_within_tolerance(
        (min, max) in bounds(),
        fraction in 0.0f32..=1.0,
        bits in 4u8..=24,
    ) {
        let spec = PrecisionSpec::scalar(min, max, bits).unwrap();
        let value = (min + (max - min) * fraction).clamp(min, max);

        let (decoded, clamped) = round_trip(SyncValue::Scalar(value), &spec);

        prop_assert!(!clamped);
        let decoded = decoded.as_scalar().unwrap();
        prop_assert!(
            (decoded - value).abs() <= spec.tolerance() + FLOAT_SLACK,
            "{} decoded as {} with tolerance {}", value, decoded, spec.tolerance()
        );
    }

    #[test]
    fn prop_out_of_range_scalar_clamps_exactly(
        (min, max) in bounds(),
        overshoot in 0.001f32..1e6,
        above in any::<bool>(),
        bits in 1u8..=32,
    ) {
        let spec = PrecisionSpec::scalar(min, max, bits).unwrap();
        let (value, bound) = if above { (max + overshoot, max) } else { (min - overshoot, min) };
        prop_assume!(value > max || value < min);

        let (decoded, clamped) = round_trip(SyncValue::Scalar(value), &spec);

        prop_assert!(clamped);
        prop_assert_eq!(decoded, SyncValue::Scalar(bound));
    }

    #[test]
    fn prop_vector_axes_within_tolerance(
        x in -50.0f32..50.0,
        y in -50.0f32..50.0,
        z in -50.0f32..50.0,
        bits in 8u8..=20,
    ) {
        let spec = PrecisionSpec::vector(-50.0, 50.0, bits).unwrap();
        let (decoded, clamped) = round_trip(SyncValue::Vector(Vec3::new(x, y, z)), &spec);

        prop_assert!(!clamped);
        let decoded = decoded.as_vector().unwrap();
        let tolerance = spec.tolerance() + FLOAT_SLACK;
        prop_assert!((decoded.x - x).abs() <= tolerance);
        prop_assert!((decoded.y - y).abs() <= tolerance);
        prop_assert!((decoded.z - z).abs() <= tolerance);
    }

    #[test]
    fn prop_integers_are_lossless(min in -1000i32..0, span in 0i32..2000, pick in 0.0f64..=1.0) {
        let max = min + span;
        let value = min + (span as f64 * pick).round() as i32;
        let spec = PrecisionSpec::Integer { min, max };

        let (decoded, clamped) = round_trip(SyncValue::Integer(value), &spec);

        prop_assert!(!clamped);
        prop_assert_eq!(decoded, SyncValue::Integer(value));
    }

    #[test]
    fn prop_rotation_stays_close(
        x in -1.0f32..1.0,
        y in -1.0f32..1.0,
        z in -1.0f32..1.0,
        w in -1.0f32..1.0,
    ) {
        let rotation = Quat::from_xyzw(x, y, z, w);
        prop_assume!(rotation.dot(rotation) > 0.01);
        let rotation = rotation.normalize();
        let spec = PrecisionSpec::Rotation { bits: 14 };

        let (decoded, _) = round_trip(SyncValue::Rotation(rotation), &spec);

        let decoded = decoded.as_rotation().unwrap();
        prop_assert!(decoded.angle_between(rotation) < 0.01);
    }
}
