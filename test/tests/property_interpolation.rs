/// PROPERTY-BASED TESTS: interpolation boundaries
///
/// t = 0 yields exactly the earlier bracket and t = 1 exactly the later one,
/// for linear and spline blending alike.
use framesync_shared::{
    interpolation::{catmull_rom, lerp},
    normalize_rotation, Quat, SyncValue, Vec3,
};
use proptest::prelude::*;

fn scalar() -> impl Strategy<Value = SyncValue> {
    (-1e6f32..1e6).prop_map(SyncValue::Scalar)
}

fn vector() -> impl Strategy<Value = SyncValue> {
    (-1e4f32..1e4, -1e4f32..1e4, -1e4f32..1e4)
        .prop_map(|(x, y, z)| SyncValue::Vector(Vec3::new(x, y, z)))
}

fn rotation() -> impl Strategy<Value = SyncValue> {
    (-1f32..1.0, -1f32..1.0, -1f32..1.0, -1f32..1.0)
        .prop_map(|(x, y, z, w)| SyncValue::Rotation(normalize_rotation(Quat::from_xyzw(x, y, z, w))))
}

fn continuous() -> impl Strategy<Value = SyncValue> {
    prop_oneof![scalar(), vector(), rotation()]
}

proptest! {
    #[test]
    fn prop_linear_boundaries_are_exact(from in continuous(), to in continuous()) {
        prop_assert_eq!(lerp(&from, &to, 0.0), from);
        prop_assert_eq!(lerp(&from, &to, 1.0), to);
    }

    #[test]
    fn prop_spline_boundaries_are_exact(
        previous in scalar(),
        from in scalar(),
        to in scalar(),
        next in scalar(),
    ) {
        prop_assert_eq!(catmull_rom(Some(&previous), &from, &to, Some(&next), 0.0), from);
        prop_assert_eq!(catmull_rom(Some(&previous), &from, &to, Some(&next), 1.0), to);
        prop_assert_eq!(catmull_rom(None, &from, &to, Some(&next), 1.0), to);
    }

    #[test]
    fn prop_spline_vector_boundaries_are_exact(
        previous in vector(),
        from in vector(),
        to in vector(),
        next in vector(),
    ) {
        prop_assert_eq!(catmull_rom(Some(&previous), &from, &to, Some(&next), 0.0), from);
        prop_assert_eq!(catmull_rom(Some(&previous), &from, &to, Some(&next), 1.0), to);
    }

    #[test]
    fn prop_linear_scalar_stays_between_brackets(a in -1e3f32..1e3, b in -1e3f32..1e3, t in 0.0f32..=1.0) {
        let value = lerp(&SyncValue::Scalar(a), &SyncValue::Scalar(b), t).as_scalar().unwrap();
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        prop_assert!(value >= low - 1e-3 && value <= high + 1e-3);
    }

    #[test]
    fn prop_discrete_values_never_blend(a in any::<u32>(), b in any::<u32>(), t in 0.0f32..=1.0) {
        let value = lerp(&SyncValue::Enum(a), &SyncValue::Enum(b), t);
        prop_assert!(value == SyncValue::Enum(a) || value == SyncValue::Enum(b));
    }
}
