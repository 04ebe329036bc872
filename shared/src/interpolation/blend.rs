use std::ops::{Add, Mul, Sub};

use crate::value::{Quat, SyncValue};

/// Blends two values of the same kind. `t <= 0` returns `from` and `t >= 1`
/// returns `to`, bit for bit.
///
/// Discrete values step to `to` once `t` reaches one half. Rotations take the
/// shortest arc.
pub fn lerp(from: &SyncValue, to: &SyncValue, t: f32) -> SyncValue {
    if t <= 0.0 {
        return *from;
    }
    if t >= 1.0 {
        return *to;
    }

    match (from, to) {
        (SyncValue::Scalar(a), SyncValue::Scalar(b)) => SyncValue::Scalar(lerp_f32(*a, *b, t)),
        (SyncValue::Vector(a), SyncValue::Vector(b)) => SyncValue::Vector(a.lerp(*b, t)),
        (SyncValue::Rotation(a), SyncValue::Rotation(b)) => SyncValue::Rotation(nlerp(*a, *b, t)),
        _ => step(from, to, t),
    }
}

/// Four-point spline through `from` and `to`. Falls back to [`lerp`] when
/// either neighbour is missing and for kinds a spline does not apply to.
pub fn catmull_rom(
    previous: Option<&SyncValue>,
    from: &SyncValue,
    to: &SyncValue,
    next: Option<&SyncValue>,
    t: f32,
) -> SyncValue {
    if t <= 0.0 {
        return *from;
    }
    if t >= 1.0 {
        return *to;
    }
    let (Some(previous), Some(next)) = (previous, next) else {
        return lerp(from, to, t);
    };

    match (previous, from, to, next) {
        (
            SyncValue::Scalar(p0),
            SyncValue::Scalar(p1),
            SyncValue::Scalar(p2),
            SyncValue::Scalar(p3),
        ) => SyncValue::Scalar(spline(*p0, *p1, *p2, *p3, t)),
        (
            SyncValue::Vector(p0),
            SyncValue::Vector(p1),
            SyncValue::Vector(p2),
            SyncValue::Vector(p3),
        ) => SyncValue::Vector(spline(*p0, *p1, *p2, *p3, t)),
        _ => lerp(from, to, t),
    }
}

fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

fn spline<T>(p0: T, p1: T, p2: T, p3: T, t: f32) -> T
where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f32, Output = T>,
{
    let t2 = t * t;
    let t3 = t2 * t;
    (p1 * 2.0
        + (p2 - p0) * t
        + (p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3) * t2
        + (p1 * 3.0 - p0 - p2 * 3.0 + p3) * t3)
        * 0.5
}

fn nlerp(a: Quat, b: Quat, t: f32) -> Quat {
    // q and -q are the same rotation, pick the one on a's side
    let b = if a.dot(b) < 0.0 { -b } else { b };
    a.lerp(b, t)
}

fn step(from: &SyncValue, to: &SyncValue, t: f32) -> SyncValue {
    if t >= 0.5 {
        *to
    } else {
        *from
    }
}
