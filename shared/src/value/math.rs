pub use glam::{Quat, Vec3};

/// Unit quaternion pointing the same way as `rotation`, or identity if it has
/// no usable length.
pub fn normalize_rotation(rotation: Quat) -> Quat {
    let length = rotation.length();
    if !length.is_finite() || length <= f32::EPSILON {
        return Quat::IDENTITY;
    }
    rotation.normalize()
}
