mod math;
mod sync_value;

pub use math::{normalize_rotation, Quat, Vec3};
pub use sync_value::{SyncValue, ValueKind};
