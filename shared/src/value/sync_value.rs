use std::fmt;

use crate::value::{Quat, Vec3};

/// The payload carried by a frame record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SyncValue {
    Bool(bool),
    /// Enum-coded state (animation state index, stance, ...)
    Enum(u32),
    Integer(i32),
    Scalar(f32),
    Vector(Vec3),
    Rotation(Quat),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Enum,
    Integer,
    Scalar,
    Vector,
    Rotation,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Bool => "Bool",
            ValueKind::Enum => "Enum",
            ValueKind::Integer => "Integer",
            ValueKind::Scalar => "Scalar",
            ValueKind::Vector => "Vector",
            ValueKind::Rotation => "Rotation",
        }
    }

    /// Discrete kinds step between frames instead of blending
    pub fn is_discrete(self) -> bool {
        matches!(self, ValueKind::Bool | ValueKind::Enum | ValueKind::Integer)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl SyncValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            SyncValue::Bool(_) => ValueKind::Bool,
            SyncValue::Enum(_) => ValueKind::Enum,
            SyncValue::Integer(_) => ValueKind::Integer,
            SyncValue::Scalar(_) => ValueKind::Scalar,
            SyncValue::Vector(_) => ValueKind::Vector,
            SyncValue::Rotation(_) => ValueKind::Rotation,
        }
    }

    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            SyncValue::Scalar(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<Vec3> {
        match self {
            SyncValue::Vector(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_rotation(&self) -> Option<Quat> {
        match self {
            SyncValue::Rotation(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<bool> for SyncValue {
    fn from(value: bool) -> Self {
        SyncValue::Bool(value)
    }
}

impl From<f32> for SyncValue {
    fn from(value: f32) -> Self {
        SyncValue::Scalar(value)
    }
}

impl From<i32> for SyncValue {
    fn from(value: i32) -> Self {
        SyncValue::Integer(value)
    }
}

impl From<Vec3> for SyncValue {
    fn from(value: Vec3) -> Self {
        SyncValue::Vector(value)
    }
}

impl From<Quat> for SyncValue {
    fn from(value: Quat) -> Self {
        SyncValue::Rotation(value)
    }
}
