// SPDX-License-Identifier: MIT OR Apache-2.0
//! Payloads and keyframe definitions.

use serde::{Deserialize, Serialize};

/// Opaque value attached to an event or keyframe.
///
/// The engine never looks inside a payload; it only stores, copies and
/// compares them. `Data` carries arbitrary structured content for callers
/// whose payloads do not fit the fixed shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    /// Free-form text label
    Label(String),
    /// Float value
    Float(f32),
    /// 2D vector (screen position)
    Vec2([f32; 2]),
    /// 3D vector
    Vec3([f32; 3]),
    /// 4D vector / quaternion
    Vec4([f32; 4]),
    /// Boolean
    Bool(bool),
    /// Arbitrary structured data
    Data(serde_json::Value),
}

impl Payload {
    /// Create a label payload
    pub fn label(text: impl Into<String>) -> Self {
        Self::Label(text.into())
    }

    /// Get as label if possible
    pub fn as_label(&self) -> Option<&str> {
        match self {
            Payload::Label(v) => Some(v),
            _ => None,
        }
    }

    /// Get as float if possible
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Payload::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as Vec2 if possible
    pub fn as_vec2(&self) -> Option<[f32; 2]> {
        match self {
            Payload::Vec2(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as Vec3 if possible
    pub fn as_vec3(&self) -> Option<[f32; 3]> {
        match self {
            Payload::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    /// Linear blend towards `other`.
    ///
    /// Only numeric shapes blend; mismatched or non-numeric pairs return `None`.
    pub fn lerp(&self, other: &Payload, t: f32) -> Option<Payload> {
        match (self, other) {
            (Payload::Float(a), Payload::Float(b)) => Some(Payload::Float(lerp(*a, *b, t))),
            (Payload::Vec2(a), Payload::Vec2(b)) => Some(Payload::Vec2(lerp_array(*a, *b, t))),
            (Payload::Vec3(a), Payload::Vec3(b)) => Some(Payload::Vec3(lerp_array(*a, *b, t))),
            (Payload::Vec4(a), Payload::Vec4(b)) => Some(Payload::Vec4(lerp_array(*a, *b, t))),
            _ => None,
        }
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Self::Label(value.to_string())
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Self::Label(value)
    }
}

impl std::fmt::Display for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Payload::Label(text) => write!(f, "{text}"),
            Payload::Float(v) => write!(f, "{v}"),
            Payload::Vec2([x, y]) => write!(f, "({x}, {y})"),
            Payload::Vec3([x, y, z]) => write!(f, "({x}, {y}, {z})"),
            Payload::Vec4([x, y, z, w]) => write!(f, "({x}, {y}, {z}, {w})"),
            Payload::Bool(v) => write!(f, "{v}"),
            Payload::Data(v) => write!(f, "{v}"),
        }
    }
}

/// Linear interpolation between two floats
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn lerp_array<const N: usize>(a: [f32; N], b: [f32; N], t: f32) -> [f32; N] {
    let mut out = a;
    for (o, (x, y)) in out.iter_mut().zip(a.iter().zip(b.iter())) {
        *o = lerp(*x, *y, t);
    }
    out
}

/// A keyframe on an entity track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Time in seconds
    pub timestamp: f64,
    /// Value at this keyframe
    pub payload: Payload,
    /// Session-wide insertion number, used to order equal timestamps
    pub sequence: u64,
}

impl Keyframe {
    /// Create a new keyframe
    pub fn new(timestamp: f64, payload: Payload, sequence: u64) -> Self {
        Self {
            timestamp,
            payload,
            sequence,
        }
    }
}
