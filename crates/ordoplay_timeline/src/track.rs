// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-entity keyframe tracks.

use crate::keyframe::{Keyframe, Payload};
use crate::timeline::{insert_ordered, range_of};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Key identifying the entity a track animates (e.g. a character name)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityKey(pub String);

impl EntityKey {
    /// Create a new entity key
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntityKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for EntityKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle returned when a keyframe is added
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeRef {
    /// Owning entity
    pub entity: EntityKey,
    /// Time in seconds
    pub timestamp: f64,
    /// Insertion number of the keyframe
    pub sequence: u64,
}

/// Ordered keyframes for one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Entity this track belongs to
    pub entity: EntityKey,
    /// Keyframes, ascending by time then insertion
    keyframes: Vec<Keyframe>,
}

impl Track {
    /// Create an empty track
    pub fn new(entity: impl Into<EntityKey>) -> Self {
        Self {
            entity: entity.into(),
            keyframes: Vec::new(),
        }
    }

    /// Build a track from keyframes in any order
    pub(crate) fn from_keyframes(entity: EntityKey, mut keyframes: Vec<Keyframe>) -> Self {
        keyframes.sort_by(|a, b| {
            a.timestamp
                .total_cmp(&b.timestamp)
                .then(a.sequence.cmp(&b.sequence))
        });
        Self { entity, keyframes }
    }

    /// Add a keyframe at its ordered position
    pub fn add_keyframe(&mut self, keyframe: Keyframe) -> usize {
        insert_ordered(&mut self.keyframes, keyframe)
    }

    /// Remove the keyframe with the given insertion number
    pub fn remove_keyframe(&mut self, sequence: u64) -> Option<Keyframe> {
        let index = self.keyframes.iter().position(|k| k.sequence == sequence)?;
        Some(self.keyframes.remove(index))
    }

    /// Get all keyframes
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Get keyframes in a time range (inclusive)
    pub fn keyframes_in_range(&self, start: f64, end: f64) -> &[Keyframe] {
        range_of(&self.keyframes, start, end)
    }

    /// Get keyframe count
    pub fn keyframe_count(&self) -> usize {
        self.keyframes.len()
    }

    /// Get the duration (time of last keyframe)
    pub fn duration(&self) -> f64 {
        self.keyframes.last().map_or(0.0, |k| k.timestamp)
    }

    /// Highest insertion number in use
    pub(crate) fn max_sequence(&self) -> Option<u64> {
        self.keyframes.iter().map(|k| k.sequence).max()
    }

    /// Find keyframes surrounding a time
    fn find_keyframes(&self, time: f64) -> (Option<&Keyframe>, Option<&Keyframe>) {
        let next_idx = self.keyframes.partition_point(|k| k.timestamp < time);

        match next_idx {
            0 => (None, self.keyframes.first()),
            idx if idx == self.keyframes.len() => (self.keyframes.last(), None),
            idx => (Some(&self.keyframes[idx - 1]), Some(&self.keyframes[idx])),
        }
    }

    /// Evaluate the track value at a given time.
    ///
    /// Numeric payloads blend linearly between neighbours; anything else
    /// holds the previous keyframe's value.
    pub fn evaluate(&self, time: f64) -> Option<Payload> {
        match self.find_keyframes(time) {
            (None, None) => None,
            (Some(kf), None) | (None, Some(kf)) => Some(kf.payload.clone()),
            (Some(a), Some(b)) => {
                if (b.timestamp - a.timestamp).abs() < 1e-9 {
                    return Some(b.payload.clone());
                }
                let t = ((time - a.timestamp) / (b.timestamp - a.timestamp)) as f32;
                a.payload
                    .lerp(&b.payload, t)
                    .or_else(|| Some(a.payload.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyframes_sorted() {
        let mut track = Track::new("Hero");
        track.add_keyframe(Keyframe::new(2.0, Payload::Float(2.0), 0));
        track.add_keyframe(Keyframe::new(0.5, Payload::Float(0.5), 1));
        track.add_keyframe(Keyframe::new(2.0, Payload::Float(9.0), 2));

        let times: Vec<_> = track.keyframes().iter().map(|k| k.timestamp).collect();
        assert_eq!(times, [0.5, 2.0, 2.0]);
        assert_eq!(track.keyframes()[1].sequence, 0);
        assert_eq!(track.keyframes()[2].sequence, 2);
        assert_eq!(track.duration(), 2.0);
    }

    #[test]
    fn test_remove_keyframe() {
        let mut track = Track::new("Hero");
        track.add_keyframe(Keyframe::new(1.0, Payload::Bool(true), 4));
        assert!(track.remove_keyframe(5).is_none());
        assert_eq!(track.remove_keyframe(4).map(|k| k.timestamp), Some(1.0));
        assert_eq!(track.keyframe_count(), 0);
    }

    #[test]
    fn test_evaluate() {
        let mut track = Track::new("Hero");
        assert_eq!(track.evaluate(1.0), None);

        track.add_keyframe(Keyframe::new(0.0, Payload::Vec2([0.0, 0.0]), 0));
        track.add_keyframe(Keyframe::new(2.0, Payload::Vec2([10.0, 4.0]), 1));

        assert_eq!(track.evaluate(1.0), Some(Payload::Vec2([5.0, 2.0])));
        assert_eq!(track.evaluate(-1.0), Some(Payload::Vec2([0.0, 0.0])));
        assert_eq!(track.evaluate(5.0), Some(Payload::Vec2([10.0, 4.0])));
    }

    #[test]
    fn test_evaluate_holds_labels() {
        let mut track = Track::new("Hero");
        track.add_keyframe(Keyframe::new(0.0, Payload::label("idle"), 0));
        track.add_keyframe(Keyframe::new(1.0, Payload::label("run"), 1));
        assert_eq!(track.evaluate(0.5), Some(Payload::label("idle")));
    }
}
