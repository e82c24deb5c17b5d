// SPDX-License-Identifier: MIT OR Apache-2.0
//! Adapters between external producers and the timeline.
//!
//! Motion samplers produce keyframe payloads that a session lays out evenly
//! over a duration. Audio cues are kept as a read-only overlay next to the
//! event timeline and never enter undo history.

use crate::error::{check_time, Result, TimelineError};
use crate::keyframe::Payload;
use crate::timeline::Event;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::str::FromStr;

/// Produces a finite, ordered list of samples for a duration
pub trait MotionSampler {
    /// Generate samples covering `duration` seconds
    fn sample(&self, duration: f64) -> Vec<Payload>;
}

impl<F> MotionSampler for F
where
    F: Fn(f64) -> Vec<Payload>,
{
    fn sample(&self, duration: f64) -> Vec<Payload> {
        self(duration)
    }
}

/// Timestamp of sample `index` out of `count` spread over `duration`
pub fn sample_time(index: usize, count: usize, duration: f64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    index as f64 * duration / count as f64
}

/// Evenly blends from one payload to another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearSampler {
    /// First sample
    pub from: Payload,
    /// Last sample
    pub to: Payload,
    /// Number of samples
    pub count: usize,
}

impl LinearSampler {
    /// Create a new linear sampler
    pub fn new(from: Payload, to: Payload, count: usize) -> Self {
        Self { from, to, count }
    }
}

impl MotionSampler for LinearSampler {
    fn sample(&self, _duration: f64) -> Vec<Payload> {
        let last = self.count.saturating_sub(1).max(1) as f32;
        (0..self.count)
            .map(|i| {
                self.from
                    .lerp(&self.to, i as f32 / last)
                    .unwrap_or_else(|| self.from.clone())
            })
            .collect()
    }
}

/// Canned character motions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionPreset {
    /// Move right at a constant speed
    Walk,
    /// Oscillating arm rotation (degrees)
    Wave,
    /// Single parabolic hop
    Jump,
}

impl MotionPreset {
    /// Samples generated per second of motion
    pub const SAMPLES_PER_SECOND: f64 = 10.0;
    /// Upper bound on samples per motion; longer motions are sampled sparser
    pub const MAX_SAMPLES: usize = 10_000;
    const WALK_SPEED: f32 = 100.0;
    const WAVE_AMPLITUDE: f64 = 30.0;
    const WAVE_FREQUENCY: f64 = 2.0;
    const JUMP_HEIGHT: f32 = 50.0;

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Walk => "walk",
            Self::Wave => "wave",
            Self::Jump => "jump",
        }
    }

    /// Get all presets
    pub fn all() -> &'static [MotionPreset] {
        &[Self::Walk, Self::Wave, Self::Jump]
    }

    /// Number of samples produced for `duration`, between 1 and [`Self::MAX_SAMPLES`]
    pub fn sample_count(duration: f64) -> usize {
        let wanted = (duration * Self::SAMPLES_PER_SECOND).ceil();
        if wanted.is_nan() || wanted < 1.0 {
            1
        } else if wanted >= Self::MAX_SAMPLES as f64 {
            Self::MAX_SAMPLES
        } else {
            wanted as usize
        }
    }
}

impl MotionSampler for MotionPreset {
    fn sample(&self, duration: f64) -> Vec<Payload> {
        let count = Self::sample_count(duration);
        (0..count)
            .map(|i| {
                let t = sample_time(i, count, duration);
                match self {
                    Self::Walk => Payload::Vec2([Self::WALK_SPEED * t as f32, 0.0]),
                    Self::Wave => Payload::Float(
                        (Self::WAVE_AMPLITUDE * (TAU * Self::WAVE_FREQUENCY * t).sin()) as f32,
                    ),
                    Self::Jump => {
                        let u = if duration > 0.0 { (t / duration) as f32 } else { 0.0 };
                        Payload::Vec2([0.0, -Self::JUMP_HEIGHT * 4.0 * u * (1.0 - u)])
                    }
                }
            })
            .collect()
    }
}

impl FromStr for MotionPreset {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|preset| name.starts_with(preset.name()))
            .ok_or_else(|| TimelineError::InvalidArgument(format!("unknown motion type '{s}'")))
    }
}

/// A timed audio marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioCue {
    /// Time in seconds
    pub time: f64,
    /// What is heard at this point
    pub description: String,
}

impl AudioCue {
    /// Create a new cue
    pub fn new(time: f64, description: impl Into<String>) -> Self {
        Self {
            time,
            description: description.into(),
        }
    }
}

/// Read-only audio markers shown next to the timeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioOverlay {
    /// Length of the audio in seconds
    pub duration: f64,
    cues: Vec<AudioCue>,
}

impl AudioOverlay {
    /// Build an overlay, validating and stable-sorting the cues
    pub fn new(duration: f64, mut cues: Vec<AudioCue>) -> Result<Self> {
        check_time("audio duration", duration)?;
        for cue in &cues {
            check_time("audio cue time", cue.time)?;
        }
        cues.sort_by(|a, b| a.time.total_cmp(&b.time));
        Ok(Self { duration, cues })
    }

    /// All cues, ascending
    pub fn cues(&self) -> &[AudioCue] {
        &self.cues
    }

    /// Cues with `start <= time <= end`
    pub fn cues_in_range(&self, start: f64, end: f64) -> &[AudioCue] {
        if start > end {
            return &[];
        }
        let lower = self.cues.partition_point(|c| c.time < start);
        let upper = self.cues.partition_point(|c| c.time <= end);
        &self.cues[lower..upper]
    }
}

/// One row of the joint event/audio display
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayEntry {
    /// Timeline event
    Event(Event),
    /// Audio marker
    Audio(AudioCue),
}

impl OverlayEntry {
    /// Time of this entry
    pub fn time(&self) -> f64 {
        match self {
            Self::Event(e) => e.timestamp,
            Self::Audio(c) => c.time,
        }
    }
}

/// Merge ordered events and cues; events come first on equal times.
pub(crate) fn merge_overlay(events: &[Event], cues: &[AudioCue]) -> Vec<OverlayEntry> {
    let mut merged = Vec::with_capacity(events.len() + cues.len());
    let (mut ei, mut ci) = (0, 0);
    while ei < events.len() || ci < cues.len() {
        let take_event = match (events.get(ei), cues.get(ci)) {
            (Some(e), Some(c)) => e.timestamp <= c.time,
            (Some(_), None) => true,
            _ => false,
        };
        if take_event {
            merged.push(OverlayEntry::Event(events[ei].clone()));
            ei += 1;
        } else {
            merged.push(OverlayEntry::Audio(cues[ci].clone()));
            ci += 1;
        }
    }
    merged
}
