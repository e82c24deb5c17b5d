// SPDX-License-Identifier: MIT OR Apache-2.0
//! The shared timeline of events.

use crate::keyframe::{Keyframe, Payload};
use serde::{Deserialize, Serialize};

/// A timestamped label on the shared timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Time in seconds
    pub timestamp: f64,
    /// Event content
    pub payload: Payload,
    /// Session-wide insertion number, used to order equal timestamps
    pub sequence: u64,
}

impl Event {
    /// Create a new event
    pub fn new(timestamp: f64, payload: Payload, sequence: u64) -> Self {
        Self {
            timestamp,
            payload,
            sequence,
        }
    }

    /// Handle for this event
    pub fn handle(&self) -> EventRef {
        EventRef {
            timestamp: self.timestamp,
            sequence: self.sequence,
        }
    }
}

/// Handle returned when an event is added
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventRef {
    /// Time in seconds
    pub timestamp: f64,
    /// Insertion number of the event
    pub sequence: u64,
}

/// Anything stored in timestamp order with an insertion tie-break.
pub(crate) trait Timed {
    fn timestamp(&self) -> f64;
    fn sequence(&self) -> u64;
}

impl Timed for Event {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }

    fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl Timed for Keyframe {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }

    fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Insert keeping `(timestamp, sequence)` ascending. Returns the index used.
///
/// Stored timestamps are always finite, so plain comparisons are total.
pub(crate) fn insert_ordered<T: Timed>(items: &mut Vec<T>, item: T) -> usize {
    let (time, seq) = (item.timestamp(), item.sequence());
    let index = items.partition_point(|existing| {
        existing.timestamp() < time || (existing.timestamp() == time && existing.sequence() < seq)
    });
    items.insert(index, item);
    index
}

/// Slice of `items` with `start <= timestamp <= end`.
pub(crate) fn range_of<T: Timed>(items: &[T], start: f64, end: f64) -> &[T] {
    if start > end || start.is_nan() || end.is_nan() {
        return &[];
    }
    let lower = items.partition_point(|item| item.timestamp() < start);
    let upper = items.partition_point(|item| item.timestamp() <= end);
    &items[lower..upper.max(lower)]
}

/// Ordered collection of all events in a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    events: Vec<Event>,
}

impl Timeline {
    /// Create an empty timeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event at its ordered position
    pub fn insert(&mut self, event: Event) -> usize {
        insert_ordered(&mut self.events, event)
    }

    /// First event (by insertion order) whose timestamp equals `timestamp`
    pub fn first_at(&self, timestamp: f64) -> Option<&Event> {
        // Equal timestamps are stored by ascending sequence, so the first
        // match in storage order is the earliest inserted one.
        self.events.iter().find(|e| e.timestamp == timestamp)
    }

    /// Remove the event with the given insertion number
    pub fn remove_sequence(&mut self, sequence: u64) -> Option<Event> {
        let index = self.events.iter().position(|e| e.sequence == sequence)?;
        Some(self.events.remove(index))
    }

    /// All events, ascending
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events with `start <= timestamp <= end`, ascending
    pub fn range(&self, start: f64, end: f64) -> &[Event] {
        range_of(&self.events, start, end)
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the timeline has no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Time of the last event
    pub fn duration(&self) -> f64 {
        self.events.last().map_or(0.0, |e| e.timestamp)
    }

    /// Highest insertion number in use
    pub(crate) fn max_sequence(&self) -> Option<u64> {
        self.events.iter().map(|e| e.sequence).max()
    }

    /// Rebuild from arbitrary events, restoring the ordering invariant
    pub(crate) fn from_events(mut events: Vec<Event>) -> Self {
        events.sort_by(|a, b| {
            a.timestamp
                .total_cmp(&b.timestamp)
                .then(a.sequence.cmp(&b.sequence))
        });
        Self { events }
    }
}
