// SPDX-License-Identifier: MIT OR Apache-2.0
//! Undo/redo history built on inverse actions.
//!
//! Every mutation of a session is expressed as an [`Action`]. Applying an
//! action yields its exact inverse, and the pair is stored as a
//! [`HistoryEntry`]. Undo applies the inverse, redo applies the action again.
//! Entries move between the two stacks unchanged, so undo and redo stay
//! symmetric.

use crate::error::{Result, TimelineError};
use crate::keyframe::Keyframe;
use crate::timeline::Event;
use crate::track::EntityKey;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

/// Default maximum undo history depth
pub const MAX_HISTORY: usize = 100;

/// Unique entry ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(u64);

impl EntryId {
    /// Get the raw ID value
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// A single store mutation.
///
/// Events and keyframes are addressed by insertion number so that an inverse
/// touches exactly the item it was built for, even when other items share
/// its timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Insert an event (keeping its insertion number)
    AddEvent(Event),
    /// Remove the event with this insertion number
    RemoveEvent {
        /// Insertion number of the event
        sequence: u64,
    },
    /// Insert a keyframe into an entity track
    AddKeyframe {
        /// Owning entity
        entity: EntityKey,
        /// Keyframe to insert
        keyframe: Keyframe,
    },
    /// Remove a keyframe from an entity track
    RemoveKeyframe {
        /// Owning entity
        entity: EntityKey,
        /// Insertion number of the keyframe
        sequence: u64,
    },
    /// Append event snapshots to a group, creating it if needed
    GroupEvents {
        /// Group name
        name: String,
        /// Snapshots to append
        events: Vec<Event>,
        /// Creation-order slot for a new group (`None` = last)
        position: Option<usize>,
    },
    /// Remove the last `count` members of a group
    UngroupEvents {
        /// Group name
        name: String,
        /// Number of trailing members to remove
        count: usize,
        /// Drop the group once it is empty
        remove_group: bool,
    },
    /// Several actions applied as one unit
    Batch(Vec<Action>),
}

impl Action {
    /// Short human-readable label
    pub fn describe(&self) -> String {
        match self {
            Action::AddEvent(event) => format!("Add event '{}' at {}s", event.payload, event.timestamp),
            Action::RemoveEvent { sequence } => format!("Remove event #{sequence}"),
            Action::AddKeyframe { entity, keyframe } => {
                format!("Add keyframe to '{entity}' at {}s", keyframe.timestamp)
            }
            Action::RemoveKeyframe { entity, sequence } => {
                format!("Remove keyframe #{sequence} from '{entity}'")
            }
            Action::GroupEvents { name, events, .. } => {
                format!("Group {} event(s) as '{name}'", events.len())
            }
            Action::UngroupEvents { name, .. } => format!("Ungroup '{name}'"),
            Action::Batch(actions) => format!("Batch of {} action(s)", actions.len()),
        }
    }
}

/// A recorded mutation and the action that reverts it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique entry ID
    pub id: EntryId,
    /// Human-readable description
    pub description: String,
    /// The action as originally applied (replayed on redo)
    pub action: Action,
    /// The inverse action (applied on undo)
    pub inverse: Action,
    /// Unix time when the entry was recorded
    pub timestamp: u64,
}

/// History statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStats {
    /// Entries in undo stack
    pub undo_count: usize,
    /// Entries in redo stack
    pub redo_count: usize,
    /// Maximum history depth
    pub max_depth: usize,
}

/// Undo/redo history manager
#[derive(Debug)]
pub struct History {
    undo_stack: VecDeque<HistoryEntry>,
    redo_stack: VecDeque<HistoryEntry>,
    next_id: u64,
    max_depth: usize,
}

impl History {
    /// Create a new history manager
    pub fn new() -> Self {
        Self::with_max_depth(MAX_HISTORY)
    }

    /// Create with custom maximum depth (at least one entry)
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            next_id: 1,
            max_depth: max_depth.max(1),
        }
    }

    /// Record an applied action and its inverse.
    ///
    /// Always clears the redo stack.
    pub fn record(&mut self, description: impl Into<String>, action: Action, inverse: Action) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;

        self.redo_stack.clear();
        self.undo_stack.push_back(HistoryEntry {
            id,
            description: description.into(),
            action,
            inverse,
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
        });

        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }

        id
    }

    /// Undo the last entry by handing its inverse to `apply`.
    ///
    /// The entry only moves to the redo stack if `apply` succeeds; on failure
    /// it is put back and the error returned.
    pub fn undo<F>(&mut self, apply: F) -> Result<HistoryEntry>
    where
        F: FnOnce(&Action) -> Result<()>,
    {
        let entry = self
            .undo_stack
            .pop_back()
            .ok_or(TimelineError::NothingToUndo)?;

        if let Err(e) = apply(&entry.inverse) {
            self.undo_stack.push_back(entry);
            return Err(e);
        }

        self.redo_stack.push_back(entry.clone());
        Ok(entry)
    }

    /// Redo the last undone entry by handing its action to `apply`.
    pub fn redo<F>(&mut self, apply: F) -> Result<HistoryEntry>
    where
        F: FnOnce(&Action) -> Result<()>,
    {
        let entry = self
            .redo_stack
            .pop_back()
            .ok_or(TimelineError::NothingToRedo)?;

        if let Err(e) = apply(&entry.action) {
            self.redo_stack.push_back(entry);
            return Err(e);
        }

        self.undo_stack.push_back(entry.clone());
        Ok(entry)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get undo stack depth
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get redo stack depth
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Get history statistics
    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            undo_count: self.undo_stack.len(),
            redo_count: self.redo_stack.len(),
            max_depth: self.max_depth,
        }
    }

    /// Get description of next undo entry
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|e| e.description.as_str())
    }

    /// Get description of next redo entry
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.back().map(|e| e.description.as_str())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remove(sequence: u64) -> Action {
        Action::RemoveEvent { sequence }
    }

    #[test]
    fn test_undo_redo_moves_entries() {
        let mut history = History::new();
        history.record("first", remove(1), remove(2));
        assert!(history.can_undo());
        assert!(!history.can_redo());

        let mut applied = Vec::new();
        let entry = history
            .undo(|a| {
                applied.push(a.clone());
                Ok(())
            })
            .unwrap();
        assert_eq!(entry.description, "first");
        assert_eq!(applied, [remove(2)]);
        assert_eq!(history.redo_description(), Some("first"));

        history
            .redo(|a| {
                applied.push(a.clone());
                Ok(())
            })
            .unwrap();
        assert_eq!(applied, [remove(2), remove(1)]);
        assert_eq!(history.undo_description(), Some("first"));
    }

    #[test]
    fn test_empty_stacks() {
        let mut history = History::new();
        assert_eq!(history.undo(|_| Ok(())), Err(TimelineError::NothingToUndo));
        assert_eq!(history.redo(|_| Ok(())), Err(TimelineError::NothingToRedo));
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = History::new();
        history.record("a", remove(1), remove(1));
        history.undo(|_| Ok(())).unwrap();
        assert!(history.can_redo());

        history.record("b", remove(2), remove(2));
        assert!(!history.can_redo());
        assert_eq!(history.redo(|_| Ok(())), Err(TimelineError::NothingToRedo));
    }

    #[test]
    fn test_failed_apply_keeps_entry() {
        let mut history = History::new();
        history.record("a", remove(1), remove(1));
        let result = history.undo(|_| Err(TimelineError::NotFound("event".into())));
        assert!(result.is_err());
        assert_eq!(history.undo_depth(), 1);
        assert_eq!(history.redo_depth(), 0);
    }

    #[test]
    fn test_max_depth() {
        let mut history = History::with_max_depth(3);
        for i in 0..5 {
            history.record(format!("op {i}"), remove(i), remove(i));
        }
        let stats = history.stats();
        assert_eq!(stats.undo_count, 3);
        assert_eq!(stats.max_depth, 3);
        assert_eq!(history.undo_description(), Some("op 4"));
    }
}
