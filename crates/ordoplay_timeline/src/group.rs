// SPDX-License-Identifier: MIT OR Apache-2.0
//! Named groupings over timeline events.
//!
//! Groups hold copies of the events they were built from. Editing or removing
//! an event on the timeline afterwards leaves existing groups untouched.

use crate::error::{Result, TimelineError};
use crate::timeline::Event;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// What happens when events are grouped under a name that already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GroupPolicy {
    /// Append to the existing group
    #[default]
    Merge,
    /// Fail with `DuplicateGroup`
    Reject,
}

/// Registry of named event groups, in creation order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupRegistry {
    groups: IndexMap<String, Vec<Event>>,
}

impl GroupRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a group exists
    pub fn contains(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    /// Members of a group
    pub fn get(&self, name: &str) -> Option<&[Event]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    /// Group names in creation order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Iterate over `(name, members)`
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Event])> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether there are no groups
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Append snapshots to a group, creating it if needed.
    ///
    /// A newly created group goes at `position` in the creation order (clamped)
    /// or last. Returns whether the group was created.
    pub(crate) fn append(&mut self, name: &str, events: &[Event], position: Option<usize>) -> bool {
        if let Some(members) = self.groups.get_mut(name) {
            members.extend_from_slice(events);
            return false;
        }
        let index = position.map_or(self.groups.len(), |p| p.min(self.groups.len()));
        self.groups.shift_insert(index, name.to_string(), events.to_vec());
        true
    }

    /// Remove the last `count` members of a group.
    ///
    /// With `remove_group` set the group itself is dropped once it has no
    /// members left, and its former position is returned alongside the
    /// removed members. Otherwise an emptied group stays registered.
    pub(crate) fn trim(
        &mut self,
        name: &str,
        count: usize,
        remove_group: bool,
    ) -> Result<(Vec<Event>, Option<usize>)> {
        let (index, _, members) = self
            .groups
            .get_full_mut(name)
            .ok_or_else(|| TimelineError::NotFound(format!("group '{name}'")))?;
        if count > members.len() {
            return Err(TimelineError::InvalidArgument(format!(
                "group '{name}' has {} members, cannot remove {count}",
                members.len()
            )));
        }
        let removed = members.split_off(members.len() - count);
        if remove_group && members.is_empty() {
            self.groups.shift_remove_index(index);
            return Ok((removed, Some(index)));
        }
        Ok((removed, None))
    }

    /// Max insertion number referenced by any member
    pub(crate) fn max_sequence(&self) -> Option<u64> {
        self.groups.values().flatten().map(|e| e.sequence).max()
    }

    pub(crate) fn from_groups(groups: IndexMap<String, Vec<Event>>) -> Self {
        Self { groups }
    }
}
