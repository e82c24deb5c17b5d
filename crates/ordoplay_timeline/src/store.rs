// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline, tracks and groups, mutated only through [`Action`]s.

use crate::error::{Result, TimelineError};
use crate::group::GroupRegistry;
use crate::history::Action;
use crate::keyframe::Keyframe;
use crate::timeline::Timeline;
use crate::track::{EntityKey, Track};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Everything a session can mutate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Store {
    /// Shared event timeline
    pub(crate) timeline: Timeline,
    /// Keyframe tracks by entity, in creation order
    pub(crate) tracks: IndexMap<EntityKey, Track>,
    /// Event groups
    pub(crate) groups: GroupRegistry,
}

impl Store {
    /// Apply an action and return the action that reverts it.
    ///
    /// On error the store is unchanged.
    pub(crate) fn apply(&mut self, action: &Action) -> Result<Action> {
        match action {
            Action::AddEvent(event) => {
                self.timeline.insert(event.clone());
                Ok(Action::RemoveEvent {
                    sequence: event.sequence,
                })
            }
            Action::RemoveEvent { sequence } => {
                let event = self
                    .timeline
                    .remove_sequence(*sequence)
                    .ok_or_else(|| TimelineError::NotFound(format!("event #{sequence}")))?;
                Ok(Action::AddEvent(event))
            }
            Action::AddKeyframe { entity, keyframe } => {
                self.track_entry(entity).add_keyframe(keyframe.clone());
                Ok(Action::RemoveKeyframe {
                    entity: entity.clone(),
                    sequence: keyframe.sequence,
                })
            }
            Action::RemoveKeyframe { entity, sequence } => {
                let keyframe = self
                    .tracks
                    .get_mut(entity)
                    .and_then(|track| track.remove_keyframe(*sequence))
                    .ok_or_else(|| {
                        TimelineError::NotFound(format!("keyframe #{sequence} on '{entity}'"))
                    })?;
                Ok(Action::AddKeyframe {
                    entity: entity.clone(),
                    keyframe,
                })
            }
            Action::GroupEvents {
                name,
                events,
                position,
            } => {
                let created = self.groups.append(name, events, *position);
                Ok(Action::UngroupEvents {
                    name: name.clone(),
                    count: events.len(),
                    remove_group: created,
                })
            }
            Action::UngroupEvents {
                name,
                count,
                remove_group,
            } => {
                let (events, position) = self.groups.trim(name, *count, *remove_group)?;
                Ok(Action::GroupEvents {
                    name: name.clone(),
                    events,
                    position,
                })
            }
            Action::Batch(actions) => self.apply_batch(actions),
        }
    }

    fn apply_batch(&mut self, actions: &[Action]) -> Result<Action> {
        let mut inverses = Vec::with_capacity(actions.len());
        for action in actions {
            match self.apply(action) {
                Ok(inverse) => inverses.push(inverse),
                Err(e) => {
                    self.rollback(inverses);
                    return Err(e);
                }
            }
        }
        inverses.reverse();
        Ok(Action::Batch(inverses))
    }

    fn rollback(&mut self, applied_inverses: Vec<Action>) {
        for inverse in applied_inverses.into_iter().rev() {
            if let Err(e) = self.apply(&inverse) {
                // Inverses of successfully applied actions always match the
                // current state; reaching this means the store was corrupted.
                tracing::error!("Rollback step failed: {e}");
            }
        }
    }

    fn track_entry(&mut self, entity: &EntityKey) -> &mut Track {
        self.tracks
            .entry(entity.clone())
            .or_insert_with(|| Track::new(entity.clone()))
    }

    /// Keyframes for an entity (empty if no track exists)
    pub(crate) fn keyframes(&self, entity: &str) -> &[Keyframe] {
        self.tracks
            .get(entity)
            .map(Track::keyframes)
            .unwrap_or_default()
    }

    /// Next free insertion number given the current contents
    pub(crate) fn next_sequence(&self) -> u64 {
        let tracks = self.tracks.values().filter_map(Track::max_sequence).max();
        [
            self.timeline.max_sequence(),
            tracks,
            self.groups.max_sequence(),
        ]
        .into_iter()
        .flatten()
        .max()
        .map_or(0, |s| s + 1)
    }
}
