// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editing session: the single entry point for timeline mutations.
//!
//! A [`Session`] owns the timeline, tracks, group registry and undo history
//! of one project. Every mutating method builds an [`Action`], applies it and
//! records the inverse, so all changes are undoable and no method leaves the
//! session half-modified when it returns an error.

use crate::config::{MotionUndo, SessionConfig};
use crate::error::{check_time, Result, TimelineError};
use crate::group::{GroupPolicy, GroupRegistry};
use crate::history::{Action, History, HistoryStats};
use crate::keyframe::{Keyframe, Payload};
use crate::project::ProjectState;
use crate::store::Store;
use crate::sync::{merge_overlay, sample_time, AudioCue, AudioOverlay, MotionSampler, OverlayEntry};
use crate::timeline::{Event, EventRef};
use crate::track::{EntityKey, KeyframeRef, Track};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random session ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

/// One project's worth of timeline state and history
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    config: SessionConfig,
    store: Store,
    history: History,
    audio: Option<AudioOverlay>,
    next_sequence: u64,
    /// Bumped whenever the contents are replaced wholesale
    epoch: u64,
}

impl Session {
    /// Create an empty session with default configuration
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    /// Create an empty session
    pub fn with_config(config: SessionConfig) -> Self {
        let id = SessionId::new();
        tracing::info!("Created timeline session {}", id.0);
        Self {
            id,
            history: History::with_max_depth(config.max_history),
            config,
            store: Store::default(),
            audio: None,
            next_sequence: 0,
            epoch: 0,
        }
    }

    /// Session ID
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Active configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Counter that changes on every reset or restore
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Add an event, optionally copying it into a group.
    ///
    /// Adding with a group is recorded as a single undo step.
    pub fn add_event(
        &mut self,
        timestamp: f64,
        payload: impl Into<Payload>,
        group: Option<&str>,
    ) -> Result<EventRef> {
        check_time("event timestamp", timestamp)?;
        if let Some(name) = group {
            self.check_group_target(name)?;
        }

        let event = Event::new(timestamp, payload.into(), self.allocate_sequence());
        let handle = event.handle();
        let action = match group {
            Some(name) => Action::Batch(vec![
                Action::AddEvent(event.clone()),
                Action::GroupEvents {
                    name: name.to_string(),
                    events: vec![event],
                    position: None,
                },
            ]),
            None => Action::AddEvent(event),
        };

        self.commit(action)?;
        Ok(handle)
    }

    /// Remove the earliest-inserted event at exactly `timestamp`
    pub fn remove_event(&mut self, timestamp: f64) -> Result<Event> {
        check_time("event timestamp", timestamp)?;
        let event = self
            .store
            .timeline
            .first_at(timestamp)
            .cloned()
            .ok_or_else(|| TimelineError::NotFound(format!("no event at {timestamp}s")))?;

        self.commit(Action::RemoveEvent {
            sequence: event.sequence,
        })?;
        Ok(event)
    }

    /// Events ascending, optionally limited to `start <= t <= end`
    pub fn list_events(&self, start: Option<f64>, end: Option<f64>) -> Vec<Event> {
        self.events_in(start, end).to_vec()
    }

    /// All events, ascending
    pub fn events(&self) -> &[Event] {
        self.store.timeline.events()
    }

    /// Number of events on the timeline
    pub fn event_count(&self) -> usize {
        self.store.timeline.len()
    }

    fn events_in(&self, start: Option<f64>, end: Option<f64>) -> &[Event] {
        match (start, end) {
            (None, None) => self.store.timeline.events(),
            (start, end) => self
                .store
                .timeline
                .range(start.unwrap_or(f64::NEG_INFINITY), end.unwrap_or(f64::INFINITY)),
        }
    }

    // ------------------------------------------------------------------
    // Keyframes
    // ------------------------------------------------------------------

    /// Add a keyframe to an entity track, creating the track if needed
    pub fn add_keyframe(
        &mut self,
        entity: impl Into<EntityKey>,
        timestamp: f64,
        payload: impl Into<Payload>,
    ) -> Result<KeyframeRef> {
        check_time("keyframe timestamp", timestamp)?;
        let entity = entity.into();
        let keyframe = Keyframe::new(timestamp, payload.into(), self.allocate_sequence());
        let handle = KeyframeRef {
            entity: entity.clone(),
            timestamp,
            sequence: keyframe.sequence,
        };

        self.commit(Action::AddKeyframe { entity, keyframe })?;
        Ok(handle)
    }

    /// Remove a keyframe by handle
    pub fn remove_keyframe(&mut self, keyframe: &KeyframeRef) -> Result<Keyframe> {
        let removed = self
            .get_keyframes(keyframe.entity.as_str())
            .iter()
            .find(|k| k.sequence == keyframe.sequence)
            .cloned()
            .ok_or_else(|| {
                TimelineError::NotFound(format!(
                    "keyframe #{} on '{}'",
                    keyframe.sequence, keyframe.entity
                ))
            })?;

        self.commit(Action::RemoveKeyframe {
            entity: keyframe.entity.clone(),
            sequence: keyframe.sequence,
        })?;
        Ok(removed)
    }

    /// Keyframes of an entity, ascending (empty if the entity has no track)
    pub fn get_keyframes(&self, entity: &str) -> &[Keyframe] {
        self.store.keyframes(entity)
    }

    /// Keyframes of an entity with `start <= t <= end`
    pub fn keyframes_in_range(&self, entity: &str, start: f64, end: f64) -> &[Keyframe] {
        self.store
            .tracks
            .get(entity)
            .map(|track| track.keyframes_in_range(start, end))
            .unwrap_or_default()
    }

    /// Track of an entity
    pub fn track(&self, entity: &str) -> Option<&Track> {
        self.store.tracks.get(entity)
    }

    /// All tracks in creation order
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.store.tracks.values()
    }

    /// Latest timestamp across events and keyframes
    pub fn duration(&self) -> f64 {
        self.store
            .tracks
            .values()
            .map(Track::duration)
            .fold(self.store.timeline.duration(), f64::max)
    }

    // ------------------------------------------------------------------
    // Groups
    // ------------------------------------------------------------------

    /// Group event snapshots under `name`
    pub fn group_events(&mut self, name: &str, events: Vec<Event>) -> Result<()> {
        self.check_group_target(name)?;
        self.commit(Action::GroupEvents {
            name: name.to_string(),
            events,
            position: None,
        })?;
        Ok(())
    }

    /// Delete a group, returning its members
    pub fn ungroup_events(&mut self, name: &str) -> Result<Vec<Event>> {
        let members = self
            .store
            .groups
            .get(name)
            .map(<[Event]>::to_vec)
            .ok_or_else(|| TimelineError::NotFound(format!("group '{name}'")))?;

        self.commit(Action::UngroupEvents {
            name: name.to_string(),
            count: members.len(),
            remove_group: true,
        })?;
        Ok(members)
    }

    /// Members of a group
    pub fn group(&self, name: &str) -> Option<&[Event]> {
        self.store.groups.get(name)
    }

    /// Group names in creation order
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.store.groups.names()
    }

    /// Group registry
    pub fn groups(&self) -> &GroupRegistry {
        &self.store.groups
    }

    fn check_group_target(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(TimelineError::InvalidArgument(
                "group name must not be empty".to_string(),
            ));
        }
        if self.config.group_policy == GroupPolicy::Reject && self.store.groups.contains(name) {
            return Err(TimelineError::DuplicateGroup(name.to_string()));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Undo / redo
    // ------------------------------------------------------------------

    /// Revert the most recent change, returning its description
    pub fn undo(&mut self) -> Result<String> {
        let entry = self
            .history
            .undo(|inverse| self.store.apply(inverse).map(drop))?;
        tracing::debug!("Undo: {}", entry.description);
        Ok(entry.description)
    }

    /// Re-apply the most recently undone change, returning its description
    pub fn redo(&mut self) -> Result<String> {
        let entry = self
            .history
            .redo(|action| self.store.apply(action).map(drop))?;
        tracing::debug!("Redo: {}", entry.description);
        Ok(entry.description)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Description of the next undo step
    pub fn undo_description(&self) -> Option<&str> {
        self.history.undo_description()
    }

    /// Description of the next redo step
    pub fn redo_description(&self) -> Option<&str> {
        self.history.redo_description()
    }

    /// History statistics
    pub fn history_stats(&self) -> HistoryStats {
        self.history.stats()
    }

    /// Forget all undo/redo history
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Apply an action and record it. Returns the inverse.
    fn commit(&mut self, action: Action) -> Result<Action> {
        let inverse = self.store.apply(&action)?;
        let description = action.describe();
        tracing::debug!("{description}");
        self.history.record(description, action, inverse.clone());
        Ok(inverse)
    }

    fn allocate_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        sequence
    }

    // ------------------------------------------------------------------
    // Motion / audio sync
    // ------------------------------------------------------------------

    /// Lay out the sampler's output as keyframes over `[0, duration)`.
    ///
    /// Sample `i` of `n` lands at `i * duration / n`. Returns the number of
    /// keyframes inserted.
    pub fn sync_with_motion<S>(
        &mut self,
        entity: impl Into<EntityKey>,
        sampler: &S,
        duration: f64,
    ) -> Result<usize>
    where
        S: MotionSampler + ?Sized,
    {
        check_time("motion duration", duration)?;
        let samples = sampler.sample(duration);
        self.apply_motion_samples(entity.into(), samples, duration)
    }

    pub(crate) fn apply_motion_samples(
        &mut self,
        entity: EntityKey,
        samples: Vec<Payload>,
        duration: f64,
    ) -> Result<usize> {
        check_time("motion duration", duration)?;
        let count = samples.len();
        if count == 0 {
            return Ok(0);
        }

        let actions: Vec<Action> = samples
            .into_iter()
            .enumerate()
            .map(|(i, payload)| Action::AddKeyframe {
                entity: entity.clone(),
                keyframe: Keyframe::new(
                    sample_time(i, count, duration),
                    payload,
                    self.allocate_sequence(),
                ),
            })
            .collect();

        match self.config.motion_undo {
            MotionUndo::Batch => {
                let inverse = self.store.apply(&Action::Batch(actions.clone()))?;
                self.history.record(
                    format!("Sync {count} motion keyframe(s) to '{entity}'"),
                    Action::Batch(actions),
                    inverse,
                );
            }
            MotionUndo::PerKeyframe => {
                for action in actions {
                    self.commit(action)?;
                }
            }
        }

        tracing::debug!("Synced {count} motion keyframe(s) to '{entity}' over {duration}s");
        Ok(count)
    }

    /// Attach a read-only audio overlay (not recorded in history)
    pub fn sync_with_audio(&mut self, duration: f64, cues: Vec<AudioCue>) -> Result<&AudioOverlay> {
        let overlay = AudioOverlay::new(duration, cues)?;
        tracing::debug!(
            "Synced audio overlay: {} cue(s) over {duration}s",
            overlay.cues().len()
        );
        Ok(self.audio.insert(overlay))
    }

    /// Current audio overlay
    pub fn audio_overlay(&self) -> Option<&AudioOverlay> {
        self.audio.as_ref()
    }

    /// Audio markers, optionally limited to `start <= t <= end`
    pub fn audio_markers(&self, start: Option<f64>, end: Option<f64>) -> Vec<AudioCue> {
        let Some(overlay) = &self.audio else {
            return Vec::new();
        };
        overlay
            .cues_in_range(start.unwrap_or(f64::NEG_INFINITY), end.unwrap_or(f64::INFINITY))
            .to_vec()
    }

    /// Events and audio markers merged for joint display
    pub fn overlay_entries(&self, start: Option<f64>, end: Option<f64>) -> Vec<OverlayEntry> {
        let cues = self.audio_markers(start, end);
        merge_overlay(self.events_in(start, end), &cues)
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Start a new, empty project in this session
    pub fn reset(&mut self) {
        self.store = Store::default();
        self.audio = None;
        self.history.clear();
        self.next_sequence = 0;
        self.epoch += 1;
        self.id = SessionId::new();
        tracing::info!("Reset timeline session {}", self.id.0);
    }

    /// Copy the project contents out (without history)
    pub fn snapshot(&self) -> ProjectState {
        ProjectState::from_store(&self.store, self.audio.as_ref())
    }

    /// Replace the project contents; history is cleared
    pub fn restore(&mut self, state: ProjectState) -> Result<()> {
        let (store, audio) = state.into_store()?;
        self.next_sequence = store.next_sequence();
        self.store = store;
        self.audio = audio;
        self.history.clear();
        self.epoch += 1;
        tracing::info!(
            "Restored session {}: {} event(s), {} track(s), {} group(s)",
            self.id.0,
            self.store.timeline.len(),
            self.store.tracks.len(),
            self.store.groups.len()
        );
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
