// SPDX-License-Identifier: MIT OR Apache-2.0
//! Serializable project contents.
//!
//! A [`ProjectState`] carries the timeline, tracks, groups and audio overlay
//! of a session. Undo history is deliberately not part of it; restoring a
//! project always starts with an empty history.

use crate::error::{check_time, Result, TimelineError};
use crate::group::GroupRegistry;
use crate::keyframe::Keyframe;
use crate::store::Store;
use crate::sync::AudioOverlay;
use crate::timeline::{Event, Timeline};
use crate::track::Track;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Saved contents of a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectState {
    /// Timeline events, ascending
    pub events: Vec<Event>,
    /// Keyframe tracks in creation order
    pub tracks: Vec<Track>,
    /// Group snapshots in creation order
    pub groups: IndexMap<String, Vec<Event>>,
    /// Audio overlay, if one was synced
    #[serde(default)]
    pub audio: Option<AudioOverlay>,
}

impl ProjectState {
    pub(crate) fn from_store(store: &Store, audio: Option<&AudioOverlay>) -> Self {
        Self {
            events: store.timeline.events().to_vec(),
            tracks: store.tracks.values().cloned().collect(),
            groups: store
                .groups
                .iter()
                .map(|(name, members)| (name.to_string(), members.to_vec()))
                .collect(),
            audio: audio.cloned(),
        }
    }

    /// Validate and rebuild a store.
    ///
    /// Data from disk is not trusted: timestamps are checked and ordering is
    /// re-established. If insertion numbers collide between events and
    /// keyframes they are reassigned in timeline-then-track order.
    pub(crate) fn into_store(self) -> Result<(Store, Option<AudioOverlay>)> {
        for event in self.events.iter().chain(self.groups.values().flatten()) {
            check_time("event timestamp", event.timestamp)?;
        }

        let mut tracks = IndexMap::with_capacity(self.tracks.len());
        for track in self.tracks {
            if tracks.contains_key(&track.entity) {
                return Err(TimelineError::InvalidArgument(format!(
                    "duplicate track for entity '{}'",
                    track.entity
                )));
            }
            let keyframes: Vec<Keyframe> = track.keyframes().to_vec();
            for keyframe in &keyframes {
                check_time("keyframe timestamp", keyframe.timestamp)?;
            }
            let entity = track.entity;
            tracks.insert(entity.clone(), Track::from_keyframes(entity, keyframes));
        }

        let mut timeline = Timeline::from_events(self.events);

        let mut seen = HashSet::new();
        let unique = timeline
            .events()
            .iter()
            .map(|e| e.sequence)
            .chain(tracks.values().flat_map(|t| t.keyframes().iter().map(|k| k.sequence)))
            .all(|sequence| seen.insert(sequence));

        if !unique {
            tracing::warn!("Project has colliding insertion numbers, renumbering");
            let mut next = 0u64;
            let mut events = timeline.events().to_vec();
            for event in &mut events {
                event.sequence = next;
                next += 1;
            }
            timeline = Timeline::from_events(events);
            for track in tracks.values_mut() {
                let mut keyframes = track.keyframes().to_vec();
                for keyframe in &mut keyframes {
                    keyframe.sequence = next;
                    next += 1;
                }
                *track = Track::from_keyframes(track.entity.clone(), keyframes);
            }
        }

        let audio = self
            .audio
            .map(|overlay| AudioOverlay::new(overlay.duration, overlay.cues().to_vec()))
            .transpose()?;

        let store = Store {
            timeline,
            tracks,
            groups: GroupRegistry::from_groups(self.groups),
        };
        Ok((store, audio))
    }
}
