// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline and keyframe engine for OrdoPlay Animator.
//!
//! This crate provides the editing model behind a scene timeline:
//! - Timestamped events kept in time order
//! - Per-entity keyframe tracks
//! - Named event groups
//! - Linear undo/redo built on inverse actions
//! - Motion and audio sync adapters
//!
//! ## Architecture
//!
//! All mutation goes through a [`Session`]. Each change is expressed as an
//! [`Action`]; applying it yields the inverse action, and both are recorded in
//! [`History`]. Motion sampling can run off-thread with
//! [`spawn_motion_sync`], which applies the batch under the session lock.

pub mod background;
pub mod config;
pub mod error;
pub mod group;
pub mod history;
pub mod keyframe;
pub mod project;
pub mod session;
mod store;
pub mod sync;
pub mod timeline;
pub mod track;

pub use background::{
    spawn_motion_sync, CancelToken, DiscardReason, MotionSyncHandle, MotionSyncOutcome,
    SharedSession,
};
pub use config::{MotionUndo, SessionConfig};
pub use error::{Result, TimelineError};
pub use group::{GroupPolicy, GroupRegistry};
pub use history::{Action, EntryId, History, HistoryEntry, HistoryStats, MAX_HISTORY};
pub use keyframe::{lerp, Keyframe, Payload};
pub use project::ProjectState;
pub use session::{Session, SessionId};
pub use sync::{
    sample_time, AudioCue, AudioOverlay, LinearSampler, MotionPreset, MotionSampler, OverlayEntry,
};
pub use timeline::{Event, EventRef, Timeline};
pub use track::{EntityKey, KeyframeRef, Track};
