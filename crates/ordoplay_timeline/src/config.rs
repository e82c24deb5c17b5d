// SPDX-License-Identifier: MIT OR Apache-2.0
//! Session configuration.

use crate::group::GroupPolicy;
use crate::history::MAX_HISTORY;
use serde::{Deserialize, Serialize};

/// How a motion sync batch is recorded in history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MotionUndo {
    /// One history entry for the whole batch
    #[default]
    Batch,
    /// One history entry per inserted keyframe
    PerKeyframe,
}

/// Tunables for a [`Session`](crate::Session)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Behaviour when grouping under an existing name
    pub group_policy: GroupPolicy,
    /// Maximum undo depth
    pub max_history: usize,
    /// Undo granularity of motion sync
    pub motion_undo: MotionUndo,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            group_policy: GroupPolicy::Merge,
            max_history: MAX_HISTORY,
            motion_undo: MotionUndo::Batch,
        }
    }
}
