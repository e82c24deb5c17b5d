// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for timeline operations.

use thiserror::Error;

/// Errors reported by the timeline engine.
///
/// Every variant is recoverable. An operation that returns an error leaves the
/// session exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimelineError {
    /// A timestamp, duration or name was rejected
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The event, keyframe or group targeted by an operation does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A group with this name already exists and the policy forbids merging
    #[error("Group already exists: {0}")]
    DuplicateGroup(String),

    /// Nothing to undo
    #[error("Nothing to undo")]
    NothingToUndo,

    /// Nothing to redo
    #[error("Nothing to redo")]
    NothingToRedo,
}

/// Result type for timeline operations
pub type Result<T> = std::result::Result<T, TimelineError>;

/// Reject negative, NaN and infinite times.
pub(crate) fn check_time(what: &str, time: f64) -> Result<f64> {
    if time.is_finite() && time >= 0.0 {
        Ok(time)
    } else {
        Err(TimelineError::InvalidArgument(format!(
            "{what} must be a finite, non-negative number of seconds (got {time})"
        )))
    }
}
