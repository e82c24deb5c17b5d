// SPDX-License-Identifier: MIT OR Apache-2.0
//! Errors raised by the animator front end.

use ordoplay_timeline::TimelineError;
use std::path::PathBuf;
use thiserror::Error;

/// Front-end error
#[derive(Debug, Error)]
pub enum ProjectError {
    /// Reading or writing a file failed
    #[error("{}: {source}", path.display())]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// A RON document could not be parsed
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: ron::error::SpannedError,
    },

    /// A value could not be written as RON
    #[error("Failed to serialize: {0}")]
    Serialize(#[from] ron::Error),

    /// A script pattern failed to compile
    #[error("Invalid script pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The project file is newer than this build understands
    #[error("Project version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version stored in the file
        found: u32,
        /// Highest version this build reads
        supported: u32,
    },

    /// The timeline engine rejected an operation
    #[error(transparent)]
    Timeline(#[from] TimelineError),
}

/// Result type for front-end operations
pub type Result<T> = std::result::Result<T, ProjectError>;

impl ProjectError {
    /// Wrap an I/O error with the path it concerns
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
