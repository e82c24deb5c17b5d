// SPDX-License-Identifier: MIT OR Apache-2.0
//! Session configuration files.

use crate::error::{ProjectError, Result};
use ordoplay_timeline::SessionConfig;
use std::path::Path;

/// Load a session configuration from a RON file.
///
/// Missing fields fall back to their defaults; no path means all defaults.
pub fn load_config(path: Option<&Path>) -> Result<SessionConfig> {
    let Some(path) = path else {
        return Ok(SessionConfig::default());
    };

    let text = std::fs::read_to_string(path).map_err(|e| ProjectError::io(path, e))?;
    let config = parse_config(&text, path)?;
    tracing::info!("Loaded session config from {}", path.display());
    Ok(config)
}

fn parse_config(text: &str, path: &Path) -> Result<SessionConfig> {
    ron::from_str(text).map_err(|source| ProjectError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordoplay_timeline::{GroupPolicy, MotionUndo, MAX_HISTORY};

    #[test]
    fn test_parse_partial_config() {
        let config = parse_config("(group_policy: Reject)", Path::new("session.ron")).unwrap();
        assert_eq!(config.group_policy, GroupPolicy::Reject);
        assert_eq!(config.max_history, MAX_HISTORY);
        assert_eq!(config.motion_undo, MotionUndo::Batch);
    }

    #[test]
    fn test_parse_full_config() {
        let text = "SessionConfig(group_policy: Merge, max_history: 5, motion_undo: PerKeyframe)";
        let config = parse_config(text, Path::new("session.ron")).unwrap();
        assert_eq!(config.max_history, 5);
        assert_eq!(config.motion_undo, MotionUndo::PerKeyframe);
    }

    #[test]
    fn test_defaults_without_path() {
        assert_eq!(load_config(None).unwrap(), SessionConfig::default());
        assert!(matches!(
            parse_config("(max_history: \"lots\")", Path::new("bad.ron")),
            Err(ProjectError::Parse { .. })
        ));
    }
}
