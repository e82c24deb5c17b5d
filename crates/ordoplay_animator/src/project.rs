// SPDX-License-Identifier: MIT OR Apache-2.0
//! Project files.
//!
//! A project is a pretty-printed RON document holding a format version, the
//! id of the session that saved it and the session contents. Undo history is
//! not saved.

use crate::error::{ProjectError, Result};
use ordoplay_timeline::{ProjectState, Session};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Current project file format version
pub const PROJECT_FORMAT_VERSION: u32 = 1;

/// Default file extension for projects
pub const PROJECT_EXTENSION: &str = "ordoanim";

/// A saved project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Format version
    pub version: u32,
    /// Session that wrote the file
    pub session_id: Uuid,
    /// Timeline contents
    pub state: ProjectState,
}

impl ProjectFile {
    /// Capture a session's contents
    pub fn from_session(session: &Session) -> Self {
        Self {
            version: PROJECT_FORMAT_VERSION,
            session_id: session.id().0,
            state: session.snapshot(),
        }
    }

    /// Load the contents into a fresh session
    pub fn into_session(self, session: &mut Session) -> Result<()> {
        session.restore(self.state)?;
        Ok(())
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String> {
        let config = ron::ser::PrettyConfig::default().struct_names(true);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Parse from RON, rejecting files from newer versions
    pub fn from_ron(text: &str, path: &Path) -> Result<Self> {
        let file: ProjectFile = ron::from_str(text).map_err(|source| ProjectError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if file.version > PROJECT_FORMAT_VERSION {
            return Err(ProjectError::UnsupportedVersion {
                found: file.version,
                supported: PROJECT_FORMAT_VERSION,
            });
        }
        Ok(file)
    }

    /// Load a project from disk
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ProjectError::io(path, e))?;
        let file = Self::from_ron(&text, path)?;
        tracing::info!("Loaded project from {}", path.display());
        Ok(file)
    }

    /// Save the project to disk
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = self.to_ron()?;
        std::fs::write(path, text).map_err(|e| ProjectError::io(path, e))?;
        tracing::info!("Saved project to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordoplay_timeline::{AudioCue, MotionPreset, Payload};

    fn sample_session() -> Session {
        let mut session = Session::new();
        session.add_event(0.0, "Scene: Park", Some("Scenes")).unwrap();
        session.add_event(2.0, "Hero enters from left", None).unwrap();
        session.add_keyframe("Hero", 2.0, Payload::Vec2([0.0, 0.0])).unwrap();
        session.sync_with_motion("Hero", &MotionPreset::Wave, 0.5).unwrap();
        session.sync_with_audio(4.0, vec![AudioCue::new(1.0, "birds")]).unwrap();
        session
    }

    #[test]
    fn test_project_ron_round_trip() {
        let session = sample_session();
        let file = ProjectFile::from_session(&session);
        let text = file.to_ron().unwrap();
        assert!(text.contains("ProjectFile"));

        let loaded = ProjectFile::from_ron(&text, Path::new("test.ordoanim")).unwrap();
        assert_eq!(loaded.session_id, session.id().0);

        let mut restored = Session::new();
        loaded.into_session(&mut restored).unwrap();
        assert_eq!(restored.snapshot(), session.snapshot());
        assert!(!restored.can_undo());
    }

    #[test]
    fn test_newer_version_rejected() {
        let mut file = ProjectFile::from_session(&Session::new());
        file.version = PROJECT_FORMAT_VERSION + 1;
        let text = file.to_ron().unwrap();
        assert!(matches!(
            ProjectFile::from_ron(&text, Path::new("new.ordoanim")),
            Err(ProjectError::UnsupportedVersion { found: 2, supported: 1 })
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            ProjectFile::from_ron("not a project", Path::new("bad.ordoanim")),
            Err(ProjectError::Parse { .. })
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("ordoplay_animator_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("scene.{PROJECT_EXTENSION}"));

        let file = ProjectFile::from_session(&sample_session());
        file.save(&path).unwrap();
        assert_eq!(ProjectFile::load(&path).unwrap(), file);

        assert!(matches!(
            ProjectFile::load(&dir.join("missing.ordoanim")),
            Err(ProjectError::Io { .. })
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
