// Device-local persistence - the small slice of state that lives on the
// client between runs: guide dismissal, cached account, cached AI config and
// the todo lists. Logs are never cached here; the backend is authoritative.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::HubError;
use crate::models::{AppConfig, Todo, User};

const STATE_FILE: &str = "state.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalState {
    #[serde(default)]
    pub has_closed_guide: bool,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub config: AppConfig,
    #[serde(default)]
    pub todos: Vec<Todo>,
}

impl LocalState {
    /// Path of the state file under the platform's data directory.
    pub fn default_path() -> Result<PathBuf, HubError> {
        ProjectDirs::from("com", "hub", "hub")
            .map(|dirs| dirs.data_dir().join(STATE_FILE))
            .ok_or_else(|| HubError::LocalState("could not determine data directory".to_string()))
    }

    /// Load persisted state, or defaults when the file does not exist yet.
    pub fn load(path: &Path) -> Result<Self, HubError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .map_err(|e| HubError::LocalState(format!("read {}: {}", path.display(), e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| HubError::LocalState(format!("parse {}: {}", path.display(), e)))
    }

    pub fn save(&self, path: &Path) -> Result<(), HubError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| HubError::LocalState(format!("create {}: {}", parent.display(), e)))?;
        }
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| HubError::LocalState(format!("serialize state: {}", e)))?;
        fs::write(path, contents)
            .map_err(|e| HubError::LocalState(format!("write {}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModelProvider;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let state = LocalState::load(&dir.path().join(STATE_FILE)).unwrap();
        assert!(!state.has_closed_guide);
        assert!(state.user.is_none());
        assert!(state.todos.is_empty());
        assert!(!state.config.api_key_tested);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(STATE_FILE);

        let mut state = LocalState::default();
        state.has_closed_guide = true;
        state.config.provider = ModelProvider::Kimi;
        state.config.api_key_tested = true;
        state.todos.push(Todo::new("water plants", "Home", chrono::Utc::now()));
        state.save(&path).unwrap();

        let loaded = LocalState::load(&path).unwrap();
        assert!(loaded.has_closed_guide);
        assert_eq!(loaded.config.provider, ModelProvider::Kimi);
        assert!(loaded.config.api_key_tested);
        assert_eq!(loaded.todos.len(), 1);
        assert_eq!(loaded.todos[0].content, "water plants");
    }

    #[test]
    fn corrupt_file_reports_local_state_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STATE_FILE);
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            LocalState::load(&path),
            Err(HubError::LocalState(_))
        ));
    }
}
