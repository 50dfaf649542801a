// ABOUTME: JSON-file preference storage at ~/.milemap/preferences.json
// ABOUTME: Loaded once at construction, best-effort persisted on every set

use crate::storage::{PreferenceStorage, KEY_PREFIX};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

const PREFERENCES_DIR: &str = ".milemap";
const PREFERENCES_FILE: &str = "preferences.json";

/// Flat JSON object of namespaced keys to string values.
pub struct FilePreferences {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
}

impl Default for FilePreferences {
    fn default() -> Self {
        Self::new()
    }
}

impl FilePreferences {
    pub fn new() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::at_path(home.join(PREFERENCES_DIR).join(PREFERENCES_FILE))
    }

    /// Storage rooted at an explicit file, for tests and portable installs.
    pub fn at_path(path: PathBuf) -> Self {
        let values = Self::load(&path);
        FilePreferences {
            path,
            values: Mutex::new(values),
        }
    }

    fn load(path: &Path) -> HashMap<String, String> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            // first run, nothing persisted yet
            Err(_) => return HashMap::new(),
        };
        match serde_json::from_str(&content) {
            Ok(values) => values,
            Err(err) => {
                warn!("ignoring unreadable preferences at {}: {err}", path.display());
                HashMap::new()
            }
        }
    }

    fn persist(&self, values: &HashMap<String, String>) {
        if let Some(parent) = self.path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                warn!("could not create {}: {err}", parent.display());
                return;
            }
        }
        let content = match serde_json::to_string_pretty(values) {
            Ok(content) => content,
            Err(err) => {
                warn!("could not serialize preferences: {err}");
                return;
            }
        };
        if let Err(err) = fs::write(&self.path, content) {
            warn!("could not save preferences to {}: {err}", self.path.display());
        }
    }
}

impl PreferenceStorage for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&format!("{KEY_PREFIX}{key}"))
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut values = self
            .values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        values.insert(format!("{KEY_PREFIX}{key}"), value.to_string());
        self.persist(&values);
    }
}
