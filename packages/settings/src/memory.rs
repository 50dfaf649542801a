// ABOUTME: HashMap-backed PreferenceStorage for tests

use crate::storage::{PreferenceStorage, KEY_PREFIX};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryPreferences {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preloads a value, as if persisted by an earlier run.
    pub fn with_value(self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }
}

impl PreferenceStorage for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&format!("{KEY_PREFIX}{key}"))
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(format!("{KEY_PREFIX}{key}"), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_what_set_stored() {
        let prefs = MemoryPreferences::new();
        assert_eq!(prefs.get("theme"), None);
        prefs.set("theme", "dark");
        assert_eq!(prefs.get("theme"), Some("dark".to_string()));
    }
}
