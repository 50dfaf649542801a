// ABOUTME: Durable user preferences: a namespaced string key-value seam
// ABOUTME: File-backed JSON for real use, HashMap double for tests; reads never fail

pub mod file;
pub mod memory;
pub mod storage;

pub use file::FilePreferences;
pub use memory::MemoryPreferences;
pub use storage::{PreferenceStorage, KEY_PREFIX, THEME_KEY};
