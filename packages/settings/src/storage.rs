// ABOUTME: The PreferenceStorage trait and the keys stored through it

/// Namespace prepended to every key so shared backing stores cannot collide.
pub const KEY_PREFIX: &str = "milemap-";

/// The persisted theme choice, stored as `dark` or `light`.
pub const THEME_KEY: &str = "theme";

/// Read-with-fallback preference storage. Absent or unreadable values come
/// back as `None` and failed writes are swallowed after a warn log; callers
/// always have a usable default to fall back on.
pub trait PreferenceStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}
