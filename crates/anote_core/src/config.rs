//! Session and storage settings.
//!
//! # Invariants
//! - `storage_key` is non-blank once validated by the session.

/// Key the note snapshot is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "notes";
/// File name used for the on-disk preferences database.
pub const DEFAULT_DB_FILE_NAME: &str = "anote_prefs.sqlite3";

/// Settings for one `NotesSession`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Store key holding the encoded note collection.
    pub storage_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl SessionConfig {
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }
}
