//! Core domain logic for A-Notes.
//! This crate is the single source of truth for note invariants.

pub mod codec;
pub mod config;
pub mod db;
pub mod logging;
pub mod manager;
pub mod model;
pub mod session;
pub mod store;

pub use codec::{decode, empty_blob, encode, CodecError, CodecResult};
pub use config::{SessionConfig, DEFAULT_DB_FILE_NAME, DEFAULT_STORAGE_KEY};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use manager::{normalize_text, NoteManager, NoteManagerCell};
pub use model::note::{Note, NoteDraft, NoteId, NoteKey};
pub use session::{NotesSession, SessionError, SessionResult};
pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
