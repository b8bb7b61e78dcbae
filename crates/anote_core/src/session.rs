//! Notes session: the composition point tying store, codec and manager.
//!
//! # Responsibility
//! - Load the persisted snapshot once and initialize the manager with it.
//! - Re-encode and save the full collection after every successful mutation.
//! - Apply the fallback policy for unreadable snapshots.
//!
//! # Invariants
//! - Failed mutations never trigger a save.
//! - A corrupted snapshot yields an empty collection; it is not overwritten
//!   until the next successful mutation.

use crate::codec::{self, CodecError};
use crate::config::SessionConfig;
use crate::manager::{NoteManager, NoteManagerCell};
use crate::model::note::{Note, NoteDraft, NoteKey};
use crate::store::{KeyValueStore, StoreError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SessionResult<T> = Result<T, SessionError>;

/// Failure while loading or saving the note snapshot.
#[derive(Debug)]
pub enum SessionError {
    Codec(CodecError),
    Store(StoreError),
    InvalidConfig(String),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Codec(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::InvalidConfig(message) => write!(f, "invalid session config: {message}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Codec(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::InvalidConfig(_) => None,
        }
    }
}

impl From<CodecError> for SessionError {
    fn from(value: CodecError) -> Self {
        Self::Codec(value)
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Owns the store and the single note manager for one process.
///
/// The manager is built exactly once, in `open`, from the loaded snapshot;
/// every later `initialize` returns it unchanged.
pub struct NotesSession<S: KeyValueStore> {
    store: S,
    config: SessionConfig,
    cell: NoteManagerCell,
}

impl<S: KeyValueStore> NotesSession<S> {
    /// Loads the snapshot from `store` and initializes the manager.
    ///
    /// # Errors
    /// - `InvalidConfig` when the storage key is blank.
    /// - `Store` when the backend cannot be read.
    ///
    /// Undecodable snapshots are not an error: they are logged and replaced by
    /// an empty collection.
    pub fn open(store: S, config: SessionConfig) -> SessionResult<Self> {
        if config.storage_key.trim().is_empty() {
            return Err(SessionError::InvalidConfig(
                "storage_key cannot be empty".to_string(),
            ));
        }

        let blob = store.get_or(&config.storage_key, codec::empty_blob())?;
        let loaded = match codec::decode(&blob) {
            Ok(notes) => notes,
            Err(err) => {
                warn!(
                    "event=session_load module=session status=fallback key={} error={}",
                    config.storage_key, err
                );
                Vec::new()
            }
        };

        let mut cell = NoteManagerCell::new();
        let count = cell.initialize(loaded).len();
        info!(
            "event=session_load module=session status=ok key={} notes={}",
            config.storage_key, count
        );

        Ok(Self {
            store,
            config,
            cell,
        })
    }

    /// Returns the session's manager. `initial` is ignored: the manager was
    /// already built from the stored snapshot in `open`.
    pub fn initialize<I, T>(&mut self, initial: I) -> &mut NoteManager
    where
        I: IntoIterator<Item = T>,
        T: Into<Option<Note>>,
    {
        self.cell.initialize(initial)
    }

    pub fn create_note(&mut self, text: &str) -> SessionResult<Option<Note>> {
        let created = self.manager_mut().create_note(text);
        self.save_if(created)
    }

    pub fn create_note_from(&mut self, candidate: &NoteDraft) -> SessionResult<Option<Note>> {
        let created = self.manager_mut().create_note_from(candidate);
        self.save_if(created)
    }

    pub fn update_note(&mut self, id: impl NoteKey, text: &str) -> SessionResult<Option<Note>> {
        let updated = self.manager_mut().update_note(id, text);
        self.save_if(updated)
    }

    pub fn update_note_with(
        &mut self,
        old: impl NoteKey,
        new: Option<&NoteDraft>,
    ) -> SessionResult<Option<Note>> {
        let updated = self.manager_mut().update_note_with(old, new);
        self.save_if(updated)
    }

    pub fn delete_note(&mut self, key: impl NoteKey) -> SessionResult<bool> {
        let deleted = self.manager_mut().delete_note(key);
        if deleted {
            self.save()?;
        }
        Ok(deleted)
    }

    /// Applies an editor result: updates the note with the draft's id, or
    /// creates a new note when no such note can be updated.
    pub fn submit_note(&mut self, draft: &NoteDraft) -> SessionResult<Option<Note>> {
        let manager = self.manager_mut();
        let updated = draft
            .text
            .as_deref()
            .and_then(|text| manager.update_note(draft.id, text));
        let result = match updated {
            Some(note) => Some(note),
            None => manager.create_note_from(draft),
        };
        self.save_if(result)
    }

    /// Encodes the current collection and writes it under the session key.
    pub fn save(&mut self) -> SessionResult<()> {
        let blob = codec::encode(self.notes())?;
        if let Err(err) = self.store.put(&self.config.storage_key, &blob) {
            error!(
                "event=session_save module=session status=error key={} error={}",
                self.config.storage_key, err
            );
            return Err(err.into());
        }
        info!(
            "event=session_save module=session status=ok key={} notes={}",
            self.config.storage_key,
            self.notes().len()
        );
        Ok(())
    }

    /// Live view of the session's notes.
    pub fn notes(&self) -> &[Note] {
        match self.cell.get() {
            Some(manager) => manager.notes(),
            None => &[],
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn manager_mut(&mut self) -> &mut NoteManager {
        self.cell.initialize(std::iter::empty::<Note>())
    }

    fn save_if(&mut self, result: Option<Note>) -> SessionResult<Option<Note>> {
        if result.is_some() {
            self.save()?;
        }
        Ok(result)
    }
}
