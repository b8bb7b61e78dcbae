//! Note lifecycle manager.
//!
//! # Responsibility
//! - Own the canonical, ordered note collection.
//! - Assign fresh ids and normalize note text on every write path.
//! - Report validation failures through `Option`/`bool`, never errors.
//!
//! # Invariants
//! - Ids in the collection are unique; assigned ids are never reused.
//! - No note written by the manager has empty or whitespace-only text.
//! - The manager never persists itself; callers save after a successful
//!   mutation.

use crate::model::note::{Note, NoteDraft, NoteId, NoteKey};
use log::{debug, info, warn};
use std::collections::HashSet;

/// Sole authority over the in-memory note collection.
#[derive(Debug)]
pub struct NoteManager {
    notes: Vec<Note>,
    /// `None` once the id space is used up.
    next_id: Option<i64>,
}

impl NoteManager {
    /// Builds a manager from previously loaded notes.
    ///
    /// `None` entries and entries repeating an already accepted id are
    /// dropped; the first occurrence wins and relative order is kept. The id
    /// counter starts after the largest loaded id.
    pub(crate) fn from_notes<I, T>(initial: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Option<Note>>,
    {
        let mut seen = HashSet::new();
        let mut dropped = 0usize;
        let mut notes = Vec::new();
        for candidate in initial {
            let candidate: Option<Note> = candidate.into();
            match candidate {
                Some(note) if seen.insert(note.id()) => notes.push(note),
                _ => dropped += 1,
            }
        }

        let next_id = notes
            .iter()
            .map(|note| note.id().get())
            .max()
            .map_or(Some(0), |max| max.checked_add(1).map(|next| next.max(0)));

        info!(
            "event=manager_init module=manager status=ok loaded={} dropped={} next_id={}",
            notes.len(),
            dropped,
            next_id.map_or_else(|| "exhausted".to_string(), |next| next.to_string())
        );

        Self { notes, next_id }
    }

    /// Creates a note from raw text.
    ///
    /// Returns `None` when `text` is blank after trimming, or when no unused
    /// id is left.
    pub fn create_note(&mut self, text: &str) -> Option<Note> {
        let Some(normalized) = normalize_text(text) else {
            debug!("event=note_create module=manager status=rejected reason=blank_text");
            return None;
        };
        let Some(id) = self.allocate_id() else {
            warn!("event=note_create module=manager status=rejected reason=id_space_exhausted");
            return None;
        };

        let note = Note::new(id, normalized);
        self.notes.push(note.clone());
        debug!(
            "event=note_create module=manager status=ok id={} total={}",
            note.id(),
            self.notes.len()
        );
        Some(note)
    }

    /// Creates a note from an editor payload.
    ///
    /// The draft id is ignored; a fresh id is assigned. Returns `None` when
    /// the draft has no text or blank text.
    pub fn create_note_from(&mut self, candidate: &NoteDraft) -> Option<Note> {
        match candidate.text.as_deref() {
            Some(text) => self.create_note(text),
            None => {
                debug!("event=note_create module=manager status=rejected reason=missing_text");
                None
            }
        }
    }

    /// Replaces the text of the note with `id`.
    ///
    /// Returns `None` when no such note exists or `text` is blank.
    pub fn update_note(&mut self, id: impl NoteKey, text: &str) -> Option<Note> {
        let Some(index) = self.position(&id) else {
            debug!("event=note_update module=manager status=rejected reason=not_found");
            return None;
        };
        let Some(normalized) = normalize_text(text) else {
            debug!("event=note_update module=manager status=rejected reason=blank_text");
            return None;
        };

        let note = &mut self.notes[index];
        note.text = normalized;
        debug!(
            "event=note_update module=manager status=ok id={} position={}",
            note.id(),
            index
        );
        Some(note.clone())
    }

    /// Replaces the text of the note named by `old` with `new`'s text.
    ///
    /// Returns `None` when `old` matches nothing, `new` is absent, or the new
    /// text is missing or blank.
    pub fn update_note_with(&mut self, old: impl NoteKey, new: Option<&NoteDraft>) -> Option<Note> {
        let text = new.and_then(|draft| draft.text.as_deref());
        match text {
            Some(text) => self.update_note(old, text),
            None => {
                debug!("event=note_update module=manager status=rejected reason=missing_text");
                None
            }
        }
    }

    /// Removes the note named by `key`. Returns whether anything was removed.
    pub fn delete_note(&mut self, key: impl NoteKey) -> bool {
        match self.position(&key) {
            Some(index) => {
                let removed = self.notes.remove(index);
                debug!(
                    "event=note_delete module=manager status=ok id={} total={}",
                    removed.id(),
                    self.notes.len()
                );
                true
            }
            None => {
                debug!("event=note_delete module=manager status=rejected reason=not_found");
                false
            }
        }
    }

    /// Live read-only view of the collection in creation order.
    ///
    /// The borrow cannot be held across a mutation; take `to_vec()` for a
    /// snapshot that outlives one.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Looks up a single note.
    pub fn get_note(&self, key: impl NoteKey) -> Option<&Note> {
        self.position(&key).map(|index| &self.notes[index])
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Id the next successful creation will receive, if any is left.
    pub fn next_id(&self) -> Option<NoteId> {
        self.next_id.map(NoteId::new)
    }

    fn allocate_id(&mut self) -> Option<NoteId> {
        let current = self.next_id?;
        self.next_id = current.checked_add(1);
        Some(NoteId::new(current))
    }

    fn position(&self, key: &impl NoteKey) -> Option<usize> {
        let id = key.note_id()?;
        self.notes.iter().position(|note| note.id() == id)
    }
}

/// Holder that initializes its manager at most once.
///
/// Owned by the process composition point and lent out by reference.
#[derive(Debug, Default)]
pub struct NoteManagerCell {
    manager: Option<NoteManager>,
}

impl NoteManagerCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the manager, building it from `initial` on the first call.
    ///
    /// Later calls ignore `initial` and return the existing manager unchanged.
    pub fn initialize<I, T>(&mut self, initial: I) -> &mut NoteManager
    where
        I: IntoIterator<Item = T>,
        T: Into<Option<Note>>,
    {
        if self.manager.is_some() {
            debug!("event=manager_init module=manager status=skipped reason=already_initialized");
        }
        self.manager
            .get_or_insert_with(|| NoteManager::from_notes(initial))
    }

    pub fn get(&self) -> Option<&NoteManager> {
        self.manager.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.manager.is_some()
    }
}

/// Trims `text` and uppercases its first character.
///
/// Returns `None` when nothing is left after trimming.
pub fn normalize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    let mut normalized = String::with_capacity(trimmed.len());
    normalized.extend(first.to_uppercase());
    normalized.push_str(chars.as_str());
    Some(normalized)
}

#[cfg(test)]
mod tests {
    use super::{normalize_text, NoteManager, NoteManagerCell};
    use crate::codec::decode;
    use crate::model::note::{Note, NoteDraft, NoteId};

    #[test]
    fn normalize_trims_and_capitalizes_first_char_only() {
        assert_eq!(normalize_text("  hello world ").as_deref(), Some("Hello world"));
        assert_eq!(normalize_text("already Capital").as_deref(), Some("Already Capital"));
        assert_eq!(normalize_text("ßtraße").as_deref(), Some("SStraße"));
        assert_eq!(normalize_text("1st item").as_deref(), Some("1st item"));
    }

    #[test]
    fn normalize_rejects_blank_input() {
        assert_eq!(normalize_text(""), None);
        assert_eq!(normalize_text(" \t\n "), None);
    }

    #[test]
    fn counter_resumes_after_largest_loaded_id() {
        let mut manager = NoteManager::from_notes(vec![Note::new(7, "A"), Note::new(3, "B")]);
        let created = manager.create_note("c").unwrap();
        assert_eq!(created.id().get(), 8);
    }

    #[test]
    fn counter_ignores_unassigned_loaded_ids() {
        let mut manager = NoteManager::from_notes(vec![Note::new(-1, "A")]);
        assert_eq!(manager.next_id().map(NoteId::get), Some(0));
        assert_eq!(manager.create_note("b").unwrap().id().get(), 0);
    }

    #[test]
    fn failed_creation_does_not_consume_an_id() {
        let mut manager = NoteManager::from_notes(Vec::<Note>::new());
        assert!(manager.create_note("   ").is_none());
        assert!(manager.create_note_from(&NoteDraft::for_note(0, None)).is_none());
        assert_eq!(manager.create_note("x").unwrap().id().get(), 0);
    }

    #[test]
    fn max_loaded_id_exhausts_the_counter_without_reuse() {
        let loaded =
            decode(r#"{"version":1,"notes":[{"id":9223372036854775807,"text":"Max"}]}"#).unwrap();
        let mut manager = NoteManager::from_notes(loaded);

        assert_eq!(manager.next_id(), None);
        assert!(manager.create_note("new").is_none());
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.notes()[0].id().get(), i64::MAX);
    }

    #[test]
    fn last_id_is_handed_out_once() {
        let mut manager = NoteManager::from_notes(vec![Note::new(i64::MAX - 1, "A")]);

        let last = manager.create_note("last").unwrap();
        assert_eq!(last.id().get(), i64::MAX);
        assert!(manager.create_note("overflow").is_none());
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn cell_builds_once() {
        let mut cell = NoteManagerCell::new();
        assert!(!cell.is_initialized());
        cell.initialize(vec![Note::new(1, "A")]);
        let manager = cell.initialize(vec![Note::new(2, "B"), Note::new(3, "C")]);
        assert_eq!(manager.notes(), &[Note::new(1, "A")]);
        assert!(cell.is_initialized());
    }
}
