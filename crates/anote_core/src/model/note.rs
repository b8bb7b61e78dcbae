//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record held by the manager.
//! - Define transient lookup/update payloads used by callers.
//!
//! # Invariants
//! - Negative ids collapse to `NoteId::UNASSIGNED` at construction.
//! - Note equality, hashing and ordering use the id only; text is ignored.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// Stable numeric identifier of a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub struct NoteId(i64);

impl NoteId {
    /// Sentinel for "no id assigned yet".
    pub const UNASSIGNED: NoteId = NoteId(-1);

    /// Builds an id, folding every negative value into `UNASSIGNED`.
    pub fn new(raw: i64) -> Self {
        if raw < 0 {
            Self::UNASSIGNED
        } else {
            Self(raw)
        }
    }

    pub fn get(self) -> i64 {
        self.0
    }

    pub fn is_assigned(self) -> bool {
        self.0 >= 0
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::UNASSIGNED
    }
}

impl From<i64> for NoteId {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<i32> for NoteId {
    fn from(value: i32) -> Self {
        Self::new(i64::from(value))
    }
}

impl From<NoteId> for i64 {
    fn from(value: NoteId) -> Self {
        value.0
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical note record.
///
/// Instances inside the manager collection always carry normalized,
/// non-empty text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// Immutable after construction.
    id: NoteId,
    /// User-visible body.
    pub text: String,
}

impl Note {
    /// Creates a note with the given id and body.
    pub fn new(id: impl Into<NoteId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }

    pub fn id(&self) -> NoteId {
        self.id
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }
}

impl PartialEq for Note {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Note {}

impl Hash for Note {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Note {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Note {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Display for Note {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Transient payload handed back by an editor.
///
/// Never inserted into the collection directly; the manager copies the text
/// into a note it constructs itself.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NoteDraft {
    /// Id of the note being edited, or `UNASSIGNED` for a new one.
    pub id: NoteId,
    /// Edited body. `None` when the editor produced no text at all.
    pub text: Option<String>,
}

impl NoteDraft {
    /// Draft for a note that does not exist yet.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: NoteId::UNASSIGNED,
            text: Some(text.into()),
        }
    }

    /// Draft that edits the note identified by `id`.
    pub fn for_note(id: impl Into<NoteId>, text: Option<String>) -> Self {
        Self {
            id: id.into(),
            text,
        }
    }
}

impl From<&Note> for NoteDraft {
    fn from(value: &Note) -> Self {
        Self {
            id: value.id,
            text: Some(value.text.clone()),
        }
    }
}

/// Anything that can name a note for lookup.
///
/// `None` is the "no argument" case: lookups through it never match.
pub trait NoteKey {
    fn note_id(&self) -> Option<NoteId>;
}

impl NoteKey for NoteId {
    fn note_id(&self) -> Option<NoteId> {
        Some(*self)
    }
}

impl NoteKey for i64 {
    fn note_id(&self) -> Option<NoteId> {
        Some(NoteId::new(*self))
    }
}

impl NoteKey for i32 {
    fn note_id(&self) -> Option<NoteId> {
        Some(NoteId::new(i64::from(*self)))
    }
}

impl NoteKey for Note {
    fn note_id(&self) -> Option<NoteId> {
        Some(self.id)
    }
}

impl NoteKey for NoteDraft {
    fn note_id(&self) -> Option<NoteId> {
        Some(self.id)
    }
}

impl<T: NoteKey + ?Sized> NoteKey for &T {
    fn note_id(&self) -> Option<NoteId> {
        (**self).note_id()
    }
}

impl<T: NoteKey> NoteKey for Option<T> {
    fn note_id(&self) -> Option<NoteId> {
        self.as_ref().and_then(NoteKey::note_id)
    }
}
