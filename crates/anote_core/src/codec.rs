//! Snapshot codec for the note collection.
//!
//! # Responsibility
//! - Encode an ordered note sequence into one opaque string.
//! - Decode that string back, rejecting corrupted or foreign input.
//!
//! # Invariants
//! - `decode(encode(notes))` preserves ids, text and order.
//! - Unknown envelope versions are rejected instead of guessed at.

use crate::model::note::Note;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Envelope version written by this build.
pub const SNAPSHOT_VERSION: u32 = 1;

pub type CodecResult<T> = Result<T, CodecError>;

/// Encode/decode failure.
#[derive(Debug)]
pub enum CodecError {
    /// Input is not valid JSON or does not have the snapshot shape.
    Json(serde_json::Error),
    /// Snapshot was written by a newer or unknown format version.
    UnsupportedVersion { found: u32, supported: u32 },
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed note snapshot: {err}"),
            Self::UnsupportedVersion { found, supported } => write!(
                f,
                "note snapshot version {found} is not supported (expected {supported})"
            ),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::UnsupportedVersion { .. } => None,
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Serialize)]
struct SnapshotOut<'a> {
    version: u32,
    notes: &'a [Note],
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SnapshotIn {
    version: u32,
    notes: Vec<Option<Note>>,
}

/// Encodes notes into a snapshot string.
pub fn encode(notes: &[Note]) -> CodecResult<String> {
    let snapshot = SnapshotOut {
        version: SNAPSHOT_VERSION,
        notes,
    };
    Ok(serde_json::to_string(&snapshot)?)
}

/// Decodes a snapshot string.
///
/// `null` entries in the note array are skipped; duplicate ids are left for
/// the manager to filter.
pub fn decode(blob: &str) -> CodecResult<Vec<Note>> {
    let snapshot: SnapshotIn = serde_json::from_str(blob)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(CodecError::UnsupportedVersion {
            found: snapshot.version,
            supported: SNAPSHOT_VERSION,
        });
    }
    Ok(snapshot.notes.into_iter().flatten().collect())
}

/// Snapshot of an empty collection, used as the store default.
pub fn empty_blob() -> String {
    format!(r#"{{"version":{SNAPSHOT_VERSION},"notes":[]}}"#)
}

#[cfg(test)]
mod tests {
    use super::{decode, empty_blob, encode, CodecError};
    use crate::model::note::Note;

    #[test]
    fn empty_blob_matches_encoded_empty_sequence() {
        assert_eq!(encode(&[]).unwrap(), empty_blob());
        assert!(decode(&empty_blob()).unwrap().is_empty());
    }

    #[test]
    fn decode_preserves_text_and_order() {
        let notes = vec![
            Note::new(4, "Milk \"2%\"\nand eggs"),
            Note::new(0, "Æble"),
            Note::new(2, "Call mom"),
        ];
        let decoded = decode(&encode(&notes).unwrap()).unwrap();

        let pairs: Vec<(i64, &str)> = decoded
            .iter()
            .map(|note| (note.id().get(), note.text()))
            .collect();
        assert_eq!(
            pairs,
            vec![(4, "Milk \"2%\"\nand eggs"), (0, "Æble"), (2, "Call mom")]
        );
    }

    #[test]
    fn decode_skips_null_entries() {
        let blob = r#"{"version":1,"notes":[{"id":1,"text":"A"},null,{"id":2,"text":"B"}]}"#;
        let decoded = decode(blob).unwrap();
        assert_eq!(decoded, vec![Note::new(1, "A"), Note::new(2, "B")]);
    }

    #[test]
    fn decode_normalizes_negative_ids() {
        let decoded = decode(r#"{"version":1,"notes":[{"id":-9,"text":"A"}]}"#).unwrap();
        assert_eq!(decoded[0].id().get(), -1);
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = decode("aced0005737200").unwrap_err();
        assert!(matches!(err, CodecError::Json(_)));

        let err = decode(r#"{"notes":[]}"#).unwrap_err();
        assert!(matches!(err, CodecError::Json(_)));

        let err = decode(r#"[{"id":1,"text":"A"}]"#).unwrap_err();
        assert!(matches!(err, CodecError::Json(_)));
    }

    #[test]
    fn decode_rejects_unknown_version() {
        let err = decode(r#"{"version":7,"notes":[]}"#).unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnsupportedVersion {
                found: 7,
                supported: 1
            }
        ));
        assert!(err.to_string().contains("version 7"));
    }
}
