//! Note domain model.
//!
//! # Responsibility
//! - Define the note value object and its identity rules.
//! - Define transient payloads callers use to address or edit notes.
//!
//! # Invariants
//! - A note is identified by its `NoteId` alone.
//! - Manager-assigned ids are never negative.

pub mod note;
