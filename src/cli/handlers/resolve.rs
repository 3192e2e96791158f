//! Note resolution utilities.

use anyhow::{Result, bail};

use crate::domain::Note;

/// Result of resolving a note identifier.
#[derive(Debug)]
pub enum ResolveResult {
    /// Exactly one note matched.
    Unique(Note),
    /// Multiple notes matched (ambiguous).
    Ambiguous(Vec<Note>),
    /// No notes matched.
    NotFound,
}

/// Minimum length before an identifier is tried as an id prefix.
const MIN_PREFIX_LEN: usize = 4;

/// Prints detailed information about ambiguous notes to help distinguish them.
pub(crate) fn print_ambiguous_notes(identifier: &str, notes: &[Note]) {
    eprintln!("Ambiguous: '{}' matches {} notes:", identifier, notes.len());
    for note in notes {
        eprintln!("  {} - {}", note.id().prefix(), note.title());

        if !note.tags().is_empty() {
            let tags: Vec<_> = note.tags().iter().map(|t| t.as_str()).collect();
            eprintln!("      tags: {}", tags.join(", "));
        }
        if note.in_trash() {
            eprintln!("      (in trash)");
        }
    }
    eprintln!();
    eprintln!("Use the note ID to specify which note you mean.");
}

/// Resolves a note identifier against the store's notes.
///
/// Resolution order:
/// 1. Exact ID match
/// 2. ID prefix match (identifiers of four or more characters)
/// 3. Exact title match
/// 4. Case-insensitive title match, only when nothing above matched
///
/// An exact ID wins outright; every other method pools its candidates.
pub fn resolve_note(notes: &[Note], identifier: &str) -> ResolveResult {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return ResolveResult::NotFound;
    }

    if let Some(note) = notes.iter().find(|n| n.id().as_str() == identifier) {
        return ResolveResult::Unique(note.clone());
    }

    let mut candidates: Vec<&Note> = Vec::new();

    if identifier.chars().count() >= MIN_PREFIX_LEN {
        candidates.extend(notes.iter().filter(|n| n.id().as_str().starts_with(identifier)));
    }

    candidates.extend(notes.iter().filter(|n| n.title() == identifier));

    if candidates.is_empty() {
        let lowered = identifier.to_lowercase();
        candidates.extend(notes.iter().filter(|n| n.title().to_lowercase() == lowered));
    }

    // Deduplicate by ID, keeping list order
    let mut unique: Vec<Note> = Vec::with_capacity(candidates.len());
    for note in candidates {
        if !unique.iter().any(|n| n.id() == note.id()) {
            unique.push(note.clone());
        }
    }

    match unique.len() {
        0 => ResolveResult::NotFound,
        1 => ResolveResult::Unique(unique.remove(0)),
        _ => ResolveResult::Ambiguous(unique),
    }
}

/// Resolves `identifier` to exactly one note or fails with a message.
pub(crate) fn require_note(notes: &[Note], identifier: &str) -> Result<Note> {
    match resolve_note(notes, identifier) {
        ResolveResult::Unique(note) => Ok(note),
        ResolveResult::Ambiguous(matches) => {
            print_ambiguous_notes(identifier, &matches);
            bail!("ambiguous note identifier");
        }
        ResolveResult::NotFound => bail!("note not found: '{}'", identifier),
    }
}
