//! Derived counts over the canonical note list.

use crate::domain::{Note, Tag};
use serde::Serialize;

/// A tag with the number of active notes carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagWithCount {
    tag: Tag,
    count: usize,
}

impl TagWithCount {
    /// Creates a new TagWithCount.
    pub fn new(tag: Tag, count: usize) -> Self {
        Self { tag, count }
    }

    /// Returns the tag.
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Returns the count of active notes with this tag.
    pub fn count(&self) -> usize {
        self.count
    }
}

/// Sidebar counts and the global tag list.
///
/// Always computed from the note list, never mutated directly. Trashed notes
/// count only towards `trash_count`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NoteCounts {
    note_count: usize,
    favorite_count: usize,
    untagged_count: usize,
    trash_count: usize,
    tags: Vec<TagWithCount>,
}

impl NoteCounts {
    /// Computes counts from a note list.
    ///
    /// Tags are listed in order of first appearance among active notes.
    pub fn from_notes(notes: &[Note]) -> Self {
        let mut counts = Self::default();

        for note in notes {
            if note.in_trash() {
                counts.trash_count += 1;
                continue;
            }

            counts.note_count += 1;
            if note.favorite() {
                counts.favorite_count += 1;
            }
            if note.tags().is_empty() {
                counts.untagged_count += 1;
            }

            // A note listing a tag twice still counts once.
            for (i, tag) in note.tags().iter().enumerate() {
                if note.tags()[..i].contains(tag) {
                    continue;
                }
                match counts.tags.iter_mut().find(|t| &t.tag == tag) {
                    Some(entry) => entry.count += 1,
                    None => counts.tags.push(TagWithCount::new(tag.clone(), 1)),
                }
            }
        }

        counts
    }

    /// Number of active notes.
    pub fn note_count(&self) -> usize {
        self.note_count
    }

    /// Number of active favorite notes.
    pub fn favorite_count(&self) -> usize {
        self.favorite_count
    }

    /// Number of active notes without tags.
    pub fn untagged_count(&self) -> usize {
        self.untagged_count
    }

    /// Number of trashed notes.
    pub fn trash_count(&self) -> usize {
        self.trash_count
    }

    /// Number of distinct tags across active notes.
    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// Distinct tags across active notes with usage counts.
    pub fn tags(&self) -> &[TagWithCount] {
        &self.tags
    }

    /// Returns true if any active note carries `tag`.
    pub fn contains_tag(&self, tag: &Tag) -> bool {
        self.tags.iter().any(|t| &t.tag == tag)
    }
}
