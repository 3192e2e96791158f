//! Builder for test notes with sensible defaults.

// Allow dead code since this is a test utility with methods for future tests
#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use memo::domain::{Note, NoteId, Tag};

fn base_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// Builder for creating test notes with sensible defaults.
///
/// Timestamps default to a fixed instant so orderings are deterministic.
#[derive(Debug)]
pub struct TestNote {
    id: NoteId,
    title: String,
    content: String,
    tags: Vec<Tag>,
    attachments: Vec<String>,
    favorite: bool,
    pinned: bool,
    in_trash: bool,
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
}

impl TestNote {
    /// Creates a new test note with the given id and title.
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id: NoteId::from(id),
            title: title.into(),
            content: String::new(),
            tags: Vec::new(),
            attachments: Vec::new(),
            favorite: false,
            pinned: false,
            in_trash: false,
            created: base_time(),
            modified: base_time(),
        }
    }

    /// Sets the content.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Adds a tag to the note.
    pub fn tag(mut self, tag: impl AsRef<str>) -> Self {
        self.tags.push(Tag::new(tag.as_ref()).expect("Invalid tag"));
        self
    }

    /// Adds an attachment reference.
    pub fn attachment(mut self, attachment: impl Into<String>) -> Self {
        self.attachments.push(attachment.into());
        self
    }

    pub fn favorite(mut self) -> Self {
        self.favorite = true;
        self
    }

    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }

    pub fn trashed(mut self) -> Self {
        self.in_trash = true;
        self
    }

    /// Moves the modification time `minutes` past the base instant.
    pub fn modified_after(mut self, minutes: i64) -> Self {
        self.modified = base_time() + Duration::minutes(minutes);
        self
    }

    /// Returns the note id as a string.
    pub fn id(&self) -> String {
        self.id.to_string()
    }

    /// Converts to a domain Note.
    pub fn to_note(&self) -> Note {
        Note::builder(self.id.clone(), &self.title, self.created, self.modified)
            .content(&self.content)
            .tags(self.tags.clone())
            .attachments(self.attachments.clone())
            .favorite(self.favorite)
            .pinned(self.pinned)
            .in_trash(self.in_trash)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_defaults() {
        let note = TestNote::new(1, "Plain").to_note();
        assert_eq!(note.id().as_str(), "1");
        assert_eq!(note.title(), "Plain");
        assert!(note.tags().is_empty());
        assert!(!note.favorite() && !note.pinned() && !note.in_trash());
    }

    #[test]
    fn test_note_builder_fields() {
        let note = TestNote::new(2, "Full")
            .content("body")
            .tag("work")
            .attachment("plan.pdf")
            .favorite()
            .trashed()
            .modified_after(5)
            .to_note();
        assert_eq!(note.content(), "body");
        assert_eq!(note.tags()[0].as_str(), "work");
        assert_eq!(note.attachments(), ["plan.pdf"]);
        assert!(note.favorite() && note.in_trash());
        assert!(note.modified_at() > note.created_at());
    }
}
