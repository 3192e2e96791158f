//! Validated payload for creating a note.

use crate::domain::{Note, NoteId, Tag};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// The kind of error that occurred when validating a new note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseNoteErrorKind {
    EmptyTitle,
}

/// Error returned when a new note fails validation.
#[derive(Debug, Clone)]
pub struct ParseNoteError {
    kind: ParseNoteErrorKind,
}

impl fmt::Display for ParseNoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ParseNoteErrorKind::EmptyTitle => write!(f, "invalid note: title cannot be empty"),
        }
    }
}

impl std::error::Error for ParseNoteError {}

/// Validates a title, returning the trimmed form.
pub fn validate_title(title: &str) -> Result<&str, ParseNoteError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ParseNoteError {
            kind: ParseNoteErrorKind::EmptyTitle,
        });
    }
    Ok(trimmed)
}

/// The fields sent to the remote service when creating a note.
///
/// Construction validates the title, so a `NoteDraft` can always be
/// submitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteDraft {
    title: String,
    content: String,
    tags: Vec<Tag>,
}

impl NoteDraft {
    /// Creates a draft with the given title.
    ///
    /// # Errors
    ///
    /// Returns `ParseNoteError` if the title is empty or whitespace-only.
    pub fn new(title: &str) -> Result<Self, ParseNoteError> {
        Ok(Self {
            title: validate_title(title)?.to_string(),
            content: String::new(),
            tags: Vec::new(),
        })
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Sets the tags; duplicates are dropped.
    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        let mut unique = Vec::with_capacity(tags.len());
        for tag in tags {
            if !unique.contains(&tag) {
                unique.push(tag);
            }
        }
        self.tags = unique;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Builds the client-side placeholder shown before the server answers.
    pub fn to_placeholder(&self, now: DateTime<Utc>) -> Note {
        Note::builder(NoteId::from_datetime(now), &self.title, now, now)
            .content(&self.content)
            .tags(self.tags.clone())
            .build()
    }
}
