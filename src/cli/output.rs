//! Output format types for CLI commands.

use clap::ValueEnum;
use serde::Serialize;

use crate::domain::Note;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for programmatic consumption
    Json,
    /// Plain note ids, one per line
    Ids,
}

/// Wrapper for serializable command output.
#[derive(Debug, Serialize)]
pub struct Output<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> Output<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// A single note in listing output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteListing {
    pub id: String,
    pub title: String,
    pub tags: Vec<String>,
    pub favorite: bool,
    pub pinned: bool,
    pub in_trash: bool,
    pub modified_at: String,
}

impl From<&Note> for NoteListing {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id().to_string(),
            title: note.title().to_string(),
            tags: note.tags().iter().map(|t| t.to_string()).collect(),
            favorite: note.favorite(),
            pinned: note.pinned(),
            in_trash: note.in_trash(),
            modified_at: note.modified_at().to_rfc3339(),
        }
    }
}

/// A single note with its text, as shown by `show`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDetail {
    #[serde(flatten)]
    pub listing: NoteListing,
    pub content: String,
    pub attachments: Vec<String>,
    pub created_at: String,
    /// True when the title or content shown comes from an unsaved draft.
    pub draft: bool,
}

/// A tag with optional count.
#[derive(Debug, Serialize)]
pub struct TagListing {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

/// Status markers shown before a note title: pinned, favorite, trashed.
pub fn flags(note: &Note) -> String {
    let mut s = String::with_capacity(3);
    s.push(if note.pinned() { 'P' } else { ' ' });
    s.push(if note.favorite() { '*' } else { ' ' });
    s.push(if note.in_trash() { 'T' } else { ' ' });
    s
}

/// Truncates a string to a maximum display width, adding ellipsis if needed.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NoteId, Tag};
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn flags_mark_status() {
        let now = Utc::now();
        let note = Note::builder(NoteId::from(1), "n", now, now)
            .favorite(true)
            .pinned(true)
            .build();
        assert_eq!(flags(&note), "P* ");
    }

    #[test]
    fn listing_uses_camel_case() {
        let now = Utc::now();
        let note = Note::builder(NoteId::from(4), "n", now, now)
            .tags(vec![Tag::new("work").unwrap()])
            .in_trash(true)
            .build();
        let value = serde_json::to_value(NoteListing::from(&note)).unwrap();
        assert_eq!(value["inTrash"], serde_json::json!(true));
        assert_eq!(value["tags"], serde_json::json!(["work"]));
        assert_eq!(value["id"], serde_json::json!("4"));
    }
}
