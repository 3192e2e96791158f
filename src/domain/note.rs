//! Note record: text content plus tags, attachments and status flags.

use crate::domain::{NoteId, Tag};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A note as held in the store, mirrored to the local cache, and exchanged
/// with the remote service.
///
/// # Fields
/// - `id`: unique identifier (placeholder or server-assigned)
/// - `title`, `content`: mutable text; content is markdown-flavored
/// - `tags`: labels, unique per note, in display order
/// - `attachments`: opaque attachment references (filenames or ids)
/// - `favorite`, `pinned`, `in_trash`: independent status flags
/// - `created_at`, `modified_at`: timestamps; `modified_at` moves on every
///   title, content, tag or attachment change
///
/// # Examples
///
/// ```
/// use memo::domain::{Note, NoteId};
/// use chrono::Utc;
///
/// let now = Utc::now();
/// let note = Note::new(NoteId::from(1), "Groceries", now, now);
/// assert_eq!(note.title(), "Groceries");
/// assert!(!note.in_trash());
/// ```
#[derive(Clone, PartialEq)]
pub struct Note {
    id: NoteId,
    title: String,
    content: String,
    tags: Vec<Tag>,
    attachments: Vec<String>,
    favorite: bool,
    pinned: bool,
    in_trash: bool,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

impl Note {
    /// Creates a new note with empty content and no flags set.
    pub fn new(
        id: NoteId,
        title: impl Into<String>,
        created_at: DateTime<Utc>,
        modified_at: DateTime<Utc>,
    ) -> Self {
        Self::builder(id, title, created_at, modified_at).build()
    }

    /// Creates a builder for constructing a Note with optional fields.
    pub fn builder(
        id: NoteId,
        title: impl Into<String>,
        created_at: DateTime<Utc>,
        modified_at: DateTime<Utc>,
    ) -> NoteBuilder {
        NoteBuilder::new(id, title, created_at, modified_at)
    }

    /// Returns the note's identifier.
    pub fn id(&self) -> &NoteId {
        &self.id
    }

    /// Returns the note's title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the note's content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the note's tags.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Returns true if the note carries the given tag.
    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    /// Returns the note's attachment references.
    pub fn attachments(&self) -> &[String] {
        &self.attachments
    }

    /// Returns true if the note has the given attachment.
    pub fn has_attachment(&self, attachment: &str) -> bool {
        self.attachments.iter().any(|a| a == attachment)
    }

    pub fn favorite(&self) -> bool {
        self.favorite
    }

    pub fn pinned(&self) -> bool {
        self.pinned
    }

    pub fn in_trash(&self) -> bool {
        self.in_trash
    }

    /// Returns true if the note is not in the trash.
    pub fn is_active(&self) -> bool {
        !self.in_trash
    }

    /// Returns when the note was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the note was last modified.
    pub fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    // ===========================================
    // Mutation (store-internal)
    // ===========================================

    pub(crate) fn set_title(&mut self, title: impl Into<String>, now: DateTime<Utc>) {
        self.title = title.into();
        self.touch(now);
    }

    pub(crate) fn set_content(&mut self, content: impl Into<String>, now: DateTime<Utc>) {
        self.content = content.into();
        self.touch(now);
    }

    /// Appends a tag without checking for duplicates.
    pub(crate) fn push_tag(&mut self, tag: Tag, now: DateTime<Utc>) {
        self.tags.push(tag);
        self.touch(now);
    }

    /// Removes every occurrence of `tag`. Returns true if anything was removed.
    pub(crate) fn remove_tag(&mut self, tag: &Tag, now: DateTime<Utc>) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        let removed = self.tags.len() != before;
        if removed {
            self.touch(now);
        }
        removed
    }

    pub(crate) fn push_attachment(&mut self, attachment: impl Into<String>, now: DateTime<Utc>) {
        self.attachments.push(attachment.into());
        self.touch(now);
    }

    pub(crate) fn remove_attachment(&mut self, attachment: &str, now: DateTime<Utc>) -> bool {
        let before = self.attachments.len();
        self.attachments.retain(|a| a != attachment);
        let removed = self.attachments.len() != before;
        if removed {
            self.touch(now);
        }
        removed
    }

    pub(crate) fn set_favorite(&mut self, favorite: bool) {
        self.favorite = favorite;
    }

    pub(crate) fn set_pinned(&mut self, pinned: bool) {
        self.pinned = pinned;
    }

    pub(crate) fn set_in_trash(&mut self, in_trash: bool) {
        self.in_trash = in_trash;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        // Never move backwards if the clock is behind the server's.
        if now > self.modified_at {
            self.modified_at = now;
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.title, self.id.prefix())
    }
}

impl fmt::Debug for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Note")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("tags", &self.tags)
            .field("attachments", &self.attachments)
            .field("favorite", &self.favorite)
            .field("pinned", &self.pinned)
            .field("in_trash", &self.in_trash)
            .field("created_at", &self.created_at)
            .field("modified_at", &self.modified_at)
            .finish_non_exhaustive()
    }
}

/// Builder for constructing a Note with optional fields.
pub struct NoteBuilder {
    id: NoteId,
    title: String,
    content: String,
    tags: Vec<Tag>,
    attachments: Vec<String>,
    favorite: bool,
    pinned: bool,
    in_trash: bool,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

impl NoteBuilder {
    fn new(
        id: NoteId,
        title: impl Into<String>,
        created_at: DateTime<Utc>,
        modified_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            content: String::new(),
            tags: Vec::new(),
            attachments: Vec::new(),
            favorite: false,
            pinned: false,
            in_trash: false,
            created_at,
            modified_at,
        }
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Sets the note's tags.
    ///
    /// Duplicates are removed (first occurrence kept).
    pub fn tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = deduplicate(tags);
        self
    }

    /// Sets the note's attachments.
    ///
    /// Duplicates are removed (first occurrence kept).
    pub fn attachments(mut self, attachments: Vec<String>) -> Self {
        self.attachments = deduplicate(attachments);
        self
    }

    pub fn favorite(mut self, favorite: bool) -> Self {
        self.favorite = favorite;
        self
    }

    pub fn pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }

    pub fn in_trash(mut self, in_trash: bool) -> Self {
        self.in_trash = in_trash;
        self
    }

    /// Builds the Note.
    pub fn build(self) -> Note {
        Note {
            id: self.id,
            title: self.title,
            content: self.content,
            tags: self.tags,
            attachments: self.attachments,
            favorite: self.favorite,
            pinned: self.pinned,
            in_trash: self.in_trash,
            created_at: self.created_at,
            modified_at: self.modified_at,
        }
    }
}

/// Removes duplicates by equality, keeping the first occurrence.
fn deduplicate<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut seen = Vec::with_capacity(items.len());
    for item in items {
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    seen
}

impl Serialize for Note {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut s = serializer.serialize_struct("Note", 10)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("title", &self.title)?;
        s.serialize_field("content", &self.content)?;
        s.serialize_field("tags", &self.tags)?;
        s.serialize_field("attachments", &self.attachments)?;
        s.serialize_field("favorite", &self.favorite)?;
        s.serialize_field("pinned", &self.pinned)?;
        s.serialize_field("inTrash", &self.in_trash)?;
        s.serialize_field("createdAt", &self.created_at)?;
        s.serialize_field("modifiedAt", &self.modified_at)?;
        s.end()
    }
}

/// A list of strings that may arrive as a JSON array, a string holding a
/// JSON-encoded array, or null.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseList {
    List(Vec<String>),
    Encoded(String),
}

fn deserialize_loose_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<LooseList>::deserialize(deserializer)?;
    Ok(match raw {
        None => Vec::new(),
        Some(LooseList::List(items)) => items,
        Some(LooseList::Encoded(s)) if s.trim().is_empty() => Vec::new(),
        Some(LooseList::Encoded(s)) => serde_json::from_str(&s).unwrap_or_else(|err| {
            tracing::debug!(%err, "discarding undecodable encoded list");
            Vec::new()
        }),
    })
}

impl<'de> Deserialize<'de> for Note {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct NoteHelper {
            id: NoteId,
            #[serde(default)]
            title: String,
            #[serde(default)]
            content: Option<String>,
            #[serde(default, deserialize_with = "deserialize_loose_list")]
            tags: Vec<String>,
            #[serde(default, deserialize_with = "deserialize_loose_list")]
            attachments: Vec<String>,
            #[serde(default)]
            favorite: Option<bool>,
            #[serde(default)]
            pinned: Option<bool>,
            #[serde(default)]
            in_trash: Option<bool>,
            #[serde(default)]
            created_at: Option<DateTime<Utc>>,
            #[serde(default)]
            modified_at: Option<DateTime<Utc>>,
        }

        let helper = NoteHelper::deserialize(deserializer)?;

        // Missing timestamps fall back to each other, then to the epoch, so
        // the same payload always yields the same note.
        let created_at = helper
            .created_at
            .or(helper.modified_at)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        let modified_at = helper.modified_at.unwrap_or(created_at);

        // Blank tags carry no meaning; drop them rather than reject the note.
        let tags = helper
            .tags
            .iter()
            .filter_map(|s| Tag::new(s).ok())
            .collect();

        Ok(
            Note::builder(helper.id, helper.title, created_at, modified_at)
                .content(helper.content.unwrap_or_default())
                .tags(tags)
                .attachments(helper.attachments)
                .favorite(helper.favorite.unwrap_or(false))
                .pinned(helper.pinned.unwrap_or(false))
                .in_trash(helper.in_trash.unwrap_or(false))
                .build(),
        )
    }
}
