//! Filter and sort selectors for the visible note list.

use crate::domain::{Note, Tag};
use std::fmt;
use std::str::FromStr;

/// Named predicate selecting which notes are shown.
///
/// Every filter except [`Filter::Trash`] excludes trashed notes.
///
/// Parsed from `all`, `favorites`, `untagged`, `trash`, or `tag:<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Favorites,
    Untagged,
    Trash,
    Tag(Tag),
}

impl Filter {
    /// Returns true if the note belongs to this filter's base set.
    pub fn matches(&self, note: &Note) -> bool {
        match self {
            Filter::Trash => note.in_trash(),
            _ if note.in_trash() => false,
            Filter::All => true,
            Filter::Favorites => note.favorite(),
            Filter::Untagged => note.tags().is_empty(),
            Filter::Tag(tag) => note.has_tag(tag),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => write!(f, "all"),
            Filter::Favorites => write!(f, "favorites"),
            Filter::Untagged => write!(f, "untagged"),
            Filter::Trash => write!(f, "trash"),
            Filter::Tag(tag) => write!(f, "tag:{}", tag),
        }
    }
}

/// Error returned when parsing an unknown filter, sort key or sort order.
#[derive(Debug, Clone)]
pub struct ParseViewError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl fmt::Display for ParseViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid {} '{}': expected {}",
            self.kind, self.value, self.expected
        )
    }
}

impl std::error::Error for ParseViewError {}

impl FromStr for Filter {
    type Err = ParseViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || ParseViewError {
            kind: "filter",
            value: s.to_string(),
            expected: "all, favorites, untagged, trash or tag:<name>",
        };

        if let Some((prefix, name)) = trimmed.split_once(':')
            && prefix.eq_ignore_ascii_case("tag")
        {
            return Tag::new(name).map(Filter::Tag).map_err(|_| err());
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "favorites" | "favorite" | "fav" => Ok(Filter::Favorites),
            "untagged" => Ok(Filter::Untagged),
            "trash" => Ok(Filter::Trash),
            _ => Err(err()),
        }
    }
}

/// Field the visible list is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Title,
    CreatedAt,
    ModifiedAt,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortKey::Title => "title",
            SortKey::CreatedAt => "created",
            SortKey::ModifiedAt => "modified",
        };
        f.write_str(s)
    }
}

impl FromStr for SortKey {
    type Err = ParseViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(SortKey::Title),
            "created" | "createdat" | "datecreated" => Ok(SortKey::CreatedAt),
            "modified" | "modifiedat" | "datemodified" => Ok(SortKey::ModifiedAt),
            _ => Err(ParseViewError {
                kind: "sort key",
                value: s.to_string(),
                expected: "title, created or modified",
            }),
        }
    }
}

/// Direction of the visible-list sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// Returns the opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascending => f.write_str("asc"),
            SortOrder::Descending => f.write_str("desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = ParseViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            _ => Err(ParseViewError {
                kind: "sort order",
                value: s.to_string(),
                expected: "asc or desc",
            }),
        }
    }
}
