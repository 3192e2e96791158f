//! Note identifier accepting both client-generated and server-assigned forms.

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A unique identifier for a note.
///
/// Notes created locally get a placeholder id derived from the creation
/// timestamp in milliseconds. Once the remote service has accepted the note,
/// the server-assigned id replaces it. Both forms are opaque strings here.
///
/// On the wire the id may arrive as a JSON string or a JSON integer; it is
/// always serialized back as a string.
///
/// # Examples
///
/// ```
/// use memo::domain::NoteId;
///
/// let id: NoteId = "65f1c0a2e4b0".parse().unwrap();
/// assert_eq!(id.as_str(), "65f1c0a2e4b0");
/// assert_eq!(id.prefix(), "65f1c0a2");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(String);

/// Number of characters shown by [`NoteId::prefix`].
const PREFIX_LEN: usize = 8;

impl NoteId {
    /// Creates a client-side placeholder id from the current time.
    pub fn generate() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Creates a placeholder id from a specific datetime (useful for testing).
    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime.timestamp_millis().to_string())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a short display prefix of the id.
    ///
    /// Ids shorter than the prefix length are returned whole.
    pub fn prefix(&self) -> &str {
        match self.0.char_indices().nth(PREFIX_LEN) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NoteId(\"{}\")", self.0)
    }
}

/// Error returned when parsing an invalid note id.
#[derive(Debug, Clone)]
pub struct ParseNoteIdError {
    value: String,
    reason: &'static str,
}

impl ParseNoteIdError {
    /// Returns the invalid value that caused this error.
    pub fn invalid_value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ParseNoteIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid note id '{}': {}", self.value, self.reason)
    }
}

impl std::error::Error for ParseNoteIdError {}

impl FromStr for NoteId {
    type Err = ParseNoteIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseNoteIdError {
                value: s.to_string(),
                reason: "id cannot be empty",
            });
        }
        // Ids are interpolated into request paths.
        if trimmed
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#'))
        {
            return Err(ParseNoteIdError {
                value: s.to_string(),
                reason: "id must not contain whitespace, '/', '?' or '#'",
            });
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl From<u64> for NoteId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for NoteId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

struct NoteIdVisitor;

impl Visitor<'_> for NoteIdVisitor {
    type Value = NoteId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a note id string or integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<NoteId, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<NoteId, E> {
        Ok(NoteId::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<NoteId, E> {
        Ok(NoteId(v.to_string()))
    }
}

impl<'de> Deserialize<'de> for NoteId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(NoteIdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn generated_id_is_millisecond_timestamp() {
        let at = DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let id = NoteId::from_datetime(at);
        assert_eq!(id.as_str(), "1705314600000");
    }

    #[test]
    fn generate_is_numeric() {
        let id = NoteId::generate();
        assert!(id.as_str().chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn parse_trims_whitespace() {
        let id: NoteId = "  abc123  ".parse().unwrap();
        assert_eq!(id.as_str(), "abc123");
    }

    #[test]
    fn parse_rejects_empty() {
        let err = "   ".parse::<NoteId>().unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn parse_rejects_path_characters() {
        assert!("a/b".parse::<NoteId>().is_err());
        assert!("a b".parse::<NoteId>().is_err());
        assert!("a?b".parse::<NoteId>().is_err());
    }

    #[test]
    fn prefix_shortens_long_ids() {
        let id: NoteId = "65f1c0a2e4b0c1d2e3f4a5b6".parse().unwrap();
        assert_eq!(id.prefix(), "65f1c0a2");
    }

    #[test]
    fn prefix_of_short_id_is_whole_id() {
        let id: NoteId = "42".parse().unwrap();
        assert_eq!(id.prefix(), "42");
    }

    #[test]
    fn deserializes_from_integer() {
        let id: NoteId = serde_json::from_str("1712345678901").unwrap();
        assert_eq!(id.as_str(), "1712345678901");
    }

    #[test]
    fn deserializes_from_string() {
        let id: NoteId = serde_json::from_str("\"n-1\"").unwrap();
        assert_eq!(id.as_str(), "n-1");
    }

    #[test]
    fn serializes_as_string() {
        let id = NoteId::from(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7\"");
    }

    #[test]
    fn integer_and_string_forms_are_equal() {
        let a: NoteId = serde_json::from_str("12").unwrap();
        let b: NoteId = serde_json::from_str("\"12\"").unwrap();
        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn debug_format() {
        let id = NoteId::from(5);
        assert_eq!(format!("{:?}", id), "NoteId(\"5\")");
    }
}
