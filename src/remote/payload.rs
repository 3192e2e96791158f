//! Request and response bodies exchanged with the remote services.

use crate::domain::{NoteId, Tag};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Partial note update for `PUT /notes/update-note/{id}`.
///
/// Absent fields are left unchanged by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NotePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<String>>,
}

impl NotePatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Returns true if the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Status flag update for `PUT /notes/update-status/{id}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_trash: Option<bool>,
}

impl StatusPatch {
    pub fn favorite(value: bool) -> Self {
        Self {
            favorite: Some(value),
            ..Self::default()
        }
    }

    pub fn pinned(value: bool) -> Self {
        Self {
            pinned: Some(value),
            ..Self::default()
        }
    }

    pub fn in_trash(value: bool) -> Self {
        Self {
            in_trash: Some(value),
            ..Self::default()
        }
    }
}

/// Body of the tag endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRequest<'a> {
    pub note_id: &'a NoteId,
    pub tag: &'a Tag,
}

/// Body of the attachment endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRequest<'a> {
    pub note_id: &'a NoteId,
    pub attachment: &'a str,
}

/// Login form.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Account creation form.
#[derive(Clone, Serialize)]
pub struct Registration {
    pub email: String,
    pub username: String,
    #[serde(rename = "phone_number", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub password: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Identifier of a user account.
///
/// The server sends it as either a string or an integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Number(n) => Self(n.to_string()),
        })
    }
}

/// Account details returned by the user endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Some endpoints wrap the user as `{"user": {...}}`, others return it bare.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum UserEnvelope {
    Wrapped { user: User },
    Bare(User),
}

impl UserEnvelope {
    pub(crate) fn into_user(self) -> User {
        match self {
            Self::Wrapped { user } | Self::Bare(user) => user,
        }
    }
}

/// Login response; a missing token means the server refused the login.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Generic `{message}` / `{error}` body.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct MessageBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl MessageBody {
    /// Extracts a human-readable message from a raw body, falling back to
    /// the body itself.
    pub(crate) fn describe(raw: &str) -> String {
        let parsed: MessageBody = serde_json::from_str(raw).unwrap_or_default();
        parsed
            .error
            .or(parsed.message)
            .unwrap_or_else(|| raw.trim().to_string())
    }
}
