//! Clients for the remote note and user services.
//!
//! The services are REST-shaped JSON APIs. [`NoteService`] and
//! [`UserService`] describe what the rest of the crate needs from them;
//! [`HttpNoteService`] and [`HttpUserService`] implement them over blocking
//! HTTP.

mod http;
mod payload;
mod session;

#[cfg(test)]
pub(crate) mod mock;

pub use http::{HttpClient, HttpNoteService, HttpUserService};
pub use payload::{
    AttachmentRequest, Credentials, NotePatch, Registration, StatusPatch, TagRequest, User,
    UserId,
};
pub use session::AuthSession;

use crate::domain::{Note, NoteDraft, NoteId, Tag};
use thiserror::Error;

/// Errors returned by the remote services.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered 401.
    #[error("not authorized")]
    Unauthorized,

    /// The server answered with a non-2xx status other than 401.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The server answered 2xx but refused the request in its body.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),
}

/// Result type for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// The remote note API.
///
/// Every call is a single request. Implementations must not retry: the
/// caller decides how to reconcile a failure with local state.
pub trait NoteService {
    /// Fetches every note owned by the user.
    fn list_notes(&self, user_id: &UserId) -> RemoteResult<Vec<Note>>;

    /// Creates a note and returns the server's copy.
    fn create_note(&self, draft: &NoteDraft) -> RemoteResult<Note>;

    /// Applies a partial update and returns the updated note.
    fn update_note(&self, id: &NoteId, patch: &NotePatch) -> RemoteResult<Note>;

    /// Deletes a note permanently.
    fn delete_note(&self, id: &NoteId) -> RemoteResult<()>;

    /// Updates status flags (favorite, pinned, trash).
    fn update_status(&self, id: &NoteId, patch: &StatusPatch) -> RemoteResult<Note>;

    fn create_tag(&self, id: &NoteId, tag: &Tag) -> RemoteResult<()>;

    fn delete_tag(&self, id: &NoteId, tag: &Tag) -> RemoteResult<()>;

    fn create_attachment(&self, id: &NoteId, attachment: &str) -> RemoteResult<()>;

    fn delete_attachment(&self, id: &NoteId, attachment: &str) -> RemoteResult<()>;

    /// Server-side filtered views.
    fn favorite_notes(&self, user_id: &UserId) -> RemoteResult<Vec<Note>>;

    fn tagged_notes(&self, user_id: &UserId) -> RemoteResult<Vec<Note>>;

    fn untagged_notes(&self, user_id: &UserId) -> RemoteResult<Vec<Note>>;

    fn trashed_notes(&self, user_id: &UserId) -> RemoteResult<Vec<Note>>;

    /// Every tag the user has used.
    fn all_tags(&self, user_id: &UserId) -> RemoteResult<Vec<Tag>>;
}

/// The remote account API.
pub trait UserService {
    /// Exchanges credentials for a session.
    fn login(&self, credentials: &Credentials) -> RemoteResult<AuthSession>;

    /// Creates an account. Returns the server's message.
    fn register(&self, registration: &Registration) -> RemoteResult<String>;

    /// Requests a password reset mail. Returns the server's message.
    fn forgot_password(&self, email: &str) -> RemoteResult<String>;

    /// Verifies an identity token with the server.
    fn check_auth(&self, id_token: &str) -> RemoteResult<User>;

    /// Fetches the user the current token belongs to.
    fn current_user(&self) -> RemoteResult<User>;
}
