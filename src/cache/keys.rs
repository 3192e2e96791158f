//! Cache key names.
//!
//! These match the keys used by the browser client, so a cache exported from
//! local storage can be imported as-is.

use crate::domain::NoteId;

/// Full note list, JSON array.
pub const NOTES: &str = "notes";

/// Access token of the logged-in user.
pub const ACCESS_TOKEN: &str = "accessToken";

/// Id of the logged-in user.
pub const USER_ID: &str = "userId";

/// Unsaved content override for a note.
pub fn draft_content_key(id: &NoteId) -> String {
    format!("noteContent_{}", id)
}

/// Unsaved title override for a note.
pub fn draft_title_key(id: &NoteId) -> String {
    format!("noteTitle_{}", id)
}
