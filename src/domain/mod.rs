//! Core types: Note, NoteId, Tag, NoteDraft, and the view selectors

mod draft;
mod note;
mod note_id;
mod tag;
mod view;

pub use draft::{NoteDraft, ParseNoteError, validate_title};
pub use note::{Note, NoteBuilder};
pub use note_id::{NoteId, ParseNoteIdError};
pub use tag::{ParseTagError, Tag};
pub use view::{Filter, ParseViewError, SortKey, SortOrder};
