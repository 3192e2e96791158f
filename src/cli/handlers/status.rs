//! Status flag, tag and attachment command handlers.

use anyhow::{Context, Result};

use super::report;
use super::resolve::require_note;
use crate::cache::LocalCache;
use crate::cli::{AttachArgs, NoteArgs, TagArgs};
use crate::domain::{Note, NoteId, Tag};
use crate::remote::NoteService;
use crate::sync::{Outcome, SyncResult, SyncSession};

/// Resolves the note and runs one session operation on it.
fn apply<S, C, F>(
    session: &mut SyncSession<S, C>,
    ident: &str,
    failure: &str,
    op: F,
) -> Result<(Note, Outcome)>
where
    S: NoteService,
    C: LocalCache,
    F: FnOnce(&mut SyncSession<S, C>, &NoteId) -> SyncResult<Outcome>,
{
    let note = require_note(session.store().notes(), ident)?;
    let outcome = op(session, note.id())
        .with_context(|| format!("failed to {} '{}'", failure, note.title()))?;
    Ok((note, outcome))
}

pub fn handle_fav<S: NoteService, C: LocalCache>(
    args: &NoteArgs,
    session: &mut SyncSession<S, C>,
) -> Result<()> {
    let (note, outcome) = apply(session, &args.note, "update", |s, id| s.toggle_favorite(id))?;
    let verb = if note.favorite() { "Unfavorited" } else { "Favorited" };
    report(verb, note.title(), outcome);
    Ok(())
}

pub fn handle_pin<S: NoteService, C: LocalCache>(
    args: &NoteArgs,
    session: &mut SyncSession<S, C>,
) -> Result<()> {
    let (note, outcome) = apply(session, &args.note, "update", |s, id| s.toggle_pin(id))?;
    let verb = if note.pinned() { "Unpinned" } else { "Pinned" };
    report(verb, note.title(), outcome);
    Ok(())
}

pub fn handle_trash<S: NoteService, C: LocalCache>(
    args: &NoteArgs,
    session: &mut SyncSession<S, C>,
) -> Result<()> {
    let (note, outcome) = apply(session, &args.note, "trash", |s, id| s.move_to_trash(id))?;
    report("Trashed", note.title(), outcome);
    Ok(())
}

pub fn handle_restore<S: NoteService, C: LocalCache>(
    args: &NoteArgs,
    session: &mut SyncSession<S, C>,
) -> Result<()> {
    let (note, outcome) = apply(session, &args.note, "restore", |s, id| s.restore(id))?;
    report("Restored", note.title(), outcome);
    Ok(())
}

pub fn handle_rm<S: NoteService, C: LocalCache>(
    args: &NoteArgs,
    session: &mut SyncSession<S, C>,
) -> Result<()> {
    let (note, outcome) =
        apply(session, &args.note, "delete", |s, id| s.delete_permanently(id))?;
    report("Deleted", note.title(), outcome);
    Ok(())
}

pub fn handle_tag<S: NoteService, C: LocalCache>(
    args: &TagArgs,
    session: &mut SyncSession<S, C>,
) -> Result<()> {
    let tag = Tag::new(&args.tag).with_context(|| format!("invalid tag: {}", args.tag))?;
    let (note, outcome) = apply(session, &args.note, "tag", |s, id| s.add_tag(id, &tag))?;
    report(&format!("Tagged #{}", tag), note.title(), outcome);
    Ok(())
}

pub fn handle_untag<S: NoteService, C: LocalCache>(
    args: &TagArgs,
    session: &mut SyncSession<S, C>,
) -> Result<()> {
    let tag = Tag::new(&args.tag).with_context(|| format!("invalid tag: {}", args.tag))?;
    let (note, outcome) = apply(session, &args.note, "untag", |s, id| s.delete_tag(id, &tag))?;
    report(&format!("Untagged #{}", tag), note.title(), outcome);
    Ok(())
}

pub fn handle_attach<S: NoteService, C: LocalCache>(
    args: &AttachArgs,
    session: &mut SyncSession<S, C>,
) -> Result<()> {
    let attachment = args.attachment.trim();
    if attachment.is_empty() {
        anyhow::bail!("attachment reference cannot be empty");
    }
    let (note, outcome) = apply(session, &args.note, "attach to", |s, id| {
        s.add_attachment(id, attachment)
    })?;
    report(&format!("Attached {}", attachment), note.title(), outcome);
    Ok(())
}

pub fn handle_detach<S: NoteService, C: LocalCache>(
    args: &AttachArgs,
    session: &mut SyncSession<S, C>,
) -> Result<()> {
    let attachment = args.attachment.trim();
    let (note, outcome) = apply(session, &args.note, "detach from", |s, id| {
        s.delete_attachment(id, attachment)
    })?;
    report(&format!("Detached {}", attachment), note.title(), outcome);
    Ok(())
}
