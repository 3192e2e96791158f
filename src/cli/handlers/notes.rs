//! New, show, edit and draft command handlers.

use anyhow::{Context, Result, bail};
use std::path::Path;
use std::process::Command;

use super::report;
use super::resolve::require_note;
use crate::cache::LocalCache;
use crate::cli::config::Config;
use crate::cli::output::{NoteDetail, NoteListing, Output, OutputFormat};
use crate::cli::{DraftAction, DraftArgs, EditArgs, NewArgs, ShowArgs};
use crate::domain::{NoteDraft, NoteId, Tag};
use crate::remote::NoteService;
use crate::sync::{SyncError, SyncSession};

/// Trait for launching an editor (allows mocking in tests).
pub(crate) trait EditorLauncher {
    fn open(&self, path: &Path) -> Result<()>;
}

struct RealEditor<'a>(&'a Config);

impl EditorLauncher for RealEditor<'_> {
    fn open(&self, path: &Path) -> Result<()> {
        open_in_editor(path, self.0)
    }
}

/// Opens a file in the configured editor and waits for it to exit.
pub(crate) fn open_in_editor(path: &Path, config: &Config) -> Result<()> {
    let editor = config.editor();

    // Parse editor command (may include args like "code --wait")
    let parts: Vec<&str> = editor.split_whitespace().collect();
    let Some((cmd, args)) = parts.split_first() else {
        bail!("editor command is empty");
    };

    let status = Command::new(cmd)
        .args(args)
        .arg(path)
        .status()
        .with_context(|| format!("failed to launch editor '{}'", editor))?;

    if !status.success() {
        bail!("editor '{}' exited with non-zero status", editor);
    }

    Ok(())
}

/// Lets the user edit `initial` in a temporary file.
///
/// Returns `None` when the text comes back unchanged.
fn edit_text<E: EditorLauncher>(editor: &E, initial: &str) -> Result<Option<String>> {
    let file = tempfile::Builder::new()
        .prefix("memo-")
        .suffix(".md")
        .tempfile()
        .context("failed to create temporary file")?;
    std::fs::write(file.path(), initial)
        .with_context(|| format!("failed to write {}", file.path().display()))?;

    editor.open(file.path())?;

    let edited = std::fs::read_to_string(file.path())
        .with_context(|| format!("failed to read {}", file.path().display()))?;
    Ok((edited != initial).then_some(edited))
}

fn parse_tags(raw: &[String]) -> Result<Vec<Tag>> {
    raw.iter()
        .map(|s| Tag::new(s).with_context(|| format!("invalid tag: {}", s)))
        .collect()
}

// ===========================================
// new
// ===========================================

pub fn handle_new<S: NoteService, C: LocalCache>(
    args: &NewArgs,
    session: &mut SyncSession<S, C>,
    config: &Config,
) -> Result<()> {
    handle_new_impl(args, session, &RealEditor(config))
}

pub(crate) fn handle_new_impl<S: NoteService, C: LocalCache, E: EditorLauncher>(
    args: &NewArgs,
    session: &mut SyncSession<S, C>,
    editor: &E,
) -> Result<()> {
    let draft = NoteDraft::new(&args.title)
        .context("invalid note")?
        .with_content(args.content.clone().unwrap_or_default())
        .with_tags(parse_tags(&args.tags)?);
    let title = draft.title().to_string();

    let Some(id) = session.create(draft).context("failed to create note")? else {
        eprintln!("Creation of '{}' was dropped", title);
        return Ok(());
    };
    println!("Created: {} [{}]", title, id);

    if args.edit {
        edit_content_interactively(session, &id, &title, editor)?;
    }
    Ok(())
}

// ===========================================
// show
// ===========================================

pub fn handle_show<S: NoteService, C: LocalCache>(
    args: &ShowArgs,
    session: &mut SyncSession<S, C>,
) -> Result<()> {
    let note = require_note(session.store().notes(), &args.note)?;
    session.store_mut().set_selected_note(Some(note.id().clone()));

    let store = session.store();
    let (title, content) = if args.saved {
        (note.title().to_string(), note.content().to_string())
    } else {
        (store.effective_title(&note), store.effective_content(&note))
    };
    let draft = title != note.title() || content != note.content();

    match args.format {
        OutputFormat::Human => {
            println!("# {}", title);
            println!();
            println!(
                "ID: {}  Created: {}  Modified: {}",
                note.id(),
                note.created_at().format("%Y-%m-%d"),
                note.modified_at().format("%Y-%m-%d")
            );

            let mut status = Vec::new();
            if note.pinned() {
                status.push("pinned");
            }
            if note.favorite() {
                status.push("favorite");
            }
            if note.in_trash() {
                status.push("in trash");
            }
            if draft {
                status.push("unsaved draft");
            }
            if !status.is_empty() {
                println!("Status: {}", status.join(", "));
            }

            if !note.tags().is_empty() {
                let tags: Vec<_> = note.tags().iter().map(|t| t.as_str()).collect();
                println!("Tags: {}", tags.join(", "));
            }
            if !note.attachments().is_empty() {
                println!("Attachments: {}", note.attachments().join(", "));
            }

            println!();
            if !content.is_empty() {
                println!("{}", content);
            }
        }
        OutputFormat::Json => {
            let mut listing = NoteListing::from(&note);
            listing.title = title;
            let detail = NoteDetail {
                listing,
                content,
                attachments: note.attachments().to_vec(),
                created_at: note.created_at().to_rfc3339(),
                draft,
            };
            println!("{}", serde_json::to_string_pretty(&Output::new(detail))?);
        }
        OutputFormat::Ids => println!("{}", note.id()),
    }

    Ok(())
}

// ===========================================
// edit
// ===========================================

pub fn handle_edit<S: NoteService, C: LocalCache>(
    args: &EditArgs,
    session: &mut SyncSession<S, C>,
    config: &Config,
) -> Result<()> {
    handle_edit_impl(args, session, &RealEditor(config))
}

/// Internal implementation that accepts a generic editor launcher.
///
/// A push the server refuses leaves the new text behind as a draft, so
/// nothing typed is lost.
pub(crate) fn handle_edit_impl<S: NoteService, C: LocalCache, E: EditorLauncher>(
    args: &EditArgs,
    session: &mut SyncSession<S, C>,
    editor: &E,
) -> Result<()> {
    let note = require_note(session.store().notes(), &args.note)?;
    let id = note.id().clone();

    if args.title.is_none() && args.content.is_none() {
        return edit_content_interactively(session, &id, note.title(), editor);
    }

    if let Some(title) = &args.title {
        match session.rename(&id, title) {
            Ok(outcome) => report("Renamed", title, outcome),
            Err(err @ SyncError::Validation(_)) => return Err(err).context("invalid title"),
            Err(err) => {
                session.store_mut().save_draft_title(&id, title);
                return Err(err).context("failed to rename note; kept the new title as a draft");
            }
        }
    }

    if let Some(content) = &args.content {
        push_content(session, &id, note.title(), content)?;
    }
    Ok(())
}

fn edit_content_interactively<S: NoteService, C: LocalCache, E: EditorLauncher>(
    session: &mut SyncSession<S, C>,
    id: &NoteId,
    title: &str,
    editor: &E,
) -> Result<()> {
    let initial = match session.store().note(id) {
        Some(note) => session.store().effective_content(note),
        None => bail!("note not found: '{}'", id),
    };

    match edit_text(editor, &initial)? {
        Some(content) => push_content(session, id, title, &content),
        None => {
            println!("No changes: {}", title);
            Ok(())
        }
    }
}

fn push_content<S: NoteService, C: LocalCache>(
    session: &mut SyncSession<S, C>,
    id: &NoteId,
    title: &str,
    content: &str,
) -> Result<()> {
    match session.edit_content(id, content) {
        Ok(outcome) => {
            report("Edited", title, outcome);
            Ok(())
        }
        Err(err) => {
            session.store_mut().save_draft_content(id, content);
            Err(err).context("failed to save note; kept the new content as a draft")
        }
    }
}

// ===========================================
// draft
// ===========================================

pub fn handle_draft<S: NoteService, C: LocalCache>(
    args: &DraftArgs,
    session: &mut SyncSession<S, C>,
) -> Result<()> {
    let note = require_note(session.store().notes(), &args.note)?;
    let id = note.id();

    match &args.action {
        DraftAction::Save { title, content } => {
            if title.is_none() && content.is_none() {
                bail!("nothing to save: pass --title or --content");
            }
            let store = session.store_mut();
            if let Some(title) = title {
                store.save_draft_title(id, title);
            }
            if let Some(content) = content {
                store.save_draft_content(id, content);
            }
            println!("Saved draft: {}", note.title());
        }
        DraftAction::Show => {
            let store = session.store();
            let title = store.draft_title(id);
            let content = store.draft_content(id);
            if title.is_none() && content.is_none() {
                println!("No drafts: {}", note.title());
            }
            if let Some(title) = title {
                println!("Title: {}", title);
            }
            if let Some(content) = content {
                println!("{}", content);
            }
        }
        DraftAction::Push => {
            let outcome = session
                .commit_drafts(id)
                .context("failed to push drafts; they are kept")?;
            report("Saved", note.title(), outcome);
        }
        DraftAction::Discard => {
            session.store_mut().discard_drafts(id);
            println!("Discarded drafts: {}", note.title());
        }
    }
    Ok(())
}
