//! List, tags and counts command handlers.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cache::LocalCache;
use crate::cli::output::{NoteListing, Output, OutputFormat, TagListing, flags, truncate_str};
use crate::cli::{CountsArgs, ListArgs, TagsArgs};
use crate::domain::Note;
use crate::remote::NoteService;
use crate::store::visible_notes;
use crate::sync::SyncSession;

pub fn handle_list<S: NoteService, C: LocalCache>(
    args: &ListArgs,
    session: &mut SyncSession<S, C>,
) -> Result<()> {
    if args.refresh {
        session.refresh().context("failed to refresh notes")?;
    }

    let store = session.store_mut();
    store.set_current_filter(args.filter.clone());
    store.set_selected_sort(args.sort);
    store.set_sort_order(args.order);
    match &args.search {
        Some(search) => store.set_search_value(search.as_str()),
        None => store.clear_search(),
    }

    let remote;
    let notes: Vec<&Note> = if args.remote {
        remote = session
            .fetch_view(&args.filter)
            .with_context(|| format!("failed to fetch '{}' notes", args.filter))?;
        visible_notes(&remote, session.store().view())
    } else {
        session.store().visible()
    };

    match args.format {
        OutputFormat::Human => {
            if notes.is_empty() {
                println!("No notes found.");
            } else {
                println!("{:<3}  {:<12}  {:<44}  {:>10}", "", "ID", "Title", "Modified");
                println!(
                    "{:<3}  {:<12}  {:<44}  {:>10}",
                    "",
                    "------------",
                    "--------------------------------------------",
                    "----------"
                );
                for note in &notes {
                    let title = session.store().effective_title(note);
                    println!(
                        "{:<3}  {:<12}  {:<44}  {:>10}",
                        flags(note),
                        truncate_str(note.id().as_str(), 12),
                        truncate_str(&title, 44),
                        note.modified_at().format("%Y-%m-%d")
                    );
                }
            }
        }
        OutputFormat::Json => {
            let listings: Vec<NoteListing> = notes.iter().map(|n| NoteListing::from(*n)).collect();
            println!("{}", serde_json::to_string_pretty(&Output::new(listings))?);
        }
        OutputFormat::Ids => {
            for note in &notes {
                println!("{}", note.id());
            }
        }
    }

    Ok(())
}

pub fn handle_tags<S: NoteService, C: LocalCache>(
    args: &TagsArgs,
    session: &SyncSession<S, C>,
) -> Result<()> {
    let listings: Vec<TagListing> = if args.remote {
        session
            .remote_tags()
            .context("failed to fetch tags")?
            .into_iter()
            .map(|tag| TagListing {
                name: tag.to_string(),
                count: None,
            })
            .collect()
    } else {
        session
            .store()
            .counts()
            .tags()
            .iter()
            .map(|t| TagListing {
                name: t.tag().to_string(),
                count: args.counts.then_some(t.count()),
            })
            .collect()
    };

    match args.format {
        OutputFormat::Human => {
            if listings.is_empty() {
                println!("No tags found.");
            }
            for tag in &listings {
                match tag.count {
                    Some(count) => println!("{:>5}  {}", count, tag.name),
                    None => println!("{}", tag.name),
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&Output::new(listings))?);
        }
        OutputFormat::Ids => {
            for tag in &listings {
                println!("{}", tag.name);
            }
        }
    }

    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CountsListing {
    notes: usize,
    favorites: usize,
    untagged: usize,
    trash: usize,
    tags: usize,
}

pub fn handle_counts<S: NoteService, C: LocalCache>(
    args: &CountsArgs,
    session: &SyncSession<S, C>,
) -> Result<()> {
    let counts = session.store().counts();
    let listing = CountsListing {
        notes: counts.note_count(),
        favorites: counts.favorite_count(),
        untagged: counts.untagged_count(),
        trash: counts.trash_count(),
        tags: counts.tag_count(),
    };

    match args.format {
        OutputFormat::Human | OutputFormat::Ids => {
            println!("Notes:     {}", listing.notes);
            println!("Favorites: {}", listing.favorites);
            println!("Untagged:  {}", listing.untagged);
            println!("Trash:     {}", listing.trash);
            println!("Tags:      {}", listing.tags);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&Output::new(listing))?);
        }
    }

    Ok(())
}
