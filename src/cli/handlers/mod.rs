//! Command handlers for the CLI.

mod account;
mod list;
mod notes;
mod resolve;
mod status;
mod sync;


use anyhow::{Context, Result};
use std::io::BufRead;
use std::path::Path;

use crate::cache::{LocalCache, SqliteCache};
use crate::cli::config::Config;
use crate::remote::{AuthSession, HttpClient, HttpNoteService, HttpUserService};
use crate::store::NoteStore;
use crate::sync::{Outcome, Strategy, SyncSession};

// Re-export public items
pub use account::{
    handle_check_auth, handle_forgot_password, handle_login, handle_logout, handle_register,
    handle_whoami,
};
pub use list::{handle_counts, handle_list, handle_tags};
pub use notes::{handle_draft, handle_edit, handle_new, handle_show};
pub use resolve::{ResolveResult, resolve_note};
pub use status::{
    handle_attach, handle_detach, handle_fav, handle_pin, handle_restore, handle_rm, handle_tag,
    handle_trash, handle_untag,
};
pub use sync::handle_sync;

// Re-export for tests
#[cfg(test)]
pub(crate) use notes::{EditorLauncher, handle_edit_impl, handle_new_impl};

/// Session type used by the binary.
pub type AppSession = SyncSession<HttpNoteService, SqliteCache>;

// ===========================================
// Shared Utilities
// ===========================================

/// Opens the local cache database.
pub fn open_cache(path: &Path) -> Result<SqliteCache> {
    SqliteCache::open(path)
        .with_context(|| format!("failed to open cache at {}", path.display()))
}

/// Builds an HTTP client carrying the stored token, if any.
pub fn http_client<C: LocalCache>(cache: &C, api_url: &str, config: &Config) -> Result<HttpClient> {
    let client = HttpClient::new(api_url, config.timeout());
    let session = AuthSession::load(cache).context("failed to read stored session")?;
    Ok(match session {
        Some(session) => client.with_token(session.token()),
        None => client,
    })
}

/// Hydrates a session from the cache at `cache_path`.
///
/// The stored login supplies both the bearer token and the user whose notes
/// are listed.
pub fn open_session(
    cache_path: &Path,
    api_url: &str,
    strategy: Strategy,
    config: &Config,
) -> Result<AppSession> {
    let cache = open_cache(cache_path)?;
    let client = http_client(&cache, api_url, config)?;
    let user_id = AuthSession::load(&cache)
        .context("failed to read stored session")?
        .map(|s| s.user_id().clone());

    tracing::debug!(
        cache = %cache_path.display(),
        api_url,
        %strategy,
        signed_in = user_id.is_some(),
        "opening session"
    );

    Ok(SyncSession::new(NoteStore::hydrate(cache), HttpNoteService::new(client))
        .with_strategy(strategy)
        .with_user(user_id))
}

/// Builds the account service for `api_url`.
pub fn user_service<C: LocalCache>(
    cache: &C,
    api_url: &str,
    config: &Config,
) -> Result<HttpUserService> {
    Ok(HttpUserService::new(http_client(cache, api_url, config)?))
}

/// Uses `given` if present, otherwise reads the first line of stdin.
pub fn read_password(given: Option<&str>) -> Result<String> {
    if let Some(password) = given {
        return Ok(password.to_string());
    }
    eprintln!("Password:");
    read_password_from(std::io::stdin().lock())
}

pub(crate) fn read_password_from<R: BufRead>(mut reader: R) -> Result<String> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        anyhow::bail!("password cannot be empty");
    }
    Ok(password)
}

/// Prints what an operation did to a note.
///
/// Dropped results are reported on stderr; they are not errors.
pub(crate) fn report(verb: &str, title: &str, outcome: Outcome) {
    match outcome {
        Outcome::Applied => println!("{verb}: {title}"),
        Outcome::Unchanged => println!("Unchanged: {title}"),
        Outcome::NotFound => eprintln!("Note disappeared before {verb}: {title}"),
        Outcome::Stale | Outcome::Cancelled => {
            eprintln!("Result of {verb} for '{title}' was dropped ({outcome})")
        }
    }
}
