//! memo - notes kept in a local cache and synced with a remote notes service

pub mod cache;
pub mod cli;
pub mod domain;
pub mod remote;
pub mod store;
pub mod sync;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cli::{
    Cli, Command,
    config::Config,
    handlers::{
        handle_attach, handle_check_auth, handle_counts, handle_detach, handle_draft, handle_edit,
        handle_fav, handle_forgot_password, handle_list, handle_login, handle_logout, handle_new,
        handle_pin, handle_register, handle_restore, handle_rm, handle_show, handle_sync,
        handle_tag, handle_tags, handle_trash, handle_untag, handle_whoami, open_cache,
        open_session, read_password, user_service,
    },
};
use cache::SqliteCache;
use remote::RemoteError;
use sync::SyncError;

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load()?;
    let cache_path = config.cache_path(cli.cache.as_ref());
    let api_url = config.api_url(cli.api_url.as_deref());
    let strategy = config.strategy(cli.strategy);

    let session = || open_session(&cache_path, &api_url, strategy, &config);
    let users = |cache: &SqliteCache| user_service(cache, &api_url, &config);

    match &cli.command {
        Command::List(args) => handle_list(args, &mut session()?),
        Command::Sync => handle_sync(&mut session()?),
        Command::New(args) => handle_new(args, &mut session()?, &config),
        Command::Show(args) => handle_show(args, &mut session()?),
        Command::Edit(args) => handle_edit(args, &mut session()?, &config),
        Command::Draft(args) => handle_draft(args, &mut session()?),
        Command::Tags(args) => handle_tags(args, &session()?),
        Command::Tag(args) => handle_tag(args, &mut session()?),
        Command::Untag(args) => handle_untag(args, &mut session()?),
        Command::Attach(args) => handle_attach(args, &mut session()?),
        Command::Detach(args) => handle_detach(args, &mut session()?),
        Command::Fav(args) => handle_fav(args, &mut session()?),
        Command::Pin(args) => handle_pin(args, &mut session()?),
        Command::Trash(args) => handle_trash(args, &mut session()?),
        Command::Restore(args) => handle_restore(args, &mut session()?),
        Command::Rm(args) => handle_rm(args, &mut session()?),
        Command::Counts(args) => handle_counts(args, &session()?),
        Command::Login(args) => {
            let password = read_password(args.password.as_deref())?;
            let mut cache = open_cache(&cache_path)?;
            let users = users(&cache)?;
            handle_login(args, password, &users, &mut cache)
        }
        Command::Logout => handle_logout(&mut open_cache(&cache_path)?),
        Command::Register(args) => {
            let password = read_password(args.password.as_deref())?;
            handle_register(args, password, &users(&open_cache(&cache_path)?)?)
        }
        Command::ForgotPassword(args) => {
            handle_forgot_password(args, &users(&open_cache(&cache_path)?)?)
        }
        Command::CheckAuth(args) => handle_check_auth(args, &users(&open_cache(&cache_path)?)?),
        Command::Whoami => {
            let cache = open_cache(&cache_path)?;
            handle_whoami(&users(&cache)?, &cache)
        }
        Command::Completions(args) => {
            clap_complete::generate(args.shell, &mut Cli::command(), "memo", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise each `-v` raises the level from
/// `warn` up to `trace`.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("memo={level}")));

    // A second init (tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Returns true if the error means the stored login is missing or rejected.
pub fn needs_login(err: &anyhow::Error) -> bool {
    err.chain().any(|e| {
        matches!(e.downcast_ref::<SyncError>(), Some(SyncError::Unauthorized))
            || matches!(e.downcast_ref::<RemoteError>(), Some(RemoteError::Unauthorized))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn login_hint_follows_the_error_chain() {
        let err = Err::<(), _>(SyncError::Unauthorized)
            .context("failed to fetch notes")
            .unwrap_err();
        assert!(needs_login(&err));

        let err = Err::<(), _>(RemoteError::Unauthorized)
            .context("token verification failed")
            .unwrap_err();
        assert!(needs_login(&err));

        let err = Err::<(), _>(RemoteError::Network("refused".into()))
            .context("failed")
            .unwrap_err();
        assert!(!needs_login(&err));
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
