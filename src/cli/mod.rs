//! CLI command definitions and handlers

pub mod config;
pub mod handlers;
pub mod output;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::domain::{Filter, SortKey, SortOrder};
use crate::sync::Strategy;
use output::OutputFormat;

/// memo - notes synced with a remote notes service
#[derive(Parser, Debug)]
#[command(name = "memo", version, about, long_about = None)]
pub struct Cli {
    /// Local cache database (overrides config file)
    #[arg(long, global = true)]
    pub cache: Option<PathBuf>,

    /// Base URL of the notes API (overrides config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// When local changes are committed: confirmed or optimistic
    #[arg(long, global = true)]
    pub strategy: Option<Strategy>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List notes for a filter, search and sort
    #[command(name = "ls")]
    List(ListArgs),

    /// Fetch all notes from the server, replacing the local copy
    Sync,

    /// Create a new note
    New(NewArgs),

    /// Show a note's contents
    Show(ShowArgs),

    /// Edit a note's title or content
    Edit(EditArgs),

    /// Manage unsaved drafts of a note
    Draft(DraftArgs),

    /// List all tags
    Tags(TagsArgs),

    /// Add a tag to a note
    Tag(TagArgs),

    /// Remove a tag from a note
    Untag(TagArgs),

    /// Add an attachment reference to a note
    Attach(AttachArgs),

    /// Remove an attachment reference from a note
    Detach(AttachArgs),

    /// Toggle a note's favorite flag
    Fav(NoteArgs),

    /// Toggle a note's pinned flag
    Pin(NoteArgs),

    /// Move a note to the trash
    Trash(NoteArgs),

    /// Restore a note from the trash
    Restore(NoteArgs),

    /// Delete a note permanently
    Rm(NoteArgs),

    /// Show note counts per sidebar section
    Counts(CountsArgs),

    /// Sign in and store the session
    Login(LoginArgs),

    /// Forget the stored session
    Logout,

    /// Create an account
    Register(RegisterArgs),

    /// Request a password reset mail
    ForgotPassword(ForgotPasswordArgs),

    /// Verify an identity token with the server
    CheckAuth(CheckAuthArgs),

    /// Show the signed-in user
    Whoami,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `ls` (list) command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Filter: all, favorites, untagged, trash, or tag:<name>
    #[arg(long, default_value = "all")]
    pub filter: Filter,

    /// Show notes whose title contains this text first
    #[arg(short, long)]
    pub search: Option<String>,

    /// Sort key: title, created, modified
    #[arg(long, default_value = "title")]
    pub sort: SortKey,

    /// Sort direction: asc or desc
    #[arg(long, default_value = "asc")]
    pub order: SortOrder,

    /// Fetch from the server before listing
    #[arg(long)]
    pub refresh: bool,

    /// Ask the server to filter instead of the local copy
    #[arg(long, conflicts_with = "refresh")]
    pub remote: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `new` command
#[derive(Parser, Debug)]
pub struct NewArgs {
    /// Note title
    pub title: String,

    /// Initial content
    #[arg(short, long)]
    pub content: Option<String>,

    /// Tag for the note (can be specified multiple times)
    #[arg(short, long = "tag", action = ArgAction::Append)]
    pub tags: Vec<String>,

    /// Open in editor after creation
    #[arg(short, long)]
    pub edit: bool,
}

/// Arguments for the `show` command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Note ID or title
    pub note: String,

    /// Show the saved text, ignoring drafts
    #[arg(long)]
    pub saved: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `edit` command
///
/// Without `--title` or `--content` the content is opened in the editor.
#[derive(Parser, Debug)]
pub struct EditArgs {
    /// Note ID or title
    pub note: String,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New content
    #[arg(long)]
    pub content: Option<String>,
}

/// Arguments for the `draft` command
#[derive(Parser, Debug)]
pub struct DraftArgs {
    /// Note ID or title
    pub note: String,

    #[command(subcommand)]
    pub action: DraftAction,
}

#[derive(Subcommand, Debug)]
pub enum DraftAction {
    /// Save an unsaved title or content locally
    Save {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Print the drafts of a note
    Show,
    /// Send the drafts to the server
    Push,
    /// Throw the drafts away
    Discard,
}

/// Arguments for commands that take a single note
#[derive(Parser, Debug)]
pub struct NoteArgs {
    /// Note ID or title
    pub note: String,
}

/// Arguments for the `tags` command
#[derive(Parser, Debug)]
pub struct TagsArgs {
    /// Show note counts for each tag
    #[arg(long)]
    pub counts: bool,

    /// List the tags the server reports instead of the local copy
    #[arg(long, conflicts_with = "counts")]
    pub remote: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `tag` and `untag` commands
#[derive(Parser, Debug)]
pub struct TagArgs {
    /// Note ID or title
    pub note: String,

    /// Tag name
    pub tag: String,
}

/// Arguments for the `attach` and `detach` commands
#[derive(Parser, Debug)]
pub struct AttachArgs {
    /// Note ID or title
    pub note: String,

    /// Attachment reference (file name or id)
    pub attachment: String,
}

/// Arguments for the `counts` command
#[derive(Parser, Debug)]
pub struct CountsArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `login` command
#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Password (read from stdin when omitted)
    #[arg(long)]
    pub password: Option<String>,
}

/// Arguments for the `register` command
#[derive(Parser, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub phone: Option<String>,

    /// Password (read from stdin when omitted)
    #[arg(long)]
    pub password: Option<String>,
}

/// Arguments for the `forgot-password` command
#[derive(Parser, Debug)]
pub struct ForgotPasswordArgs {
    /// Account email
    pub email: String,
}

/// Arguments for the `check-auth` command
#[derive(Parser, Debug)]
pub struct CheckAuthArgs {
    /// Identity token to verify
    pub id_token: String,
}

/// Arguments for the `completions` command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, zsh, fish)
    #[arg(value_enum)]
    pub shell: Shell,
}
