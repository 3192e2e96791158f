//! Test harness for CLI integration tests.
//!
//! Provides isolated cache environments, programmatic note seeding, a stub
//! notes server, and CLI assertion helpers using `assert_cmd`.

mod command;
mod env;
mod note;
mod server;

// Re-export main types for external use
#[allow(unused_imports)]
pub use command::MemoCommand;
#[allow(unused_imports)]
pub use env::TestEnv;
#[allow(unused_imports)]
pub use note::TestNote;
#[allow(unused_imports)]
pub use server::{Recorded, StubServer};
