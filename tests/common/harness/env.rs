//! Isolated test environment with a temporary cache database.

// Allow dead code since this is a test utility with methods for future tests
#![allow(dead_code)]

use super::{MemoCommand, StubServer, TestNote};
use memo::cache::{self, LocalCache, SqliteCache};
use memo::domain::Note;
use memo::remote::{AuthSession, UserId};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Address nothing listens on; commands that reach it fail with a network error.
const UNREACHABLE_API: &str = "http://127.0.0.1:1";

/// Isolated test environment with a temporary cache database.
///
/// The child process gets its own config and data directories, so a
/// developer's real configuration never leaks into a test.
pub struct TestEnv {
    /// The temporary directory (kept for lifetime management)
    temp_dir: TempDir,
    cache_path: PathBuf,
}

impl TestEnv {
    /// Creates a new isolated test environment with an empty cache.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache_path = temp_dir.path().join("cache.db");
        Self {
            temp_dir,
            cache_path,
        }
    }

    /// Returns the path of the cache database.
    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    fn open_cache(&self) -> SqliteCache {
        SqliteCache::open(&self.cache_path).expect("Failed to open cache")
    }

    /// Writes the given notes as the cached note list.
    pub fn seed(&self, notes: &[TestNote]) {
        let notes: Vec<Note> = notes.iter().map(TestNote::to_note).collect();
        self.open_cache()
            .set_json(cache::NOTES, &notes)
            .expect("Failed to seed notes");
    }

    /// Stores a signed-in session.
    pub fn login_as(&self, token: &str, user_id: &str) {
        AuthSession::new(token, UserId::new(user_id))
            .store(&mut self.open_cache())
            .expect("Failed to store session");
    }

    /// Reads the cached note list.
    pub fn notes(&self) -> Vec<Note> {
        self.open_cache()
            .get_json(cache::NOTES)
            .expect("Failed to read notes")
            .unwrap_or_default()
    }

    /// Returns the cached note with the given id.
    pub fn note(&self, id: &str) -> Option<Note> {
        self.notes().into_iter().find(|n| n.id().as_str() == id)
    }

    /// Reads a raw cache entry.
    pub fn cache_value(&self, key: &str) -> Option<String> {
        self.open_cache().get(key).expect("Failed to read cache")
    }

    /// Creates a MemoCommand against this cache and an unreachable server.
    pub fn cmd(&self) -> MemoCommand {
        self.cmd_at(UNREACHABLE_API)
    }

    /// Creates a MemoCommand against this cache and the stub server.
    pub fn cmd_with(&self, server: &StubServer) -> MemoCommand {
        self.cmd_at(&server.url())
    }

    fn cmd_at(&self, url: &str) -> MemoCommand {
        MemoCommand::new()
            .env("HOME", self.temp_dir.path())
            .env("XDG_CONFIG_HOME", self.temp_dir.path().join("config"))
            .env("XDG_DATA_HOME", self.temp_dir.path().join("data"))
            .cache(&self.cache_path)
            .api_url(url)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_cleanup_on_drop() {
        let path = {
            let env = TestEnv::new();
            env.seed(&[TestNote::new(1, "a")]);
            env.cache_path().to_path_buf()
        };
        assert!(!path.exists(), "temp directory should be cleaned up on drop");
    }

    #[test]
    fn test_env_seed_and_read_back() {
        let env = TestEnv::new();
        env.seed(&[TestNote::new(1, "a"), TestNote::new(2, "b").tag("work")]);

        let notes = env.notes();
        assert_eq!(notes.len(), 2);
        assert_eq!(env.note("2").unwrap().tags()[0].as_str(), "work");
    }

    #[test]
    fn test_env_login_writes_session_keys() {
        let env = TestEnv::new();
        env.login_as("tok", "u1");
        assert_eq!(env.cache_value("accessToken").as_deref(), Some("tok"));
        assert_eq!(env.cache_value("userId").as_deref(), Some("u1"));
    }

    #[test]
    fn test_env_provides_command() {
        let env = TestEnv::new();
        let cmd = env.cmd();
        let args = cmd.get_args();
        assert_eq!(args[0], "--cache");
        assert_eq!(args[2], "--api-url");
        assert_eq!(args[3], UNREACHABLE_API);
    }
}
