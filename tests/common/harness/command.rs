//! Fluent wrapper around assert_cmd::Command.

// Allow dead code since this is a test utility with methods for future tests
#![allow(dead_code)]

use assert_cmd::Command;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Fluent wrapper around `assert_cmd::Command` for the `memo` binary.
///
/// Provides a builder-style API for constructing and executing CLI commands.
pub struct MemoCommand {
    args: Vec<String>,
    envs: Vec<(String, String)>,
    stdin: Option<String>,
}

impl MemoCommand {
    /// Creates a new command for the `memo` binary.
    pub fn new() -> Self {
        Self {
            args: Vec::new(),
            envs: Vec::new(),
            stdin: None,
        }
    }

    /// Sets the `--cache` option to the given database.
    pub fn cache(mut self, path: &Path) -> Self {
        self.args.push("--cache".to_string());
        self.args.push(path.to_string_lossy().to_string());
        self
    }

    /// Sets the `--api-url` option.
    pub fn api_url(mut self, url: &str) -> Self {
        self.args.push("--api-url".to_string());
        self.args.push(url.to_string());
        self
    }

    /// Sets an environment variable for the child process.
    pub fn env(mut self, key: &str, value: impl AsRef<Path>) -> Self {
        self.envs
            .push((key.to_string(), value.as_ref().to_string_lossy().to_string()));
        self
    }

    /// Feeds the given text to stdin.
    pub fn stdin(mut self, input: &str) -> Self {
        self.stdin = Some(input.to_string());
        self
    }

    /// Adds arguments to the command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Returns the current arguments (for testing).
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Runs the command and returns an Assert for making assertions.
    #[allow(deprecated)]
    pub fn assert(self) -> assert_cmd::assert::Assert {
        let mut cmd = Command::cargo_bin("memo").expect("Failed to find memo binary");
        cmd.env_remove("RUST_LOG");
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        cmd.args(&self.args);
        if let Some(input) = self.stdin {
            cmd.write_stdin(input);
        }
        cmd.assert()
    }

    /// Runs the command, expects success, and returns stdout as a string.
    pub fn output_success(self) -> String {
        let output = self.assert().success().get_output().stdout.clone();
        String::from_utf8(output).expect("Output was not valid UTF-8")
    }

    /// Runs the command, expects success, and parses stdout as JSON.
    pub fn output_json<T: DeserializeOwned>(self) -> T {
        let output = self.output_success();
        serde_json::from_str(&output).expect("Failed to parse output as JSON")
    }

    // ===========================================
    // Command Shortcuts
    // ===========================================

    /// Configures for the `ls` command.
    pub fn ls(self) -> Self {
        self.args(["ls"])
    }

    /// Configures for the `show` command with an identifier.
    pub fn show(self, ident: &str) -> Self {
        self.args(["show", ident])
    }

    /// Configures for the `sync` command.
    pub fn sync(self) -> Self {
        self.args(["sync"])
    }

    /// Configures for the `tags` command.
    pub fn tags(self) -> Self {
        self.args(["tags"])
    }

    /// Configures for the `counts` command.
    pub fn counts(self) -> Self {
        self.args(["counts"])
    }

    // ===========================================
    // Options
    // ===========================================

    /// Adds `--format json` to the command.
    pub fn format_json(self) -> Self {
        self.args(["--format", "json"])
    }

    /// Adds `--format ids` to the command.
    pub fn format_ids(self) -> Self {
        self.args(["--format", "ids"])
    }

    /// Adds `--strategy optimistic` to the command.
    pub fn optimistic(self) -> Self {
        self.args(["--strategy", "optimistic"])
    }
}

impl Default for MemoCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_command_runs_binary() {
        MemoCommand::new().args(["--help"]).assert().success();
    }

    #[test]
    fn test_command_with_cache() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cache.db");
        let cmd = MemoCommand::new().cache(&path);
        let args = cmd.get_args();
        assert_eq!(args[0], "--cache");
        assert_eq!(args[1], path.to_string_lossy());
    }

    #[test]
    fn test_command_shortcuts() {
        let cmd = MemoCommand::new().ls().format_json().optimistic();
        let args = cmd.get_args();
        assert_eq!(args, ["ls", "--format", "json", "--strategy", "optimistic"]);
    }
}
