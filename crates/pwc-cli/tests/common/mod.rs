//! Shared E2E test helpers for `pwc` binary tests.

#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

/// Default timeout for one binary run.
pub const TIMEOUT: Duration = Duration::from_secs(10);

/// Variables that would leak the developer's configuration into a test.
const CONFIG_VARS: &[&str] = &[
    "PWC_DEBUG",
    "PWC_BUFFER_SIZE",
    "PWC_STORE_DIR",
    "PWC_LOG_LEVEL",
    "RUST_LOG",
];

pub const CROSSWORD: &str = r#"{
    "title": "Tiny",
    "grid": ["QANDA", "U#O#R", "IDEAS"],
    "across": {"1": "Audience session", "4": "Notions"},
    "down": {"1": "Sound of a duck, almost", "2": "Christmas, in Paris, minus a letter", "3": "Latin arts"}
}"#;

pub const ACROSTIC: &str = r#"{
    "grid": ["AB#CD", "EFG#H"],
    "clues": {"A": "Tea, in Beijing", "B": "Not a word"},
    "clue_numbers": {"A": [3, 1, 8], "B": [5, 2, 4, 6, 7]},
    "quote": "ABCD EFGH"
}"#;

pub const SPELLING_BEE: &str = r#"{"official": ["COUNT", "COUNTRY"], "unofficial": ["CONTO"]}"#;

/// Isolated working directory with a fake home.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(dir.path().join("home")).expect("create home");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `content` to `name` inside the workspace and returns its path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).expect("write workspace file");
        path
    }

    /// Writes a script whose `{dir}` placeholders point at the workspace.
    pub fn script(&self, name: &str, content: &str) -> PathBuf {
        let dir = self.dir.path().to_str().expect("valid utf8");
        self.write(name, &content.replace("{dir}", dir))
    }

    /// `pwc` command with the workspace as project root and home.
    pub fn cmd(&self) -> assert_cmd::Command {
        let mut cmd: assert_cmd::Command = cargo_bin_cmd!("pwc");
        cmd.timeout(TIMEOUT);
        for var in CONFIG_VARS {
            cmd.env_remove(var);
        }
        cmd.env("HOME", self.dir.path().join("home"));
        cmd.arg("-C").arg(self.dir.path());
        cmd
    }
}

/// Parses stdout into event kinds, in order.
pub fn event_kinds(stdout: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| {
            let event: serde_json::Value = serde_json::from_str(line).expect("event line is JSON");
            event["kind"].as_str().expect("kind is a string").to_string()
        })
        .collect()
}
