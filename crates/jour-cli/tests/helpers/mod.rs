use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test harness for running CLI commands against a temporary database.
pub struct CliTestHarness {
    _temp_dir: TempDir,
    db_path: PathBuf,
}

impl CliTestHarness {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");

        Self {
            _temp_dir: temp_dir,
            db_path,
        }
    }

    /// A Command wired to the jour binary and this harness's database.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("jour").expect("Failed to find jour binary");
        cmd.env("JOUR_DATABASE_PATH", &self.db_path);
        cmd
    }

    pub fn db_path(&self) -> &std::path::Path {
        &self.db_path
    }

    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Runs `jour add` with the given arguments and returns the short ID the
    /// command printed.
    pub fn add_and_capture_id(&self, args: &[&str]) -> String {
        let output = self.run_success(args).get_output().stdout.clone();
        let text = String::from_utf8_lossy(&output);
        extract_short_id(&text).expect("add output did not contain a short ID")
    }
}

/// Finds the first eight-character lowercase-hex run in CLI output. Short IDs
/// are the only tokens of that shape the views print; dates and times are
/// broken up by separators and ANSI escapes carry no hex runs that long.
pub fn extract_short_id(output: &str) -> Option<String> {
    let mut run = String::new();
    for ch in output.chars().chain(std::iter::once('\n')) {
        if matches!(ch, '0'..='9' | 'a'..='f') {
            run.push(ch);
        } else {
            if run.len() == 8 {
                return Some(run);
            }
            run.clear();
        }
    }
    None
}

/// Utility predicates shared across the test suite.
pub mod assertions {
    use predicates::prelude::*;

    pub fn has_task_table_headers() -> impl Predicate<str> {
        predicate::str::contains("ID")
            .and(predicate::str::contains("Title"))
            .and(predicate::str::contains("Status"))
    }

    pub fn has_day_view_headers() -> impl Predicate<str> {
        predicate::str::contains("Time")
            .and(predicate::str::contains("Task"))
            .and(predicate::str::contains("Priority"))
    }

    pub fn task_created_successfully() -> impl Predicate<str> {
        predicate::str::contains("Created task")
            .or(predicate::str::contains("Created recurring task"))
    }

    pub fn empty_result() -> impl Predicate<str> {
        predicate::str::contains("No tasks found")
            .or(predicate::str::contains("Nothing scheduled"))
    }

    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error").or(predicate::str::contains("error"))
    }
}
