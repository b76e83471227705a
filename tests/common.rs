#![allow(dead_code)]
use assert_cmd::assert::Assert;
use assert_cmd::{Command, cargo_bin_cmd};
use std::path::PathBuf;
use tempfile::TempDir;

/// Fixed wall clock for every command, so day boundaries are predictable.
pub const NOW: &str = "2025-09-10 10:00";

pub fn rpf() -> Command {
    cargo_bin_cmd!("rpetfeed")
}

/// A throw-away home directory holding the test database.
pub struct TestDb {
    pub dir: TempDir,
    pub path: String,
}

impl TestDb {
    pub fn file(&self, name: &str) -> String {
        self.dir.path().join(name).to_string_lossy().to_string()
    }

    fn base(&self, now: &str) -> Command {
        let mut cmd = rpf();
        cmd.env("HOME", self.dir.path())
            .env("APPDATA", self.dir.path())
            .args(["--db", &self.path, "--test", "--no-color", "--now", now]);
        cmd
    }

    /// Run a subcommand at [`NOW`].
    pub fn run(&self, args: &[&str]) -> Assert {
        self.base(NOW).args(args).assert()
    }

    /// Run a subcommand at another moment.
    pub fn run_at(&self, now: &str, args: &[&str]) -> Assert {
        self.base(now).args(args).assert()
    }

    pub fn stdout(&self, args: &[&str]) -> String {
        let out = self.run(args).success().get_output().stdout.clone();
        String::from_utf8_lossy(&out).to_string()
    }

    /// `list --json` parsed.
    pub fn list_json(&self) -> serde_json::Value {
        let out = self.stdout(&["list", "--json"]);
        // main prints an empty line before the command output
        serde_json::from_str(out.trim()).expect("list --json output")
    }

    /// Pet ids in display order.
    pub fn listed_ids(&self) -> Vec<i64> {
        self.list_json()["entries"]
            .as_array()
            .expect("entries")
            .iter()
            .map(|e| e["pet_id"].as_i64().expect("pet_id"))
            .collect()
    }
}

/// Create a fresh database through `init` (with its sample pet).
pub fn setup_test_db() -> TestDb {
    let dir = tempfile::tempdir().expect("tempdir");
    let path: PathBuf = dir.path().join("rpetfeed_test.sqlite");
    let db = TestDb {
        path: path.to_string_lossy().to_string(),
        dir,
    };
    db.run(&["init"]).success();
    db
}

/// Fresh database without the sample pet.
pub fn setup_empty_db() -> TestDb {
    let db = setup_test_db();
    db.run(&["del", "1", "--yes"]).success();
    db
}

/// Add a pet and return its id.
pub fn add_pet(db: &TestDb, name: &str, kind: &str, extra: &[&str]) -> i64 {
    let before = db.listed_ids();
    let mut args = vec!["add", name, kind];
    args.extend_from_slice(extra);
    db.run(&args).success();

    db.listed_ids()
        .into_iter()
        .find(|id| !before.contains(id))
        .expect("new pet id")
}
