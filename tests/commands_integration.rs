//! Integration tests for the gitkit binary.
//!
//! These tests run the built binary against real git repositories and
//! captured git output.

use std::path::Path;
use std::process::Command;

use assert_cmd::Command as BinCommand;
use predicates::prelude::*;
use tempfile::TempDir;

// =============================================================================
// Test Fixtures
// =============================================================================

/// Test fixture with a repository on `main` and an isolated home directory.
struct TestRepo {
    dir: TempDir,
    home: TempDir,
}

impl TestRepo {
    /// Create a new test repository with an initial commit on main.
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");

        run_git(dir.path(), &["init"]);
        run_git(dir.path(), &["symbolic-ref", "HEAD", "refs/heads/main"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Test User"]);

        std::fs::write(dir.path().join("README.md"), "# Test Repo\n").unwrap();
        run_git(dir.path(), &["add", "README.md"]);
        run_git(dir.path(), &["commit", "-m", "Initial commit"]);

        Self { dir, home }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create a file and commit it.
    fn commit(&self, filename: &str, content: &str, message: &str) {
        std::fs::write(self.path().join(filename), content).unwrap();
        run_git(self.path(), &["add", filename]);
        run_git(self.path(), &["commit", "-m", message]);
    }

    /// Get HEAD hash.
    fn head(&self) -> String {
        git_stdout(self.path(), &["rev-parse", "HEAD"])
    }

    /// The gitkit binary, run inside this repository.
    fn gitkit(&self) -> BinCommand {
        let mut cmd = gitkit(self.home.path());
        cmd.current_dir(self.path());
        cmd
    }
}

/// The gitkit binary with its config isolated under `home`.
fn gitkit(home: &Path) -> BinCommand {
    let mut cmd = BinCommand::cargo_bin("gitkit").expect("binary not built");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("GITKIT_CONFIG");
    cmd
}

/// Run a git command in the given directory.
fn run_git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");
    assert!(
        status.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&status.stderr)
    );
}

fn git_stdout(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

// =============================================================================
// check
// =============================================================================

mod check {
    use super::*;

    #[test]
    fn valid_value_is_echoed() {
        let home = TempDir::new().unwrap();
        gitkit(home.path())
            .args(["check", "ref-name", "refs/heads/main"])
            .assert()
            .success()
            .stdout("refs/heads/main\n");
    }

    #[test]
    fn git_url_prints_repository_name() {
        let home = TempDir::new().unwrap();
        gitkit(home.path())
            .args(["check", "git-url", "https://example.com/org/project.git"])
            .assert()
            .success()
            .stdout("https://example.com/org/project.git\tproject\n");
    }

    #[test]
    fn invalid_value_fails_with_reason() {
        let home = TempDir::new().unwrap();
        gitkit(home.path())
            .args(["check", "ref-name-component", "feature/x"])
            .assert()
            .failure()
            .code(1)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("feature/x"));
    }

    #[test]
    fn uppercase_sha1_rejected() {
        let home = TempDir::new().unwrap();
        gitkit(home.path())
            .args(["check", "sha1", "ABCDEF0123456789ABCDEF0123456789ABCDEF01"])
            .assert()
            .failure();
    }

    #[test]
    fn unknown_kind_is_usage_error() {
        let home = TempDir::new().unwrap();
        gitkit(home.path())
            .args(["check", "branch", "main"])
            .assert()
            .failure()
            .code(2);
    }
}

// =============================================================================
// parse
// =============================================================================

mod parse {
    use super::*;

    const REFS: &str = "\
aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa refs/heads/main
bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb refs/tags/v1
cccccccccccccccccccccccccccccccccccccccc refs/tags/v1^{}
";

    const LOG: &str = "\
commit 2222222222222222222222222222222222222222 1111111111111111111111111111111111111111
Author:     A U Thor <author@example.com>
AuthorDate: 2024-01-15T10:30:00+01:00
Commit:     A U Thor <author@example.com>
CommitDate: 2024-01-15T10:30:00Z

    Second commit

    With a body

commit 1111111111111111111111111111111111111111
Author:     A U Thor <author@example.com>
AuthorDate: 2024-01-14T09:00:00+01:00
Commit:     A U Thor <author@example.com>
CommitDate: 2024-01-14T09:00:00+01:00

    Initial commit

";

    #[test]
    fn refs_resolve_annotated_tags() {
        let home = TempDir::new().unwrap();
        gitkit(home.path())
            .args(["parse", "refs"])
            .write_stdin(REFS)
            .assert()
            .success()
            .stdout(
                "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa refs/heads/main\n\
                 cccccccccccccccccccccccccccccccccccccccc refs/tags/v1\n",
            );
    }

    #[test]
    fn refs_as_json() {
        let home = TempDir::new().unwrap();
        let output = gitkit(home.path())
            .args(["parse", "refs", "--json"])
            .write_stdin(REFS)
            .output()
            .unwrap();
        assert!(output.status.success());

        let refs: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let refs = refs.as_array().unwrap();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[1]["full_name"], "refs/tags/v1");
        assert_eq!(refs[1]["short_name"], "v1");
        assert_eq!(refs[1]["is_tag"], true);
    }

    #[test]
    fn malformed_refs_fail() {
        let home = TempDir::new().unwrap();
        gitkit(home.path())
            .args(["parse", "refs"])
            .write_stdin("not-a-hash refs/heads/main\n")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to parse ref listing"));
    }

    #[test]
    fn log_prints_short_hash_and_subject() {
        let home = TempDir::new().unwrap();
        gitkit(home.path())
            .args(["parse", "log"])
            .write_stdin(LOG)
            .assert()
            .success()
            .stdout("2222222 Second commit\n1111111 Initial commit\n");
    }

    #[test]
    fn log_as_json() {
        let home = TempDir::new().unwrap();
        let output = gitkit(home.path())
            .args(["parse", "log", "--json"])
            .write_stdin(LOG)
            .output()
            .unwrap();
        assert!(output.status.success());

        let commits: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let first = &commits[0];
        assert_eq!(first["parent_sha1s"][0], "1111111111111111111111111111111111111111");
        assert_eq!(
            first["message_lines"],
            serde_json::json!(["Second commit", "", "With a body"])
        );
    }

    /// A history far larger than a pipe buffer.
    fn long_log(commits: usize) -> String {
        (0..commits)
            .map(|i| {
                format!(
                    "commit {i:040x}\n\
                     Author:     A U Thor <author@example.com>\n\
                     AuthorDate: 2024-01-15T10:30:00+01:00\n\
                     Commit:     A U Thor <author@example.com>\n\
                     CommitDate: 2024-01-15T10:30:00+01:00\n\
                     \n    Commit number {i}\n\n"
                )
            })
            .collect()
    }

    #[test]
    fn closed_stdout_ends_quietly() {
        use assert_cmd::prelude::CommandCargoExt;
        use std::io::Write;
        use std::process::Stdio;

        let home = TempDir::new().unwrap();
        let mut child = Command::cargo_bin("gitkit")
            .expect("binary not built")
            .args(["parse", "log"])
            .env("HOME", home.path())
            .env_remove("GITKIT_CONFIG")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();

        // Reader goes away before anything is read, like `gitkit ... | head -0`
        drop(child.stdout.take());
        let mut stdin = child.stdin.take().unwrap();
        let input = long_log(10_000);
        let writer = std::thread::spawn(move || {
            // gitkit may stop reading once its stdout is gone
            let _ = stdin.write_all(input.as_bytes());
        });

        let output = child.wait_with_output().unwrap();
        writer.join().unwrap();

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(output.status.success(), "stderr: {stderr}");
        assert!(!stderr.contains("panicked"), "stderr: {stderr}");
    }

    #[test]
    fn truncated_log_fails_after_complete_records() {
        let home = TempDir::new().unwrap();
        let truncated = &LOG[..LOG.len() - 2];
        gitkit(home.path())
            .args(["parse", "log"])
            .write_stdin(truncated)
            .assert()
            .failure()
            .stdout("2222222 Second commit\n")
            .stderr(predicate::str::contains("unexpected end of output"));
    }
}

// =============================================================================
// Repository commands
// =============================================================================

mod repository {
    use super::*;

    #[test]
    fn rev_parse_full_and_short() {
        let repo = TestRepo::new();
        let head = repo.head();

        repo.gitkit()
            .args(["rev-parse", "HEAD"])
            .assert()
            .success()
            .stdout(format!("{head}\n"));

        repo.gitkit()
            .args(["rev-parse", "--short=10", "main"])
            .assert()
            .success()
            .stdout(format!("{}\n", &head[..10]));
    }

    #[test]
    fn rev_parse_unknown_rev_fails() {
        let repo = TestRepo::new();
        repo.gitkit()
            .args(["rev-parse", "no-such-branch"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to resolve 'no-such-branch'"));
    }

    #[test]
    fn cwd_flag_selects_repository() {
        let repo = TestRepo::new();
        let elsewhere = TempDir::new().unwrap();

        gitkit(elsewhere.path())
            .current_dir(elsewhere.path())
            .arg("--cwd")
            .arg(repo.path())
            .arg("branch")
            .assert()
            .success()
            .stdout("main\n");
    }

    #[test]
    fn outside_repository_fails() {
        let elsewhere = TempDir::new().unwrap();
        gitkit(elsewhere.path())
            .current_dir(elsewhere.path())
            .arg("branch")
            .assert()
            .failure()
            .stderr(predicate::str::contains("not a git repository"));
    }

    #[test]
    fn branch_warns_when_detached() {
        let repo = TestRepo::new();
        run_git(repo.path(), &["checkout", "--detach"]);

        repo.gitkit()
            .arg("branch")
            .assert()
            .success()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("HEAD is detached"));
    }

    #[test]
    fn log_newest_first_with_limit() {
        let repo = TestRepo::new();
        repo.commit("a.txt", "a\n", "Second commit");
        repo.commit("b.txt", "b\n", "Third commit");
        let head = repo.head();

        repo.gitkit()
            .args(["log", "-n", "2"])
            .assert()
            .success()
            .stdout(format!(
                "{} Third commit\n{} Second commit\n",
                &head[..7],
                &git_stdout(repo.path(), &["rev-parse", "HEAD~1"])[..7]
            ));
    }

    #[test]
    fn log_uses_configured_max_count() {
        let repo = TestRepo::new();
        repo.commit("a.txt", "a\n", "Second commit");

        repo.gitkit()
            .args(["config", "set", "max_count", "1"])
            .assert()
            .success();

        repo.gitkit()
            .arg("log")
            .assert()
            .success()
            .stdout(predicate::str::contains("Second commit"))
            .stdout(predicate::str::contains("Initial commit").not());
    }

    #[test]
    fn log_of_range() {
        let repo = TestRepo::new();
        run_git(repo.path(), &["tag", "base"]);
        repo.commit("a.txt", "a\n", "After base");

        repo.gitkit()
            .args(["log", "base..HEAD"])
            .assert()
            .success()
            .stdout(predicate::str::contains("After base"))
            .stdout(predicate::str::contains("Initial commit").not());
    }

    #[test]
    fn refs_lists_heads_and_tags() {
        let repo = TestRepo::new();
        let head = repo.head();
        run_git(repo.path(), &["tag", "-a", "-m", "Release", "v1"]);

        repo.gitkit()
            .args(["refs", "--heads"])
            .assert()
            .success()
            .stdout(format!("{head} refs/heads/main\n"));

        repo.gitkit()
            .args(["refs", "--tags"])
            .assert()
            .success()
            .stdout(format!("{head} refs/tags/v1\n"));

        repo.gitkit()
            .arg("refs")
            .assert()
            .success()
            .stdout(predicate::str::starts_with(format!("{head} HEAD\n")));
    }

    #[test]
    fn refs_without_tags_is_empty() {
        let repo = TestRepo::new();
        repo.gitkit()
            .args(["refs", "--tags"])
            .assert()
            .success()
            .stdout("");
    }
}

// =============================================================================
// config
// =============================================================================

mod config {
    use super::*;

    #[test]
    fn set_and_get_repo_key() {
        let repo = TestRepo::new();

        repo.gitkit()
            .args(["config", "set", "remote", "upstream"])
            .assert()
            .success()
            .stdout("Set remote = upstream\n");

        repo.gitkit()
            .args(["config", "get", "remote"])
            .assert()
            .success()
            .stdout("upstream\n");

        assert!(repo.path().join(".git/gitkit/config.toml").exists());
    }

    #[test]
    fn repo_key_shared_with_linked_worktree() {
        let repo = TestRepo::new();
        let worktree = TempDir::new().unwrap();
        let wt_path = worktree.path().join("wt");
        run_git(
            repo.path(),
            &["worktree", "add", "-b", "wt", wt_path.to_str().unwrap()],
        );

        gitkit(repo.home.path())
            .current_dir(&wt_path)
            .args(["config", "set", "remote", "upstream"])
            .assert()
            .success();

        assert!(repo.path().join(".git/gitkit/config.toml").exists());
        repo.gitkit()
            .args(["config", "get", "remote"])
            .assert()
            .success()
            .stdout("upstream\n");
    }

    #[test]
    fn set_global_key_writes_under_home() {
        let repo = TestRepo::new();

        repo.gitkit()
            .args(["config", "set", "short_sha_length", "12"])
            .assert()
            .success();

        assert!(repo.home.path().join(".gitkit/config.toml").exists());

        repo.gitkit()
            .args(["rev-parse", "--short", "HEAD"])
            .assert()
            .success()
            .stdout(format!("{}\n", &repo.head()[..12]));
    }

    #[test]
    fn list_shows_defaults() {
        let repo = TestRepo::new();
        repo.gitkit()
            .args(["config", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("remote = origin  # repo"))
            .stdout(predicate::str::contains("max_count = (not set)  # repo"))
            .stdout(predicate::str::contains("git_program = git  # global"));
    }

    #[test]
    fn unknown_key_fails() {
        let repo = TestRepo::new();
        repo.gitkit()
            .args(["config", "get", "trunk"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown configuration key: trunk"));
    }

    #[test]
    fn invalid_count_fails() {
        let repo = TestRepo::new();
        repo.gitkit()
            .args(["config", "set", "max_count", "many"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("max_count must be a positive integer"));
    }

    #[test]
    fn configured_git_program_is_used() {
        let repo = TestRepo::new();
        std::fs::create_dir_all(repo.home.path().join(".gitkit")).unwrap();
        std::fs::write(
            repo.home.path().join(".gitkit/config.toml"),
            "git_program = \"definitely-not-git\"\n",
        )
        .unwrap();

        repo.gitkit()
            .args(["rev-parse", "HEAD"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("definitely-not-git"));
    }
}

// =============================================================================
// completion
// =============================================================================

#[test]
fn completion_generates_script() {
    let home = TempDir::new().unwrap();
    gitkit(home.path())
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gitkit"));
}
