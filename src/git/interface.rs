//! git::interface
//!
//! Repository facade over the git command line.
//!
//! Every operation runs one (occasionally two) git commands through
//! [`GitRunner`] and either checks the exit code or hands stdout to the
//! parsers in [`crate::core`].
//!
//! # Error Handling
//!
//! Failures are normalized into [`GitError`]:
//! - [`GitError::NotARepo`]: No repository at or above the given path
//! - [`GitError::CommandFailed`]: git exited with an unexpected code; carries
//!   the command line, exit code and combined output
//! - [`GitError::Parse`]: git succeeded but its output had the wrong shape
//! - [`GitError::DirtyWorktree`]: Refused to check out over local changes
//!
//! # Example
//!
//! ```no_run
//! use gitkit::core::types::{RefNameComponent, Rev};
//! use gitkit::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! let head = git.commit_id(&Rev::head())?;
//! git.create_branch(&RefNameComponent::new("topic")?, &head)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::iter::FusedIterator;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use thiserror::Error;

use super::runner::{CommandOutput, GitRunner, LineStream};
use crate::core::error::ParseError;
use crate::core::refs::{parse_refs, Ref};
use crate::core::rev_list::{CommitInfo, RevList};
use crate::core::types::{
    FormatError, FullRefName, GitUrl, RefName, RefNameComponent, RepositoryName, Rev, Revision,
    Sha1, ShortSha1,
};

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// No repository at or above the given path.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Tried to initialise a repository where one already exists.
    #[error("path is already a git repository: {path}")]
    AlreadyARepo {
        /// The existing repository
        path: PathBuf,
    },

    /// An argument was out of range or blank.
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// The parameter name
        name: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// Git returned a value that is not a valid identifier.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Git output did not have the expected shape.
    #[error("unexpected output from '{command}': {source}")]
    Parse {
        /// The command whose output was rejected
        command: String,
        /// Where parsing failed
        source: ParseError,
    },

    /// Git exited with a status the operation does not accept.
    #[error("{message} (exit code {}): {command}\n{output}", .exit_code.map_or("none".to_string(), |c| c.to_string()))]
    CommandFailed {
        /// What was being attempted
        message: String,
        /// The command line
        command: String,
        /// Exit code, or `None` if killed by a signal
        exit_code: Option<i32>,
        /// Combined stdout and stderr
        output: String,
    },

    /// The git program could not be started.
    #[error("failed to run '{program}': {source}")]
    Spawn {
        /// The program that was invoked
        program: String,
        /// The underlying OS error
        source: std::io::Error,
    },

    /// Working tree has uncommitted changes.
    #[error("repository contains uncommitted changes: {path}")]
    DirtyWorktree {
        /// The repository path
        path: PathBuf,
    },

    /// A ref that must not exist already does.
    #[error("'{name}' already exists")]
    AlreadyExists {
        /// The existing ref
        name: String,
    },

    /// Filesystem or pipe error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A git repository with a working tree.
///
/// Holds the absolute path of the repository root, the repository's name
/// (its directory name) and the runner used for every command.
#[derive(Debug)]
pub struct Git {
    path: PathBuf,
    name: RepositoryName,
    runner: GitRunner,
}

impl Git {
    // =========================================================================
    // Discovery and creation
    // =========================================================================

    /// Whether `path` is the root of a repository (has a `.git` entry).
    pub fn is_repository(path: &Path) -> bool {
        path.is_dir() && path.join(".git").exists()
    }

    /// Find the repository containing `path`, searching upwards.
    ///
    /// Returns `Ok(None)` if no ancestor is a repository.
    pub fn find_containing_repository(path: &Path) -> Result<Option<Self>, GitError> {
        let path = absolute(path)?;
        match path.ancestors().find(|dir| Self::is_repository(dir)) {
            Some(root) => Ok(Some(Self::at(root.to_path_buf(), GitRunner::default())?)),
            None => Ok(None),
        }
    }

    /// Open the repository containing `path`.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    /// - [`GitError::Format`] if the repository directory is not a valid
    ///   [`RepositoryName`]
    pub fn open(path: &Path) -> Result<Self, GitError> {
        Self::find_containing_repository(path)?.ok_or_else(|| GitError::NotARepo {
            path: path.to_path_buf(),
        })
    }

    /// Open the repository containing `path`, running commands with `runner`.
    pub fn open_with(path: &Path, runner: GitRunner) -> Result<Self, GitError> {
        Ok(Self::open(path)?.with_runner(runner))
    }

    /// Initialise a new repository, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// - [`GitError::AlreadyARepo`] if `path` is already a repository root
    pub fn init(path: &Path) -> Result<Self, GitError> {
        let path = absolute(path)?;
        std::fs::create_dir_all(&path)?;

        if Self::is_repository(&path) {
            return Err(GitError::AlreadyARepo { path });
        }

        let runner = GitRunner::default();
        let output = runner.run(&path, ["init"])?;
        if !output.success() {
            return Err(output.into_error("Initialising repository failed"));
        }

        Self::at(path, runner)
    }

    /// Clone `url` into a new directory under `parent`.
    ///
    /// The directory is named after the URL's repository name.
    pub fn clone(parent: &Path, url: &GitUrl) -> Result<Self, GitError> {
        if !parent.is_dir() {
            return Err(GitError::InvalidArgument {
                name: "parent",
                reason: format!("directory does not exist: {}", parent.display()),
            });
        }
        let parent = absolute(parent)?;
        let directory = url.repository_name().as_str();

        let runner = GitRunner::default();
        let output = runner.run(&parent, ["clone", url.as_str(), directory])?;
        if !output.success() {
            return Err(output.into_error("Cloning repository failed"));
        }

        Self::at(parent.join(directory), runner)
    }

    fn at(path: PathBuf, runner: GitRunner) -> Result<Self, GitError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = RepositoryName::new(file_name)?;
        Ok(Self { path, name, runner })
    }

    /// Replace the runner used for subsequent commands.
    pub fn with_runner(mut self, runner: GitRunner) -> Self {
        self.runner = runner;
        self
    }

    /// Absolute path of the repository root.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The git directory shared by every worktree of the repository.
    ///
    /// In a linked worktree or a submodule `.git` is a file pointing
    /// elsewhere, so git is asked rather than assuming `<path>/.git`.
    pub fn git_dir(&self) -> Result<PathBuf, GitError> {
        let output = self.run_checked(
            "Locate git directory failed",
            &["rev-parse", "--git-common-dir"],
        )?;
        // Relative to the working directory unless git printed an absolute path
        Ok(self.path.join(output.stdout.trim()))
    }

    /// The repository name, taken from its directory name.
    pub fn name(&self) -> &RepositoryName {
        &self.name
    }

    pub fn runner(&self) -> &GitRunner {
        &self.runner
    }

    // =========================================================================
    // Command helpers
    // =========================================================================

    fn run<S: AsRef<std::ffi::OsStr>>(&self, args: &[S]) -> Result<CommandOutput, GitError> {
        self.runner.run(&self.path, args)
    }

    /// Run a command that must exit with 0.
    fn run_checked<S: AsRef<std::ffi::OsStr>>(
        &self,
        message: &str,
        args: &[S],
    ) -> Result<CommandOutput, GitError> {
        let output = self.run(args)?;
        if !output.success() {
            return Err(output.into_error(message));
        }
        Ok(output)
    }

    /// Run a listing command and parse its ref lines.
    ///
    /// `show-ref` exits with 1 when nothing matches, so callers pass the exit
    /// codes that mean success.
    fn list_refs(&self, message: &str, args: &[&str], accept: &[i32]) -> Result<Vec<Ref>, GitError> {
        let output = self.run(args)?;
        if !output.exited_with(accept) {
            return Err(output.into_error(message));
        }
        parse_refs(&output.stdout).map_err(|source| GitError::Parse {
            command: output.command_line,
            source,
        })
    }

    // =========================================================================
    // Commits
    // =========================================================================

    /// Resolve a revision to the full hash of the commit it names.
    ///
    /// Annotated tags are peeled to their commit.
    pub fn commit_id(&self, rev: &impl Revision) -> Result<Sha1, GitError> {
        operand("rev", rev.as_rev())?;
        let peeled = Rev::peel_to_commit(rev);
        let output = self.run_checked(
            "Resolve rev to commit sha1 failed",
            &["rev-parse", "-q", "--verify", peeled.as_str()],
        )?;
        Ok(Sha1::new(output.stdout.trim())?)
    }

    /// Resolve a revision, returning `None` if it names no commit.
    pub fn try_commit_id(&self, rev: &impl Revision) -> Result<Option<Sha1>, GitError> {
        match self.commit_id(rev) {
            Ok(sha1) => Ok(Some(sha1)),
            Err(GitError::CommandFailed { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Whether a revision resolves to a commit.
    pub fn exists(&self, rev: &impl Revision) -> Result<bool, GitError> {
        Ok(self.try_commit_id(rev)?.is_some())
    }

    /// Full hash of the checked-out commit.
    pub fn head_commit_id(&self) -> Result<Sha1, GitError> {
        self.commit_id(&Rev::head())
    }

    /// Resolve a revision to an abbreviated hash.
    ///
    /// `min_len` of `None` lets git pick a length that is unique in this
    /// repository.
    ///
    /// # Errors
    ///
    /// - [`GitError::InvalidArgument`] if `min_len` is outside 4..=40
    pub fn short_commit_id(
        &self,
        rev: &impl Revision,
        min_len: Option<usize>,
    ) -> Result<ShortSha1, GitError> {
        let length = match min_len {
            None => "auto".to_string(),
            Some(len) if (ShortSha1::MIN_LEN..=Sha1::LEN).contains(&len) => len.to_string(),
            Some(len) => {
                return Err(GitError::InvalidArgument {
                    name: "min_len",
                    reason: format!(
                        "must be between {} and {}, got {}",
                        ShortSha1::MIN_LEN,
                        Sha1::LEN,
                        len
                    ),
                })
            }
        };

        let short = format!("--short={length}");
        operand("rev", rev.as_rev())?;
        let peeled = Rev::peel_to_commit(rev);
        let output = self.run_checked(
            "Resolve rev to short commit sha1 failed",
            &["rev-parse", short.as_str(), peeled.as_str()],
        )?;
        Ok(ShortSha1::new(output.stdout.trim())?)
    }

    // =========================================================================
    // Branches
    // =========================================================================

    /// The checked-out branch, or `None` if HEAD is detached.
    ///
    /// Works on an unborn branch (a repository with no commits yet).
    pub fn current_branch(&self) -> Result<Option<RefName>, GitError> {
        let output = self.run(&["symbolic-ref", "-q", "--short", "HEAD"])?;
        match output.exit_code {
            Some(0) => Ok(Some(RefName::new(output.stdout.trim())?)),
            Some(1) => Ok(None),
            _ => Err(output.into_error("Get current branch failed")),
        }
    }

    /// Local branches and the commits they point to.
    pub fn branches(&self) -> Result<Vec<Ref>, GitError> {
        self.list_refs("Get branches failed", &["show-ref", "--heads"], &[0, 1])
    }

    /// Branches on `remote` and the commits they point to.
    pub fn remote_branches(&self, remote: &str) -> Result<Vec<Ref>, GitError> {
        check_remote(remote)?;
        self.list_refs(
            "Get remote branches failed",
            &["ls-remote", "--heads", remote],
            &[0],
        )
    }

    /// Create a branch at `target`. Fails if the branch exists.
    pub fn create_branch(
        &self,
        name: &RefNameComponent,
        target: &impl Revision,
    ) -> Result<(), GitError> {
        self.run_checked(
            "Create branch failed",
            &[
                "branch",
                operand("name", name.as_str())?,
                operand("target", target.as_rev())?,
            ],
        )?;
        Ok(())
    }

    /// Create a branch at `target`, or move it there if it exists.
    pub fn create_or_move_branch(
        &self,
        name: &RefNameComponent,
        target: &impl Revision,
    ) -> Result<(), GitError> {
        self.run_checked(
            "Create or move branch failed",
            &[
                "branch",
                "-f",
                operand("name", name.as_str())?,
                operand("target", target.as_rev())?,
            ],
        )?;
        Ok(())
    }

    /// Delete a branch, whether it is a regular or a symbolic branch.
    ///
    /// Regular branches are force-deleted.
    pub fn delete_branch(&self, name: &RefNameComponent) -> Result<(), GitError> {
        let full_name = FullRefName::for_branch(name);
        if self.is_symbolic_ref(&full_name)? {
            return self.delete_symbolic_ref(&full_name);
        }

        self.run_checked(
            "Delete branch failed",
            &["branch", "-D", operand("name", name.as_str())?],
        )?;
        Ok(())
    }

    /// Create a branch that is a symbolic reference to another branch.
    ///
    /// # Errors
    ///
    /// - [`GitError::AlreadyExists`] if a branch named `name` exists
    pub fn create_symbolic_branch(
        &self,
        name: &RefNameComponent,
        target: &RefNameComponent,
    ) -> Result<(), GitError> {
        let full_name = FullRefName::for_branch(name);
        if self
            .branches()?
            .iter()
            .any(|branch| branch.full_name() == &full_name)
        {
            return Err(GitError::AlreadyExists {
                name: full_name.into_string(),
            });
        }

        self.create_symbolic_ref(&full_name, &FullRefName::for_branch(target))
    }

    /// Whether a branch is a symbolic reference.
    pub fn is_symbolic_branch(&self, name: &RefNameComponent) -> Result<bool, GitError> {
        self.is_symbolic_ref(&FullRefName::for_branch(name))
    }

    // =========================================================================
    // Tags
    // =========================================================================

    /// Tags and the commits they point to.
    ///
    /// Annotated tags resolve to the commit they annotate.
    pub fn tags(&self) -> Result<Vec<Ref>, GitError> {
        self.list_refs("Get tags failed", &["show-ref", "--tags", "-d"], &[0, 1])
    }

    /// Tags on `remote` and the commits they point to.
    pub fn remote_tags(&self, remote: &str) -> Result<Vec<Ref>, GitError> {
        check_remote(remote)?;
        self.list_refs("Get remote tags failed", &["ls-remote", "--tags", remote], &[0])
    }

    /// Create a lightweight tag at `target`.
    pub fn create_tag(&self, name: &RefNameComponent, target: &impl Revision) -> Result<(), GitError> {
        self.run_checked(
            "Create tag failed",
            &[
                "tag",
                operand("name", name.as_str())?,
                operand("target", target.as_rev())?,
            ],
        )?;
        Ok(())
    }

    /// Create an annotated tag at `target`.
    pub fn create_annotated_tag(
        &self,
        name: &RefNameComponent,
        target: &impl Revision,
        message: &str,
    ) -> Result<(), GitError> {
        check_message(message)?;
        self.run_checked(
            "Create tag failed",
            &[
                "tag",
                "-a",
                "-m",
                message,
                operand("name", name.as_str())?,
                operand("target", target.as_rev())?,
            ],
        )?;
        Ok(())
    }

    /// Delete a tag.
    pub fn delete_tag(&self, name: &RefNameComponent) -> Result<(), GitError> {
        self.run_checked(
            "Delete tag failed",
            &["tag", "-d", operand("name", name.as_str())?],
        )?;
        Ok(())
    }

    // =========================================================================
    // Refs
    // =========================================================================

    /// All refs, including `HEAD`, with tags dereferenced.
    pub fn refs(&self) -> Result<Vec<Ref>, GitError> {
        self.list_refs(
            "Get refs failed",
            &["show-ref", "--head", "--dereference"],
            &[0, 1],
        )
    }

    /// All refs on `remote`.
    pub fn remote_refs(&self, remote: &str) -> Result<Vec<Ref>, GitError> {
        check_remote(remote)?;
        self.list_refs("Get remote refs failed", &["ls-remote", remote], &[0])
    }

    /// Point `name` at `target` as a symbolic reference.
    pub fn create_symbolic_ref(
        &self,
        name: &FullRefName,
        target: &FullRefName,
    ) -> Result<(), GitError> {
        self.run_checked(
            "Create symbolic ref failed",
            &[
                "symbolic-ref",
                operand("name", name.as_str())?,
                operand("target", target.as_str())?,
            ],
        )?;
        Ok(())
    }

    /// Delete a symbolic reference (not the ref it points to).
    pub fn delete_symbolic_ref(&self, name: &FullRefName) -> Result<(), GitError> {
        self.run_checked(
            "Delete symbolic ref failed",
            &["symbolic-ref", "--delete", operand("name", name.as_str())?],
        )?;
        Ok(())
    }

    /// Whether `name` is a symbolic reference.
    pub fn is_symbolic_ref(&self, name: &FullRefName) -> Result<bool, GitError> {
        Ok(self.symbolic_ref_target(name)?.is_some())
    }

    /// The ref a symbolic reference points to, or `None` if `name` is not
    /// symbolic.
    pub fn symbolic_ref_target(&self, name: &FullRefName) -> Result<Option<FullRefName>, GitError> {
        let output = self.run(&["symbolic-ref", "-q", operand("name", name.as_str())?])?;
        if !output.success() {
            return Ok(None);
        }
        Ok(Some(FullRefName::new(output.stdout.trim())?))
    }

    // =========================================================================
    // Working tree
    // =========================================================================

    /// Whether there are staged, unstaged or untracked changes.
    pub fn has_uncommitted_changes(&self) -> Result<bool, GitError> {
        let output = self.run_checked(
            "Uncommitted changes check failed",
            &["status", "--porcelain"],
        )?;
        Ok(!output.stdout.trim().is_empty())
    }

    /// Stage every change in the working tree.
    pub fn stage_changes(&self) -> Result<(), GitError> {
        self.run_checked("Stage uncommitted changes failed", &["add", "-A"])?;
        Ok(())
    }

    /// Commit staged changes.
    ///
    /// # Errors
    ///
    /// - [`GitError::InvalidArgument`] if `message` is blank
    pub fn commit(&self, message: &str) -> Result<(), GitError> {
        check_message(message)?;
        self.run_checked("Commit failed", &["commit", "-m", message])?;
        Ok(())
    }

    /// Check out a revision.
    ///
    /// # Errors
    ///
    /// - [`GitError::DirtyWorktree`] if there are uncommitted changes
    pub fn checkout(&self, rev: &impl Revision) -> Result<(), GitError> {
        if self.has_uncommitted_changes()? {
            return Err(GitError::DirtyWorktree {
                path: self.path.clone(),
            });
        }

        self.run_checked(
            "Checkout failed",
            &["checkout", operand("rev", rev.as_rev())?],
        )?;
        Ok(())
    }

    /// Whether a path inside the repository is ignored.
    pub fn is_ignored(&self, path: &Path) -> Result<bool, GitError> {
        if path.as_os_str().is_empty() {
            return Err(GitError::InvalidArgument {
                name: "path",
                reason: "must not be empty".to_string(),
            });
        }

        let output = self.run(&[
            std::ffi::OsStr::new("check-ignore"),
            std::ffi::OsStr::new("-q"),
            std::ffi::OsStr::new("--"),
            path.as_os_str(),
        ])?;
        match output.exit_code {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(output.into_error("check-ignore failed")),
        }
    }

    // =========================================================================
    // Remote
    // =========================================================================

    /// Push refs to `remote` atomically.
    ///
    /// Returns git's combined output. Pushing no refs does nothing and
    /// returns an empty string.
    pub fn push(&self, refs: &[FullRefName], remote: &str, dry_run: bool) -> Result<String, GitError> {
        check_remote(remote)?;
        if refs.is_empty() {
            return Ok(String::new());
        }

        let mut args = vec!["push", "--atomic"];
        if dry_run {
            args.push("--dry-run");
        }
        args.push(remote);
        for r in refs {
            args.push(operand("refs", r.as_str())?);
        }

        let output = self.run_checked("Push failed", &args)?;
        Ok(output.combined_output())
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Stream commits reachable from `rev`, newest first.
    ///
    /// Commits are parsed as git produces them. Dropping the stream early
    /// stops the git process.
    pub fn rev_list(
        &self,
        rev: &impl Revision,
        max_count: Option<usize>,
    ) -> Result<RevListStream, GitError> {
        let mut args = vec![
            "rev-list".to_string(),
            "--parents".to_string(),
            "--format=fuller".to_string(),
            "--date=iso-strict".to_string(),
        ];
        if let Some(count) = max_count {
            args.push(format!("--max-count={count}"));
        }
        args.push(operand("rev", rev.as_rev())?.to_string());

        let stream = self.runner.spawn_lines(&self.path, &args)?;
        Ok(RevListStream::new(stream))
    }

    /// Whether `ancestor` is an ancestor of (or the same as) `descendant`.
    pub fn is_ancestor(
        &self,
        ancestor: &impl Revision,
        descendant: &impl Revision,
    ) -> Result<bool, GitError> {
        let output = self.run(&[
            "merge-base",
            "--is-ancestor",
            operand("ancestor", ancestor.as_rev())?,
            operand("descendant", descendant.as_rev())?,
        ])?;
        match output.exit_code {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(output.into_error("merge-base --is-ancestor failed")),
        }
    }

    /// Commits after `from` up to and including `to`, oldest first.
    ///
    /// With `from` of `None`, lists from the start of history.
    pub fn list_commits(
        &self,
        from: Option<&dyn Revision>,
        to: &dyn Revision,
    ) -> Result<Vec<Sha1>, GitError> {
        let rev = match from {
            Some(from) => Rev::new(format!(
                "{}..{}",
                operand("from", from.as_rev())?,
                operand("to", to.as_rev())?
            ))?,
            None => Rev::new(operand("to", to.as_rev())?)?,
        };

        let mut commits = self
            .rev_list(&rev, None)?
            .map(|commit| commit.map(|c| c.sha1().clone()))
            .collect::<Result<Vec<_>, _>>()?;
        commits.reverse();
        Ok(commits)
    }

    /// Number of commits after `from` up to and including `to`.
    pub fn distance(&self, from: Option<&dyn Revision>, to: &dyn Revision) -> Result<usize, GitError> {
        Ok(self.list_commits(from, to)?.len())
    }

    /// The commit date of a revision.
    pub fn committer_date(&self, rev: &impl Revision) -> Result<DateTime<FixedOffset>, GitError> {
        Ok(*self.single_commit(rev)?.commit_date())
    }

    /// The full message of a revision.
    pub fn commit_message(&self, rev: &impl Revision) -> Result<String, GitError> {
        Ok(self.single_commit(rev)?.message().to_string())
    }

    fn single_commit(&self, rev: &impl Revision) -> Result<CommitInfo, GitError> {
        let mut stream = self.rev_list(rev, Some(1))?;
        let command = stream.command_line().to_string();
        match stream.next() {
            Some(commit) => commit,
            None => Err(GitError::Parse {
                command,
                source: ParseError::UnexpectedEnd { line_number: 0 },
            }),
        }
    }
}

/// Lazily parsed `rev-list` output from a running git process.
///
/// Yields commits as their records complete. Once stdout is exhausted the
/// exit status is checked, so a bad revision surfaces as a final
/// [`GitError::CommandFailed`]. The first error ends the stream.
pub struct RevListStream {
    command_line: String,
    parser: RevList<LineStream>,
    finished: bool,
}

impl std::fmt::Debug for RevListStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevListStream")
            .field("command_line", &self.command_line)
            .field("line_number", &self.parser.line_number())
            .field("finished", &self.finished)
            .finish()
    }
}

impl RevListStream {
    fn new(stream: LineStream) -> Self {
        Self {
            command_line: stream.command_line().to_string(),
            parser: RevList::new(stream),
            finished: false,
        }
    }

    /// The command line, for diagnostics.
    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    /// Wait for git and turn a non-zero exit into an error.
    fn finish(&mut self) -> Option<GitError> {
        match self.parser.get_mut().finish() {
            Ok(output) if output.success() => None,
            Ok(output) => Some(output.into_error("rev-list failed")),
            Err(e) => Some(e),
        }
    }
}

impl Iterator for RevListStream {
    type Item = Result<CommitInfo, GitError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.parser.next() {
            Some(Ok(commit)) => Some(Ok(commit)),
            Some(Err(source)) => {
                self.finished = true;
                Some(Err(GitError::Parse {
                    command: self.command_line.clone(),
                    source,
                }))
            }
            None => {
                self.finished = true;
                self.finish().map(Err)
            }
        }
    }
}

impl FusedIterator for RevListStream {}

fn check_remote(remote: &str) -> Result<(), GitError> {
    if remote.trim().is_empty() {
        return Err(GitError::InvalidArgument {
            name: "remote",
            reason: "must not be blank".to_string(),
        });
    }
    operand("remote", remote)?;
    Ok(())
}

/// A value passed to git as a positional argument.
///
/// Identifier grammars allow a leading `-`, which git would parse as an
/// option.
fn operand<'a>(name: &'static str, value: &'a str) -> Result<&'a str, GitError> {
    if value.starts_with('-') {
        return Err(GitError::InvalidArgument {
            name,
            reason: format!("'{value}' would be read as an option"),
        });
    }
    Ok(value)
}

fn check_message(message: &str) -> Result<(), GitError> {
    if message.trim().is_empty() {
        return Err(GitError::InvalidArgument {
            name: "message",
            reason: "must not be blank".to_string(),
        });
    }
    Ok(())
}

/// Make `path` absolute without touching the filesystem.
fn absolute(path: &Path) -> Result<PathBuf, GitError> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
