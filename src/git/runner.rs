//! git::runner
//!
//! External process invocation for the git executable.
//!
//! # Modes
//!
//! - [`GitRunner::run`] waits for the command and captures all of its output.
//! - [`GitRunner::spawn_lines`] hands back a [`LineStream`] that reads stdout
//!   incrementally while the command is still running.
//!
//! This is the only module that spawns processes.
//!
//! # Early Termination
//!
//! A [`LineStream`] that is dropped before its output has been fully read
//! kills and reaps its child. Consumers can stop reading at any point without
//! draining the rest of the output.

use std::ffi::OsStr;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread::JoinHandle;

use super::GitError;

/// Captured result of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// The command line, for diagnostics
    pub command_line: String,
    /// Everything written to stdout
    pub stdout: String,
    /// Everything written to stderr
    pub stderr: String,
    /// Exit code, or `None` if the process was killed by a signal
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    /// Whether the command exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Whether the exit code is one of `codes`.
    pub fn exited_with(&self, codes: &[i32]) -> bool {
        self.exit_code.is_some_and(|code| codes.contains(&code))
    }

    /// Stdout followed by stderr.
    pub fn combined_output(&self) -> String {
        let mut combined = String::with_capacity(self.stdout.len() + self.stderr.len());
        combined.push_str(&self.stdout);
        if !self.stdout.is_empty() && !self.stdout.ends_with('\n') && !self.stderr.is_empty() {
            combined.push('\n');
        }
        combined.push_str(&self.stderr);
        combined
    }

    /// Convert into [`GitError::CommandFailed`] carrying this output.
    pub fn into_error(self, message: impl Into<String>) -> GitError {
        let output = self.combined_output();
        GitError::CommandFailed {
            message: message.into(),
            command: self.command_line,
            exit_code: self.exit_code,
            output,
        }
    }
}

/// Runs a git executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRunner {
    program: String,
}

impl Default for GitRunner {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitRunner {
    /// Create a runner for the given program (a name on `PATH` or a path).
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The program this runner invokes.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run a command in `dir` and capture its output.
    ///
    /// A non-zero exit code is not an error here; callers decide which exit
    /// codes they accept.
    ///
    /// # Errors
    ///
    /// - [`GitError::Spawn`] if the program could not be started
    pub fn run<I, S>(&self, dir: &Path, args: I) -> Result<CommandOutput, GitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let (mut command, command_line) = self.command(dir, args);
        tracing::debug!(command = %command_line, dir = %dir.display(), "running git");

        let output = command
            .stdin(Stdio::null())
            .output()
            .map_err(|source| GitError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let result = CommandOutput {
            command_line,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        };
        tracing::debug!(command = %result.command_line, exit_code = ?result.exit_code, "git exited");

        Ok(result)
    }

    /// Start a command in `dir` and stream its stdout.
    ///
    /// # Errors
    ///
    /// - [`GitError::Spawn`] if the program could not be started
    pub fn spawn_lines<I, S>(&self, dir: &Path, args: I) -> Result<LineStream, GitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let (mut command, command_line) = self.command(dir, args);
        tracing::debug!(command = %command_line, dir = %dir.display(), "spawning git");

        let spawn_error = |source| GitError::Spawn {
            program: self.program.clone(),
            source,
        };

        let mut child = command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        let stdout = child.stdout.take().ok_or_else(|| {
            spawn_error(io::Error::new(io::ErrorKind::BrokenPipe, "stdout not captured"))
        })?;

        // Drain stderr on its own thread so a chatty child never blocks on a full pipe
        let stderr = child.stderr.take().map(|mut pipe| {
            std::thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = pipe.read_to_end(&mut buf);
                String::from_utf8_lossy(&buf).into_owned()
            })
        });

        Ok(LineStream {
            command_line,
            reader: BufReader::new(stdout),
            child: Some(child),
            stderr,
        })
    }

    fn command<I, S>(&self, dir: &Path, args: I) -> (Command, String)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(&self.program);
        command.current_dir(dir);

        let mut command_line = self.program.clone();
        for arg in args {
            let arg = arg.as_ref();
            command_line.push(' ');
            command_line.push_str(&quote(&arg.to_string_lossy()));
            command.arg(arg);
        }

        (command, command_line)
    }
}

/// Quote an argument for display if it contains whitespace or is empty.
fn quote(arg: &str) -> String {
    if arg.is_empty() || arg.contains(char::is_whitespace) || arg.contains('"') {
        format!("\"{}\"", arg.replace('"', "\\\""))
    } else {
        arg.to_string()
    }
}

/// Stdout of a running git command.
///
/// Implements [`BufRead`], so it can feed any line-oriented parser directly.
pub struct LineStream {
    command_line: String,
    reader: BufReader<ChildStdout>,
    child: Option<Child>,
    stderr: Option<JoinHandle<String>>,
}

impl std::fmt::Debug for LineStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineStream")
            .field("command_line", &self.command_line)
            .field("running", &self.child.is_some())
            .finish()
    }
}

impl LineStream {
    /// The command line, for diagnostics.
    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    /// Read any unread stdout, wait for the process, and report how it exited.
    ///
    /// The returned output's `stdout` holds only what had not been read yet.
    /// Calling this twice reports the first result's exit code as `None`.
    pub fn finish(&mut self) -> Result<CommandOutput, GitError> {
        let mut rest = Vec::new();
        self.reader.read_to_end(&mut rest)?;

        let exit_code = match self.child.take() {
            Some(mut child) => child.wait()?.code(),
            None => None,
        };
        let stderr = self.join_stderr();

        tracing::debug!(command = %self.command_line, exit_code = ?exit_code, "git exited");

        Ok(CommandOutput {
            command_line: self.command_line.clone(),
            stdout: String::from_utf8_lossy(&rest).into_owned(),
            stderr,
            exit_code,
        })
    }

    fn join_stderr(&mut self) -> String {
        self.stderr
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default()
    }
}

impl Read for LineStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl BufRead for LineStream {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.reader.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt)
    }
}

impl Drop for LineStream {
    fn drop(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };

        if let Ok(None) = child.try_wait() {
            tracing::warn!(command = %self.command_line, "killing git before end of output");
            let _ = child.kill();
        }
        let _ = child.wait();
        let _ = self.join_stderr();
    }
}
