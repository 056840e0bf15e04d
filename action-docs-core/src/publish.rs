//! Delivery of rendered documentation.
//!
//! Two paths exist. [`publish_as_output`] hands the text to an [`OutputSink`]
//! under the name `doc`. [`publish_as_commit`] splices the text between the
//! markers of the target file, writes it back and commits the file with `git`.
//! The git sequence is a single external side effect: the first failing
//! command aborts the rest and nothing is rolled back.

use std::env;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::NamedTempFile;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::contract::{CommandOutput, CommandRunner, IdentityProvider, OutputSink};
use crate::error::{DocError, DocResult};
use crate::markers;

/// Name of the output carrying the rendered documentation.
pub const DOC_OUTPUT: &str = "doc";

pub const COMMIT_MESSAGE: &str = "bot: GHA doc";

/// Runs commands in the current directory with `std::process::Command`,
/// capturing their output.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        let output = Command::new(program).args(args).output()?;
        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Reads the commit identity from the GitHub Actions environment
/// (`GITHUB_ACTOR`, `GITHUB_SERVER_URL`) each time it is asked.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvIdentity;

impl IdentityProvider for EnvIdentity {
    fn actor(&self) -> DocResult<String> {
        match env::var("GITHUB_ACTOR") {
            Ok(actor) if !actor.trim().is_empty() => Ok(actor),
            _ => Err(DocError::Identity(
                "GITHUB_ACTOR environment variable not set".to_string(),
            )),
        }
    }

    fn host(&self) -> String {
        env::var("GITHUB_SERVER_URL")
            .ok()
            .map(|url| host_of(&url))
            .filter(|host| !host.is_empty())
            .unwrap_or_else(|| "github.com".to_string())
    }
}

fn host_of(url: &str) -> String {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    without_scheme
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// A fixed identity, for explicit injection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticIdentity {
    pub actor: String,
    pub host: String,
}

impl StaticIdentity {
    pub fn new(actor: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            host: host.into(),
        }
    }
}

impl IdentityProvider for StaticIdentity {
    fn actor(&self) -> DocResult<String> {
        Ok(self.actor.clone())
    }

    fn host(&self) -> String {
        self.host.clone()
    }
}

/// Appends outputs to the file named by `GITHUB_OUTPUT`, using the
/// multi-line `name<<DELIMITER` form.
#[derive(Debug, Clone)]
pub struct GithubOutputFile {
    path: PathBuf,
}

impl GithubOutputFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// `None` when `GITHUB_OUTPUT` is unset or empty.
    pub fn from_env() -> Option<Self> {
        env::var_os("GITHUB_OUTPUT")
            .filter(|p| !p.is_empty())
            .map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for GithubOutputFile {
    fn set_output(&self, name: &str, value: &str) -> DocResult<()> {
        let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
        if name.contains(&delimiter) || value.contains(&delimiter) {
            return Err(DocError::Output(format!(
                "output `{name}` collides with delimiter {delimiter}"
            )));
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| DocError::Output(format!("{}: {e}", self.path.display())))?;
        write!(file, "{name}<<{delimiter}\n{value}\n{delimiter}\n")
            .map_err(|e| DocError::Output(format!("{}: {e}", self.path.display())))?;

        debug!(output = name, path = %self.path.display(), "Wrote output to GITHUB_OUTPUT");
        Ok(())
    }
}

/// Prints output values to stdout; used outside of GitHub Actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn set_output(&self, name: &str, value: &str) -> DocResult<()> {
        debug!(output = name, "Printing output to stdout");
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(value.as_bytes())
            .and_then(|_| handle.flush())
            .map_err(|e| DocError::Output(e.to_string()))
    }
}

/// Exposes `content` as the `doc` output.
pub fn publish_as_output(content: &str, sink: &dyn OutputSink) -> DocResult<()> {
    sink.set_output(DOC_OUTPUT, content)?;
    info!(output = DOC_OUTPUT, bytes = content.len(), "Published documentation as output");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    /// The marked region already held the rendered text; nothing was written.
    Unchanged,
}

/// Splices `content` into the file at `path`, then stages, commits and
/// pushes it.
pub fn publish_as_commit(
    content: &str,
    path: &Path,
    git: &dyn CommandRunner,
    identity: &dyn IdentityProvider,
) -> DocResult<CommitOutcome> {
    let existing = fs::read_to_string(path).map_err(|e| DocError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let patched = markers::splice(&existing, content)?;

    if patched == existing {
        info!(path = %path.display(), "Documentation already up to date, skipping commit");
        return Ok(CommitOutcome::Unchanged);
    }

    let actor = identity.actor()?;
    let email = format!("{actor}@users.noreply.{}", identity.host());

    write_atomic(path, &patched)?;
    info!(path = %path.display(), bytes = patched.len(), "Patched output file");

    let target = path.to_string_lossy().into_owned();

    let steps: [Vec<&str>; 6] = [
        vec!["config", "--local", "user.name", actor.as_str()],
        vec!["config", "--local", "user.email", email.as_str()],
        vec!["fetch", "--depth=1", "origin", "+refs/tags/*:refs/tags/*"],
        vec!["add", target.as_str()],
        vec!["commit", "-m", COMMIT_MESSAGE],
        vec!["push"],
    ];
    for step in steps {
        let args: Vec<String> = step.into_iter().map(String::from).collect();
        run_git(git, &args)?;
    }

    info!(path = %path.display(), actor = %actor, "Committed and pushed documentation");
    Ok(CommitOutcome::Committed)
}

fn run_git(git: &dyn CommandRunner, args: &[String]) -> DocResult<()> {
    let command = format!("git {}", args.join(" "));
    debug!(command = %command, "Running git");

    match git.run("git", args) {
        Ok(output) if output.success => {
            debug!(command = %command, stdout = %output.stdout.trim(), "git succeeded");
            Ok(())
        }
        Ok(output) => {
            let status = output
                .code
                .map_or_else(|| "terminated by signal".to_string(), |c| format!("exit code {c}"));
            error!(command = %command, %status, stderr = %output.stderr.trim(), "git exited with failure");
            Err(DocError::Commit {
                command,
                detail: format!("{status}: {}", output.stderr.trim()),
            })
        }
        Err(e) => {
            error!(error = ?e, command = %command, "Failed to launch git process");
            Err(DocError::Commit {
                command,
                detail: e.to_string(),
            })
        }
    }
}

/// Writes `content` to `path` through a temporary file in the same directory.
///
/// Symlinks are followed so the link itself survives, and the target keeps
/// its permissions.
pub fn write_atomic(path: &Path, content: &str) -> DocResult<()> {
    let write_err = |source: io::Error| DocError::Write {
        path: path.to_path_buf(),
        source,
    };
    let target = fs::canonicalize(path).map_err(write_err)?;
    let permissions = fs::metadata(&target).map_err(write_err)?.permissions();
    let dir = target.parent().unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(content.as_bytes()).map_err(write_err)?;
    tmp.as_file().set_permissions(permissions).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(&target).map_err(|e| write_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_of_strips_scheme_and_path() {
        assert_eq!(host_of("https://github.example.com/"), "github.example.com");
        assert_eq!(host_of("github.com"), "github.com");
    }
}
