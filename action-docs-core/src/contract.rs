//! # contract: seams between the pipeline and the outside world
//!
//! The pipeline touches three external collaborators: a process runner for
//! `git`, the identity used to author commits, and the sink that receives
//! named outputs. Each is a trait here so that production code wires real
//! implementations (see [`crate::publish`]) while tests inject mocks.
//!
//! ## Mocking & Testing
//! - The traits are annotated for `mockall`. With the `test-export-mocks`
//!   feature (on by default) the generated `Mock*` types are exported for
//!   integration tests in this and dependent crates.

use std::io;

use mockall::automock;

use crate::error::DocResult;

/// Captured result of a finished child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    /// Exit code, `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn ok() -> Self {
        Self {
            success: true,
            code: Some(0),
            ..Default::default()
        }
    }

    pub fn failed(code: i32, stderr: &str) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }
}

/// Runs an external program to completion.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait CommandRunner {
    /// Runs `program` with `args` and waits for it.
    ///
    /// An `Err` means the process could not be started; a non-zero exit is
    /// reported through [`CommandOutput::success`].
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput>;
}

/// Supplies the identity commits are authored with.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait IdentityProvider {
    /// Login of the user the commit is attributed to.
    fn actor(&self) -> DocResult<String>;

    /// Host used for the noreply address, e.g. `github.com`.
    fn host(&self) -> String;
}

/// Receives named program outputs.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait OutputSink {
    fn set_output(&self, name: &str, value: &str) -> DocResult<()>;
}
