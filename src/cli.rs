//!
//! This module implements the CLI interface for action-docs: option parsing,
//! wiring of the real collaborators, and the failure channel seen by the
//! workflow.
//!
//! All domain logic (loading, rendering, patching, publishing) lives in the
//! [`action-docs-core`] crate. This module is strictly CLI glue.
//!
//! ## How To Use
//! - From a workflow step: the action runtime passes inputs as `INPUT_*`
//!   environment variables, which every flag below falls back to.
//! - From a shell: `action-docs --mode output --display table --input-path action.yml`.
//! - Programmatically / in tests: call [`run`] with a constructed [`Cli`].
//!
//! [`action-docs-core`]: ../../action_docs_core/
use action_docs_core::config::RawOptions;
use action_docs_core::contract::OutputSink;
use action_docs_core::generate::{self, Collaborators, RunReport};
use action_docs_core::publish::{EnvIdentity, GithubOutputFile, StdoutSink, SystemCommandRunner};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Generate Markdown docs for a GitHub Action from its action.yml.
#[derive(Parser, Debug)]
#[clap(
    name = "action-docs",
    version,
    about = "Render action.yml inputs and outputs to Markdown and publish them as an output or a commit"
)]
pub struct Cli {
    /// Where the docs go: `commit` or `output`
    #[clap(long, env = "INPUT_MODE")]
    pub mode: Option<String>,

    /// Layout of the docs: `classic` or `table`
    #[clap(long, env = "INPUT_DISPLAY")]
    pub display: Option<String>,

    /// Path to the action metadata file
    #[clap(long, env = "INPUT_INPUTPATH")]
    pub input_path: Option<String>,

    /// File holding the `<!-- GHA START -->` / `<!-- GHA END -->` markers
    #[clap(long, env = "INPUT_OUTPUTPATH")]
    pub output_path: Option<String>,
}

impl Cli {
    /// Paths stay strings until here: the runner passes unset inputs as
    /// empty values, which count as absent.
    pub fn options(&self) -> RawOptions {
        RawOptions {
            mode: self.mode.clone(),
            display: self.display.clone(),
            input_path: path_option(self.input_path.as_deref()),
            output_path: path_option(self.output_path.as_deref()),
        }
    }
}

fn path_option(value: Option<&str>) -> Option<PathBuf> {
    value.filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// CLI entrypoint shared by `main()` and integration tests.
///
/// Errors carry the underlying [`action_docs_core::DocError`] so the caller
/// can recover its exit code.
pub fn run(cli: Cli) -> Result<RunReport> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    let raw = cli.options();
    let sink: Box<dyn OutputSink> = match GithubOutputFile::from_env() {
        Some(file) => {
            tracing::debug!(path = %file.path().display(), "Writing outputs to GITHUB_OUTPUT");
            Box::new(file)
        }
        None => {
            tracing::debug!("GITHUB_OUTPUT not set, writing outputs to stdout");
            Box::new(StdoutSink)
        }
    };

    let collaborators = Collaborators {
        git: &SystemCommandRunner,
        identity: &EnvIdentity,
        sink: sink.as_ref(),
    };

    match generate::run(&raw, collaborators) {
        Ok(report) => {
            tracing::info!(?report, "Documentation generated");
            Ok(report)
        }
        Err(e) => {
            tracing::error!(error = %e, "Documentation generation failed");
            Err(e.into())
        }
    }
}

/// Formats `message` as a workflow `::error::` annotation.
pub fn failure_annotation(message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{escaped}")
}
