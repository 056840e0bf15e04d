//! High-level pipeline: validate options → load metadata → check output file →
//! render → publish.
//!
//! # Responsibilities
//! - Fail fast: the first failing stage returns its [`DocError`] and no later
//!   stage runs. Nothing is written and no git command runs before rendering
//!   has succeeded.
//! - Trace every stage boundary so a failed run in CI can be diagnosed from
//!   its log alone.
//!
//! # Callable From
//! - The CLI crate, with real collaborators.
//! - Integration tests, with the mocks from [`crate::contract`].

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::config::{PublishMode, RawOptions, RunConfig};
use crate::contract::{CommandRunner, IdentityProvider, OutputSink};
use crate::error::{DocError, DocResult};
use crate::markers;
use crate::metadata;
use crate::publish::{self, CommitOutcome};
use crate::render::{self, DisplayMode};

/// External collaborators used by the publish stage.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub git: &'a dyn CommandRunner,
    pub identity: &'a dyn IdentityProvider,
    pub sink: &'a dyn OutputSink,
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub mode: PublishMode,
    pub display: DisplayMode,
    pub rendered_bytes: usize,
    /// Set in commit mode.
    pub commit: Option<(PathBuf, CommitOutcome)>,
}

/// Validates `raw` and runs the whole pipeline.
pub fn run(raw: &RawOptions, with: Collaborators<'_>) -> DocResult<RunReport> {
    info!("[RUN] Validating options");
    let config = match RunConfig::from_raw(raw) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, mode = ?raw.mode, display = ?raw.display, "[RUN][ERROR] Invalid options");
            return Err(e);
        }
    };
    config.trace_loaded();
    execute(&config, with)
}

/// Runs the pipeline for an already validated configuration.
pub fn execute(config: &RunConfig, with: Collaborators<'_>) -> DocResult<RunReport> {
    info!(input_path = %config.input_path.display(), "[RUN] Loading action metadata");
    let metadata = metadata::load(&config.input_path)?;

    if let Some(output_path) = &config.output_path {
        info!(output_path = %output_path.display(), "[RUN] Checking output file");
        check_output_file(output_path)?;
    }

    info!(display = %config.display, "[RUN] Rendering documentation");
    let doc = match render::render(&metadata, config.display) {
        Ok(doc) => doc,
        Err(e) => {
            error!(error = %e, "[RUN][ERROR] Rendering failed");
            return Err(e);
        }
    };

    let commit = match config.mode {
        PublishMode::Output => {
            publish::publish_as_output(&doc, with.sink)?;
            None
        }
        PublishMode::Commit => {
            let path = config
                .output_path
                .as_deref()
                .ok_or(DocError::MissingOutputPath)?;
            info!(output_path = %path.display(), "[RUN] Publishing documentation as commit");
            let outcome = publish::publish_as_commit(&doc, path, with.git, with.identity)?;
            Some((path.to_path_buf(), outcome))
        }
    };

    let report = RunReport {
        mode: config.mode,
        display: config.display,
        rendered_bytes: doc.len(),
        commit,
    };
    info!(?report, "[RUN] Complete");
    Ok(report)
}

/// The output file must exist and carry both markers, start before end.
pub fn check_output_file(path: &Path) -> DocResult<()> {
    if !path.exists() {
        error!(output_path = %path.display(), "[RUN][ERROR] Output file not found");
        return Err(DocError::NotFound {
            role: "Output",
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| {
        error!(error = ?e, output_path = %path.display(), "[RUN][ERROR] Failed to read output file");
        DocError::Read {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    if !markers::validate_markers(&content) {
        error!(output_path = %path.display(), "[RUN][ERROR] Output file lacks marker tags");
        return Err(DocError::MissingSentinels);
    }
    markers::locate(&content).map(|_| ()).map_err(|e| {
        error!(output_path = %path.display(), "[RUN][ERROR] Output file marker tags are out of order");
        e
    })
}
