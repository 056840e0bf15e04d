use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes. Every failure maps to a non-zero code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    Validation = 2,
    NotFound = 3,
    Parse = 4,
    Render = 5,
    Io = 6,
    Commit = 7,
}

#[derive(Debug, Error)]
pub enum DocError {
    #[error("Unknown mode")]
    InvalidMode(String),

    #[error("Unknown display")]
    InvalidDisplay(String),

    #[error("Input Path is required")]
    MissingInputPath,

    #[error("Output Path is required when mode is commit")]
    MissingOutputPath,

    #[error("{role} Path: {} not found", .path.display())]
    NotFound { role: &'static str, path: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unable to find tags in the Output file")]
    MissingSentinels,

    #[error("failed to parse action metadata: {0}")]
    Parse(String),

    #[error("failed to render documentation: {0}")]
    Render(String),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to determine commit identity: {0}")]
    Identity(String),

    #[error("failed to set output: {0}")]
    Output(String),

    #[error("`{command}` failed: {detail}")]
    Commit { command: String, detail: String },
}

impl DocError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::InvalidMode(_)
            | Self::InvalidDisplay(_)
            | Self::MissingInputPath
            | Self::MissingOutputPath => ExitCode::Validation,
            Self::NotFound { .. } => ExitCode::NotFound,
            Self::MissingSentinels | Self::Parse(_) => ExitCode::Parse,
            Self::Render(_) => ExitCode::Render,
            Self::Read { .. } | Self::Write { .. } | Self::Output(_) => ExitCode::Io,
            Self::Identity(_) | Self::Commit { .. } => ExitCode::Commit,
        }
    }
}

pub type DocResult<T> = Result<T, DocError>;
