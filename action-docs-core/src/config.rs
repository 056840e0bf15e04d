use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::{DocError, DocResult};
use crate::render::DisplayMode;

/// Where the rendered documentation goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishMode {
    /// Patch the output file and commit it.
    Commit,
    /// Expose the documentation as the `doc` output.
    Output,
}

impl PublishMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublishMode::Commit => "commit",
            PublishMode::Output => "output",
        }
    }
}

impl FromStr for PublishMode {
    type Err = DocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "commit" => Ok(PublishMode::Commit),
            "output" => Ok(PublishMode::Output),
            other => Err(DocError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for PublishMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options as received from the command line or the action inputs, before
/// any validation.
#[derive(Debug, Clone, Default)]
pub struct RawOptions {
    pub mode: Option<String>,
    pub display: Option<String>,
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
}

/// Validated run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub mode: PublishMode,
    pub display: DisplayMode,
    pub input_path: PathBuf,
    /// `None` when no output path (or an empty one) was given.
    pub output_path: Option<PathBuf>,
}

impl RunConfig {
    /// Validates mode, then display, then the input path, then the
    /// commit/output-path pairing. Empty paths count as absent.
    pub fn from_raw(raw: &RawOptions) -> DocResult<Self> {
        let mode: PublishMode = raw.mode.as_deref().unwrap_or_default().parse()?;
        let display: DisplayMode = raw.display.as_deref().unwrap_or_default().parse()?;

        let input_path = non_empty(&raw.input_path).ok_or(DocError::MissingInputPath)?;
        let output_path = non_empty(&raw.output_path);

        if mode == PublishMode::Commit && output_path.is_none() {
            return Err(DocError::MissingOutputPath);
        }

        Ok(RunConfig {
            mode,
            display,
            input_path,
            output_path,
        })
    }

    pub fn trace_loaded(&self) {
        info!(
            mode = %self.mode,
            display = %self.display,
            input_path = %self.input_path.display(),
            output_path = ?self.output_path,
            "Loaded run configuration"
        );
        debug!(?self, "Run configuration (full debug)");
    }
}

fn non_empty(path: &Option<PathBuf>) -> Option<PathBuf> {
    path.clone().filter(|p| !p.as_os_str().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(mode: &str, display: &str, output: Option<&str>) -> RawOptions {
        RawOptions {
            mode: Some(mode.to_string()),
            display: Some(display.to_string()),
            input_path: Some(PathBuf::from("action.yml")),
            output_path: output.map(PathBuf::from),
        }
    }

    #[test]
    fn mode_is_checked_before_display() {
        let err = RunConfig::from_raw(&raw("push", "grid", None)).unwrap_err();
        assert!(matches!(err, DocError::InvalidMode(ref m) if m == "push"));
    }

    #[test]
    fn absent_mode_is_invalid() {
        let options = RawOptions {
            display: Some("classic".into()),
            ..Default::default()
        };
        assert!(matches!(
            RunConfig::from_raw(&options),
            Err(DocError::InvalidMode(_))
        ));
    }

    #[test]
    fn commit_requires_non_empty_output_path() {
        assert!(matches!(
            RunConfig::from_raw(&raw("commit", "classic", Some(""))),
            Err(DocError::MissingOutputPath)
        ));
        let config = RunConfig::from_raw(&raw("commit", "table", Some("README.md"))).unwrap();
        assert_eq!(config.output_path, Some(PathBuf::from("README.md")));
        assert_eq!(config.display, DisplayMode::Table);
    }

    #[test]
    fn empty_output_path_is_dropped_in_output_mode() {
        let config = RunConfig::from_raw(&raw("output", "classic", Some(""))).unwrap();
        assert_eq!(config.mode, PublishMode::Output);
        assert_eq!(config.output_path, None);
    }

    #[test]
    fn input_path_is_required_after_mode_and_display() {
        let mut options = raw("output", "classic", None);
        options.input_path = Some(PathBuf::new());
        assert!(matches!(
            RunConfig::from_raw(&options),
            Err(DocError::MissingInputPath)
        ));

        options.input_path = None;
        options.display = Some("grid".into());
        assert!(matches!(
            RunConfig::from_raw(&options),
            Err(DocError::InvalidDisplay(_))
        ));
    }
}
