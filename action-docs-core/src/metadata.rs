//! Action metadata model and the YAML loader that produces it.
//!
//! The loader is the only place where the untrusted `action.yml` is parsed.
//! It checks the file exists before reading so a missing path is reported as
//! [`DocError::NotFound`] rather than an I/O error, then decodes the content
//! with `serde_yaml`. Beyond structural decoding no field is validated.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, error, info};

use crate::error::{DocError, DocResult};

/// The parsed contents of an action metadata file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActionMetadata {
    pub name: String,
    pub description: String,
    pub author: String,
    #[serde(default)]
    pub inputs: Option<IndexMap<String, InputSpec>>,
    #[serde(default)]
    pub outputs: Option<IndexMap<String, OutputSpec>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InputSpec {
    #[serde(default, deserialize_with = "flag")]
    pub required: bool,
    /// Any YAML scalar; `null` and absence both decode to `None`.
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OutputSpec {
    #[serde(default)]
    pub description: Option<String>,
}

impl ActionMetadata {
    /// Inputs in declaration order; empty when the section is absent.
    pub fn inputs(&self) -> impl Iterator<Item = (&String, &InputSpec)> {
        self.inputs.iter().flat_map(|m| m.iter())
    }

    /// Outputs in declaration order; empty when the section is absent.
    pub fn outputs(&self) -> impl Iterator<Item = (&String, &OutputSpec)> {
        self.outputs.iter().flat_map(|m| m.iter())
    }

    pub fn trace_loaded(&self) {
        info!(
            name = %self.name,
            author = %self.author,
            inputs_count = self.inputs().count(),
            outputs_count = self.outputs().count(),
            "Loaded action metadata"
        );
        debug!(?self, "Action metadata loaded (full debug)");
    }
}

// Action files in the wild spell `required` both as a YAML bool and as a
// quoted "true"/"false".
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(b),
        Value::String(s) => match s.trim() {
            "true" | "True" | "TRUE" => Ok(true),
            "false" | "False" | "FALSE" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "invalid value for `required`: {other:?}"
            ))),
        },
        other => Err(serde::de::Error::custom(format!(
            "invalid value for `required`: {other:?}"
        ))),
    }
}

/// Decodes action metadata from YAML text.
pub fn parse(content: &str) -> DocResult<ActionMetadata> {
    serde_yaml::from_str(content).map_err(|e| DocError::Parse(e.to_string()))
}

/// Loads and parses the action metadata file at `path`.
pub fn load<P: AsRef<Path>>(path: P) -> DocResult<ActionMetadata> {
    let path_ref = path.as_ref();
    info!(input_path = ?path_ref, "Loading action metadata");

    if !path_ref.exists() {
        error!(input_path = ?path_ref, "Action metadata file not found");
        return Err(DocError::NotFound {
            role: "Input",
            path: path_ref.to_path_buf(),
        });
    }

    let content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            error!(error = ?e, input_path = ?path_ref, "Action metadata is not valid UTF-8");
            return Err(DocError::Parse(format!("{}: {e}", path_ref.display())));
        }
        Err(e) => {
            error!(error = ?e, input_path = ?path_ref, "Failed to read action metadata");
            return Err(DocError::Read {
                path: path_ref.to_path_buf(),
                source: e,
            });
        }
    };

    match parse(&content) {
        Ok(metadata) => {
            metadata.trace_loaded();
            Ok(metadata)
        }
        Err(e) => {
            error!(error = %e, input_path = ?path_ref, "Failed to parse action metadata YAML");
            Err(e)
        }
    }
}
