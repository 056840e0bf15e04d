//! Markdown rendering of action metadata.
//!
//! Rendering is split in two steps. [`input_rows`] and [`output_rows`] turn the
//! metadata into display-ready rows, applying the description placeholder, the
//! required flag and the default-value rules. A [`Renderer`] then lays those
//! rows out. Every layout sees identical rows, so adding a layout never changes
//! which fields appear or in what order.

use serde_yaml::Value;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::{DocError, DocResult};
use crate::metadata::ActionMetadata;

/// Shown in place of a missing description.
pub const MISSING_DESCRIPTION: &str = "N/A";

pub const INPUTS_HEADING: &str = "## Inputs";
pub const OUTPUTS_HEADING: &str = "## Outputs";

/// Layout used to render the documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Flowing list blocks, one per input/output.
    Classic,
    /// Markdown tables, one row per input/output.
    Table,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Classic => "classic",
            DisplayMode::Table => "table",
        }
    }

    pub fn renderer(&self) -> &'static dyn Renderer {
        match self {
            DisplayMode::Classic => &ClassicRenderer,
            DisplayMode::Table => &TableRenderer,
        }
    }
}

impl FromStr for DisplayMode {
    type Err = DocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "classic" => Ok(DisplayMode::Classic),
            "table" => Ok(DisplayMode::Table),
            other => Err(DocError::InvalidDisplay(other.to_string())),
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One input, ready for layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRow {
    pub name: String,
    pub description: String,
    pub required: &'static str,
    pub default: String,
}

/// One output, ready for layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub name: String,
    pub description: String,
}

/// A layout strategy. Each method receives a non-empty slice and returns a
/// section that starts with its heading and ends with a single newline.
pub trait Renderer {
    fn render_inputs(&self, rows: &[InputRow]) -> String;
    fn render_outputs(&self, rows: &[OutputRow]) -> String;
}

pub struct ClassicRenderer;

impl Renderer for ClassicRenderer {
    fn render_inputs(&self, rows: &[InputRow]) -> String {
        let mut out = format!("{INPUTS_HEADING}\n\n");
        for row in rows {
            out.push_str(&format!("- `{}`\n", row.name));
            out.push_str(&format!("  - Description: {}\n", indent(&row.description)));
            out.push_str(&format!("  - Required: {}\n", row.required));
            out.push_str(&format!("  - Default: {}\n", row.default));
        }
        out
    }

    fn render_outputs(&self, rows: &[OutputRow]) -> String {
        let mut out = format!("{OUTPUTS_HEADING}\n\n");
        for row in rows {
            out.push_str(&format!("- `{}`\n", row.name));
            out.push_str(&format!("  - Description: {}\n", indent(&row.description)));
        }
        out
    }
}

pub struct TableRenderer;

impl Renderer for TableRenderer {
    fn render_inputs(&self, rows: &[InputRow]) -> String {
        let mut out = format!("{INPUTS_HEADING}\n\n");
        out.push_str("| Name | Description | Required | Default |\n");
        out.push_str("| --- | --- | --- | --- |\n");
        for row in rows {
            out.push_str(&format!(
                "| `{}` | {} | {} | {} |\n",
                cell(&row.name),
                cell(&row.description),
                row.required,
                cell(&row.default)
            ));
        }
        out
    }

    fn render_outputs(&self, rows: &[OutputRow]) -> String {
        let mut out = format!("{OUTPUTS_HEADING}\n\n");
        out.push_str("| Name | Description |\n");
        out.push_str("| --- | --- |\n");
        for row in rows {
            out.push_str(&format!(
                "| `{}` | {} |\n",
                cell(&row.name),
                cell(&row.description)
            ));
        }
        out
    }
}

// Continuation lines stay inside the list item.
fn indent(text: &str) -> String {
    text.trim_end().lines().collect::<Vec<_>>().join("\n    ")
}

fn cell(text: &str) -> String {
    text.trim()
        .replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}

fn describe(description: Option<&String>) -> String {
    match description {
        Some(d) => d.clone(),
        None => MISSING_DESCRIPTION.to_string(),
    }
}

/// Renders an input's default value.
///
/// `""` becomes `""`, numeric zero becomes `0`, absent/null/false/NaN
/// become `None`, other scalars are shown as-is. Sequences and mappings are rejected.
pub fn render_default(name: &str, value: Option<&Value>) -> DocResult<String> {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok("None".to_string()),
        Some(Value::Bool(true)) => Ok("true".to_string()),
        Some(Value::String(s)) if s.is_empty() => Ok("\"\"".to_string()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) if n.is_nan() => Ok("None".to_string()),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Ok("0".to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Sequence(_)) | Some(Value::Mapping(_)) | Some(Value::Tagged(_)) => Err(
            DocError::Render(format!("input `{name}` has a non-scalar default")),
        ),
    }
}

pub fn input_rows(metadata: &ActionMetadata) -> DocResult<Vec<InputRow>> {
    metadata
        .inputs()
        .map(|(name, spec)| -> DocResult<InputRow> {
            Ok(InputRow {
                name: name.clone(),
                description: describe(spec.description.as_ref()),
                required: if spec.required { "Yes" } else { "No" },
                default: render_default(name, spec.default.as_ref())?,
            })
        })
        .collect()
}

pub fn output_rows(metadata: &ActionMetadata) -> Vec<OutputRow> {
    metadata
        .outputs()
        .map(|(name, spec)| OutputRow {
            name: name.clone(),
            description: describe(spec.description.as_ref()),
        })
        .collect()
}

/// Renders `metadata` with the layout selected by `mode`.
///
/// Returns an empty string when there are neither inputs nor outputs.
pub fn render(metadata: &ActionMetadata, mode: DisplayMode) -> DocResult<String> {
    let inputs = input_rows(metadata)?;
    let outputs = output_rows(metadata);
    let renderer = mode.renderer();

    let mut sections = Vec::with_capacity(2);
    if !inputs.is_empty() {
        sections.push(renderer.render_inputs(&inputs));
    }
    if !outputs.is_empty() {
        sections.push(renderer.render_outputs(&outputs));
    }

    let doc = sections.join("\n");
    debug!(
        display = %mode,
        inputs = inputs.len(),
        outputs = outputs.len(),
        bytes = doc.len(),
        "Rendered documentation"
    );
    Ok(doc)
}
