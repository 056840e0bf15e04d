//! Sentinel markers delimiting the generated region of a document.

use std::ops::Range;

use crate::error::{DocError, DocResult};

pub const START_TAG: &str = "<!-- GHA START -->";
pub const END_TAG: &str = "<!-- GHA END -->";

/// True when both tags occur somewhere in `content`, in any order.
pub fn validate_markers(content: &str) -> bool {
    content.contains(START_TAG) && content.contains(END_TAG)
}

/// Byte range strictly between the first start tag and the first end tag.
///
/// The first end tag must come after the first start tag.
pub fn locate(content: &str) -> DocResult<Range<usize>> {
    let start = content.find(START_TAG).ok_or(DocError::MissingSentinels)? + START_TAG.len();
    let end = content.find(END_TAG).ok_or(DocError::MissingSentinels)?;
    if end < start {
        return Err(DocError::MissingSentinels);
    }
    Ok(start..end)
}

/// Replaces the marked region of `content` with `rendered`, keeping both tags.
pub fn splice(content: &str, rendered: &str) -> DocResult<String> {
    let region = locate(content)?;
    let body = rendered.trim_end_matches('\n');

    let mut out = String::with_capacity(content.len() + body.len() + 2);
    out.push_str(&content[..region.start]);
    out.push('\n');
    if !body.is_empty() {
        out.push_str(body);
        out.push('\n');
    }
    out.push_str(&content[region.end..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_rejects_end_before_start() {
        let doc = format!("{END_TAG}\n{START_TAG}\n");
        assert!(validate_markers(&doc));
        assert!(matches!(locate(&doc), Err(DocError::MissingSentinels)));
    }

    #[test]
    fn locate_uses_first_occurrence_of_each_tag() {
        let doc = format!("a{START_TAG}b{END_TAG}c{START_TAG}d{END_TAG}");
        let range = locate(&doc).unwrap();
        assert_eq!(&doc[range], "b");
    }

    #[test]
    fn splice_of_empty_render_leaves_single_newline() {
        let doc = format!("{START_TAG}old{END_TAG}");
        assert_eq!(splice(&doc, "").unwrap(), format!("{START_TAG}\n{END_TAG}"));
    }
}
