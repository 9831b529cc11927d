//! Select diagnostics that land entirely on added lines and shape them as
//! review comments.

use crate::diff::AddedLines;
use crate::parser::Diagnostic;
use crate::paths::normalize_path_from;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, warn};

/// Most comments posted in one review
pub const MAX_COMMENTS: usize = 50;

/// Hidden tag identifying comments this tool posted for `identifier`
pub fn marker(identifier: &str) -> String {
    format!("<!-- lintbridge:{} -->", identifier)
}

/// One inline comment, in the shape the review API accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentRequest {
    pub path: String,
    pub line: u32,
    pub side: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_side: Option<&'static str>,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentBatch {
    pub comments: Vec<CommentRequest>,
    /// More eligible diagnostics existed than `MAX_COMMENTS`
    pub truncated: bool,
}

impl CommentBatch {
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }
}

fn render_body(diag: &Diagnostic, identifier: &str) -> String {
    let level = diag.level.map(|l| l.as_str());
    let trailer = [
        level,
        Some(identifier),
        diag.id.as_deref(),
        diag.sym.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(":");

    let mut body = marker(identifier);
    body.push('\n');
    if let Some(msg) = diag.msg.as_deref().filter(|m| !m.is_empty()) {
        body.push_str(msg);
    }
    if !trailer.is_empty() {
        if !body.ends_with('\n') {
            body.push(' ');
        }
        body.push('[');
        body.push_str(&trailer);
        body.push(']');
    }
    body
}

/// Build the comment batch against an explicit working directory.
pub fn build_comments_from<I>(
    diagnostics: I,
    added: &AddedLines,
    analysis_root: &str,
    cwd: &Path,
    identifier: &str,
) -> CommentBatch
where
    I: IntoIterator<Item = Diagnostic>,
{
    let mut batch = CommentBatch::default();

    for diag in diagnostics {
        let (Some(reported), Some(start)) = (diag.path.as_deref(), diag.line) else {
            continue;
        };
        let end = diag.eline.filter(|&e| e >= start).unwrap_or(start);
        let path = normalize_path_from(reported, analysis_root, cwd);

        if !added.contains_range(&path, start, end) {
            debug!("Skipping {}:{}-{} (outside the diff)", path, start, end);
            continue;
        }

        if batch.comments.len() >= MAX_COMMENTS {
            warn!(
                "More than {} diagnostics on changed lines; extra comments were dropped",
                MAX_COMMENTS
            );
            batch.truncated = true;
            break;
        }

        let ranged = start != end;
        batch.comments.push(CommentRequest {
            body: render_body(&diag, identifier),
            path,
            line: end,
            side: "RIGHT",
            start_line: ranged.then_some(start),
            start_side: ranged.then_some("RIGHT"),
        });
    }

    batch
}

/// Build the comment batch relative to the process working directory.
pub fn build_comments<I>(
    diagnostics: I,
    added: &AddedLines,
    analysis_root: &str,
    identifier: &str,
) -> std::io::Result<CommentBatch>
where
    I: IntoIterator<Item = Diagnostic>,
{
    let cwd = std::env::current_dir()?;
    Ok(build_comments_from(
        diagnostics,
        added,
        analysis_root,
        &cwd,
        identifier,
    ))
}
