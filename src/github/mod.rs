mod gh;
pub mod retry;

pub use gh::GhCli;

use crate::comment::{build_comments, marker, CommentBatch};
use crate::diff::map_added_lines;
use crate::error::GitHubError;
use crate::parser::Diagnostic;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExistingComment {
    pub id: u64,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CommentPage {
    pub comments: Vec<ExistingComment>,
    pub has_next: bool,
}

/// Operations on the pull request being reviewed
#[async_trait]
pub trait ReviewHost: Send + Sync {
    /// One page (1-based) of the review comments already on the change
    async fn list_comments(&self, page: u32) -> Result<CommentPage, GitHubError>;

    async fn delete_comment(&self, id: u64) -> Result<(), GitHubError>;

    /// Unified diff of the change
    async fn fetch_diff(&self) -> Result<String, GitHubError>;

    async fn create_review(&self, batch: &CommentBatch, marker: &str) -> Result<(), GitHubError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub deleted: usize,
    pub posted: usize,
    pub truncated: bool,
}

/// Remove comments left by a previous run for `identifier`, page by page.
///
/// A page that had deletions is read again, since later comments move up
/// into it. Ids already deleted are skipped, so a listing that still shows
/// them cannot trap the loop on one page.
async fn delete_marked(host: &dyn ReviewHost, tag: &str) -> Result<usize, GitHubError> {
    let mut deleted: HashSet<u64> = HashSet::new();
    let mut page = 1;

    loop {
        let listing = host.list_comments(page).await?;
        let mut deleted_here = 0;

        for comment in &listing.comments {
            if deleted.contains(&comment.id) {
                debug!("Comment {} still listed after deletion", comment.id);
                continue;
            }
            if comment.body.as_deref().is_some_and(|b| b.contains(tag)) {
                debug!("Deleting old comment {}", comment.id);
                host.delete_comment(comment.id).await?;
                deleted.insert(comment.id);
                deleted_here += 1;
            }
        }

        if deleted_here == 0 {
            if !listing.has_next {
                break;
            }
            page += 1;
        }
    }

    Ok(deleted.len())
}

/// Replace this tool's review comments with fresh ones for `diagnostics`.
///
/// Steps run strictly in order and the first failure aborts the rest:
/// delete old marked comments, fetch the diff, build the batch, post it
/// (skipped when nothing is eligible).
pub async fn publish<I>(
    host: &dyn ReviewHost,
    diagnostics: I,
    analysis_root: &str,
    identifier: &str,
) -> Result<PublishReport, GitHubError>
where
    I: IntoIterator<Item = Diagnostic>,
{
    let tag = marker(identifier);

    let deleted = delete_marked(host, &tag).await?;
    info!("Deleted {} old comments", deleted);

    let diff = host.fetch_diff().await?;
    let added = map_added_lines(&diff)?;

    let batch = build_comments(diagnostics, &added, analysis_root, identifier)?;
    if batch.is_empty() {
        info!("No diagnostics on changed lines; nothing to post");
    } else {
        host.create_review(&batch, &tag).await?;
        info!("Posted {} comments", batch.len());
    }

    Ok(PublishReport {
        deleted,
        posted: batch.len(),
        truncated: batch.truncated,
    })
}
