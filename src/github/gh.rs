use super::retry::retry_with_backoff;
use super::{CommentPage, ExistingComment, ReviewHost};
use crate::comment::{CommentBatch, CommentRequest, MAX_COMMENTS};
use crate::config::{GithubConfig, RetryConfig};
use crate::error::GitHubError;
use async_trait::async_trait;
use serde::Serialize;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout as tokio_timeout;
use tracing::debug;

const PER_PAGE: usize = 100;

#[derive(Serialize)]
struct ReviewPayload<'a> {
    event: &'static str,
    body: &'a str,
    comments: &'a [CommentRequest],
}

/// Review host backed by the `gh` CLI
pub struct GhCli {
    binary: String,
    repo: String,
    pr: u64,
    timeout: Duration,
    retry: RetryConfig,
}

impl GhCli {
    pub fn new(repo: String, pr: u64, github: &GithubConfig, retry: RetryConfig) -> Self {
        Self {
            binary: github.gh_binary.clone(),
            repo,
            pr,
            timeout: Duration::from_secs(github.timeout_sec),
            retry,
        }
    }

    /// Run one `gh` invocation, feeding `stdin` when given, and return stdout.
    async fn gh(&self, args: &[String], stdin: Option<&[u8]>) -> Result<String, GitHubError> {
        debug!("{} {}", self.binary, args.join(" "));

        let mut cmd = Command::new(&self.binary);
        cmd.args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let run = async {
            let mut child = cmd.spawn()?;
            if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
                pipe.write_all(input).await?;
            }
            child.wait_with_output().await
        };

        let output = tokio_timeout(self.timeout, run)
            .await
            .map_err(|_| GitHubError::Timeout(self.timeout))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitHubError::GhCli(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Top-level body of the review wrapping the inline comments.
    ///
    /// Submitted reviews cannot be deleted through the API, so each run that
    /// posts leaves one review behind; the visible line says what it was.
    fn review_body(marker: &str, batch: &CommentBatch) -> String {
        let mut body = format!(
            "{}\nlintbridge found {} diagnostics on changed lines.",
            marker,
            batch.len()
        );
        if batch.truncated {
            body.push_str(&format!(" Only the first {} are shown.", MAX_COMMENTS));
        }
        body
    }

    fn api_args(&self, method: &str, endpoint: String) -> Vec<String> {
        vec![
            "api".to_string(),
            "--method".to_string(),
            method.to_string(),
            endpoint,
        ]
    }
}

#[async_trait]
impl ReviewHost for GhCli {
    async fn list_comments(&self, page: u32) -> Result<CommentPage, GitHubError> {
        let args = self.api_args(
            "GET",
            format!(
                "repos/{}/pulls/{}/comments?per_page={}&page={}",
                self.repo, self.pr, PER_PAGE, page
            ),
        );

        let stdout = retry_with_backoff(&self.retry, "list review comments", || {
            self.gh(&args, None)
        })
        .await?;

        let comments: Vec<ExistingComment> =
            serde_json::from_str(&stdout).map_err(|e| GitHubError::ParseOutput(e.to_string()))?;
        debug!("Page {} has {} review comments", page, comments.len());

        Ok(CommentPage {
            has_next: comments.len() == PER_PAGE,
            comments,
        })
    }

    async fn delete_comment(&self, id: u64) -> Result<(), GitHubError> {
        let args = self.api_args(
            "DELETE",
            format!("repos/{}/pulls/comments/{}", self.repo, id),
        );
        retry_with_backoff(&self.retry, "delete review comment", || {
            self.gh(&args, None)
        })
        .await?;
        Ok(())
    }

    async fn fetch_diff(&self) -> Result<String, GitHubError> {
        let args = vec![
            "pr".to_string(),
            "diff".to_string(),
            self.pr.to_string(),
            "--repo".to_string(),
            self.repo.clone(),
        ];
        retry_with_backoff(&self.retry, "fetch diff", || self.gh(&args, None)).await
    }

    async fn create_review(&self, batch: &CommentBatch, marker: &str) -> Result<(), GitHubError> {
        let body = Self::review_body(marker, batch);
        let payload = serde_json::to_vec(&ReviewPayload {
            event: "COMMENT",
            body: &body,
            comments: &batch.comments,
        })
        .map_err(|e| GitHubError::ParseOutput(e.to_string()))?;

        let mut args = self.api_args(
            "POST",
            format!("repos/{}/pulls/{}/reviews", self.repo, self.pr),
        );
        args.push("--input".to_string());
        args.push("-".to_string());

        retry_with_backoff(&self.retry, "create review", || {
            self.gh(&args, Some(payload.as_slice()))
        })
        .await?;
        Ok(())
    }
}
