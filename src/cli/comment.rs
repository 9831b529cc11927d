use super::{build_parser, CommentArgs};
use crate::github::{publish, GhCli};
use std::path::Path;

pub async fn execute(args: CommentArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let (config, input) = args.input.load(config_path)?;

    let repo = args
        .repo
        .clone()
        .or_else(|| config.github.repo.clone())
        .ok_or_else(|| {
            anyhow::anyhow!("No repository given. Use --repo, GITHUB_REPOSITORY or github.repo")
        })?;

    let parser = build_parser(&config)?;
    let diagnostics = parser.parse(&input)?;

    let host = GhCli::new(repo.clone(), args.pr, &config.github, config.retry.clone());
    let report = publish(&host, diagnostics, &config.analysis_path, &config.tool_name).await?;

    println!(
        "{}#{}: removed {} old comments, posted {}",
        repo, args.pr, report.deleted, report.posted
    );
    if report.truncated {
        eprintln!(
            "warning: only the first {} comments were posted",
            crate::comment::MAX_COMMENTS
        );
    }

    Ok(())
}
