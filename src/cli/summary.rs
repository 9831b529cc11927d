use super::{build_parser, SummaryArgs};
use crate::output::{append_step_summary, render_summary, step_summary_path};
use std::path::Path;
use tracing::info;

pub fn execute(args: SummaryArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let (config, input) = args.input.load(config_path)?;
    let parser = build_parser(&config)?;
    let diagnostics = parser.parse(&input)?;

    let markdown = render_summary(diagnostics, &config.tool_name, &config.analysis_path)?;

    match step_summary_path() {
        Some(path) => {
            append_step_summary(&path, &markdown)?;
            info!("Appended summary to {}", path.display());
        }
        None => print!("{}", markdown),
    }
    Ok(())
}
