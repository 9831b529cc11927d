use super::{build_parser, SarifArgs};
use crate::output::write_sarif;
use crate::sarif::{assemble, UriMode};
use std::path::Path;
use tracing::info;

pub fn execute(args: SarifArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let (config, input) = args.input.load(config_path)?;
    let parser = build_parser(&config)?;
    let diagnostics = parser.parse(&input)?;

    let cwd = std::env::current_dir()?;
    let mode = if args.rooted_uris {
        UriMode::Rooted {
            analysis_root: &config.analysis_path,
            cwd: &cwd,
        }
    } else {
        UriMode::AsReported
    };

    let log = assemble(diagnostics, &config.tool_name, mode);
    write_sarif(&log, args.output.as_deref())?;

    let count = log.runs.first().map_or(0, |run| run.results.len());
    info!("Wrote {} results for {}", count, config.tool_name);
    Ok(())
}
