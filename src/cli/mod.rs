pub mod comment;
pub mod formats;
pub mod sarif;
pub mod schema;
pub mod summary;

use crate::config::{Config, InputSource};
use crate::parser::{known_parser, parse_level_map, regex_parser, Parser as LintParser};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Parser)]
#[command(name = "lintbridge")]
#[command(
    author,
    version,
    about = "Turn linter output into SARIF logs and pull request review comments"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file (default: lintbridge.yaml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert linter output to a SARIF log
    Sarif(SarifArgs),

    /// Post diagnostics on changed lines as pull request review comments
    Comment(CommentArgs),

    /// Render diagnostics as a Markdown job summary
    Summary(SummaryArgs),

    /// List built-in input formats
    Formats,

    /// Print JSON Schema for config validation
    Schema,
}

/// Where the linter output comes from and how to read it
#[derive(Args, Clone, Debug)]
pub struct InputArgs {
    /// Linter output file (`-` for stdin)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Built-in input format (see `lintbridge formats`)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Custom regex with named groups, instead of --format
    #[arg(long)]
    pub pattern: Option<String>,

    /// JSON object mapping captured level words to error/warning/note
    #[arg(long)]
    pub level_map: Option<String>,

    /// Tool name for SARIF output and comment markers
    #[arg(long)]
    pub tool_name: Option<String>,

    /// Directory the linter ran in, relative to the repository root
    #[arg(long)]
    pub analysis_path: Option<String>,
}

#[derive(Args, Clone, Debug)]
pub struct SarifArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output file (`-` or omitted for stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Resolve URIs against --analysis-path instead of keeping them as reported
    #[arg(long)]
    pub rooted_uris: bool,
}

#[derive(Args, Clone, Debug)]
pub struct CommentArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Repository (owner/repo)
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repo: Option<String>,

    /// Pull request number
    #[arg(long)]
    pub pr: u64,
}

#[derive(Args, Clone, Debug)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

impl InputArgs {
    /// Layer command-line overrides on top of the loaded config
    pub fn apply(&self, config: &mut Config) -> anyhow::Result<()> {
        match (&self.format, &self.pattern) {
            (None, None) => {}
            (format, pattern) => {
                config.format = format.clone();
                config.pattern = pattern.clone();
            }
        }
        if let Some(json) = &self.level_map {
            config.level_map = parse_level_map(json)?;
        }
        if let Some(name) = &self.tool_name {
            config.tool_name = name.clone();
        }
        if let Some(path) = &self.analysis_path {
            config.analysis_path = path.clone();
        }
        Ok(())
    }

    /// Load config, apply overrides, and read the linter output
    pub fn load(&self, config_path: Option<&Path>) -> anyhow::Result<(Config, String)> {
        let mut config = Config::discover(config_path)?;
        self.apply(&mut config)?;
        let input = read_input(&self.input)?;
        Ok((config, input))
    }
}

/// Read linter output, dropping every carriage return
pub fn read_input(path: &Path) -> anyhow::Result<String> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read input from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input: {}", path.display()))?
    };
    debug!("Read {} bytes of linter output", raw.len());
    Ok(raw.replace('\r', ""))
}

/// Pick the parser the config asks for
pub fn build_parser(config: &Config) -> anyhow::Result<LintParser> {
    let parser = match config.input_source()? {
        InputSource::Format(name) => {
            if !config.level_map.is_empty() {
                warn!("level_map is ignored for the built-in '{}' format", name);
            }
            known_parser(name)?
        }
        InputSource::Pattern(pattern) => {
            let level_map = (!config.level_map.is_empty()).then(|| config.level_map.clone());
            regex_parser(pattern, level_map)?
        }
    };
    Ok(parser)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Level;

    fn args() -> InputArgs {
        InputArgs {
            input: PathBuf::from("-"),
            format: None,
            pattern: None,
            level_map: None,
            tool_name: None,
            analysis_path: None,
        }
    }

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flag_replaces_configured_pattern() {
        let mut config = Config {
            pattern: Some("(?P<msg>.*)".to_string()),
            ..Config::default()
        };
        let overrides = InputArgs {
            format: Some("flake8".to_string()),
            tool_name: Some("flake8".to_string()),
            ..args()
        };
        overrides.apply(&mut config).unwrap();
        assert_eq!(config.input_source().unwrap(), InputSource::Format("flake8"));
        assert_eq!(config.tool_name, "flake8");
    }

    #[test]
    fn test_level_map_flag() {
        let mut config = Config::default();
        let overrides = InputArgs {
            pattern: Some("(?P<level>\\w+) (?P<msg>.*)".to_string()),
            level_map: Some(r#"{"E": "error"}"#.to_string()),
            ..args()
        };
        overrides.apply(&mut config).unwrap();
        assert_eq!(config.level_map.get("E"), Some(&Level::Error));

        let parser = build_parser(&config).unwrap();
        let diags: Vec<_> = parser.parse("E broken\nX odd\n").unwrap().collect();
        assert_eq!(diags[0].level, Some(Level::Error));
        assert_eq!(diags[1].level, None);
    }

    #[test]
    fn test_bad_level_map_flag() {
        let overrides = InputArgs {
            level_map: Some(r#"{"E": "fatal"}"#.to_string()),
            ..args()
        };
        assert!(overrides.apply(&mut Config::default()).is_err());
    }

    #[test]
    fn test_unknown_format() {
        let config = Config {
            format: Some("eslint".to_string()),
            ..Config::default()
        };
        let err = build_parser(&config).unwrap_err();
        assert!(err.to_string().contains("Unrecognized input format: eslint"));
    }

    #[test]
    fn test_read_input_strips_carriage_returns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "a.py:1:1: E1 x\r\nb.py:2:2: E2 y\r\n").unwrap();
        assert_eq!(read_input(&path).unwrap(), "a.py:1:1: E1 x\nb.py:2:2: E2 y\n");
    }
}
