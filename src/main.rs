use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod comment;
mod config;
mod diff;
mod error;
mod github;
mod output;
mod parser;
mod paths;
mod sarif;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Only show logs with --verbose; warnings always reach stderr
    let filter = if cli.verbose {
        EnvFilter::new("lintbridge=debug")
    } else {
        EnvFilter::new("lintbridge=warn")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Sarif(args) => cli::sarif::execute(args, config),
        Commands::Comment(args) => cli::comment::execute(args, config).await,
        Commands::Summary(args) => cli::summary::execute(args, config),
        Commands::Formats => cli::formats::execute(),
        Commands::Schema => cli::schema::execute(),
    }
}
