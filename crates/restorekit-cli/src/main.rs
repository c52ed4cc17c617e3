use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod completion;
mod dispatch;
mod lockfile;
mod render;

use completion::CliCompletionShell;

const LOG_ENV_VAR: &str = "RESTOREKIT_LOG";

#[derive(Parser, Debug)]
#[command(name = "restorekit")]
#[command(about = "Restore package dependency graphs for projects", long_about = None)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Restore {
        inputs: Vec<PathBuf>,
        #[arg(long, env = "RESTOREKIT_DISABLE_PARALLEL", value_parser = FalseyValueParser::new())]
        disable_parallel: bool,
        #[arg(long)]
        max_parallelism: Option<usize>,
        #[arg(long)]
        locked: bool,
    },
    Spec { input: PathBuf },
    Graph {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[arg(long)]
        output: PathBuf,
    },
    Completions {
        #[arg(value_enum)]
        shell: CliCompletionShell,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    dispatch::run_cli(cli).await
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests;
