use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use restorekit_assembler::{assemble_project_spec, locate_manifest, ProjectManifest};
use restorekit_core::{DependencyGraphSpec, ProjectGraphSpec};
use restorekit_runner::{
    default_path_providers, LogLevel, RequestCollector, RestoreConfig, RestoreContext,
    RestoreLogMessage, RestoreRequest, RestoreScheduler, RestoreSummary, DEFAULT_CONFIG_FILE_NAME,
};
use tracing::debug;

use crate::completion::write_completions_script;
use crate::lockfile::DeclaredGraphResolver;
use crate::render::{format_summary_lines, format_totals_line, TerminalRenderer};
use crate::{Cli, Commands};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RestoreOverrides {
    pub(crate) disable_parallel: bool,
    pub(crate) max_parallelism: Option<usize>,
    pub(crate) locked: bool,
}

#[derive(Debug)]
pub(crate) struct RestoreOutcome {
    pub(crate) summaries: Vec<RestoreSummary>,
    pub(crate) warnings: Vec<RestoreLogMessage>,
}

impl RestoreOutcome {
    pub(crate) fn succeeded(&self) -> bool {
        self.summaries.iter().all(|summary| summary.success)
    }
}

pub(crate) async fn run_cli(cli: Cli) -> Result<ExitCode> {
    let working_dir = env::current_dir().context("failed resolving current directory")?;
    let renderer = TerminalRenderer::current();

    match cli.command {
        Commands::Restore {
            inputs,
            disable_parallel,
            max_parallelism,
            locked,
        } => {
            let overrides = RestoreOverrides {
                disable_parallel,
                max_parallelism,
                locked,
            };
            let config = load_config(cli.config.as_deref(), &working_dir, &overrides)?;
            let outcome = restore_inputs(&inputs, &working_dir, &config).await?;

            for warning in &outcome.warnings {
                renderer.print_status("warn", &warning.message);
            }
            if outcome.summaries.is_empty() {
                renderer.print_status("skip", "nothing to restore");
                return Ok(ExitCode::SUCCESS);
            }

            renderer.print_section("restore");
            for summary in &outcome.summaries {
                renderer.print_lines(&format_summary_lines(summary, renderer.style()));
            }
            println!("{}", format_totals_line(&outcome.summaries, renderer.style()));

            if outcome.succeeded() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::Spec { input } => {
            let spec = assemble_manifest_spec(&input)?;
            println!("{}", spec.to_json_pretty()?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Graph { inputs, output } => {
            let config = load_config(cli.config.as_deref(), &working_dir, &RestoreOverrides::default())?;
            let (requests, _context) = collect_requests(&inputs, &working_dir, &config)?;
            let graph = build_dependency_graph(requests);
            graph.save(&output)?;
            renderer.print_status(
                "ok",
                &format!(
                    "wrote dependency graph with {} project(s) to {}",
                    graph.restore.len(),
                    output.display()
                ),
            );
            Ok(ExitCode::SUCCESS)
        }
        Commands::Completions { shell } => {
            let mut stdout = std::io::stdout().lock();
            write_completions_script(shell, &mut stdout)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

pub(crate) fn load_config(
    explicit: Option<&Path>,
    working_dir: &Path,
    overrides: &RestoreOverrides,
) -> Result<RestoreConfig> {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| working_dir.join(DEFAULT_CONFIG_FILE_NAME));
    if explicit.is_some() && !path.exists() {
        anyhow::bail!("restore config not found: {}", path.display());
    }
    debug!(path = %path.display(), exists = path.exists(), "loading restore config");
    let config = RestoreConfig::load(&path)?;
    let config = apply_overrides(config, overrides)?;
    debug!(
        disable_parallel = config.disable_parallel,
        max_parallelism = ?config.max_parallelism,
        locked_mode = config.settings.locked_mode,
        "restore config resolved"
    );
    Ok(config)
}

pub(crate) fn apply_overrides(mut config: RestoreConfig, overrides: &RestoreOverrides) -> Result<RestoreConfig> {
    if overrides.disable_parallel {
        config.disable_parallel = true;
    }
    if let Some(max_parallelism) = overrides.max_parallelism {
        if max_parallelism == 0 {
            anyhow::bail!("--max-parallelism must be at least 1");
        }
        config.max_parallelism = Some(max_parallelism);
    }
    if overrides.locked {
        config.settings.locked_mode = true;
    }
    Ok(config)
}

fn collect_requests(
    inputs: &[PathBuf],
    working_dir: &Path,
    config: &RestoreConfig,
) -> Result<(Vec<RestoreRequest>, RestoreContext)> {
    let context = RestoreContext::new(
        working_dir.to_path_buf(),
        config.settings.clone(),
        config.enabled_sources(),
    );
    let requests = RequestCollector::new(default_path_providers()).collect(inputs, &context)?;
    Ok((requests, context))
}

pub(crate) async fn restore_inputs(
    inputs: &[PathBuf],
    working_dir: &Path,
    config: &RestoreConfig,
) -> Result<RestoreOutcome> {
    let (requests, context) = collect_requests(inputs, working_dir, config)?;
    let warnings = context.log.entries_at(LogLevel::Warning);
    if requests.is_empty() {
        return Ok(RestoreOutcome {
            summaries: Vec::new(),
            warnings,
        });
    }

    let scheduler = RestoreScheduler::new(Arc::new(DeclaredGraphResolver), config.scheduler_options());
    let summaries = scheduler.run(requests).await?;
    Ok(RestoreOutcome { summaries, warnings })
}

pub(crate) fn assemble_manifest_spec(input: &Path) -> Result<ProjectGraphSpec> {
    let manifest_path = locate_manifest(input)
        .with_context(|| format!("no restore.toml manifest found for {}", input.display()))?;
    let frontend = ProjectManifest::load(&manifest_path)?.into_frontend(&manifest_path)?;
    assemble_project_spec(&frontend)
        .with_context(|| format!("failed assembling graph spec from {}", manifest_path.display()))
}

pub(crate) fn build_dependency_graph(requests: Vec<RestoreRequest>) -> DependencyGraphSpec {
    let mut graph = DependencyGraphSpec::default();
    for request in requests {
        graph.add_restore(request.spec);
    }
    graph
}
