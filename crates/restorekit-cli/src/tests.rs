use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use pretty_assertions::assert_eq;
use restorekit_runner::{
    LogLevel, RestoreConfig, RestoreLogMessage, RestoreSettings, RestoreSummary,
    DEFAULT_LOCK_FILE_NAME,
};

use super::*;
use crate::completion::write_completions_script;
use crate::dispatch::{
    apply_overrides, assemble_manifest_spec, build_dependency_graph, load_config, restore_inputs,
    RestoreOverrides,
};
use crate::lockfile::{DeclaredLockFile, LOCK_FILE_FORMAT_VERSION};
use crate::render::{
    format_elapsed, format_summary_lines, format_totals_line, render_status_line, OutputStyle,
};

const APP_MANIFEST: &str = r#"
project = "App.csproj"

[properties]
TargetFrameworks = "net45;netstandard1.6"

[[targets]]
moniker = "net45"

[[targets.package_references]]
include = "Newtonsoft.Json"
metadata = { Version = "[9.0.1, )" }

[[targets.project_references]]
include = "../Lib/Lib.csproj"

[[targets]]
moniker = "netstandard1.6"

[[targets.package_references]]
include = "NETStandard.Library"
metadata = { Version = "1.6.1" }
"#;

fn write_manifest(dir: &Path, content: &str) {
    fs::create_dir_all(dir).expect("must create project dir");
    fs::write(dir.join("restore.toml"), content).expect("must write manifest");
}

fn summary(name: &str, success: bool, no_op: bool) -> RestoreSummary {
    RestoreSummary {
        success,
        no_op,
        project_name: name.to_string(),
        input_path: PathBuf::from(format!("/work/{name}")),
        lock_file_path: Some(PathBuf::from(format!("/work/{name}/obj/project.lock.json"))),
        settings: Arc::new(RestoreSettings::default()),
        sources: Vec::new(),
        errors: Vec::new(),
        elapsed: Duration::from_millis(1250),
    }
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn restore_command_parses_flags() {
    let cli = Cli::try_parse_from([
        "restorekit",
        "-v",
        "restore",
        "src/App",
        "src/Lib",
        "--max-parallelism",
        "3",
        "--locked",
    ])
    .expect("restore command must parse");

    assert_eq!(cli.verbose, 1);
    match cli.command {
        Commands::Restore {
            inputs,
            max_parallelism,
            locked,
            ..
        } => {
            assert_eq!(inputs, vec![PathBuf::from("src/App"), PathBuf::from("src/Lib")]);
            assert_eq!(max_parallelism, Some(3));
            assert!(locked);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn graph_command_requires_inputs() {
    let result = Cli::try_parse_from(["restorekit", "graph", "--output", "all.dg.json"]);
    assert!(result.is_err());
}

#[test]
fn render_status_line_plain_is_unadorned() {
    assert_eq!(
        render_status_line(OutputStyle::Plain, "ok", "App: restored in 0.010s"),
        "App: restored in 0.010s"
    );
}

#[test]
fn render_status_line_rich_includes_ascii_badge() {
    assert_eq!(
        render_status_line(OutputStyle::Rich, "ok", "App: restored"),
        "[OK] App: restored"
    );
    assert_eq!(
        render_status_line(OutputStyle::Rich, "warn", "nothing to restore"),
        "[WARN] nothing to restore"
    );
    assert_eq!(
        render_status_line(OutputStyle::Rich, "skip", "App: up-to-date"),
        "[..] App: up-to-date"
    );
}

#[test]
fn format_elapsed_pads_millis() {
    assert_eq!(format_elapsed(Duration::from_millis(1005)), "1.005s");
    assert_eq!(format_elapsed(Duration::ZERO), "0.000s");
}

#[test]
fn summary_lines_cover_each_outcome() {
    assert_eq!(
        format_summary_lines(&summary("App", true, false), OutputStyle::Rich),
        vec!["[OK] App: restored in 1.250s -> /work/App/obj/project.lock.json"]
    );
    assert_eq!(
        format_summary_lines(&summary("Lib", true, true), OutputStyle::Rich),
        vec!["[..] Lib: up-to-date (1.250s)"]
    );

    let mut failed = summary("Tool", false, false);
    failed.errors.push(RestoreLogMessage {
        level: LogLevel::Error,
        message: "locked mode is enabled and the lock file for Tool is missing".to_string(),
    });
    assert_eq!(
        format_summary_lines(&failed, OutputStyle::Plain),
        vec![
            "Tool: restore failed after 1.250s",
            "  locked mode is enabled and the lock file for Tool is missing",
        ]
    );
}

#[test]
fn totals_line_counts_outcomes() {
    let summaries = vec![
        summary("App", true, false),
        summary("Lib", true, true),
        summary("Tool", false, false),
    ];
    assert_eq!(
        format_totals_line(&summaries, OutputStyle::Rich),
        "[ERR] restored=1 up_to_date=1 failed=1"
    );
    assert_eq!(
        format_totals_line(&summaries[..2], OutputStyle::Rich),
        "[OK] restored=1 up_to_date=1 failed=0"
    );
}

#[test]
fn overrides_layer_over_config() {
    let config = apply_overrides(
        RestoreConfig::default(),
        &RestoreOverrides {
            disable_parallel: true,
            max_parallelism: Some(2),
            locked: true,
        },
    )
    .expect("overrides should apply");

    assert!(config.disable_parallel);
    assert_eq!(config.max_parallelism, Some(2));
    assert!(config.settings.locked_mode);
    assert_eq!(config.scheduler_options().degree_of_parallelism(), 1);
}

#[test]
fn zero_max_parallelism_override_is_rejected() {
    let err = apply_overrides(
        RestoreConfig::default(),
        &RestoreOverrides {
            max_parallelism: Some(0),
            ..RestoreOverrides::default()
        },
    )
    .expect_err("zero must be rejected");
    assert!(err.to_string().contains("--max-parallelism"));
}

#[test]
fn config_file_in_working_directory_is_loaded() {
    let dir = tempfile::tempdir().expect("must create tempdir");
    fs::write(
        dir.path().join("restorekit.toml"),
        "max_parallelism = 4\n[settings]\nlock_file_name = \"packages.lock.json\"\n",
    )
    .expect("must write config");

    let config = load_config(None, dir.path(), &RestoreOverrides::default())
        .expect("config should load");
    assert_eq!(config.max_parallelism, Some(4));
    assert_eq!(config.settings.lock_file_name, "packages.lock.json");

    let err = load_config(
        Some(&dir.path().join("missing.toml")),
        dir.path(),
        &RestoreOverrides::default(),
    )
    .expect_err("explicit missing config must fail");
    assert!(err.to_string().contains("restore config not found"));
}

#[derive(Clone, Default)]
struct CapturedLog(Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("log lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn config_loading_emits_debug_events() {
    let dir = tempfile::tempdir().expect("must create tempdir");
    fs::write(dir.path().join("restorekit.toml"), "max_parallelism = 2\n")
        .expect("must write config");

    let captured = CapturedLog::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let overrides = RestoreOverrides {
        disable_parallel: true,
        ..RestoreOverrides::default()
    };
    tracing::subscriber::with_default(subscriber, || {
        load_config(None, dir.path(), &overrides).expect("config should load");
    });

    let output = String::from_utf8(captured.0.lock().expect("log lock").clone())
        .expect("log output should be utf-8");
    assert!(output.contains("loading restore config"));
    assert!(output.contains("restorekit.toml"));
    assert!(output.contains("restore config resolved"));
    assert!(output.contains("disable_parallel=true"));
}

#[test]
fn lock_file_records_targets_and_project_references() {
    let dir = tempfile::tempdir().expect("must create tempdir");
    let app = dir.path().join("App");
    write_manifest(&app, APP_MANIFEST);
    let spec = assemble_manifest_spec(&app).expect("spec should assemble");

    let lock_file = DeclaredLockFile::from_spec(&spec).expect("lock file should build");

    assert_eq!(lock_file.version, LOCK_FILE_FORMAT_VERSION);
    assert_eq!(lock_file.spec_hash, spec.content_hash().expect("hash"));
    assert_eq!(
        lock_file.targets["net45"]["Newtonsoft.Json"],
        "[9.0.1, )"
    );
    assert_eq!(
        lock_file.targets["netstandard1.6"]["NETStandard.Library"],
        "[1.6.1, )"
    );
    assert_eq!(
        lock_file.project_references,
        vec![dir.path().join("Lib").join("Lib.csproj").display().to_string()]
    );

    let reparsed = DeclaredLockFile::from_json_str(&lock_file.to_json_pretty().expect("json"))
        .expect("lock file should parse");
    assert_eq!(reparsed, lock_file);
}

#[test]
fn lock_file_with_unknown_version_is_rejected() {
    let err = DeclaredLockFile::from_json_str(
        r#"{"version":7,"spec_hash":"abc","project":"/work/App/App.csproj"}"#,
    )
    .expect_err("version 7 must be rejected");
    assert!(err.to_string().contains("unsupported lock file version 7"));
}

#[tokio::test]
async fn restore_writes_lock_file_then_reports_up_to_date() {
    let dir = tempfile::tempdir().expect("must create tempdir");
    let app = dir.path().join("App");
    write_manifest(&app, APP_MANIFEST);
    let config = RestoreConfig::default();
    let lock_path = app.join("obj").join(DEFAULT_LOCK_FILE_NAME);

    let first = restore_inputs(&[app.clone()], dir.path(), &config)
        .await
        .expect("first restore should run");
    assert!(first.succeeded());
    assert!(!first.summaries[0].no_op);
    assert_eq!(first.summaries[0].lock_file_path.as_ref(), Some(&lock_path));
    let written = fs::read_to_string(&lock_path).expect("lock file must exist");
    assert!(written.contains("Newtonsoft.Json"));
    assert!(!app.join("obj").join("project.lock.json.tmp").exists());

    let second = restore_inputs(&[app], dir.path(), &config)
        .await
        .expect("second restore should run");
    assert!(second.succeeded());
    assert!(second.summaries[0].no_op);
}

#[tokio::test]
async fn locked_mode_fails_without_a_matching_lock_file() {
    let dir = tempfile::tempdir().expect("must create tempdir");
    let app = dir.path().join("App");
    write_manifest(&app, APP_MANIFEST);
    let mut config = RestoreConfig::default();
    config.settings.locked_mode = true;

    let missing = restore_inputs(&[app.clone()], dir.path(), &config)
        .await
        .expect("restore should run");
    assert!(!missing.succeeded());
    assert!(missing.summaries[0].errors[0].message.contains("is missing"));
    assert!(!app.join("obj").join(DEFAULT_LOCK_FILE_NAME).exists());

    let unlocked = RestoreConfig::default();
    restore_inputs(&[app.clone()], dir.path(), &unlocked)
        .await
        .expect("unlocked restore should run");
    let matching = restore_inputs(&[app.clone()], dir.path(), &config)
        .await
        .expect("locked restore should run");
    assert!(matching.succeeded());
    assert!(matching.summaries[0].no_op);

    write_manifest(&app, &APP_MANIFEST.replace("9.0.1", "10.0.3"));
    let stale = restore_inputs(&[app], dir.path(), &config)
        .await
        .expect("locked restore should run");
    assert!(!stale.succeeded());
    assert!(stale.summaries[0].errors[0]
        .message
        .contains("does not match the project"));
}

#[tokio::test]
async fn missing_input_aborts_restore() {
    let dir = tempfile::tempdir().expect("must create tempdir");
    let app = dir.path().join("App");
    write_manifest(&app, APP_MANIFEST);
    let missing = dir.path().join("Nope");

    let err = restore_inputs(&[app.clone(), missing.clone()], dir.path(), &RestoreConfig::default())
        .await
        .expect_err("missing input must fail");
    assert!(err.to_string().contains(&missing.display().to_string()));
    assert!(!app.join("obj").join(DEFAULT_LOCK_FILE_NAME).exists());
}

#[test]
fn dependency_graph_round_trips_through_graph_provider() {
    let dir = tempfile::tempdir().expect("must create tempdir");
    let app = dir.path().join("App");
    write_manifest(&app, APP_MANIFEST);
    let spec = assemble_manifest_spec(&app).expect("spec should assemble");
    let context = restorekit_runner::RestoreContext::new(
        dir.path().to_path_buf(),
        RestoreSettings::default(),
        Vec::new(),
    );
    let request = restorekit_runner::RestoreRequest::new(app.clone(), spec.clone(), &context);

    let graph = build_dependency_graph(vec![request]);
    let graph_path = dir.path().join("all.dg.json");
    graph.save(&graph_path).expect("graph should save");

    let loaded = restorekit_core::DependencyGraphSpec::load(&graph_path).expect("graph should load");
    assert_eq!(loaded.restore, vec![spec.unique_name().to_string()]);
    assert_eq!(loaded.restore_specs().expect("specs")[0], &spec);
}

#[test]
fn completions_script_names_the_binary() {
    let mut output = Vec::new();
    write_completions_script(CliCompletionShell::Bash, &mut output)
        .expect("completions should render");
    let script = String::from_utf8(output).expect("script should be utf-8");
    assert!(script.contains("restorekit"));
}
