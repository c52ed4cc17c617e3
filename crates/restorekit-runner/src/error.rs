use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedInputKind {
    Project,
    Config,
    Generic,
}

impl UnsupportedInputKind {
    pub fn for_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        if file_name == "project.json" {
            return Self::Project;
        }

        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        if extension.ends_with("proj") {
            return Self::Project;
        }
        match extension.as_str() {
            "config" | "json" | "toml" | "props" => Self::Config,
            _ => Self::Generic,
        }
    }

    pub fn describe(self, path: &Path) -> String {
        match self {
            Self::Project => format!(
                "project file '{}' is not restorable: add a restore.toml manifest next to it",
                path.display()
            ),
            Self::Config => format!(
                "configuration file '{}' cannot be restored directly: pass a project directory, restore.toml, or .dg.json graph",
                path.display()
            ),
            Self::Generic => format!(
                "input '{}' is not a restorable project, manifest, or dependency graph",
                path.display()
            ),
        }
    }
}

#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("{}", .kind.describe(.path))]
    UnsupportedInput {
        path: PathBuf,
        kind: UnsupportedInputKind,
    },
    #[error("input '{}' does not exist", .path.display())]
    InputNotFound { path: PathBuf },
    #[error("request provider '{provider}' failed for '{}'", .input.display())]
    Provider {
        provider: String,
        input: PathBuf,
        #[source]
        source: anyhow::Error,
    },
    #[error("restore task failed unexpectedly")]
    UnhandledTaskFailure(#[from] tokio::task::JoinError),
}
