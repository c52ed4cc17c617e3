use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;
use restorekit_core::{LibraryTarget, ProjectGraphSpec};
use restorekit_runner::{
    CollectorLogger, ExistingLockFile, LockFileCommit, NoopCommit, Resolver, RestoreRequest,
    RestoreResult,
};
use serde::{Deserialize, Serialize};

pub(crate) const LOCK_FILE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct DeclaredLockFile {
    pub(crate) version: u32,
    pub(crate) spec_hash: String,
    pub(crate) project: String,
    #[serde(default)]
    pub(crate) targets: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    pub(crate) project_references: Vec<String>,
}

impl DeclaredLockFile {
    pub(crate) fn from_spec(spec: &ProjectGraphSpec) -> Result<Self> {
        let targets = spec
            .target_frameworks
            .iter()
            .map(|target| {
                let packages = target
                    .dependencies
                    .iter()
                    .filter(|dependency| dependency.target == LibraryTarget::Package)
                    .map(|dependency| (dependency.name.clone(), dependency.version_range.to_string()))
                    .collect();
                (target.framework.short_folder_name(), packages)
            })
            .collect();
        let project_references: BTreeSet<String> = spec
            .restore_metadata
            .target_frameworks
            .iter()
            .flat_map(|framework| framework.project_references.iter())
            .map(|reference| reference.project_unique_name.clone())
            .collect();

        Ok(Self {
            version: LOCK_FILE_FORMAT_VERSION,
            spec_hash: spec.content_hash()?,
            project: spec.unique_name().to_string(),
            targets,
            project_references: project_references.into_iter().collect(),
        })
    }

    pub(crate) fn from_json_str(input: &str) -> Result<Self> {
        let lock_file: Self = serde_json::from_str(input).context("failed to parse lock file")?;
        if lock_file.version != LOCK_FILE_FORMAT_VERSION {
            anyhow::bail!(
                "unsupported lock file version {} (expected {})",
                lock_file.version,
                LOCK_FILE_FORMAT_VERSION
            );
        }
        Ok(lock_file)
    }

    pub(crate) fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .with_context(|| format!("failed serializing lock file for '{}'", self.project))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DeclaredGraphResolver;

#[async_trait]
impl Resolver for DeclaredGraphResolver {
    async fn execute(
        &self,
        request: &RestoreRequest,
        existing_lock_file: Option<ExistingLockFile>,
    ) -> Result<RestoreResult> {
        let started = Instant::now();
        let logger = &request.logger;
        let lock_file = DeclaredLockFile::from_spec(&request.spec)?;

        for target in &request.spec.target_frameworks {
            for dependency in &target.dependencies {
                if dependency.target == LibraryTarget::Package && dependency.version_range.is_all() {
                    logger.warning(format!(
                        "{} has no version constraint for {}; any version satisfies it",
                        dependency.name,
                        target.framework.short_folder_name()
                    ));
                }
            }
        }

        let existing_hash = existing_lock_file.as_ref().and_then(|existing| {
            match DeclaredLockFile::from_json_str(&existing.content) {
                Ok(parsed) => Some(parsed.spec_hash),
                Err(err) => {
                    logger.warning(format!(
                        "ignoring unreadable lock file {}: {err:#}",
                        existing.path.display()
                    ));
                    None
                }
            }
        });

        if existing_hash.as_deref() == Some(lock_file.spec_hash.as_str()) {
            logger.information(format!("lock file for {} is up to date", lock_file.project));
            return Ok(RestoreResult::no_op(
                started.elapsed(),
                request.lock_file_path.clone(),
            ));
        }

        if request.settings.locked_mode {
            let reason = if existing_lock_file.is_some() {
                "does not match the project"
            } else {
                "is missing"
            };
            logger.error(format!(
                "locked mode is enabled and the lock file for {} {reason}",
                lock_file.project
            ));
            return Ok(RestoreResult::failed(
                started.elapsed(),
                request.lock_file_path.clone(),
            ));
        }

        let Some(path) = request.lock_file_path.clone() else {
            logger.verbose(format!("{} has no lock file location", lock_file.project));
            return Ok(RestoreResult::new(
                true,
                started.elapsed(),
                None,
                Box::new(NoopCommit),
            ));
        };

        Ok(RestoreResult::new(
            true,
            started.elapsed(),
            Some(path.clone()),
            Box::new(LockFileWrite { path, lock_file }),
        ))
    }
}

struct LockFileWrite {
    path: PathBuf,
    lock_file: DeclaredLockFile,
}

#[async_trait]
impl LockFileCommit for LockFileWrite {
    async fn commit(&self, logger: &CollectorLogger) -> Result<()> {
        let content = self.lock_file.to_json_pretty()?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed creating directory {}", parent.display()))?;
        }

        let staged = self.path.with_extension("json.tmp");
        tokio::fs::write(&staged, content)
            .await
            .with_context(|| format!("failed writing lock file: {}", staged.display()))?;
        tokio::fs::rename(&staged, &self.path)
            .await
            .with_context(|| {
                format!(
                    "failed moving lock file into place: {} -> {}",
                    staged.display(),
                    self.path.display()
                )
            })?;

        logger.verbose(format!("wrote lock file {}", self.path.display()));
        Ok(())
    }
}
