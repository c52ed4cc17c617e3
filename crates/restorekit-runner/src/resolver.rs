use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::logger::CollectorLogger;
use crate::request::RestoreRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingLockFile {
    pub path: PathBuf,
    pub content: String,
}

/// Turns a request's graph spec into a resolution result. Reporting a failed
/// resolution is done through `RestoreResult::success`, not through `Err`.
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn execute(
        &self,
        request: &RestoreRequest,
        existing_lock_file: Option<ExistingLockFile>,
    ) -> Result<RestoreResult>;
}

#[async_trait]
pub trait LockFileCommit: Send + Sync {
    async fn commit(&self, logger: &CollectorLogger) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCommit;

#[async_trait]
impl LockFileCommit for NoopCommit {
    async fn commit(&self, _logger: &CollectorLogger) -> Result<()> {
        Ok(())
    }
}

pub struct RestoreResult {
    pub success: bool,
    pub no_op: bool,
    pub elapsed: Duration,
    pub lock_file_path: Option<PathBuf>,
    commit: Box<dyn LockFileCommit>,
}

impl RestoreResult {
    pub fn new(
        success: bool,
        elapsed: Duration,
        lock_file_path: Option<PathBuf>,
        commit: Box<dyn LockFileCommit>,
    ) -> Self {
        Self {
            success,
            no_op: false,
            elapsed,
            lock_file_path,
            commit,
        }
    }

    pub fn failed(elapsed: Duration, lock_file_path: Option<PathBuf>) -> Self {
        Self::new(false, elapsed, lock_file_path, Box::new(NoopCommit))
    }

    pub fn no_op(elapsed: Duration, lock_file_path: Option<PathBuf>) -> Self {
        Self {
            no_op: true,
            ..Self::new(true, elapsed, lock_file_path, Box::new(NoopCommit))
        }
    }

    pub async fn commit(&self, logger: &CollectorLogger) -> Result<()> {
        self.commit.commit(logger).await
    }
}

impl fmt::Debug for RestoreResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestoreResult")
            .field("success", &self.success)
            .field("no_op", &self.no_op)
            .field("elapsed", &self.elapsed)
            .field("lock_file_path", &self.lock_file_path)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct RestoreResultPair {
    pub request: RestoreRequest,
    pub result: RestoreResult,
}

pub(crate) async fn load_existing_lock_file(path: Option<&Path>) -> Result<Option<ExistingLockFile>> {
    let Some(path) = path else {
        return Ok(None);
    };
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(ExistingLockFile {
            path: path.to_path_buf(),
            content,
        })),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => {
            Err(err).with_context(|| format!("failed reading existing lock file: {}", path.display()))
        }
    }
}
