use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::logger::RestoreLogMessage;
use crate::resolver::RestoreResultPair;
use crate::settings::{PackageSource, RestoreSettings};

#[derive(Debug, Clone)]
pub struct RestoreSummary {
    pub success: bool,
    pub no_op: bool,
    pub project_name: String,
    pub input_path: PathBuf,
    pub lock_file_path: Option<PathBuf>,
    pub settings: Arc<RestoreSettings>,
    pub sources: Vec<PackageSource>,
    pub errors: Vec<RestoreLogMessage>,
    pub elapsed: Duration,
}

pub struct CommitPipeline;

impl CommitPipeline {
    pub async fn commit(pair: RestoreResultPair) -> RestoreSummary {
        let RestoreResultPair { request, result } = pair;
        let project = request.spec.unique_name().to_string();
        let mut success = result.success;

        if result.no_op {
            request
                .logger
                .information(format!("lock file for {project} is up to date, nothing to write"));
        } else if let Err(err) = result.commit(&request.logger).await {
            request
                .logger
                .error(format!("failed committing restore results for {project}: {err:#}"));
            success = false;
        }

        let elapsed_ms = elapsed_millis(result.elapsed);
        if success {
            info!(project = %project, elapsed_ms, no_op = result.no_op, "restore completed");
            request
                .logger
                .minimal(format!("Restore completed in {elapsed_ms} ms for {project}."));
        } else {
            error!(project = %project, elapsed_ms, "restore failed");
            request
                .logger
                .minimal(format!("Failed to restore {project} (in {elapsed_ms} ms)."));
        }

        RestoreSummary {
            success,
            no_op: result.no_op,
            project_name: request.spec.name.clone(),
            input_path: request.input_path.clone(),
            lock_file_path: request.lock_file_path.clone(),
            settings: Arc::clone(&request.settings),
            sources: request.sources.clone(),
            errors: request.logger.errors(),
            elapsed: result.elapsed,
        }
    }
}

pub(crate) fn elapsed_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
