use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::commit::{CommitPipeline, RestoreSummary};
use crate::error::RestoreError;
use crate::request::RestoreRequest;
use crate::resolver::{load_existing_lock_file, RestoreResult, RestoreResultPair, Resolver};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerOptions {
    pub disable_parallel: bool,
    pub max_parallelism: Option<usize>,
}

impl SchedulerOptions {
    pub fn new(disable_parallel: bool, max_parallelism: Option<usize>) -> Self {
        Self {
            disable_parallel,
            max_parallelism,
        }
    }

    pub fn sequential() -> Self {
        Self::new(true, None)
    }

    pub fn degree_of_parallelism(&self) -> usize {
        if self.disable_parallel || cfg!(target_family = "wasm") {
            return 1;
        }
        self.max_parallelism.unwrap_or_else(num_cpus::get).max(1)
    }
}

pub struct RestoreScheduler {
    resolver: Arc<dyn Resolver>,
    options: SchedulerOptions,
}

impl RestoreScheduler {
    pub fn new(resolver: Arc<dyn Resolver>, options: SchedulerOptions) -> Self {
        Self { resolver, options }
    }

    pub fn options(&self) -> SchedulerOptions {
        self.options
    }

    pub async fn run(&self, requests: Vec<RestoreRequest>) -> Result<Vec<RestoreSummary>, RestoreError> {
        let resolver = Arc::clone(&self.resolver);
        self.drive(requests, None, move |request| {
            let resolver = Arc::clone(&resolver);
            async move {
                let pair = execute_request(resolver, request).await;
                CommitPipeline::commit(pair).await
            }
        })
        .await
    }

    /// Resolves without persisting anything. Once `cancel` fires no further
    /// requests are admitted; tasks already running finish normally.
    pub async fn run_without_commit(
        &self,
        requests: Vec<RestoreRequest>,
        cancel: &CancellationToken,
    ) -> Result<Vec<RestoreResultPair>, RestoreError> {
        let resolver = Arc::clone(&self.resolver);
        self.drive(requests, Some(cancel), move |request| {
            execute_request(Arc::clone(&resolver), request)
        })
        .await
    }

    async fn drive<T, F, Fut>(
        &self,
        requests: Vec<RestoreRequest>,
        cancel: Option<&CancellationToken>,
        task: F,
    ) -> Result<Vec<T>, RestoreError>
    where
        F: Fn(RestoreRequest) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let parallelism = self.options.degree_of_parallelism();
        let mut queue: VecDeque<RestoreRequest> = requests.into();
        let mut in_flight: FuturesUnordered<JoinHandle<T>> = FuturesUnordered::new();
        let mut completed = Vec::with_capacity(queue.len());
        debug!(requests = queue.len(), parallelism, "starting restore scheduler");

        while !queue.is_empty() {
            if in_flight.len() >= parallelism {
                if let Some(joined) = in_flight.next().await {
                    completed.push(joined?);
                }
            }

            if cancel.is_some_and(CancellationToken::is_cancelled) {
                debug!(pending = queue.len(), "restore cancelled, no further requests admitted");
                break;
            }

            let Some(request) = queue.pop_front() else {
                break;
            };
            in_flight.push(tokio::spawn(task(request)));
        }

        while let Some(joined) = in_flight.next().await {
            completed.push(joined?);
        }
        Ok(completed)
    }
}

async fn execute_request(resolver: Arc<dyn Resolver>, request: RestoreRequest) -> RestoreResultPair {
    let started = Instant::now();
    debug!(project = request.spec.unique_name(), "restoring");

    let existing_lock_file = match load_existing_lock_file(request.lock_file_path.as_deref()).await {
        Ok(existing) => existing,
        Err(err) => {
            request.logger.warning(format!("{err:#}"));
            None
        }
    };

    let result = match resolver.execute(&request, existing_lock_file).await {
        Ok(result) => result,
        Err(err) => {
            request.logger.error(format!(
                "failed to restore {}: {err:#}",
                request.spec.unique_name()
            ));
            RestoreResult::failed(started.elapsed(), request.lock_file_path.clone())
        }
    };

    RestoreResultPair { request, result }
}
