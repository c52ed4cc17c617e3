mod collector;
mod commit;
mod error;
mod logger;
mod providers;
mod request;
mod resolver;
mod scheduler;
mod settings;

pub use collector::{PathComparison, RequestCollector};
pub use commit::{CommitPipeline, RestoreSummary};
pub use error::{RestoreError, UnsupportedInputKind};
pub use logger::{CollectorLogger, LogLevel, RestoreLogMessage};
pub use providers::{
    default_path_providers, GraphFileRequestProvider, InMemoryRequestProvider,
    ManifestRequestProvider, PathRequestProvider, PreloadedRequestProvider, RequestProvider,
    GRAPH_FILE_SUFFIX,
};
pub use request::{RestoreContext, RestoreRequest};
pub use resolver::{
    ExistingLockFile, LockFileCommit, NoopCommit, RestoreResult, RestoreResultPair, Resolver,
};
pub use scheduler::{RestoreScheduler, SchedulerOptions};
pub use settings::{
    PackageSource, RestoreConfig, RestoreSettings, DEFAULT_CONFIG_FILE_NAME,
    DEFAULT_LOCK_FILE_NAME,
};
pub use tokio_util::sync::CancellationToken;
