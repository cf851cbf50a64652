use async_trait::async_trait;

use poolwatch_core::{CoreError, QueueSnapshot, QueueWatch, Snapshot, WorkPoolStore};

/// Produces raw work-pool snapshots for the refresh loop.
///
/// Implemented by the DynamoDB-backed fetcher below and by test doubles.
/// Failures are either [`CoreError::Unavailable`] or [`CoreError::Auth`];
/// the loop retries both the same way.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self) -> Result<Snapshot, CoreError>;

    /// Human-readable description of the source, for the status bar.
    fn source(&self) -> &str;
}

/// Produces queue-metric snapshots for the refresh loop.
#[async_trait]
pub trait FetchQueues: Send + Sync {
    async fn fetch(&self) -> Result<QueueSnapshot, CoreError>;

    fn source(&self) -> &str;
}

/// [`Fetch`] over the DynamoDB work-pool table.
pub struct WorkPoolFetcher {
    store: WorkPoolStore,
    source: String,
}

impl WorkPoolFetcher {
    pub fn new(store: WorkPoolStore) -> Self {
        let source = format!("dynamodb:{}", store.table_name());
        Self { store, source }
    }
}

#[async_trait]
impl Fetch for WorkPoolFetcher {
    async fn fetch(&self) -> Result<Snapshot, CoreError> {
        self.store.scan_work_pool().await
    }

    fn source(&self) -> &str {
        &self.source
    }
}

/// [`FetchQueues`] over SQS.
pub struct QueueStatsFetcher {
    watch: QueueWatch,
    source: String,
}

impl QueueStatsFetcher {
    pub fn new(watch: QueueWatch, queue_count: usize) -> Self {
        let source = if queue_count == 0 {
            "sqs (all queues)".to_string()
        } else {
            format!("sqs ({queue_count} queues)")
        };
        Self { watch, source }
    }
}

#[async_trait]
impl FetchQueues for QueueStatsFetcher {
    async fn fetch(&self) -> Result<QueueSnapshot, CoreError> {
        self.watch.fetch_queues().await
    }

    fn source(&self) -> &str {
        &self.source
    }
}
