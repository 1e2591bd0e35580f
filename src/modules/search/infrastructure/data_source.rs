use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::modules::search::domain::entities::RawPropertyRecord;
use crate::shared::errors::AppResult;

/// One mutation observed on the backing dataset.
#[derive(Debug, Clone)]
pub enum ChangeEvent {
    Inserted(RawPropertyRecord),
    Updated(RawPropertyRecord),
    Deleted(Uuid),
}

/// Live subscription handle. Events arrive in publication order; dropping the
/// handle (or calling `unsubscribe`) tears the subscription down.
pub struct ChangeFeed {
    receiver: mpsc::Receiver<ChangeEvent>,
    cancel: CancellationToken,
}

impl ChangeFeed {
    pub fn new(receiver: mpsc::Receiver<ChangeEvent>, cancel: CancellationToken) -> Self {
        Self { receiver, cancel }
    }

    /// Next event, or `None` once the feed has been closed on either side.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        self.receiver.recv().await
    }

    pub fn unsubscribe(&self) {
        self.cancel.cancel();
    }
}

impl Drop for ChangeFeed {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Backend abstraction the search controller loads from. Implementations
/// must only surface listable records (visible and not rejected) from the
/// batch queries; the change feed carries everything and lets the caller
/// re-check listability per event.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PropertyDataSource: Send + Sync {
    /// Total number of listable records, for pagination bookkeeping.
    async fn count_listable(&self) -> AppResult<u64>;

    /// One page of listable records ordered newest-first.
    async fn fetch_batch(&self, offset: usize, limit: usize) -> AppResult<Vec<RawPropertyRecord>>;

    /// Open a live change subscription.
    async fn subscribe(&self) -> AppResult<ChangeFeed>;
}
