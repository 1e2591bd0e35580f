use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::data_source::{ChangeEvent, ChangeFeed, PropertyDataSource};
use crate::modules::search::domain::entities::RawPropertyRecord;
use crate::shared::errors::AppResult;

const EVENT_BUFFER: usize = 64;

/// In-process data source backed by a concurrent map, used by tests and by
/// offline/demo setups. Mutations fan out to every open change feed.
pub struct InMemoryDataSource {
    records: DashMap<Uuid, RawPropertyRecord>,
    events: broadcast::Sender<ChangeEvent>,
}

impl InMemoryDataSource {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            records: DashMap::new(),
            events,
        }
    }

    pub fn with_records(records: Vec<RawPropertyRecord>) -> Self {
        let source = Self::new();
        for record in records {
            source.records.insert(record.id, record);
        }
        source
    }

    /// Insert a record and notify subscribers. Notification happens even for
    /// non-listable records; consumers filter on their side.
    pub fn insert(&self, record: RawPropertyRecord) {
        self.records.insert(record.id, record.clone());
        let _ = self.events.send(ChangeEvent::Inserted(record));
    }

    pub fn update(&self, record: RawPropertyRecord) {
        self.records.insert(record.id, record.clone());
        let _ = self.events.send(ChangeEvent::Updated(record));
    }

    pub fn delete(&self, id: Uuid) {
        self.records.remove(&id);
        let _ = self.events.send(ChangeEvent::Deleted(id));
    }

    fn sorted_listable(&self) -> Vec<RawPropertyRecord> {
        let mut listable: Vec<RawPropertyRecord> = self
            .records
            .iter()
            .filter(|entry| entry.value().is_listable())
            .map(|entry| entry.value().clone())
            .collect();
        // Newest first; undated records sink to the end, ids break ties so
        // pagination stays deterministic.
        listable.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        listable
    }
}

impl Default for InMemoryDataSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PropertyDataSource for InMemoryDataSource {
    async fn count_listable(&self) -> AppResult<u64> {
        Ok(self
            .records
            .iter()
            .filter(|entry| entry.value().is_listable())
            .count() as u64)
    }

    async fn fetch_batch(&self, offset: usize, limit: usize) -> AppResult<Vec<RawPropertyRecord>> {
        Ok(self
            .sorted_listable()
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    async fn subscribe(&self) -> AppResult<ChangeFeed> {
        let mut upstream = self.events.subscribe();
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    event = upstream.recv() => match event {
                        Ok(event) => {
                            if tx.send(event).await.is_err() {
                                break;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            log::warn!("change feed lagged, {} events dropped", skipped);
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
        });

        Ok(ChangeFeed::new(rx, cancel))
    }
}
