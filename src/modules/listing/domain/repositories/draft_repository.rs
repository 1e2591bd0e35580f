use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::modules::listing::domain::entities::{DraftStep, ListingDraft};
use crate::shared::errors::AppResult;

/// Storage boundary for listing drafts. Every operation is scoped to the
/// owning user; a draft id that exists but belongs to someone else behaves
/// exactly like a missing draft.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DraftRepository: Send + Sync {
    async fn create(&self, owner_id: Uuid) -> AppResult<ListingDraft>;

    async fn get(&self, id: Uuid, owner_id: Uuid) -> AppResult<ListingDraft>;

    /// Persist one step column's new value, bumping `updated_at`.
    async fn update_column(
        &self,
        id: Uuid,
        owner_id: Uuid,
        step: DraftStep,
        value: Value,
    ) -> AppResult<ListingDraft>;

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> AppResult<()>;
}
