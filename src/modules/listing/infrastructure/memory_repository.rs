use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use serde_json::Value;
use uuid::Uuid;

use crate::modules::listing::domain::entities::{DraftStep, ListingDraft};
use crate::modules::listing::domain::repositories::DraftRepository;
use crate::shared::errors::{AppError, AppResult};

/// In-process draft store for tests and offline setups. Owner scoping is
/// enforced here the same way a real backend would: a wrong owner looks
/// identical to a missing draft.
pub struct InMemoryDraftRepository {
    drafts: DashMap<Uuid, ListingDraft>,
}

impl InMemoryDraftRepository {
    pub fn new() -> Self {
        Self {
            drafts: DashMap::new(),
        }
    }

    fn owned(&self, id: Uuid, owner_id: Uuid) -> AppResult<ListingDraft> {
        self.drafts
            .get(&id)
            .filter(|draft| draft.owner_id == owner_id)
            .map(|draft| draft.clone())
            .ok_or_else(|| AppError::NotFound(format!("draft {} not found", id)))
    }
}

impl Default for InMemoryDraftRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DraftRepository for InMemoryDraftRepository {
    async fn create(&self, owner_id: Uuid) -> AppResult<ListingDraft> {
        let draft = ListingDraft::new(owner_id);
        self.drafts.insert(draft.id, draft.clone());
        Ok(draft)
    }

    async fn get(&self, id: Uuid, owner_id: Uuid) -> AppResult<ListingDraft> {
        self.owned(id, owner_id)
    }

    async fn update_column(
        &self,
        id: Uuid,
        owner_id: Uuid,
        step: DraftStep,
        value: Value,
    ) -> AppResult<ListingDraft> {
        let mut draft = self.owned(id, owner_id)?;
        *draft.column_mut(step) = value;
        draft.updated_at = Utc::now();
        self.drafts.insert(draft.id, draft.clone());
        Ok(draft)
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> AppResult<()> {
        self.owned(id, owner_id)?;
        self.drafts.remove(&id);
        Ok(())
    }
}
