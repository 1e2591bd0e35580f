//! Wizard-step persistence over the draft repository.
//!
//! Each step saves into its own nested JSON column via a deep merge, so a
//! partial payload from one screen never wipes keys another screen already
//! wrote into the same column.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::listing::domain::entities::{DraftStep, ListingDraft};
use crate::modules::listing::domain::repositories::DraftRepository;
use crate::shared::errors::AppResult;

/// One binary file queued for upload.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Media storage boundary. Returns public URLs for uploaded files.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(
        &self,
        files: Vec<ImageUpload>,
        folder: &str,
        owner_id: Uuid,
    ) -> AppResult<Vec<String>>;
}

pub struct DraftService {
    repository: Arc<dyn DraftRepository>,
    uploader: Arc<dyn ImageUploader>,
}

impl DraftService {
    pub fn new(repository: Arc<dyn DraftRepository>, uploader: Arc<dyn ImageUploader>) -> Self {
        Self { repository, uploader }
    }

    pub async fn create_draft(&self, owner_id: Uuid) -> AppResult<ListingDraft> {
        self.repository.create(owner_id).await
    }

    pub async fn get_draft(&self, id: Uuid, owner_id: Uuid) -> AppResult<ListingDraft> {
        self.repository.get(id, owner_id).await
    }

    pub async fn delete_draft(&self, id: Uuid, owner_id: Uuid) -> AppResult<()> {
        self.repository.delete(id, owner_id).await
    }

    /// Merge one step's form payload into its draft column and persist the
    /// merged value. Keys absent from the payload keep their stored values,
    /// including nested ones.
    pub async fn save_step(
        &self,
        draft_id: Uuid,
        owner_id: Uuid,
        step: DraftStep,
        payload: Value,
    ) -> AppResult<ListingDraft> {
        let draft = self.repository.get(draft_id, owner_id).await?;
        let mut merged = draft.column(step).clone();
        deep_merge(&mut merged, payload);
        self.repository
            .update_column(draft_id, owner_id, step, merged)
            .await
    }

    /// Upload media files and merge the resulting URLs into the media
    /// column. An upload failure degrades to an empty image list with a
    /// warning rather than aborting the save.
    pub async fn save_images(
        &self,
        draft_id: Uuid,
        owner_id: Uuid,
        category: &str,
        files: Vec<ImageUpload>,
    ) -> AppResult<ListingDraft> {
        let folder = folder_slug(category);
        let urls = match self.uploader.upload(files, &folder, owner_id).await {
            Ok(urls) => urls,
            Err(err) => {
                log::warn!(
                    "image upload failed for draft {}, saving with empty image list: {}",
                    draft_id,
                    err
                );
                Vec::new()
            }
        };
        self.save_step(
            draft_id,
            owner_id,
            DraftStep::Media,
            serde_json::json!({ "images": urls }),
        )
        .await
    }
}

/// Recursively merge `incoming` into `target`. Objects merge key by key,
/// everything else (arrays included) replaces wholesale.
pub fn deep_merge(target: &mut Value, incoming: Value) {
    match (target, incoming) {
        (Value::Object(target_map), Value::Object(incoming_map)) => {
            for (key, value) in incoming_map {
                match target_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        target_map.insert(key, value);
                    }
                }
            }
        }
        (target_slot, incoming) => *target_slot = incoming,
    }
}

/// Storage folder derived from the property category: lowercased with
/// non-alphanumeric runs collapsed to single hyphens.
fn folder_slug(category: &str) -> String {
    let mut slug = String::with_capacity(category.len());
    let mut last_was_hyphen = true;
    for c in category.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        "uncategorized".to_string()
    } else {
        slug
    }
}
