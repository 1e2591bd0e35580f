/// Listing Draft Integration Tests
///
/// Exercises the wizard-step save path end to end: nested JSON merging
/// against the in-memory repository and the degrade-to-empty behavior when
/// image uploads fail.
use std::sync::Arc;

use async_trait::async_trait;
use nivaas_lib::modules::listing::application::{DraftService, ImageUpload, ImageUploader};
use nivaas_lib::modules::listing::domain::entities::DraftStep;
use nivaas_lib::modules::listing::infrastructure::InMemoryDraftRepository;
use nivaas_lib::shared::errors::{AppError, AppResult};
use serde_json::json;
use uuid::Uuid;

struct StaticUploader {
    urls: Vec<String>,
}

#[async_trait]
impl ImageUploader for StaticUploader {
    async fn upload(
        &self,
        _files: Vec<ImageUpload>,
        _folder: &str,
        _owner_id: Uuid,
    ) -> AppResult<Vec<String>> {
        Ok(self.urls.clone())
    }
}

struct FailingUploader;

#[async_trait]
impl ImageUploader for FailingUploader {
    async fn upload(
        &self,
        _files: Vec<ImageUpload>,
        _folder: &str,
        _owner_id: Uuid,
    ) -> AppResult<Vec<String>> {
        Err(AppError::ExternalServiceError("storage down".to_string()))
    }
}

fn service_with(uploader: Arc<dyn ImageUploader>) -> DraftService {
    DraftService::new(Arc::new(InMemoryDraftRepository::new()), uploader)
}

#[tokio::test]
async fn test_step_saves_merge_without_clobbering_nested_keys() {
    let service = service_with(Arc::new(StaticUploader { urls: vec![] }));
    let owner = Uuid::new_v4();
    let draft = service.create_draft(owner).await.unwrap();

    service
        .save_step(
            draft.id,
            owner,
            DraftStep::LocationDetails,
            json!({ "address": { "line1": "12 MG Road", "pin": "560001" }, "city": "Bangalore" }),
        )
        .await
        .unwrap();

    // A later partial save touches one nested key and adds another field.
    let saved = service
        .save_step(
            draft.id,
            owner,
            DraftStep::LocationDetails,
            json!({ "address": { "line1": "14 MG Road" }, "landmark": "near metro" }),
        )
        .await
        .unwrap();

    assert_eq!(
        saved.location_details,
        json!({
            "address": { "line1": "14 MG Road", "pin": "560001" },
            "city": "Bangalore",
            "landmark": "near metro"
        })
    );
}

#[tokio::test]
async fn test_steps_are_isolated_from_each_other() {
    let service = service_with(Arc::new(StaticUploader { urls: vec![] }));
    let owner = Uuid::new_v4();
    let draft = service.create_draft(owner).await.unwrap();

    service
        .save_step(draft.id, owner, DraftStep::BasicDetails, json!({ "title": "2 BHK" }))
        .await
        .unwrap();
    let saved = service
        .save_step(draft.id, owner, DraftStep::Pricing, json!({ "price": 4500000 }))
        .await
        .unwrap();

    assert_eq!(saved.basic_details, json!({ "title": "2 BHK" }));
    assert_eq!(saved.pricing, json!({ "price": 4500000 }));
}

#[tokio::test]
async fn test_image_upload_success_stores_urls() {
    let service = service_with(Arc::new(StaticUploader {
        urls: vec!["https://cdn/a.jpg".to_string(), "https://cdn/b.jpg".to_string()],
    }));
    let owner = Uuid::new_v4();
    let draft = service.create_draft(owner).await.unwrap();

    let saved = service
        .save_images(
            draft.id,
            owner,
            "Apartment",
            vec![ImageUpload {
                file_name: "a.jpg".to_string(),
                bytes: vec![0xFF],
            }],
        )
        .await
        .unwrap();
    assert_eq!(
        saved.media["images"],
        json!(["https://cdn/a.jpg", "https://cdn/b.jpg"])
    );
}

#[tokio::test]
async fn test_image_upload_failure_does_not_abort_save() {
    let service = service_with(Arc::new(FailingUploader));
    let owner = Uuid::new_v4();
    let draft = service.create_draft(owner).await.unwrap();

    let saved = service
        .save_images(
            draft.id,
            owner,
            "Villa",
            vec![ImageUpload {
                file_name: "front.jpg".to_string(),
                bytes: vec![1, 2, 3],
            }],
        )
        .await
        .unwrap();
    assert_eq!(saved.media["images"], json!([]));
}

#[tokio::test]
async fn test_draft_operations_are_owner_scoped() {
    let service = service_with(Arc::new(StaticUploader { urls: vec![] }));
    let owner = Uuid::new_v4();
    let draft = service.create_draft(owner).await.unwrap();

    let stranger = Uuid::new_v4();
    let result = service
        .save_step(draft.id, stranger, DraftStep::Pricing, json!({ "price": 1 }))
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    // The owner still sees an untouched draft.
    let fetched = service.get_draft(draft.id, owner).await.unwrap();
    assert_eq!(fetched.pricing, json!({}));
}
