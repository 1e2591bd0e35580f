pub mod draft_service;

pub use draft_service::{deep_merge, DraftService, ImageUpload, ImageUploader};
