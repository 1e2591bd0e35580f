pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-exports for easy external access - only export what's actually used
pub use application::{DraftService, ImageUpload, ImageUploader};
pub use domain::entities::{DraftStep, ListingDraft};
pub use domain::repositories::DraftRepository;
pub use infrastructure::InMemoryDraftRepository;
