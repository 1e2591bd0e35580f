pub mod modules;
pub mod shared;

// Re-exports for convenience (the usual entry points of the engine)
pub use modules::search::application::SearchController;
pub use modules::search::domain::entities::{Property, RawPropertyRecord};
pub use modules::search::domain::value_objects::{SearchFilters, SortKey, Tab};
pub use shared::errors::{AppError, AppResult};
