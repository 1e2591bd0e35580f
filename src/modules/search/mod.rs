pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-exports for easy external access - only export what's actually used
pub use application::SearchController;
pub use domain::entities::{Property, RawPropertyRecord};
pub use domain::value_objects::{AreaUnit, SearchFilters, SortKey, Tab};
pub use infrastructure::{ChangeEvent, InMemoryDataSource, PropertyDataSource};
