pub mod data_source;
pub mod memory_source;
pub mod rest_source;

// Re-exports for easy access
pub use data_source::{ChangeEvent, ChangeFeed, PropertyDataSource};
pub use memory_source::InMemoryDataSource;
pub use rest_source::RestDataSource;
