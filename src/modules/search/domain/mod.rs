pub mod entities;
pub mod services;
pub mod value_objects;

// Re-exports for easy access
pub use entities::*;
pub use services::{FilterPipeline, PipelineConfig, PropertyTransformer};
pub use value_objects::{AreaUnit, SearchFilters, SortKey, Tab};
