pub mod filter_pipeline;
pub mod inference;
pub mod location_normalizer;
pub mod property_transformer;

// Re-exports for easy access
pub use filter_pipeline::{FilterPipeline, PipelineConfig};
pub use inference::Inference;
pub use location_normalizer::{is_major_city, normalize_location_name};
pub use property_transformer::PropertyTransformer;
