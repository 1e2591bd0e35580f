pub mod area_unit;
pub mod search_filters;

// Re-exports for easy access
pub use area_unit::{convert_area, standardize_unit_name, AreaUnit};
pub use search_filters::{FilterUpdate, SearchFilters, SortKey, Tab};
