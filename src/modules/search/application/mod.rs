pub mod search_controller;
pub mod url_params;

// Re-exports for easy access
pub use search_controller::{SearchController, PAGE_SIZE};
pub use url_params::{parse_query, ParsedQuery};
