// Shared Kernel - Domain Driven Design
// Following Clean Architecture + Hexagonal Architecture patterns

pub mod errors; // Shared error types
pub mod utils; // Shared utilities (logging, timing)

pub use errors::{AppError, AppResult};
