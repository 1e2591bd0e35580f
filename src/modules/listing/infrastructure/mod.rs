pub mod memory_repository;

pub use memory_repository::InMemoryDraftRepository;
