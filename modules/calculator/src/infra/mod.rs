pub mod storage;

pub use storage::in_memory_repo::InMemoryCalculationRepository;
