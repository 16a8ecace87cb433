pub mod in_memory_repo;
