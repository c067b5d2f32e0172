//! Database implementations

pub mod cache_repository;
pub mod manager;

pub use cache_repository::SqliteCacheStore;
pub use manager::DbManager;
