// Library crate for the quarterback stat tracker
// This file exposes the public API for integration tests

pub mod config;
pub mod shared;
pub mod stats;
pub mod storage;
pub mod tracker;

// Re-export commonly used types for easier access in tests
pub use config::{AppConfig, StorageConfig};
pub use shared::{build_router, AppError, AppState};
pub use stats::{StatKey, StatsService};
pub use storage::{InMemoryStorage, SqliteStorage, StorageAdapter, StorageError};
pub use tracker::{TrackerError, TrackerService};
