//! reprise-stores - Review store backends for reprise.
//!
//! This crate provides the [`ReviewStore`] implementations the review engine
//! persists through:
//!
//! - **Memory** - in-process map, for tests and single-node setups
//! - **SQLite** - embedded file-backed database, the production default
//!
//! [`ReviewStoreFactory`] picks a backend from a
//! [`StoreConfig`](reprise_core::config::StoreConfig).

mod factory;
mod memory;
mod sqlite;

// Public exports
pub use factory::ReviewStoreFactory;
pub use memory::MemoryReviewStore;
pub use sqlite::SqliteReviewStore;

// Re-export core types for convenience
pub use reprise_core::config::{StoreConfig, StoreProvider};
pub use reprise_core::traits::{ReviewStore, TransactFn};
