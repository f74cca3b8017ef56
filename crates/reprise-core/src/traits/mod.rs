//! Trait definitions for pluggable backends.

pub mod review_store;

pub use review_store::{ReviewStore, TransactFn};
