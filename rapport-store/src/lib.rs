//! # rapport-store
//!
//! The persistence adapter around [`rapport_core::Registry`]: the registry
//! snapshot lives as YAML at `~/.rapport/registry.yaml`.
//!
//! Call [`open`] at startup to restore the previous state (or start empty),
//! and [`flush`] after mutating to persist it.

pub mod error;
pub mod file_store;

pub use error::StoreError;
pub use file_store::{flush, flush_at, load_at, open, open_at, save_at, store_path, store_path_at};
