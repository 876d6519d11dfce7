//! Praxis Store - Document Store Abstraction
//!
//! The persistence engine behind Praxis is an opaque document store: this
//! crate defines the async [`DocumentBackend`] contract, the store-level
//! query predicates, typed per-entity [`Collection`] accessors with
//! idempotent index provisioning, the upsert key resolver, and an
//! in-memory backend satisfying the contract.

pub mod backend;
pub mod collection;
pub mod memory;
pub mod query;
pub mod upsert;

pub use backend::{CollectionSpec, DocumentBackend, IndexSpec, JsonMap, StoreResult};
pub use collection::Collection;
pub use memory::MemoryBackend;
pub use query::{Comparison, Condition, Filter, Order, Sort};
pub use upsert::{resolve_key, MissingKeyError, UpsertKey};
