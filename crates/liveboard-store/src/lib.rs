//! Liveboard data stores.
//!
//! Both stores write an entity change and its event as one unit.

pub mod memory;
pub mod pg_store;

pub use memory::MemoryStore;
pub use pg_store::PgStore;
