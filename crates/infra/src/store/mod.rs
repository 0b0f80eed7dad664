//! Inventory record storage backends.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryInventoryStore;
pub use postgres::PostgresInventoryStore;
