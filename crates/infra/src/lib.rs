//! Infrastructure layer: `RecordStore` backends (in-memory, Postgres).

pub mod store;

mod integration_tests;

pub use store::{InMemoryInventoryStore, PostgresInventoryStore};
