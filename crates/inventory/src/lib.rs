//! Inventory domain module.
//!
//! This crate contains the business rules for per-product stock tracking:
//! status derivation, non-negative stock, and the create/get/list/adjust/delete
//! operations. Persistence is reached only through the [`RecordStore`] trait;
//! there is no IO, HTTP, or SQL here.

pub mod error;
pub mod record;
pub mod rules;
pub mod status;
pub mod store;

pub use error::{ErrorKind, InventoryError, InventoryResult, StoreError};
pub use record::{AdjustInventory, CreateInventory, InventoryRecord, apply_adjustment};
pub use rules::InventoryRules;
pub use status::{InventoryStatus, derive_status, parse_status_filter};
pub use store::{AdjustFn, RecordStore};
