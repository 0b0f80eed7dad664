use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, ProductId, RecordId};

use crate::status::{InventoryStatus, derive_status};

/// One product's stock-tracking row.
///
/// At most one record exists per `product_id`. `available_quantity` is never
/// negative and `status` always equals `derive_status(available_quantity)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub id: RecordId,
    pub product_id: ProductId,
    pub available_quantity: i64,
    pub status: InventoryStatus,
    /// Instant of the most recent quantity-increasing adjustment.
    pub replenishment_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryRecord {
    /// Build a fresh record for a newly onboarded product.
    pub fn new(product_id: ProductId, initial_quantity: i64, now: DateTime<Utc>) -> Self {
        Self {
            id: RecordId::new(),
            product_id,
            available_quantity: initial_quantity,
            status: derive_status(initial_quantity),
            replenishment_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for InventoryRecord {
    type Id = RecordId;

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Command: start tracking stock for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateInventory {
    pub product_id: ProductId,
    pub initial_quantity: i64,
}

/// Command: change on-hand quantity by a signed delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustInventory {
    pub product_id: ProductId,
    pub quantity_delta: i64,
    /// Free-form justification; logged, never stored.
    pub reason: String,
}

impl CreateInventory {
    pub fn validate(&self) -> DomainResult<()> {
        if self.initial_quantity < 0 {
            return Err(DomainError::invalid_argument(
                "initialQuantity cannot be negative",
            ));
        }
        Ok(())
    }
}

impl AdjustInventory {
    /// Preconditions checked before the record is even looked up.
    pub fn validate(&self) -> DomainResult<()> {
        if self.quantity_delta == 0 {
            return Err(DomainError::invalid_argument("quantityDelta must be non-zero"));
        }
        if self.reason.trim().is_empty() {
            return Err(DomainError::invalid_argument("reason is required"));
        }
        Ok(())
    }
}

/// Apply a quantity delta to `record` at instant `now`.
///
/// All checks run before the first field is written: on error `record` is
/// left exactly as it was.
pub fn apply_adjustment(
    record: &mut InventoryRecord,
    quantity_delta: i64,
    now: DateTime<Utc>,
) -> DomainResult<()> {
    if quantity_delta == 0 {
        return Err(DomainError::invalid_argument("quantityDelta must be non-zero"));
    }

    let new_quantity = record
        .available_quantity
        .checked_add(quantity_delta)
        .ok_or_else(|| DomainError::invalid_argument("adjustment would overflow quantity"))?;
    if new_quantity < 0 {
        return Err(DomainError::invalid_argument(
            "adjustment would produce negative quantity",
        ));
    }

    record.available_quantity = new_quantity;
    record.status = derive_status(new_quantity);
    if quantity_delta > 0 {
        record.replenishment_at = Some(now);
    }
    record.updated_at = now;
    Ok(())
}
