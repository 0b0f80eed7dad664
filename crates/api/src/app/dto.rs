use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, ProductId, RecordId};
use stockroom_inventory::{AdjustInventory, CreateInventory, InventoryRecord, InventoryStatus};

// -------------------------
// Request DTOs
// -------------------------

/// Fields are optional here so that a missing field is reported with our own
/// message instead of a generic deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInventoryRequest {
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub initial_quantity: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustInventoryRequest {
    pub quantity_delta: Option<i64>,
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListInventoryQuery {
    pub status: Option<String>,
}

impl CreateInventoryRequest {
    pub fn into_command(self) -> DomainResult<CreateInventory> {
        let product_id = self
            .product_id
            .ok_or_else(|| DomainError::invalid_argument("productId is required"))?;
        if self.initial_quantity < 0 {
            return Err(DomainError::invalid_argument("initialQuantity cannot be negative"));
        }
        Ok(CreateInventory {
            product_id,
            initial_quantity: self.initial_quantity,
        })
    }
}

impl AdjustInventoryRequest {
    pub fn into_command(self, product_id: ProductId) -> DomainResult<AdjustInventory> {
        let quantity_delta = self
            .quantity_delta
            .ok_or_else(|| DomainError::invalid_argument("quantityDelta is required"))?;
        let reason = self
            .reason
            .filter(|r| !r.trim().is_empty())
            .ok_or_else(|| DomainError::invalid_argument("reason is required"))?;
        Ok(AdjustInventory {
            product_id,
            quantity_delta,
            reason,
        })
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryResponse {
    pub id: RecordId,
    pub product_id: ProductId,
    pub available_quantity: i64,
    pub status: InventoryStatus,
    pub replenishment_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<InventoryRecord> for InventoryResponse {
    fn from(rec: InventoryRecord) -> Self {
        Self {
            id: rec.id,
            product_id: rec.product_id,
            available_quantity: rec.available_quantity,
            status: rec.status,
            replenishment_at: rec.replenishment_at,
            created_at: rec.created_at,
            updated_at: rec.updated_at,
        }
    }
}
