//! Inventory business rules.
//!
//! Each operation performs its precondition checks up front and then at most
//! one logical round trip to the [`RecordStore`]. The rules hold no state of
//! their own beyond the store handle and the clock.

use stockroom_core::{Clock, DomainError, ProductId, SystemClock};
use tracing::{debug, info};

use crate::error::{InventoryError, InventoryResult, StoreError};
use crate::record::{AdjustInventory, CreateInventory, InventoryRecord, apply_adjustment};
use crate::status::parse_status_filter;
use crate::store::RecordStore;

#[derive(Debug, Clone)]
pub struct InventoryRules<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S> InventoryRules<S, SystemClock>
where
    S: RecordStore,
{
    /// Rules backed by the wall clock.
    pub fn with_system_clock(store: S) -> Self {
        Self::new(store, SystemClock)
    }
}

impl<S, C> InventoryRules<S, C>
where
    S: RecordStore,
    C: Clock,
{
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// Start tracking a product. Fails with `AlreadyExists` on a second call
    /// for the same product.
    pub async fn create(&self, cmd: CreateInventory) -> InventoryResult<InventoryRecord> {
        cmd.validate()?;

        if self.store.exists_by_product_id(cmd.product_id).await? {
            return Err(already_exists(cmd.product_id));
        }

        let record = InventoryRecord::new(cmd.product_id, cmd.initial_quantity, self.clock.now());
        let saved = self.store.save(record).await.map_err(|e| match e {
            // Lost a race against a concurrent create for the same product.
            StoreError::DuplicateProduct(product_id) => already_exists(product_id),
            other => other.into(),
        })?;

        debug!(
            product_id = %saved.product_id,
            record_id = %saved.id,
            available_quantity = saved.available_quantity,
            "inventory created"
        );
        Ok(saved)
    }

    pub async fn get(&self, product_id: ProductId) -> InventoryResult<InventoryRecord> {
        self.store
            .find_by_product_id(product_id)
            .await?
            .ok_or_else(|| not_found(product_id))
    }

    /// All records, or only those whose status matches `status_filter`
    /// (case-insensitive). A blank filter is the same as none.
    pub async fn list(&self, status_filter: Option<&str>) -> InventoryResult<Vec<InventoryRecord>> {
        let records = match parse_status_filter(status_filter)? {
            Some(status) => self.store.find_by_status(status).await?,
            None => self.store.find_all().await?,
        };
        Ok(records)
    }

    /// Apply a signed quantity delta. Status and timestamps follow the new
    /// quantity; a failed check leaves the stored record unchanged.
    pub async fn adjust(&self, cmd: AdjustInventory) -> InventoryResult<InventoryRecord> {
        cmd.validate()?;

        let now = self.clock.now();
        let delta = cmd.quantity_delta;
        let apply = move |record: &mut InventoryRecord| apply_adjustment(record, delta, now);

        let updated = self
            .store
            .update_by_product_id(cmd.product_id, &apply)
            .await?
            .ok_or_else(|| not_found(cmd.product_id))?;

        info!(
            product_id = %cmd.product_id,
            quantity_delta = cmd.quantity_delta,
            reason = %cmd.reason,
            available_quantity = updated.available_quantity,
            status = %updated.status,
            "inventory adjusted"
        );
        Ok(updated)
    }

    /// Stop tracking a product. Not idempotent: a second call is `NotFound`.
    pub async fn delete(&self, product_id: ProductId) -> InventoryResult<()> {
        let record = self.get(product_id).await?;
        if !self.store.delete_by_id(record.id).await? {
            // Removed concurrently between lookup and delete.
            return Err(not_found(product_id));
        }
        debug!(product_id = %product_id, record_id = %record.id, "inventory deleted");
        Ok(())
    }
}

fn not_found(product_id: ProductId) -> InventoryError {
    DomainError::not_found(format!("inventory not found for product {product_id}")).into()
}

fn already_exists(product_id: ProductId) -> InventoryError {
    DomainError::already_exists(format!("inventory already exists for product {product_id}")).into()
}
