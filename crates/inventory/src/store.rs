use std::sync::Arc;

use stockroom_core::{DomainResult, ProductId, RecordId};

use crate::error::{InventoryResult, StoreError};
use crate::record::InventoryRecord;
use crate::status::InventoryStatus;

/// Mutation run by [`RecordStore::update_by_product_id`] inside the store's
/// transaction. Returning an error aborts the write.
pub type AdjustFn<'a> = &'a (dyn Fn(&mut InventoryRecord) -> DomainResult<()> + Send + Sync);

/// Persistence collaborator for inventory records.
///
/// ## Implementation requirements
///
/// - At most one record per `product_id`; a second insert for the same product
///   fails with [`StoreError::DuplicateProduct`].
/// - `save` is insert-or-update keyed by `id`.
/// - `update_by_product_id` is atomic with respect to other updates of the same
///   record: two concurrent calls never observe the same pre-update quantity.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    async fn find_by_product_id(
        &self,
        product_id: ProductId,
    ) -> Result<Option<InventoryRecord>, StoreError>;

    async fn exists_by_product_id(&self, product_id: ProductId) -> Result<bool, StoreError>;

    async fn find_by_status(
        &self,
        status: InventoryStatus,
    ) -> Result<Vec<InventoryRecord>, StoreError>;

    /// All records, oldest first.
    async fn find_all(&self) -> Result<Vec<InventoryRecord>, StoreError>;

    async fn save(&self, record: InventoryRecord) -> Result<InventoryRecord, StoreError>;

    /// Returns `false` if nothing was stored under `id`.
    async fn delete_by_id(&self, id: RecordId) -> Result<bool, StoreError>;

    /// Read, mutate and write back the record for `product_id` as one unit.
    ///
    /// `Ok(None)` when no record exists. Errors from `apply` are returned as-is
    /// and leave the stored record untouched.
    async fn update_by_product_id(
        &self,
        product_id: ProductId,
        apply: AdjustFn<'_>,
    ) -> InventoryResult<Option<InventoryRecord>>;
}

#[async_trait::async_trait]
impl<S> RecordStore for Arc<S>
where
    S: RecordStore + ?Sized,
{
    async fn find_by_product_id(
        &self,
        product_id: ProductId,
    ) -> Result<Option<InventoryRecord>, StoreError> {
        (**self).find_by_product_id(product_id).await
    }

    async fn exists_by_product_id(&self, product_id: ProductId) -> Result<bool, StoreError> {
        (**self).exists_by_product_id(product_id).await
    }

    async fn find_by_status(
        &self,
        status: InventoryStatus,
    ) -> Result<Vec<InventoryRecord>, StoreError> {
        (**self).find_by_status(status).await
    }

    async fn find_all(&self) -> Result<Vec<InventoryRecord>, StoreError> {
        (**self).find_all().await
    }

    async fn save(&self, record: InventoryRecord) -> Result<InventoryRecord, StoreError> {
        (**self).save(record).await
    }

    async fn delete_by_id(&self, id: RecordId) -> Result<bool, StoreError> {
        (**self).delete_by_id(id).await
    }

    async fn update_by_product_id(
        &self,
        product_id: ProductId,
        apply: AdjustFn<'_>,
    ) -> InventoryResult<Option<InventoryRecord>> {
        (**self).update_by_product_id(product_id, apply).await
    }
}
