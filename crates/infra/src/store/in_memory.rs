use std::collections::HashMap;

use tokio::sync::RwLock;

use stockroom_core::{Entity, ProductId, RecordId};
use stockroom_inventory::{
    AdjustFn, InventoryRecord, InventoryResult, InventoryStatus, RecordStore, StoreError,
};

/// In-memory inventory store for tests/dev.
///
/// Records are keyed by their opaque id with a secondary product index. The
/// write lock is held for the whole of `update_by_product_id`, which serializes
/// concurrent adjustments.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    inner: RwLock<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    records: HashMap<RecordId, InventoryRecord>,
    by_product: HashMap<ProductId, RecordId>,
}

impl Tables {
    fn sorted(&self, keep: impl Fn(&InventoryRecord) -> bool) -> Vec<InventoryRecord> {
        let mut out: Vec<InventoryRecord> =
            self.records.values().filter(|r| keep(*r)).cloned().collect();
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        out
    }
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait::async_trait]
impl RecordStore for InMemoryInventoryStore {
    async fn find_by_product_id(
        &self,
        product_id: ProductId,
    ) -> Result<Option<InventoryRecord>, StoreError> {
        let tables = self.inner.read().await;
        Ok(tables
            .by_product
            .get(&product_id)
            .and_then(|id| tables.records.get(id))
            .cloned())
    }

    async fn exists_by_product_id(&self, product_id: ProductId) -> Result<bool, StoreError> {
        Ok(self.inner.read().await.by_product.contains_key(&product_id))
    }

    async fn find_by_status(
        &self,
        status: InventoryStatus,
    ) -> Result<Vec<InventoryRecord>, StoreError> {
        Ok(self.inner.read().await.sorted(|r| r.status == status))
    }

    async fn find_all(&self) -> Result<Vec<InventoryRecord>, StoreError> {
        Ok(self.inner.read().await.sorted(|_| true))
    }

    async fn save(&self, record: InventoryRecord) -> Result<InventoryRecord, StoreError> {
        let mut tables = self.inner.write().await;
        let id = record.id();

        // Unique index on product id.
        if let Some(owner) = tables.by_product.get(&record.product_id) {
            if *owner != id {
                return Err(StoreError::DuplicateProduct(record.product_id));
            }
        }

        let stale = tables
            .records
            .get(&id)
            .map(|previous| previous.product_id)
            .filter(|previous| *previous != record.product_id);
        if let Some(stale) = stale {
            tables.by_product.remove(&stale);
        }

        tables.by_product.insert(record.product_id, id);
        tables.records.insert(id, record.clone());
        Ok(record)
    }

    async fn delete_by_id(&self, id: RecordId) -> Result<bool, StoreError> {
        let mut tables = self.inner.write().await;
        match tables.records.remove(&id) {
            Some(removed) => {
                tables.by_product.remove(&removed.product_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_by_product_id(
        &self,
        product_id: ProductId,
        apply: AdjustFn<'_>,
    ) -> InventoryResult<Option<InventoryRecord>> {
        let mut tables = self.inner.write().await;
        let Some(id) = tables.by_product.get(&product_id).copied() else {
            return Ok(None);
        };
        let Some(stored) = tables.records.get_mut(&id) else {
            return Ok(None);
        };

        // Work on a copy so a rejected mutation cannot leak into the table.
        let mut candidate = stored.clone();
        apply(&mut candidate)?;
        *stored = candidate.clone();
        Ok(Some(candidate))
    }
}
