//! Integration tests for the inventory rules over a real store backend.
//!
//! Tests: InventoryRules → RecordStore (in-memory)
//!
//! Verifies:
//! - Status derivation and timestamps across the record lifecycle
//! - Rejected operations never persist partial state
//! - Concurrent adjustments of one product are serialized

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, Duration, TimeZone, Utc};

    use stockroom_core::{DomainError, FixedClock, ProductId};
    use stockroom_inventory::{
        AdjustInventory, CreateInventory, ErrorKind, InventoryError, InventoryRules,
        InventoryStatus, RecordStore,
    };

    use crate::store::InMemoryInventoryStore;

    type Rules = InventoryRules<Arc<InMemoryInventoryStore>, Arc<FixedClock>>;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    fn setup() -> (Rules, Arc<InMemoryInventoryStore>, Arc<FixedClock>) {
        let store = Arc::new(InMemoryInventoryStore::new());
        let clock = Arc::new(FixedClock::new(t0()));
        let rules = InventoryRules::new(store.clone(), clock.clone());
        (rules, store, clock)
    }

    fn create(product_id: ProductId, initial_quantity: i64) -> CreateInventory {
        CreateInventory {
            product_id,
            initial_quantity,
        }
    }

    fn adjust(product_id: ProductId, quantity_delta: i64, reason: &str) -> AdjustInventory {
        AdjustInventory {
            product_id,
            quantity_delta,
            reason: reason.to_string(),
        }
    }

    #[tokio::test]
    async fn create_persists_record_with_derived_status() {
        let (rules, store, _clock) = setup();
        let product_id = ProductId::new();

        let rec = rules.create(create(product_id, 10)).await.unwrap();

        assert_eq!(rec.product_id, product_id);
        assert_eq!(rec.available_quantity, 10);
        assert_eq!(rec.status, InventoryStatus::InStock);
        assert_eq!(rec.replenishment_at, None);
        assert_eq!(rec.created_at, t0());
        assert_eq!(rec.updated_at, t0());
        assert_eq!(store.find_by_product_id(product_id).await.unwrap(), Some(rec));
    }

    #[tokio::test]
    async fn duplicate_create_is_rejected_and_not_persisted() {
        let (rules, store, _clock) = setup();
        let product_id = ProductId::new();
        let first = rules.create(create(product_id, 1)).await.unwrap();

        let err = rules.create(create(product_id, 5)).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert!(err.to_string().contains("already exists"));
        assert_eq!(store.len().await, 1);
        assert_eq!(rules.get(product_id).await.unwrap(), first);
    }

    #[tokio::test]
    async fn negative_initial_quantity_is_rejected() {
        let (rules, store, _clock) = setup();
        let err = rules.create(create(ProductId::new(), -3)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn get_unknown_product_is_not_found() {
        let (rules, _store, _clock) = setup();
        let err = rules.get(ProductId::new()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn restock_sell_out_oversell_scenario() {
        let (rules, _store, clock) = setup();
        let x = ProductId::new();

        let created = rules.create(create(x, 0)).await.unwrap();
        assert_eq!(created.status, InventoryStatus::OutOfStock);

        clock.advance(Duration::minutes(1));
        let restocked = rules.adjust(adjust(x, 5, "restock")).await.unwrap();
        assert_eq!(restocked.available_quantity, 5);
        assert_eq!(restocked.status, InventoryStatus::InStock);
        assert_eq!(restocked.replenishment_at, Some(t0() + Duration::minutes(1)));
        assert!(restocked.replenishment_at.unwrap() >= created.updated_at);

        clock.advance(Duration::minutes(1));
        let sold_out = rules.adjust(adjust(x, -5, "sold out")).await.unwrap();
        assert_eq!(sold_out.available_quantity, 0);
        assert_eq!(sold_out.status, InventoryStatus::OutOfStock);
        assert_eq!(sold_out.replenishment_at, restocked.replenishment_at);
        assert_eq!(sold_out.updated_at, t0() + Duration::minutes(2));

        clock.advance(Duration::minutes(1));
        let err = rules.adjust(adjust(x, -1, "oversell")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("negative quantity"));

        let after = rules.get(x).await.unwrap();
        assert_eq!(after, sold_out);
    }

    #[tokio::test]
    async fn zero_delta_is_rejected_before_lookup() {
        let (rules, _store, _clock) = setup();
        // Unknown product: the zero-delta check still wins over NotFound.
        let err = rules.adjust(adjust(ProductId::new(), 0, "noop")).await.unwrap_err();
        assert_eq!(
            err,
            InventoryError::from(DomainError::invalid_argument("quantityDelta must be non-zero"))
        );
    }

    #[tokio::test]
    async fn blank_reason_is_rejected() {
        let (rules, _store, _clock) = setup();
        let x = ProductId::new();
        rules.create(create(x, 2)).await.unwrap();

        let err = rules.adjust(adjust(x, 1, "   ")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(rules.get(x).await.unwrap().available_quantity, 2);
    }

    #[tokio::test]
    async fn adjust_unknown_product_is_not_found() {
        let (rules, _store, _clock) = setup();
        let err = rules.adjust(adjust(ProductId::new(), 4, "restock")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn list_filters_by_status_case_insensitively() {
        let (rules, _store, clock) = setup();
        let a = ProductId::new();
        let b = ProductId::new();
        let c = ProductId::new();
        rules.create(create(a, 3)).await.unwrap();
        clock.advance(Duration::seconds(1));
        rules.create(create(b, 0)).await.unwrap();
        clock.advance(Duration::seconds(1));
        rules.create(create(c, 9)).await.unwrap();

        let in_stock: Vec<ProductId> = rules
            .list(Some("in_stock"))
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.product_id)
            .collect();
        assert_eq!(in_stock, vec![a, c]);

        let out: Vec<ProductId> = rules
            .list(Some("OUT_of_STOCK"))
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.product_id)
            .collect();
        assert_eq!(out, vec![b]);

        assert!(rules.list(Some("backordered")).await.unwrap().is_empty());
        assert_eq!(rules.list(None).await.unwrap().len(), 3);
        assert_eq!(rules.list(Some("")).await.unwrap().len(), 3);

        let err = rules.list(Some("bogus")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn delete_is_not_idempotent() {
        let (rules, store, _clock) = setup();
        let x = ProductId::new();
        rules.create(create(x, 1)).await.unwrap();

        rules.delete(x).await.unwrap();

        assert_eq!(rules.get(x).await.unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(rules.delete(x).await.unwrap_err().kind(), ErrorKind::NotFound);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn product_can_be_recreated_after_delete() {
        let (rules, _store, _clock) = setup();
        let x = ProductId::new();
        let first = rules.create(create(x, 1)).await.unwrap();
        rules.delete(x).await.unwrap();

        let second = rules.create(create(x, 4)).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(second.available_quantity, 4);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_adjustments_do_not_lose_updates() {
        let (rules, _store, _clock) = setup();
        let rules = Arc::new(rules);
        let x = ProductId::new();
        rules.create(create(x, 0)).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..50 {
            let rules = rules.clone();
            handles.push(tokio::spawn(async move {
                rules
                    .adjust(adjust(x, 2, &format!("restock #{i}")))
                    .await
                    .map(|_| ())
            }));
        }
        for h in handles {
            h.await.unwrap().unwrap();
        }

        assert_eq!(rules.get(x).await.unwrap().available_quantity, 100);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_sales_never_oversell() {
        let (rules, _store, _clock) = setup();
        let rules = Arc::new(rules);
        let x = ProductId::new();
        rules.create(create(x, 10)).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..25 {
            let rules = rules.clone();
            handles.push(tokio::spawn(async move {
                rules.adjust(adjust(x, -1, "sale")).await.is_ok()
            }));
        }
        let mut succeeded = 0;
        for h in handles {
            if h.await.unwrap() {
                succeeded += 1;
            }
        }

        assert_eq!(succeeded, 10);
        let rec = rules.get(x).await.unwrap();
        assert_eq!(rec.available_quantity, 0);
        assert_eq!(rec.status, InventoryStatus::OutOfStock);
    }
}
