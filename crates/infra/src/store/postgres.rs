//! Postgres-backed inventory store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError | Scenario |
//! |------------|----------------------|------------|----------|
//! | Database (unique on `product_id`) | `23505` | `DuplicateProduct` | Concurrent create |
//! | Database (other) | Any other | `Backend` | Check constraint, connectivity, etc. |
//! | PoolClosed / Other | N/A | `Backend` | Pool shut down, network errors |
//!
//! ## Concurrency
//!
//! `update_by_product_id` takes a row lock (`SELECT .. FOR UPDATE`) inside a
//! transaction, so concurrent adjustments of the same product are serialized
//! by the database. Other products are never blocked.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use std::sync::Arc;
use tracing::instrument;

use stockroom_core::{DomainError, ProductId, RecordId};
use stockroom_inventory::{
    AdjustFn, InventoryError, InventoryRecord, InventoryResult, InventoryStatus, RecordStore,
    StoreError,
};

const SELECT_COLUMNS: &str = r#"
    SELECT
        id,
        product_id,
        available_quantity,
        status,
        replenishment_at,
        created_at,
        updated_at
    FROM inventory_items
"#;

/// Postgres-backed inventory store.
///
/// Uses the SQLx connection pool, which is `Send + Sync` and cheap to clone.
#[derive(Debug, Clone)]
pub struct PostgresInventoryStore {
    pool: Arc<PgPool>,
}

impl PostgresInventoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect and make sure the schema exists.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Create the `inventory_items` table and its indexes if missing.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS inventory_items (
                id                 UUID PRIMARY KEY,
                product_id         UUID NOT NULL UNIQUE,
                available_quantity BIGINT NOT NULL CHECK (available_quantity >= 0),
                status             VARCHAR(20) NOT NULL,
                replenishment_at   TIMESTAMPTZ NULL,
                created_at         TIMESTAMPTZ NOT NULL,
                updated_at         TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_table", e))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS inventory_items_status_idx ON inventory_items (status)",
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_index", e))?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl RecordStore for PostgresInventoryStore {
    #[instrument(skip_all, fields(product_id = %product_id), err)]
    async fn find_by_product_id(
        &self,
        product_id: ProductId,
    ) -> Result<Option<InventoryRecord>, StoreError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE product_id = $1"))
            .bind(product_id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_product_id", e))?;

        row.as_ref().map(record_from_row).transpose()
    }

    #[instrument(skip_all, fields(product_id = %product_id), err)]
    async fn exists_by_product_id(&self, product_id: ProductId) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT EXISTS (SELECT 1 FROM inventory_items WHERE product_id = $1)")
            .bind(product_id.as_uuid())
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("exists_by_product_id", e))?;

        row.try_get::<bool, _>(0)
            .map_err(|e| map_sqlx_error("exists_by_product_id", e))
    }

    #[instrument(skip_all, fields(status = %status), err)]
    async fn find_by_status(
        &self,
        status: InventoryStatus,
    ) -> Result<Vec<InventoryRecord>, StoreError> {
        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS} WHERE status = $1 ORDER BY created_at ASC, id ASC"
        ))
        .bind(status.as_str())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_status", e))?;

        rows.iter().map(record_from_row).collect()
    }

    #[instrument(skip_all, err)]
    async fn find_all(&self) -> Result<Vec<InventoryRecord>, StoreError> {
        let rows = sqlx::query(&format!("{SELECT_COLUMNS} ORDER BY created_at ASC, id ASC"))
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_all", e))?;

        rows.iter().map(record_from_row).collect()
    }

    #[instrument(skip_all, fields(record_id = %record.id, product_id = %record.product_id), err)]
    async fn save(&self, record: InventoryRecord) -> Result<InventoryRecord, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO inventory_items (
                id,
                product_id,
                available_quantity,
                status,
                replenishment_at,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id)
            DO UPDATE SET
                product_id = EXCLUDED.product_id,
                available_quantity = EXCLUDED.available_quantity,
                status = EXCLUDED.status,
                replenishment_at = EXCLUDED.replenishment_at,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.product_id.as_uuid())
        .bind(record.available_quantity)
        .bind(record.status.as_str())
        .bind(record.replenishment_at)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateProduct(record.product_id)
            } else {
                map_sqlx_error("save", e)
            }
        })?;

        Ok(record)
    }

    #[instrument(skip_all, fields(record_id = %id), err)]
    async fn delete_by_id(&self, id: RecordId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM inventory_items WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_by_id", e))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip_all, fields(product_id = %product_id))]
    async fn update_by_product_id(
        &self,
        product_id: ProductId,
        apply: AdjustFn<'_>,
    ) -> InventoryResult<Option<InventoryRecord>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE product_id = $1 FOR UPDATE"))
            .bind(product_id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("select_for_update", e))?;

        let Some(row) = row else {
            tx.rollback()
                .await
                .map_err(|e| map_sqlx_error("rollback", e))?;
            return Ok(None);
        };

        let mut record = record_from_row(&row)?;
        if let Err(e) = apply(&mut record) {
            return Err(rejected_adjustment(tx.rollback().await, e));
        }

        sqlx::query(
            r#"
            UPDATE inventory_items
            SET available_quantity = $2,
                status = $3,
                replenishment_at = $4,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.available_quantity)
        .bind(record.status.as_str())
        .bind(record.replenishment_at)
        .bind(record.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Ok(Some(record))
    }
}

fn record_from_row(row: &PgRow) -> Result<InventoryRecord, StoreError> {
    let decode =
        |e: sqlx::Error| StoreError::backend(format!("failed to decode inventory row: {e}"));

    let status: String = row.try_get("status").map_err(decode)?;
    let status = status
        .parse::<InventoryStatus>()
        .map_err(|e| StoreError::backend(format!("corrupt status column: {e}")))?;

    Ok(InventoryRecord {
        id: RecordId::from_uuid(row.try_get("id").map_err(decode)?),
        product_id: ProductId::from_uuid(row.try_get("product_id").map_err(decode)?),
        available_quantity: row.try_get("available_quantity").map_err(decode)?,
        status,
        replenishment_at: row
            .try_get::<Option<DateTime<Utc>>, _>("replenishment_at")
            .map_err(decode)?,
        created_at: row.try_get("created_at").map_err(decode)?,
        updated_at: row.try_get("updated_at").map_err(decode)?,
    })
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => StoreError::backend(format!(
            "database error in {}: {}",
            operation,
            db_err.message()
        )),
        sqlx::Error::PoolClosed => {
            StoreError::backend(format!("connection pool closed in {}", operation))
        }
        other => StoreError::backend(format!("sqlx error in {}: {}", operation, other)),
    }
}

/// A rejected adjustment reports the domain error even if the rollback fails;
/// the transaction is discarded with its connection either way.
fn rejected_adjustment(rollback: Result<(), sqlx::Error>, err: DomainError) -> InventoryError {
    if let Err(rb) = rollback {
        tracing::warn!(error = %rb, "rollback after rejected adjustment failed");
    }
    err.into()
}

/// Unique violation (`23505`); the only unique index besides the primary key
/// is `product_id`, and ids are freshly generated.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23505";
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_adjustment_keeps_domain_error_when_rollback_fails() {
        let err = DomainError::invalid_argument("adjustment would produce negative quantity");

        let result = rejected_adjustment(Err(sqlx::Error::PoolClosed), err.clone());
        assert_eq!(result, InventoryError::from(err.clone()));

        let result = rejected_adjustment(Ok(()), err.clone());
        assert_eq!(result, InventoryError::from(err));
    }

    #[test]
    fn unique_violation_requires_database_error() {
        assert!(!is_unique_violation(&sqlx::Error::PoolClosed));
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }
}
