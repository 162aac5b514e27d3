//! Postgres-backed SKU store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError | Scenario |
//! |------------|----------------------|------------|----------|
//! | Database (unique violation) | `23505` | `Duplicate` | `sku` code already used |
//! | Database (check constraint violation) | `23514` | `Backend` | status/timestamp constraint |
//! | Database (other) | Any other | `Backend` | Other database errors |
//! | PoolClosed / other | N/A | `Backend` | Network errors, connection failures, etc. |
//!
//! `update_by_id` and `delete_by_id` report `Missing` when no row matches.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::instrument;

use skuflow_core::RecordId;
use skuflow_products::{NewSkuRecord, Sku, SkuChanges, SkuId, SkuStatus};

use super::{SkuFilter, SkuOrder, SkuStore, StoreError};

const SCHEMA: &str = include_str!("../../migrations/0001_create_skus.sql");

const COLUMNS: &str =
    "id, descricao, descricao_comercial, sku, status, created_at, updated_at";

/// Open a connection pool.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, StoreError> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| map_sqlx_error("connect", e))
}

/// Postgres-backed SKU store.
///
/// Each trait call is a single SQL statement, so it is atomic on its own.
/// Uniqueness of `sku` is enforced by the `skus_sku_key` constraint.
#[derive(Debug, Clone)]
pub struct PostgresSkuStore {
    pool: Arc<PgPool>,
}

impl PostgresSkuStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the `skus` table and indexes if they do not exist.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl SkuStore for PostgresSkuStore {
    #[instrument(skip(self, data), fields(sku = %data.sku), err)]
    async fn create(&self, data: NewSkuRecord) -> Result<Sku, StoreError> {
        let id = SkuId::generate();
        let sql = format!(
            "INSERT INTO skus ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {COLUMNS}"
        );

        let row = sqlx::query(&sql)
            .bind(id.0.as_uuid())
            .bind(&data.descricao)
            .bind(&data.descricao_comercial)
            .bind(&data.sku)
            .bind(data.status.as_str())
            .bind(data.created_at)
            .bind(data.updated_at)
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Duplicate(data.sku.clone())
                } else {
                    map_sqlx_error("create", e)
                }
            })?;

        sku_from_row(&row)
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn find_by_id(&self, id: SkuId) -> Result<Option<Sku>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM skus WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.0.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.as_ref().map(sku_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_many(
        &self,
        filter: &SkuFilter,
        offset: u64,
        limit: u64,
        order: SkuOrder,
    ) -> Result<Vec<Sku>, StoreError> {
        let order_by = match order {
            SkuOrder::NewestFirst => "created_at DESC, id DESC",
        };
        let sql = format!(
            "SELECT {COLUMNS} FROM skus WHERE {FILTER} ORDER BY {order_by} OFFSET $3 LIMIT $4"
        );

        let rows = sqlx::query(&sql)
            .bind(filter.status.map(SkuStatus::as_str))
            .bind(filter.text.as_deref().map(like_pattern))
            .bind(to_i64(offset))
            .bind(to_i64(limit))
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_many", e))?;

        rows.iter().map(sku_from_row).collect()
    }

    #[instrument(skip(self), err)]
    async fn count(&self, filter: &SkuFilter) -> Result<u64, StoreError> {
        let sql = format!("SELECT COUNT(*) AS total FROM skus WHERE {FILTER}");
        let row = sqlx::query(&sql)
            .bind(filter.status.map(SkuStatus::as_str))
            .bind(filter.text.as_deref().map(like_pattern))
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("count", e))?;

        let total: i64 = row
            .try_get("total")
            .map_err(|e| StoreError::Backend(format!("failed to read count: {e}")))?;
        Ok(total.max(0) as u64)
    }

    #[instrument(skip(self, changes), fields(id = %id), err)]
    async fn update_by_id(&self, id: SkuId, changes: SkuChanges) -> Result<Sku, StoreError> {
        let sql = format!(
            r#"
            UPDATE skus SET
                descricao = COALESCE($2, descricao),
                descricao_comercial = COALESCE($3, descricao_comercial),
                sku = COALESCE($4, sku),
                status = COALESCE($5, status),
                updated_at = GREATEST($6, created_at)
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );

        let new_code = changes.sku.clone();
        let row = sqlx::query(&sql)
            .bind(id.0.as_uuid())
            .bind(changes.descricao)
            .bind(changes.descricao_comercial)
            .bind(changes.sku)
            .bind(changes.status.map(SkuStatus::as_str))
            .bind(changes.updated_at)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Duplicate(new_code.unwrap_or_default())
                } else {
                    map_sqlx_error("update_by_id", e)
                }
            })?;

        match row {
            Some(row) => sku_from_row(&row),
            None => Err(StoreError::Missing(id)),
        }
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn delete_by_id(&self, id: SkuId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM skus WHERE id = $1")
            .bind(id.0.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_by_id", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Missing(id));
        }
        Ok(())
    }
}

/// Shared WHERE clause: `$1` = status (nullable), `$2` = ILIKE pattern (nullable).
const FILTER: &str = "($1::text IS NULL OR status = $1) \
     AND ($2::text IS NULL OR descricao ILIKE $2 OR descricao_comercial ILIKE $2 OR sku ILIKE $2)";

fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn sku_from_row(row: &PgRow) -> Result<Sku, StoreError> {
    let decode = |e: sqlx::Error| StoreError::Backend(format!("failed to decode sku row: {e}"));

    let id: uuid::Uuid = row.try_get("id").map_err(decode)?;
    let status: String = row.try_get("status").map_err(decode)?;
    let status = status
        .parse::<SkuStatus>()
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(decode)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(decode)?;

    Ok(Sku {
        id: SkuId::new(RecordId::from_uuid(id)),
        descricao: row.try_get("descricao").map_err(decode)?,
        descricao_comercial: row.try_get("descricao_comercial").map_err(decode)?,
        sku: row.try_get("sku").map_err(decode)?,
        status,
        created_at,
        updated_at,
    })
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.to_string()).unwrap_or_default();
            StoreError::Backend(format!(
                "database error in {operation} ({code}): {}",
                db_err.message()
            ))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {operation}"))
        }
        _ => StoreError::Backend(format!("sqlx error in {operation}: {err}")),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23505";
        }
    }
    false
}
