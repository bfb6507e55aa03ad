pub mod models;

use contrack_core::{TrackerSettings, Workbook};
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};
use uuid::Uuid;

use crate::error::AppError;
use models::WorkbookRecord;

const MAX_CONNECTIONS: u32 = 10;

/// Postgres-backed workbook storage
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Pool that only connects on first use
    pub fn connect_lazy(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_lazy(database_url)?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Most recently touched first
    pub async fn list_workbooks(&self) -> Result<Vec<WorkbookRecord>, AppError> {
        let records = sqlx::query_as::<_, WorkbookRecord>(
            "SELECT id, name, created_at, updated_at FROM workbooks ORDER BY updated_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    /// Insert the record and its seeded sheets in one transaction
    pub async fn create_workbook(&self, workbook: &Workbook) -> Result<WorkbookRecord, AppError> {
        let mut tx = self.pool.begin().await?;

        let record = sqlx::query_as::<_, WorkbookRecord>(
            "INSERT INTO workbooks (name) VALUES ($1) RETURNING id, name, created_at, updated_at",
        )
        .bind(&workbook.name)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO workbook_contents (workbook_id, content) VALUES ($1, $2)")
            .bind(record.id)
            .bind(Json(workbook))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(record)
    }

    pub async fn get_workbook(&self, id: Uuid) -> Result<Option<WorkbookRecord>, AppError> {
        let record = sqlx::query_as::<_, WorkbookRecord>(
            "SELECT id, name, created_at, updated_at FROM workbooks WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    pub async fn rename_workbook(&self, id: Uuid, name: &str) -> Result<Option<WorkbookRecord>, AppError> {
        let record = sqlx::query_as::<_, WorkbookRecord>(
            "UPDATE workbooks SET name = $1, updated_at = NOW() WHERE id = $2 \
             RETURNING id, name, created_at, updated_at",
        )
        .bind(name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    /// Returns false when there was nothing to delete
    pub async fn delete_workbook(&self, id: Uuid) -> Result<bool, AppError> {
        let done = sqlx::query("DELETE FROM workbooks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }

    /// Load a workbook's sheets. A record without stored content gets
    /// freshly seeded sheets.
    pub async fn load_workbook(&self, id: Uuid, settings: &TrackerSettings) -> Result<Workbook, AppError> {
        let record = self
            .get_workbook(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Workbook {} not found", id)))?;

        let stored: Option<Json<Workbook>> =
            sqlx::query_scalar("SELECT content FROM workbook_contents WHERE workbook_id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(match stored {
            Some(Json(workbook)) => workbook,
            None => {
                tracing::debug!(workbook = %id, "no stored content; seeding sheets");
                Workbook::seeded(record.name, settings)
            }
        })
    }

    /// Upsert a workbook's sheets and bump the record's timestamp
    pub async fn store_workbook(&self, id: Uuid, workbook: &Workbook) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO workbook_contents (workbook_id, content)
            VALUES ($1, $2)
            ON CONFLICT (workbook_id)
            DO UPDATE SET content = EXCLUDED.content, updated_at = NOW()
            "#,
        )
        .bind(id)
        .bind(Json(workbook))
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE workbooks SET updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
