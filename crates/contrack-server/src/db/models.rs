use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Workbook database model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkbookRecord {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
