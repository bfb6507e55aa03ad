use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use contrack_core::Workbook;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::models::WorkbookRecord;
use crate::error::AppError;
use crate::AppState;

/// Request to create or rename a workbook
#[derive(Debug, Deserialize)]
pub struct WorkbookNameRequest {
    pub name: String,
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Workbook {} not found", id))
}

fn validate_name(name: &str) -> Result<&str, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Workbook name must not be empty".to_string()));
    }
    Ok(name)
}

async fn list_workbooks(
    State(state): State<AppState>,
) -> Result<Json<Vec<WorkbookRecord>>, AppError> {
    Ok(Json(state.db.list_workbooks().await?))
}

/// Create a workbook seeded with the tracker's sheets and header rows
async fn create_workbook(
    State(state): State<AppState>,
    Json(req): Json<WorkbookNameRequest>,
) -> Result<Json<WorkbookRecord>, AppError> {
    let name = validate_name(&req.name)?;
    let record = state.db.create_workbook(&Workbook::seeded(name, &state.settings)).await?;
    tracing::info!(id = %record.id, name = %record.name, "workbook created");
    Ok(Json(record))
}

async fn get_workbook(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkbookRecord>, AppError> {
    let record = state.db.get_workbook(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(record))
}

async fn rename_workbook(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<WorkbookNameRequest>,
) -> Result<Json<WorkbookRecord>, AppError> {
    let name = validate_name(&req.name)?;
    let record = state.db.rename_workbook(id, name).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(record))
}

/// Delete a workbook and drop its lock
async fn delete_workbook(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let lock = state.locks.get_or_create(id).await;
    let _guard = lock.lock().await;

    if !state.db.delete_workbook(id).await? {
        return Err(not_found(id));
    }
    state.locks.remove(id).await;
    tracing::info!(%id, "workbook deleted");
    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// The workbook's sheets, seeded if nothing was stored yet
async fn get_workbook_content(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Workbook>, AppError> {
    let workbook = state.db.load_workbook(id, &state.settings).await?;
    Ok(Json(workbook))
}

/// Replace the workbook's sheets wholesale
async fn save_workbook_content(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(content): Json<Workbook>,
) -> Result<Json<serde_json::Value>, AppError> {
    let lock = state.locks.get_or_create(id).await;
    let _guard = lock.lock().await;

    state.db.get_workbook(id).await?.ok_or_else(|| not_found(id))?;
    state.db.store_workbook(id, &content).await?;
    Ok(Json(serde_json::json!({ "saved": true })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/workbooks", get(list_workbooks).post(create_workbook))
        .route(
            "/api/workbooks/:id",
            get(get_workbook).put(rename_workbook).delete(delete_workbook),
        )
        .route(
            "/api/workbooks/:id/content",
            get(get_workbook_content).put(save_workbook_content),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_trims() {
        assert_eq!(validate_name("  Clients 2026 ").unwrap(), "Clients 2026");
        assert!(matches!(validate_name("   "), Err(AppError::BadRequest(_))));
    }
}
