use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use contrack_core::parse_cell_input;
use contrack_engine::EditOutcome;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::runner::{run_tracker, Invocation};
use crate::AppState;

/// A single-cell edit as typed by a user. Rows and columns are 0-based.
#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub sheet: String,
    pub row: u32,
    pub col: u32,
    /// Raw text as typed; numbers and dates are recognized
    #[serde(default)]
    pub new_value: String,
    /// Previous content as the client saw it; defaults to what is stored
    #[serde(default)]
    pub old_value: Option<String>,
    /// Answer to a confirmation the edit may ask for; no answer declines
    #[serde(default)]
    pub confirm: Option<bool>,
}

/// Write the value into the cell, then let the tracker react to the edit
async fn post_edit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<EditRequest>,
) -> Result<Json<Invocation<EditOutcome>>, AppError> {
    tracing::debug!(workbook = %id, sheet = %req.sheet, row = req.row, col = req.col, "edit received");
    let answer = req.confirm.unwrap_or(false);

    let invocation = run_tracker(&state, id, answer, move |tracker| {
        let mut event = tracker.write_edit(&req.sheet, req.row, req.col, parse_cell_input(&req.new_value))?;
        if let Some(old) = &req.old_value {
            event.old_value = Some(parse_cell_input(old)).filter(|v| !v.is_empty());
        }
        tracker.handle_edit(&event)
    })
    .await?;

    Ok(Json(invocation))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/workbooks/:id/edits", post(post_edit))
}
