use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use contrack_engine::{Job, JobReport};
use uuid::Uuid;

use crate::error::AppError;
use crate::runner::{run_tracker, Invocation};
use crate::AppState;

/// Run a batch job by name against a workbook
async fn run_job(
    State(state): State<AppState>,
    Path((id, name)): Path<(Uuid, String)>,
) -> Result<Json<Invocation<JobReport>>, AppError> {
    let job: Job = name.parse()?;
    tracing::info!(workbook = %id, %job, "job requested");

    // Jobs never ask for confirmation
    let invocation = run_tracker(&state, id, false, move |tracker| tracker.run_job(job)).await?;
    Ok(Json(invocation))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/workbooks/:id/jobs/:job", post(run_job))
}
