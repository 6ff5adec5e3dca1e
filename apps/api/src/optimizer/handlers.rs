use axum::{extract::State, Json};
use tracing::info;

use crate::errors::AppError;
use crate::optimizer::{OptimizationRequest, OptimizationResult};
use crate::state::AppState;

/// POST /api/v1/resume/optimize
pub async fn handle_optimize(
    State(state): State<AppState>,
    Json(req): Json<OptimizationRequest>,
) -> Result<Json<OptimizationResult>, AppError> {
    let result = state
        .optimizer
        .optimize(&req.latex_code, &req.job_description)
        .await?;

    info!(
        match_score = result.match_score,
        changes_made = result.changes_made,
        degraded = result.degraded,
        "resume optimized"
    );

    Ok(Json(result))
}
