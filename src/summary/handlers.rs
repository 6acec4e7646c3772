use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    state::AppState,
    summary::{
        dto::{SummaryQuery, SummaryResponse},
        engine,
    },
    transactions::repo_types::Transaction,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/summary", get(get_summary))
}

/// Derive balance, monthly series, category totals and insight metrics from
/// the caller's current ledger snapshot. Recomputed on every call.
#[instrument(skip(state, claims))]
pub async fn get_summary(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let snapshot = Transaction::list_by_user(&state.db, claims.sub).await?;
    let summary = engine::summarize(&snapshot);

    let goal_progress = query
        .goal
        .map(|goal| engine::goal_progress(goal, summary.total_savings))
        .transpose()?;

    Ok(Json(SummaryResponse {
        summary,
        goal_progress,
    }))
}
