use serde::{Deserialize, Serialize};

use crate::summary::engine::{GoalProgress, LedgerSummary};

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// Optional savings goal; when present the response carries progress
    /// toward it. The goal is never persisted server-side.
    #[serde(default)]
    pub goal: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub summary: LedgerSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_progress: Option<GoalProgress>,
}
