use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::{auth::jwt::AuthUser, error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct SendReportRequest {
    #[serde(rename = "pdfData", default)]
    pub pdf_data: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendReportResponse {
    pub message: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/report", post(send_report))
}

pub(crate) fn decode_pdf_payload(pdf_data: Option<&str>) -> Result<Vec<u8>, ApiError> {
    let encoded = match pdf_data {
        Some(data) if !data.is_empty() => data,
        _ => return Err(ApiError::Validation("No PDF data provided".into())),
    };
    STANDARD
        .decode(encoded)
        .map_err(|_| ApiError::Validation("Invalid PDF data".into()))
}

/// Accept a rendered PDF and hand it to the mailer on a background task.
/// Delivery is fire-and-forget: a failed send is logged, never surfaced as a
/// ledger failure.
#[instrument(skip(state, claims, payload))]
pub async fn send_report(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<SendReportRequest>,
) -> Result<(StatusCode, Json<SendReportResponse>), ApiError> {
    let pdf = decode_pdf_payload(payload.pdf_data.as_deref())?;
    debug!(bytes = pdf.len(), "received PDF report");

    let mailer = state.mailer.clone();
    let to = claims.email.clone();
    tokio::spawn(async move {
        match mailer.send_report(&to, pdf).await {
            Ok(()) => info!(to = %to, "report sent"),
            Err(e) => error!(error = %e, to = %to, "report delivery failed"),
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(SendReportResponse {
            message: "Report queued for delivery".into(),
        }),
    ))
}
