use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    state::AppState,
    transactions::{
        dto::{
            CreateTransactionRequest, MessageResponse, TransactionListResponse,
            TransactionResponse, UpdateTransactionRequest,
        },
        repo_types::Transaction,
    },
};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/transactions", get(list_transactions))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", post(create_transaction))
        .route("/transactions/:id", put(update_transaction))
        .route("/transactions/:id", delete(delete_transaction))
}

#[instrument(skip(state, claims))]
pub async fn list_transactions(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<TransactionListResponse>, ApiError> {
    let rows = Transaction::list_by_user(&state.db, claims.sub).await?;
    Ok(Json(TransactionListResponse {
        transactions: rows.into_iter().map(Into::into).collect(),
    }))
}

#[instrument(skip(state, claims, payload))]
pub async fn create_transaction(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), ApiError> {
    let new_tx = payload.validate()?;
    let row = Transaction::create(&state.db, claims.sub, new_tx).await?;

    info!(user_id = %claims.sub, transaction_id = %row.id, "transaction added");
    Ok((
        StatusCode::CREATED,
        Json(TransactionResponse {
            message: "Transaction added successfully".into(),
            transaction: row.into(),
        }),
    ))
}

#[instrument(skip(state, claims, payload))]
pub async fn update_transaction(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTransactionRequest>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let patch = payload.validate()?;
    let row = Transaction::update(&state.db, claims.sub, id, patch)
        .await?
        .ok_or_else(|| {
            warn!(user_id = %claims.sub, transaction_id = %id, "update missed");
            ApiError::NotFound("Transaction not found".into())
        })?;

    info!(user_id = %claims.sub, transaction_id = %row.id, "transaction updated");
    Ok(Json(TransactionResponse {
        message: "Transaction updated successfully".into(),
        transaction: row.into(),
    }))
}

#[instrument(skip(state, claims))]
pub async fn delete_transaction(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !Transaction::delete(&state.db, claims.sub, id).await? {
        warn!(user_id = %claims.sub, transaction_id = %id, "delete missed");
        return Err(ApiError::NotFound("Transaction not found".into()));
    }

    info!(user_id = %claims.sub, transaction_id = %id, "transaction deleted");
    Ok(Json(MessageResponse {
        message: "Transaction deleted successfully".into(),
    }))
}
