use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::transactions::dto::{NewTransaction, TransactionPatch};
use crate::transactions::repo_types::Transaction;

impl Transaction {
    /// All of one user's transactions, newest occurrence date first. Ties on
    /// the date fall back to insertion order, newest first.
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> Result<Vec<Transaction>, ApiError> {
        let rows = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_id, description, amount, kind,
                   category_name, category_emoji, date, created_at, updated_at
            FROM transactions
            WHERE user_id = $1
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        tx: NewTransaction,
    ) -> Result<Transaction, ApiError> {
        let row = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions
                (user_id, description, amount, kind, category_name, category_emoji, date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, description, amount, kind,
                      category_name, category_emoji, date, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(tx.description)
        .bind(tx.amount)
        .bind(tx.kind)
        .bind(tx.category.name)
        .bind(tx.category.emoji)
        .bind(tx.date)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Partial overwrite in a single statement, so two concurrent updates to
    /// the same row serialize at the database and one of them wins whole.
    /// Returns None when the id is not owned by `user_id`, whether or not it
    /// exists under someone else.
    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        patch: TransactionPatch,
    ) -> Result<Option<Transaction>, ApiError> {
        let (category_name, category_emoji) = match patch.category {
            Some(category) => (Some(category.name), Some(category.emoji)),
            None => (None, None),
        };
        let row = sqlx::query_as::<_, Transaction>(
            r#"
            UPDATE transactions SET
                description = COALESCE($3, description),
                amount = COALESCE($4, amount),
                kind = COALESCE($5, kind),
                date = COALESCE($6, date),
                category_name = COALESCE($7, category_name),
                category_emoji = COALESCE($8, category_emoji),
                updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, description, amount, kind,
                      category_name, category_emoji, date, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(patch.description)
        .bind(patch.amount)
        .bind(patch.kind)
        .bind(patch.date)
        .bind(category_name)
        .bind(category_emoji)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// Returns false when nothing was owned and removed, so a repeated
    /// delete reports not-found.
    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
