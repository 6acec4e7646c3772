use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::categories::{resolve_category, Category};
use crate::error::ApiError;
use crate::transactions::repo_types::{Transaction, TxKind};

fn parse_date(raw: &str) -> Result<Date, ApiError> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(raw.trim(), &format).map_err(|_| ApiError::Validation("Invalid date".into()))
}

fn validate_amount(amount: f64) -> Result<f64, ApiError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(ApiError::Validation(
            "Amount must be a positive number".into(),
        ))
    }
}

fn parse_kind(raw: &str) -> Result<TxKind, ApiError> {
    TxKind::parse(raw)
        .ok_or_else(|| ApiError::Validation("Type must be income or expense".into()))
}

/// Request body for adding a transaction. Fields arrive optional so that a
/// missing one reports the same validation error the frontend expects,
/// rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub description: Option<String>,
    pub amount: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub date: Option<String>,
    #[serde(default)]
    pub category: Option<Value>,
}

/// A fully validated transaction ready to persist.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub description: String,
    pub amount: f64,
    pub kind: TxKind,
    pub date: Date,
    pub category: Category,
}

impl CreateTransactionRequest {
    pub fn validate(self) -> Result<NewTransaction, ApiError> {
        let description = self.description.as_deref().map(str::trim).unwrap_or("");
        let (Some(amount), Some(kind), Some(date)) = (self.amount, self.kind, self.date) else {
            return Err(ApiError::Validation("All fields are required".into()));
        };
        if description.is_empty() || date.trim().is_empty() {
            return Err(ApiError::Validation("All fields are required".into()));
        }

        Ok(NewTransaction {
            description: description.to_string(),
            amount: validate_amount(amount)?,
            kind: parse_kind(&kind)?,
            date: parse_date(&date)?,
            category: resolve_category(self.category.as_ref())?.into_category(),
        })
    }
}

/// Request body for editing a transaction. Absent fields keep their prior
/// value; supplied fields are validated exactly as in create.
#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    pub description: Option<String>,
    pub amount: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub date: Option<String>,
    #[serde(default)]
    pub category: Option<Value>,
}

/// Validated partial overwrite.
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub kind: Option<TxKind>,
    pub date: Option<Date>,
    pub category: Option<Category>,
}

impl UpdateTransactionRequest {
    pub fn validate(self) -> Result<TransactionPatch, ApiError> {
        let description = match self.description {
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(ApiError::Validation("Description cannot be empty".into()));
                }
                Some(trimmed.to_string())
            }
            None => None,
        };

        Ok(TransactionPatch {
            description,
            amount: self.amount.map(validate_amount).transpose()?,
            kind: self.kind.as_deref().map(parse_kind).transpose()?,
            date: self.date.as_deref().map(parse_date).transpose()?,
            category: self
                .category
                .as_ref()
                .map(|raw| resolve_category(Some(raw)).map(|r| r.into_category()))
                .transpose()?,
        })
    }
}

/// Transaction as returned to the client, category folded back into a pair.
#[derive(Debug, Serialize)]
pub struct TransactionDto {
    pub id: Uuid,
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TxKind,
    pub category: Category,
    pub date: Date,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<Transaction> for TransactionDto {
    fn from(t: Transaction) -> Self {
        Self {
            id: t.id,
            description: t.description,
            amount: t.amount,
            kind: t.kind,
            category: Category {
                name: t.category_name,
                emoji: t.category_emoji,
            },
            date: t.date,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<TransactionDto>,
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub message: String,
    pub transaction: TransactionDto,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base_request() -> CreateTransactionRequest {
        CreateTransactionRequest {
            description: Some("Coffee".into()),
            amount: Some(50.0),
            kind: Some("expense".into()),
            date: Some("2024-03-05".into()),
            category: Some(json!({"name": "Food", "emoji": "🍔"})),
        }
    }

    #[test]
    fn valid_request_passes() {
        let tx = base_request().validate().expect("should validate");
        assert_eq!(tx.description, "Coffee");
        assert_eq!(tx.kind, TxKind::Expense);
        assert_eq!(tx.date, time::macros::date!(2024 - 03 - 05));
        assert_eq!(tx.category, Category::new("Food", "🍔"));
    }

    #[test]
    fn missing_fields_are_rejected() {
        let mut req = base_request();
        req.amount = None;
        assert!(matches!(
            req.validate().unwrap_err(),
            ApiError::Validation(_)
        ));

        let mut req = base_request();
        req.description = Some("   ".into());
        assert!(matches!(
            req.validate().unwrap_err(),
            ApiError::Validation(_)
        ));
    }

    #[test]
    fn zero_and_negative_amounts_are_rejected() {
        for amount in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let mut req = base_request();
            req.amount = Some(amount);
            assert!(matches!(
                req.validate().unwrap_err(),
                ApiError::Validation(_)
            ));
        }
    }

    #[test]
    fn unknown_type_is_rejected() {
        let mut req = base_request();
        req.kind = Some("transfer".into());
        assert!(matches!(
            req.validate().unwrap_err(),
            ApiError::Validation(_)
        ));
    }

    #[test]
    fn unparsable_date_is_rejected() {
        let mut req = base_request();
        req.date = Some("March 5th".into());
        assert!(matches!(
            req.validate().unwrap_err(),
            ApiError::Validation(_)
        ));
    }

    #[test]
    fn missing_category_defaults_to_other() {
        let mut req = base_request();
        req.category = None;
        let tx = req.validate().expect("should validate");
        assert_eq!(tx.category, Category::default_other());
    }

    #[test]
    fn malformed_category_is_rejected() {
        let mut req = base_request();
        req.category = Some(json!({"name": "Food"}));
        assert!(matches!(
            req.validate().unwrap_err(),
            ApiError::Validation(_)
        ));
    }

    #[test]
    fn patch_keeps_absent_fields_unset() {
        let req = UpdateTransactionRequest {
            description: None,
            amount: Some(75.5),
            kind: None,
            date: None,
            category: None,
        };
        let patch = req.validate().expect("should validate");
        assert!(patch.description.is_none());
        assert_eq!(patch.amount, Some(75.5));
        assert!(patch.kind.is_none());
        assert!(patch.date.is_none());
        assert!(patch.category.is_none());
    }

    #[test]
    fn patch_revalidates_supplied_fields() {
        let req = UpdateTransactionRequest {
            description: Some("  ".into()),
            amount: None,
            kind: None,
            date: None,
            category: None,
        };
        assert!(matches!(
            req.validate().unwrap_err(),
            ApiError::Validation(_)
        ));

        let req = UpdateTransactionRequest {
            description: None,
            amount: Some(-1.0),
            kind: None,
            date: None,
            category: None,
        };
        assert!(matches!(
            req.validate().unwrap_err(),
            ApiError::Validation(_)
        ));

        let req = UpdateTransactionRequest {
            description: None,
            amount: None,
            kind: None,
            date: None,
            category: Some(json!({"emoji": "🍔"})),
        };
        assert!(matches!(
            req.validate().unwrap_err(),
            ApiError::Validation(_)
        ));
    }
}
