use axum::{routing::get, Json, Router};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{error::ApiError, state::AppState};

/// A transaction category. The canonical list below is what the frontend
/// offers, but any pair with a non-empty name and emoji is accepted so users
/// are not locked out of novel categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub emoji: String,
}

impl Category {
    pub fn new(name: &str, emoji: &str) -> Self {
        Self {
            name: name.into(),
            emoji: emoji.into(),
        }
    }

    /// The fallback used whenever a transaction arrives without a category.
    pub fn default_other() -> Self {
        Self::new("Other", "📦")
    }
}

lazy_static! {
    pub static ref CANONICAL_CATEGORIES: Vec<Category> = vec![
        Category::new("Food", "🍔"),
        Category::new("Transport", "🚗"),
        Category::new("Entertainment", "🎬"),
        Category::new("Shopping", "🛍️"),
        Category::new("Bills", "💡"),
        Category::new("Health", "💊"),
        Category::new("Travel", "✈️"),
        Category::new("Salary", "💰"),
        Category::new("Other", "📦"),
    ];
}

/// Outcome of resolving a raw category payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryResolution {
    /// The caller supplied a well-formed category.
    Provided(Category),
    /// Nothing was supplied; the Other/📦 fallback applies.
    Defaulted(Category),
}

impl CategoryResolution {
    pub fn into_category(self) -> Category {
        match self {
            CategoryResolution::Provided(c) | CategoryResolution::Defaulted(c) => c,
        }
    }
}

/// Resolve the category field of a create or update request.
///
/// Clients send either a JSON object or a JSON-encoded string (the dropdown
/// stores stringified options), so both shapes are parsed here. Create and
/// update must go through this same function so they cannot drift apart in
/// leniency: absent means defaulted, malformed means rejected.
pub fn resolve_category(raw: Option<&Value>) -> Result<CategoryResolution, ApiError> {
    let value = match raw {
        None | Some(Value::Null) => {
            return Ok(CategoryResolution::Defaulted(Category::default_other()))
        }
        Some(Value::String(encoded)) => serde_json::from_str::<Value>(encoded)
            .map_err(|_| ApiError::Validation("Invalid category format".into()))?,
        Some(value) => value.clone(),
    };

    let name = value.get("name").and_then(Value::as_str).unwrap_or("");
    let emoji = value.get("emoji").and_then(Value::as_str).unwrap_or("");
    if name.is_empty() || emoji.is_empty() {
        return Err(ApiError::Validation("Invalid category format".into()));
    }

    Ok(CategoryResolution::Provided(Category::new(name, emoji)))
}

#[derive(Debug, Serialize)]
struct CategoriesResponse {
    categories: Vec<Category>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/categories", get(list_categories))
}

async fn list_categories() -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: CANONICAL_CATEGORIES.clone(),
    })
}
