use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// User-owned tag describing what the user was doing when an entry was logged.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub icon: Option<String>,
    pub color: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityRequest {
    #[validate(length(min = 1, max = 100, message = "Activity name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(max = 50, message = "Icon name too long"))]
    pub icon: String,
    #[validate(length(min = 1, max = 32, message = "Color must be 1-32 characters"))]
    pub color: String,
    #[validate(length(min = 1, max = 50, message = "Category must be 1-50 characters"))]
    pub category: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActivityRequest {
    #[validate(length(min = 1, max = 100, message = "Activity name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 50, message = "Icon name too long"))]
    pub icon: Option<String>,
    #[validate(length(min = 1, max = 32, message = "Color must be 1-32 characters"))]
    pub color: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Category must be 1-50 characters"))]
    pub category: Option<String>,
}
