use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Reference mood a user can pick for an entry. The set is seeded by
/// migration and read-only at runtime; `value` is the numeric rating used
/// for averages, `order` controls display position.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Mood {
    pub id: Uuid,
    pub name: String,
    pub value: i32,
    pub color: String,
    pub icon: Option<String>,
    #[sqlx(rename = "sort_order")]
    pub order: i32,
}
