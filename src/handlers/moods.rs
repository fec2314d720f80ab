use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::mood::Mood;
use crate::AppState;

pub async fn list_moods(State(state): State<AppState>) -> AppResult<Json<Vec<Mood>>> {
    let moods = sqlx::query_as::<_, Mood>("SELECT * FROM moods ORDER BY sort_order ASC")
        .fetch_all(&state.db)
        .await?;

    Ok(Json(moods))
}

pub async fn get_mood(
    State(state): State<AppState>,
    Path(mood_id): Path<Uuid>,
) -> AppResult<Json<Mood>> {
    let mood = sqlx::query_as::<_, Mood>("SELECT * FROM moods WHERE id = $1")
        .bind(mood_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::NotFound("Mood not found".into()))?;

    Ok(Json(mood))
}
