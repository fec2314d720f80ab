use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::activity::{Activity, CreateActivityRequest, UpdateActivityRequest};
use crate::AppState;

pub async fn list_activities(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Vec<Activity>>> {
    let activities = sqlx::query_as::<_, Activity>(
        r#"
        SELECT * FROM activities
        WHERE user_id = $1
        ORDER BY category ASC, name ASC
        "#,
    )
    .bind(auth_user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(activities))
}

pub async fn get_activity(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(activity_id): Path<Uuid>,
) -> AppResult<Json<Activity>> {
    let activity = sqlx::query_as::<_, Activity>(
        "SELECT * FROM activities WHERE id = $1 AND user_id = $2",
    )
    .bind(activity_id)
    .bind(auth_user.id)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("Activity not found".into()))?;

    Ok(Json(activity))
}

pub async fn create_activity(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateActivityRequest>,
) -> AppResult<Json<Activity>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let activity = sqlx::query_as::<_, Activity>(
        r#"
        INSERT INTO activities (id, user_id, name, icon, color, category)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(&body.name)
    .bind(&body.icon)
    .bind(&body.color)
    .bind(&body.category)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(activity))
}

pub async fn update_activity(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(activity_id): Path<Uuid>,
    Json(body): Json<UpdateActivityRequest>,
) -> AppResult<Json<Activity>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let activity = sqlx::query_as::<_, Activity>(
        r#"
        UPDATE activities SET
            name = COALESCE($3, name),
            icon = COALESCE($4, icon),
            color = COALESCE($5, color),
            category = COALESCE($6, category),
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(activity_id)
    .bind(auth_user.id)
    .bind(&body.name)
    .bind(&body.icon)
    .bind(&body.color)
    .bind(&body.category)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("Activity not found".into()))?;

    Ok(Json(activity))
}

pub async fn delete_activity(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(activity_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM activities WHERE id = $1 AND user_id = $2")
        .bind(activity_id)
        .bind(auth_user.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Activity not found".into()));
    }

    // No FK covers the UUID[] column on entries; scrub the id by hand
    sqlx::query(
        r#"
        UPDATE entries
        SET activity_ids = array_remove(activity_ids, $1), updated_at = NOW()
        WHERE user_id = $2 AND $1 = ANY(activity_ids)
        "#,
    )
    .bind(activity_id)
    .bind(auth_user.id)
    .execute(&state.db)
    .await?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}
