use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::entry::{
    CreateEntryRequest, EnrichedEntry, Entry, EntryQuery, UpdateEntryRequest,
};
use crate::models::mood::Mood;
use crate::AppState;

pub async fn create_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateEntryRequest>,
) -> AppResult<Json<Entry>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let activity_ids = normalize_activity_ids(body.activity_ids);
    check_entry_refs(
        &state,
        auth_user.id,
        Some(body.mood_id),
        Some(activity_ids.as_slice()),
    )
    .await?;

    let entry = sqlx::query_as::<_, Entry>(
        r#"
        INSERT INTO entries (id, user_id, entry_date, entry_time, mood_id, activity_ids, note, synced_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(body.date)
    .bind(body.time)
    .bind(body.mood_id)
    .bind(&activity_ids)
    .bind(&body.note)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(entry))
}

pub async fn list_entries(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<EntryQuery>,
) -> AppResult<Json<Vec<Entry>>> {
    let entries = fetch_entries(&state, auth_user.id, &query).await?;
    Ok(Json(entries))
}

pub async fn get_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(entry_id): Path<Uuid>,
) -> AppResult<Json<Entry>> {
    let entry = sqlx::query_as::<_, Entry>(
        "SELECT * FROM entries WHERE id = $1 AND user_id = $2",
    )
    .bind(entry_id)
    .bind(auth_user.id)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("Entry not found".into()))?;

    Ok(Json(entry))
}

pub async fn update_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(entry_id): Path<Uuid>,
    Json(body): Json<UpdateEntryRequest>,
) -> AppResult<Json<Entry>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let activity_ids = body.activity_ids.map(normalize_activity_ids);
    check_entry_refs(&state, auth_user.id, body.mood_id, activity_ids.as_deref()).await?;

    let entry = sqlx::query_as::<_, Entry>(
        r#"
        UPDATE entries SET
            entry_date = COALESCE($3, entry_date),
            entry_time = COALESCE($4, entry_time),
            mood_id = COALESCE($5, mood_id),
            activity_ids = COALESCE($6, activity_ids),
            note = COALESCE($7, note),
            updated_at = NOW(),
            synced_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(entry_id)
    .bind(auth_user.id)
    .bind(body.date)
    .bind(body.time)
    .bind(body.mood_id)
    .bind(&activity_ids)
    .bind(&body.note)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::NotFound("Entry not found".into()))?;

    Ok(Json(entry))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(entry_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM entries WHERE id = $1 AND user_id = $2")
        .bind(entry_id)
        .bind(auth_user.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Entry not found".into()));
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Same listing as `list_entries`, with the mood reference resolved to the
/// full mood record on each entry.
pub async fn list_enriched_entries(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<EntryQuery>,
) -> AppResult<Json<Vec<EnrichedEntry>>> {
    let entries = fetch_entries(&state, auth_user.id, &query).await?;

    let moods: HashMap<Uuid, Mood> = sqlx::query_as::<_, Mood>("SELECT * FROM moods")
        .fetch_all(&state.db)
        .await?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();

    let enriched = enrich_entries(entries, &moods)?;
    Ok(Json(enriched))
}

async fn fetch_entries(
    state: &AppState,
    user_id: Uuid,
    query: &EntryQuery,
) -> AppResult<Vec<Entry>> {
    let start = query
        .start_date
        .unwrap_or_else(|| Utc::now().date_naive() - chrono::Duration::days(30));
    let end = query.end_date.unwrap_or_else(|| Utc::now().date_naive());

    let entries = if let Some(mood_id) = query.mood_id {
        sqlx::query_as::<_, Entry>(
            r#"
            SELECT * FROM entries
            WHERE user_id = $1 AND mood_id = $2 AND entry_date BETWEEN $3 AND $4
            ORDER BY entry_date DESC, entry_time DESC
            "#,
        )
        .bind(user_id)
        .bind(mood_id)
        .bind(start)
        .bind(end)
        .fetch_all(&state.db)
        .await?
    } else {
        sqlx::query_as::<_, Entry>(
            r#"
            SELECT * FROM entries
            WHERE user_id = $1 AND entry_date BETWEEN $2 AND $3
            ORDER BY entry_date DESC, entry_time DESC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&state.db)
        .await?
    };

    Ok(entries)
}

/// Verify the referential pieces of an entry write: the mood must be one of
/// the seeded moods, every activity id must belong to the calling user.
async fn check_entry_refs(
    state: &AppState,
    user_id: Uuid,
    mood_id: Option<Uuid>,
    activity_ids: Option<&[Uuid]>,
) -> AppResult<()> {
    if let Some(mood_id) = mood_id {
        let known = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM moods WHERE id = $1")
            .bind(mood_id)
            .fetch_one(&state.db)
            .await?;
        if known == 0 {
            return Err(AppError::Validation("moodId does not reference a known mood".into()));
        }
    }

    if let Some(ids) = activity_ids {
        if !ids.is_empty() {
            let owned = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM activities WHERE user_id = $1 AND id = ANY($2)",
            )
            .bind(user_id)
            .bind(ids)
            .fetch_one(&state.db)
            .await?;
            if owned != ids.len() as i64 {
                return Err(AppError::Validation(
                    "activityIds must reference your own activities".into(),
                ));
            }
        }
    }

    Ok(())
}

/// Sort and dedup the activity set; the wire field is a list but the stored
/// value is a set.
fn normalize_activity_ids(mut ids: Vec<Uuid>) -> Vec<Uuid> {
    ids.sort();
    ids.dedup();
    ids
}

fn enrich_entries(
    entries: Vec<Entry>,
    moods: &HashMap<Uuid, Mood>,
) -> Result<Vec<EnrichedEntry>, AppError> {
    entries
        .into_iter()
        .map(|e| {
            let mood = moods.get(&e.mood_id).cloned().ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!(
                    "entry {} references missing mood {}",
                    e.id,
                    e.mood_id
                ))
            })?;
            Ok(EnrichedEntry {
                id: e.id,
                user_id: e.user_id,
                date: e.date,
                time: e.time,
                mood,
                activity_ids: e.activity_ids,
                note: e.note,
                created_at: e.created_at,
                updated_at: e.updated_at,
                synced_at: e.synced_at,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::*;

    fn mood(id: Uuid, name: &str, value: i32) -> Mood {
        Mood {
            id,
            name: name.into(),
            value,
            color: "#4caf50".into(),
            icon: None,
            order: 1,
        }
    }

    fn entry(mood_id: Uuid) -> Entry {
        Entry {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            mood_id,
            activity_ids: vec![],
            note: Some("note".into()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            synced_at: Some(Utc::now()),
        }
    }

    #[test]
    fn normalize_sorts_and_dedups() {
        let a = Uuid::from_u128(2);
        let b = Uuid::from_u128(1);
        let ids = normalize_activity_ids(vec![a, b, a, b]);
        assert_eq!(ids, vec![b, a]);
    }

    #[test]
    fn normalize_keeps_empty_set() {
        assert!(normalize_activity_ids(vec![]).is_empty());
    }

    #[test]
    fn enrich_embeds_full_mood() {
        let mood_id = Uuid::new_v4();
        let mut moods = HashMap::new();
        moods.insert(mood_id, mood(mood_id, "good", 4));

        let e = entry(mood_id);
        let note = e.note.clone();

        let enriched = enrich_entries(vec![e], &moods).unwrap();
        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0].mood.id, mood_id);
        assert_eq!(enriched[0].mood.name, "good");
        assert_eq!(enriched[0].note, note);
    }

    #[test]
    fn enrich_fails_on_unknown_mood() {
        let moods = HashMap::new();
        let result = enrich_entries(vec![entry(Uuid::new_v4())], &moods);
        assert!(result.is_err());
    }
}
