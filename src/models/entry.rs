use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::mood::Mood;

/// A logged journal record: a date/time, a mood reference, a set of activity
/// ids and an optional note. `synced_at` is stamped by the server whenever the
/// record is persisted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(rename = "entry_date")]
    pub date: NaiveDate,
    #[sqlx(rename = "entry_time")]
    pub time: NaiveTime,
    pub mood_id: Uuid,
    pub activity_ids: Vec<Uuid>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub synced_at: Option<DateTime<Utc>>,
}

/// Read-side variant of [`Entry`] with the mood reference resolved to the full
/// mood record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub mood: Mood,
    pub activity_ids: Vec<Uuid>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub synced_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub mood_id: Uuid,
    pub activity_ids: Vec<Uuid>,
    #[validate(length(max = 5000, message = "Note must be at most 5000 characters"))]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntryRequest {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub mood_id: Option<Uuid>,
    pub activity_ids: Option<Vec<Uuid>>,
    #[validate(length(max = 5000, message = "Note must be at most 5000 characters"))]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub mood_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> Entry {
        Entry {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 8, 6).unwrap(),
            time: NaiveTime::from_hms_opt(21, 30, 0).unwrap(),
            mood_id: Uuid::new_v4(),
            activity_ids: vec![Uuid::new_v4()],
            note: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            synced_at: None,
        }
    }

    #[test]
    fn entry_serializes_with_camel_case_wire_names() {
        let value = serde_json::to_value(sample_entry()).unwrap();
        let obj = value.as_object().unwrap();

        for key in [
            "id",
            "userId",
            "date",
            "time",
            "moodId",
            "activityIds",
            "note",
            "createdAt",
            "updatedAt",
            "syncedAt",
        ] {
            assert!(obj.contains_key(key), "missing wire field {key}");
        }
        assert!(!obj.contains_key("user_id"));
        assert!(!obj.contains_key("synced_at"));

        assert_eq!(obj["date"], "2026-08-06");
        assert_eq!(obj["time"], "21:30:00");
        assert!(obj["syncedAt"].is_null());
    }

    #[test]
    fn create_request_parses_wire_json() {
        let body: CreateEntryRequest = serde_json::from_str(
            r#"{
                "date": "2026-08-06",
                "time": "08:15:00",
                "moodId": "a1e9c3a0-0001-4000-8000-000000000001",
                "activityIds": [],
                "note": "slept well"
            }"#,
        )
        .unwrap();

        assert_eq!(body.date, NaiveDate::from_ymd_opt(2026, 8, 6).unwrap());
        assert_eq!(body.time, NaiveTime::from_hms_opt(8, 15, 0).unwrap());
        assert!(body.activity_ids.is_empty());
        assert_eq!(body.note.as_deref(), Some("slept well"));
    }

    #[test]
    fn update_request_fields_default_to_none() {
        let body: UpdateEntryRequest = serde_json::from_str(r#"{ "note": "edited" }"#).unwrap();
        assert!(body.date.is_none());
        assert!(body.mood_id.is_none());
        assert!(body.activity_ids.is_none());
        assert_eq!(body.note.as_deref(), Some("edited"));
    }
}
