use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

/// Aggregate mood statistics for one user, computed in
/// `handlers::stats` from the user's entries.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodStatistics {
    pub total_entries: i64,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub mood_distribution: Vec<MoodDistribution>,
    pub average_mood: f64,
    pub mood_over_time: Vec<MoodOverTime>,
}

/// How often one mood was logged, with the mood's display fields denormalized
/// so clients can render the breakdown without a second lookup.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodDistribution {
    pub mood_id: Uuid,
    pub mood_name: String,
    pub mood_color: String,
    pub count: i64,
    pub percentage: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodOverTime {
    pub date: NaiveDate,
    pub average_mood: f64,
    pub entry_count: i64,
}
