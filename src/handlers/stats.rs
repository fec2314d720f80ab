use std::collections::{BTreeMap, HashMap};

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::error::AppResult;
use crate::models::mood::Mood;
use crate::models::statistics::{MoodDistribution, MoodOverTime, MoodStatistics};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub async fn get_mood_statistics(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<StatsQuery>,
) -> AppResult<Json<MoodStatistics>> {
    let moods: HashMap<Uuid, Mood> = sqlx::query_as::<_, Mood>("SELECT * FROM moods")
        .fetch_all(&state.db)
        .await?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();

    // Full history: streaks need contiguity-to-today, which a clipped window
    // cannot answer.
    let rows = sqlx::query_as::<_, (NaiveDate, Uuid)>(
        r#"
        SELECT entry_date, mood_id FROM entries
        WHERE user_id = $1
        ORDER BY entry_date ASC
        "#,
    )
    .bind(auth_user.id)
    .fetch_all(&state.db)
    .await?;

    let today = Utc::now().date_naive();
    let stats = compute_statistics(&rows, &moods, query.start_date, query.end_date, today);

    Ok(Json(stats))
}

/// Aggregate one user's entry rows into the full statistics payload. Streaks
/// always walk the full history; the optional range restricts everything else.
fn compute_statistics(
    rows: &[(NaiveDate, Uuid)],
    moods: &HashMap<Uuid, Mood>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> MoodStatistics {
    let in_range = |d: NaiveDate| start.map_or(true, |s| d >= s) && end.map_or(true, |e| d <= e);
    let filtered: Vec<(NaiveDate, Uuid)> = rows.iter().copied().filter(|(d, _)| in_range(*d)).collect();

    let mut dates: Vec<NaiveDate> = rows.iter().map(|(d, _)| *d).collect();
    dates.sort();
    dates.dedup();
    let longest_streak = longest_streak(&dates);
    dates.reverse();
    let current_streak = current_streak(&dates, today);

    let total_entries = filtered.len() as i64;

    let mut counts: HashMap<Uuid, i64> = HashMap::new();
    let mut value_sum: i64 = 0;
    let mut valued: i64 = 0;
    let mut by_date: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();

    for (date, mood_id) in &filtered {
        *counts.entry(*mood_id).or_insert(0) += 1;
        if let Some(mood) = moods.get(mood_id) {
            value_sum += mood.value as i64;
            valued += 1;
            let bucket = by_date.entry(*date).or_insert((0, 0));
            bucket.0 += mood.value as i64;
            bucket.1 += 1;
        }
    }

    let average_mood = if valued > 0 {
        value_sum as f64 / valued as f64
    } else {
        0.0
    };

    let mut mood_distribution: Vec<MoodDistribution> = counts
        .into_iter()
        .filter_map(|(mood_id, count)| {
            let mood = moods.get(&mood_id)?;
            Some(MoodDistribution {
                mood_id,
                mood_name: mood.name.clone(),
                mood_color: mood.color.clone(),
                count,
                percentage: if total_entries > 0 {
                    count as f64 / total_entries as f64 * 100.0
                } else {
                    0.0
                },
            })
        })
        .collect();
    // Largest share first; name breaks ties deterministically
    mood_distribution.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.mood_name.cmp(&b.mood_name))
    });

    let mood_over_time: Vec<MoodOverTime> = by_date
        .into_iter()
        .map(|(date, (sum, count))| MoodOverTime {
            date,
            average_mood: sum as f64 / count as f64,
            entry_count: count,
        })
        .collect();

    MoodStatistics {
        total_entries,
        current_streak,
        longest_streak,
        mood_distribution,
        average_mood,
        mood_over_time,
    }
}

/// Consecutive logged days anchored at today, with a one-day grace so the
/// streak survives until the user has had a chance to log today.
fn current_streak(dates_desc: &[NaiveDate], today: NaiveDate) -> i32 {
    let mut check_date = match dates_desc.first() {
        Some(&latest) if latest == today || latest == today - Duration::days(1) => latest,
        _ => return 0,
    };

    let mut streak = 0i32;
    for &date in dates_desc {
        if date == check_date {
            streak += 1;
            check_date -= Duration::days(1);
        } else if date < check_date {
            break;
        }
    }
    streak
}

fn longest_streak(dates_asc: &[NaiveDate]) -> i32 {
    let mut longest = 0i32;
    let mut streak = 0i32;
    let mut prev_date: Option<NaiveDate> = None;

    for &date in dates_asc {
        match prev_date {
            Some(prev) if date == prev + Duration::days(1) => streak += 1,
            Some(_) => {
                longest = longest.max(streak);
                streak = 1;
            }
            None => streak = 1,
        }
        prev_date = Some(date);
    }

    longest.max(streak)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, day).unwrap()
    }

    fn mood_set() -> (HashMap<Uuid, Mood>, Uuid, Uuid) {
        let good = Uuid::from_u128(4);
        let bad = Uuid::from_u128(2);
        let mut moods = HashMap::new();
        moods.insert(
            good,
            Mood {
                id: good,
                name: "good".into(),
                value: 4,
                color: "#8bc34a".into(),
                icon: None,
                order: 2,
            },
        );
        moods.insert(
            bad,
            Mood {
                id: bad,
                name: "bad".into(),
                value: 2,
                color: "#ff9800".into(),
                icon: None,
                order: 4,
            },
        );
        (moods, good, bad)
    }

    #[test]
    fn empty_history_yields_zeroed_stats() {
        let (moods, _, _) = mood_set();
        let stats = compute_statistics(&[], &moods, None, None, d(6));

        assert_eq!(stats.total_entries, 0);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.longest_streak, 0);
        assert_eq!(stats.average_mood, 0.0);
        assert!(stats.mood_distribution.is_empty());
        assert!(stats.mood_over_time.is_empty());
    }

    #[test]
    fn current_streak_counts_consecutive_days_ending_today() {
        let dates = [d(6), d(5), d(4), d(2)];
        assert_eq!(current_streak(&dates, d(6)), 3);
    }

    #[test]
    fn current_streak_grace_covers_yesterday() {
        // Nothing logged today yet: streak ending yesterday still stands
        let dates = [d(5), d(4), d(3)];
        assert_eq!(current_streak(&dates, d(6)), 3);
    }

    #[test]
    fn current_streak_is_zero_after_a_missed_day() {
        let dates = [d(3), d(2), d(1)];
        assert_eq!(current_streak(&dates, d(6)), 0);
    }

    #[test]
    fn longest_streak_spans_gaps() {
        // runs: 1-2 (len 2), 4-6 (len 3), 9 (len 1)
        let dates = [d(1), d(2), d(4), d(5), d(6), d(9)];
        assert_eq!(longest_streak(&dates), 3);
    }

    #[test]
    fn longest_streak_single_day() {
        assert_eq!(longest_streak(&[d(1)]), 1);
    }

    #[test]
    fn distribution_counts_and_percentages() {
        let (moods, good, bad) = mood_set();
        let rows = [(d(1), good), (d(2), good), (d(3), good), (d(4), bad)];

        let stats = compute_statistics(&rows, &moods, None, None, d(6));

        assert_eq!(stats.total_entries, 4);
        assert_eq!(stats.mood_distribution.len(), 2);
        assert_eq!(stats.mood_distribution[0].mood_id, good);
        assert_eq!(stats.mood_distribution[0].count, 3);
        assert!((stats.mood_distribution[0].percentage - 75.0).abs() < f64::EPSILON);
        assert_eq!(stats.mood_distribution[1].count, 1);
        assert!((stats.mood_distribution[1].percentage - 25.0).abs() < f64::EPSILON);

        // (4 + 4 + 4 + 2) / 4
        assert!((stats.average_mood - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn mood_over_time_groups_by_date_ascending() {
        let (moods, good, bad) = mood_set();
        let rows = [(d(2), good), (d(2), bad), (d(1), good)];

        let stats = compute_statistics(&rows, &moods, None, None, d(6));

        assert_eq!(stats.mood_over_time.len(), 2);
        assert_eq!(stats.mood_over_time[0].date, d(1));
        assert_eq!(stats.mood_over_time[0].entry_count, 1);
        assert_eq!(stats.mood_over_time[1].date, d(2));
        assert_eq!(stats.mood_over_time[1].entry_count, 2);
        // (4 + 2) / 2
        assert!((stats.mood_over_time[1].average_mood - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn range_filters_totals_but_not_streaks() {
        let (moods, good, _) = mood_set();
        let rows = [(d(3), good), (d(4), good), (d(5), good), (d(6), good)];

        let stats = compute_statistics(&rows, &moods, Some(d(5)), Some(d(6)), d(6));

        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.mood_over_time.len(), 2);
        // Streaks ignore the window: 4 consecutive days ending today
        assert_eq!(stats.current_streak, 4);
        assert_eq!(stats.longest_streak, 4);
    }
}
