//! Long-lived per-user progress aggregation.
//!
//! Folds completed sessions into running statistics (streaks, accuracy,
//! weekly goal progress) and derives human-readable reports from a fixed
//! rule table.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::session::calculate_performance;
use crate::types::{Card, CardReview, StudySession, StudyStats};

#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    #[error("invalid state: {0}")]
    InvalidState(String),
}

/// Folds one completed session into the user's running statistics.
///
/// Compatibility note: the accuracy blend divides by `total_cards`, mixing
/// a per-session number into a per-card running average. Downstream
/// consumers were calibrated against that divisor, so it stays.
pub fn update_stats(
    mut stats: StudyStats,
    session: &StudySession,
    review_times: &[DateTime<Utc>],
    now: DateTime<Utc>,
) -> Result<StudyStats, ProgressError> {
    let performance =
        calculate_performance(session).map_err(|e| ProgressError::InvalidState(e.to_string()))?;

    stats.total_study_time += performance.duration_minutes;

    let count = stats.total_cards.max(0) as f64;
    stats.average_accuracy =
        (stats.average_accuracy * count + performance.accuracy) / (count + 1.0);

    stats.last_study_date = Some(now);
    stats.weekly_progress += session.cards_studied;

    stats.current_streak = calculate_streak(review_times, now.date_naive());
    if stats.current_streak > stats.longest_streak {
        stats.longest_streak = stats.current_streak;
    }
    Ok(stats)
}

/// Consecutive-day study streak ending today.
///
/// Review timestamps collapse to calendar days. Walking backward from
/// today, a day extends the streak when its distance from today equals the
/// running count or overshoots it by one, so a single missed day does not
/// break the chain.
pub fn calculate_streak(review_times: &[DateTime<Utc>], today: NaiveDate) -> i64 {
    let mut days: Vec<NaiveDate> = review_times.iter().map(|t| t.date_naive()).collect();
    days.sort_unstable();
    days.dedup();
    days.reverse();

    let mut streak: i64 = 0;
    for day in days {
        let diff = (today - day).num_days();
        if diff == streak || diff == streak + 1 {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

/// Recomputes the card-population counters from the current collection.
/// Learned means recalled successfully at least once; mastered means the
/// interval has grown past the configured cutoff.
pub fn refresh_card_counts(
    mut stats: StudyStats,
    cards: &[Card],
    config: &EngineConfig,
) -> StudyStats {
    stats.total_cards = cards.len() as i64;
    stats.cards_learned = cards.iter().filter(|c| c.repetition > 0).count() as i64;
    stats.cards_mastered = cards
        .iter()
        .filter(|c| c.interval >= config.mastery_interval_days)
        .count() as i64;
    stats
}

/// One day's accuracy in the review history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAccuracy {
    pub date: NaiveDate,
    /// Accuracy percent, 0..=100.
    pub accuracy: f64,
    pub reviews: i64,
}

/// Per-day accuracy series, oldest day first.
pub fn daily_accuracy(reviews: &[CardReview]) -> Vec<DailyAccuracy> {
    let mut buckets: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();
    for review in reviews {
        let entry = buckets.entry(review.review_date.date_naive()).or_insert((0, 0));
        entry.0 += 1;
        if review.quality.is_passing() {
            entry.1 += 1;
        }
    }
    buckets
        .into_iter()
        .map(|(date, (total, correct))| DailyAccuracy {
            date,
            accuracy: if total > 0 {
                correct as f64 / total as f64 * 100.0
            } else {
                0.0
            },
            reviews: total,
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub action: String,
    pub reason: String,
    pub priority: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReport {
    pub summary: String,
    pub recommendations: Vec<Recommendation>,
    pub achievements: Vec<Achievement>,
}

/// Derives a report from the aggregates. Every entry comes from an
/// enumerable threshold condition; there is no scoring model behind this.
pub fn generate_report(
    stats: &StudyStats,
    recent_sessions: &[StudySession],
    config: &EngineConfig,
) -> PerformanceReport {
    let thresholds = &config.report;
    let mut recommendations = Vec::new();
    let mut achievements = Vec::new();

    if stats.average_accuracy < thresholds.low_accuracy_percent {
        recommendations.push(Recommendation {
            action: "Review missed cards again before introducing new material".to_string(),
            reason: format!("lifetime accuracy is {:.0}%", stats.average_accuracy),
            priority: "high".to_string(),
        });
    }
    if stats.current_streak == 0 {
        recommendations.push(Recommendation {
            action: "Study at least one card today to start a streak".to_string(),
            reason: "no active study streak".to_string(),
            priority: "medium".to_string(),
        });
    }
    if stats.weekly_goal > 0 && stats.weekly_progress < stats.weekly_goal {
        let remaining = stats.weekly_goal - stats.weekly_progress;
        recommendations.push(Recommendation {
            action: format!("Review {remaining} more cards to reach the weekly goal"),
            reason: format!(
                "{} of {} cards reviewed this week",
                stats.weekly_progress, stats.weekly_goal
            ),
            priority: "low".to_string(),
        });
    }

    let recent_accuracy = recent_session_accuracy(recent_sessions);
    if let Some(recent) = recent_accuracy {
        if recent < thresholds.low_accuracy_percent && stats.average_accuracy >= recent {
            recommendations.push(Recommendation {
                action: "Shorten sessions until accuracy recovers".to_string(),
                reason: format!("recent sessions average {recent:.0}% accuracy"),
                priority: "medium".to_string(),
            });
        }
    }

    if stats.current_streak >= thresholds.long_streak_achievement_days {
        achievements.push(Achievement {
            title: "Monthly streak".to_string(),
            description: format!("{} consecutive study days", stats.current_streak),
        });
    } else if stats.current_streak >= thresholds.streak_achievement_days {
        achievements.push(Achievement {
            title: "Weekly streak".to_string(),
            description: format!("{} consecutive study days", stats.current_streak),
        });
    }
    if stats.weekly_goal > 0 && stats.weekly_progress >= stats.weekly_goal {
        achievements.push(Achievement {
            title: "Weekly goal met".to_string(),
            description: format!(
                "{} cards reviewed against a goal of {}",
                stats.weekly_progress, stats.weekly_goal
            ),
        });
    }
    if stats.average_accuracy >= thresholds.high_accuracy_percent && stats.total_cards > 0 {
        achievements.push(Achievement {
            title: "Sharp recall".to_string(),
            description: format!("lifetime accuracy of {:.0}%", stats.average_accuracy),
        });
    }

    let summary = format!(
        "{} cards tracked, {:.0}% lifetime accuracy, {}-day streak, {} recent sessions",
        stats.total_cards,
        stats.average_accuracy,
        stats.current_streak,
        recent_sessions.len()
    );

    PerformanceReport {
        summary,
        recommendations,
        achievements,
    }
}

fn recent_session_accuracy(sessions: &[StudySession]) -> Option<f64> {
    let completed: Vec<f64> = sessions
        .iter()
        .filter(|s| s.completed && s.cards_studied > 0)
        .map(|s| s.cards_correct as f64 / s.cards_studied as f64 * 100.0)
        .collect();
    if completed.is_empty() {
        return None;
    }
    Some(completed.iter().sum::<f64>() / completed.len() as f64)
}
