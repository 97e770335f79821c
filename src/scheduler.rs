//! Due-queue selection and session planning.
//!
//! Selection filters and orders the card collection; planning decides how
//! much of the queue fits one sitting and what the next week looks like.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::review::{is_due, retention_rate};
use crate::types::Card;

/// Days covered by the review forecast.
const FORECAST_DAYS: i64 = 7;

/// Cards currently due, earliest scheduled date first. The sort is stable,
/// so cards sharing a due date keep their input order.
pub fn due_cards(cards: &[Card], now: DateTime<Utc>) -> Vec<Card> {
    let mut due: Vec<Card> = cards.iter().filter(|c| is_due(c, now)).cloned().collect();
    due.sort_by(|a, b| a.next_review_date.cmp(&b.next_review_date));
    due
}

/// Orders an already-due set into the study queue.
///
/// Precedence: most overdue first, then lower easiness (harder cards), then
/// lower retention (weaker cards). The sort is stable, so full ties keep
/// their input order and the queue is reproducible for a given collection.
pub fn prioritize(due: &[Card], now: DateTime<Utc>) -> Vec<Card> {
    let mut queue: Vec<Card> = due.to_vec();
    queue.sort_by(|a, b| {
        overdue_seconds(b, now)
            .cmp(&overdue_seconds(a, now))
            .then_with(|| a.easiness_factor.total_cmp(&b.easiness_factor))
            .then_with(|| retention_rate(a).total_cmp(&retention_rate(b)))
    });
    queue
}

fn overdue_seconds(card: &Card, now: DateTime<Utc>) -> i64 {
    (now - card.next_review_date).num_seconds().max(0)
}

/// How many cards fit one sitting: the due count clamped into the
/// configured bounds, further capped by the time available at the average
/// seconds-per-card pace.
pub fn optimal_session_size(
    total_due: i64,
    available_seconds: i64,
    config: &EngineConfig,
) -> i64 {
    let sizing = &config.sizing;
    let by_time = available_seconds.max(0) / sizing.seconds_per_card.max(1);
    let optimal = total_due.clamp(sizing.min_session_cards, sizing.max_session_cards);
    optimal.min(by_time)
}

/// One day of the review forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub date: NaiveDate,
    /// Cards that have never been recalled successfully.
    pub new_count: i64,
    pub review_count: i64,
}

/// Seven-day review forecast, today first.
///
/// A card lands in the bucket whose calendar day equals its scheduled date.
/// Cards already overdue belong to the due queue, not the forecast.
pub fn weekly_plan(cards: &[Card], now: DateTime<Utc>) -> Vec<DailyForecast> {
    let today = now.date_naive();
    (0..FORECAST_DAYS)
        .map(|offset| {
            let day = today + Duration::days(offset);
            let mut new_count = 0;
            let mut review_count = 0;
            for card in cards {
                if card.next_review_date.date_naive() == day {
                    if card.repetition == 0 {
                        new_count += 1;
                    } else {
                        review_count += 1;
                    }
                }
            }
            DailyForecast {
                date: day,
                new_count,
                review_count,
            }
        })
        .collect()
}
