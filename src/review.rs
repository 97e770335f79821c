//! SM-2 review state transitions.
//!
//! One quality observation moves a card's (easiness, repetition, interval)
//! triple to its next value. Pure and deterministic; the clock is always a
//! parameter.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Card, Quality, INITIAL_EASINESS, MIN_EASINESS};

/// Interval after the first successful recall, in days.
const FIRST_INTERVAL: i64 = 1;

/// Interval after the second consecutive successful recall, in days.
const SECOND_INTERVAL: i64 = 6;

/// Upper bound on computed intervals, about a century. Keeps the date
/// arithmetic in range; no realistic schedule gets anywhere near it.
const MAX_INTERVAL: i64 = 36_500;

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("invalid state: {0}")]
    InvalidState(String),
}

/// The memory-state triple the calculator consumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewState {
    pub easiness_factor: f64,
    pub repetition: i64,
    pub interval: i64,
}

impl Default for ReviewState {
    fn default() -> Self {
        Self {
            easiness_factor: INITIAL_EASINESS,
            repetition: 0,
            interval: 1,
        }
    }
}

impl ReviewState {
    pub fn from_card(card: &Card) -> Self {
        Self {
            easiness_factor: card.easiness_factor,
            repetition: card.repetition,
            interval: card.interval,
        }
    }

    fn validate(&self) -> Result<(), ReviewError> {
        if !self.easiness_factor.is_finite() {
            return Err(ReviewError::InvalidState(
                "easiness factor is not finite".to_string(),
            ));
        }
        if self.repetition < 0 {
            return Err(ReviewError::InvalidState(format!(
                "negative repetition: {}",
                self.repetition
            )));
        }
        if self.interval < 1 {
            return Err(ReviewError::InvalidState(format!(
                "interval below one day: {}",
                self.interval
            )));
        }
        Ok(())
    }
}

/// Result of one review: the next memory state plus the due date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub easiness_factor: f64,
    pub repetition: i64,
    pub interval: i64,
    pub next_review_date: DateTime<Utc>,
}

impl Schedule {
    pub fn state(&self) -> ReviewState {
        ReviewState {
            easiness_factor: self.easiness_factor,
            repetition: self.repetition,
            interval: self.interval,
        }
    }
}

/// Applies one SM-2 transition.
///
/// `state: None` treats the card as brand new (EF 2.5, repetition 0,
/// interval 1), the safe default for missing memory state. A successful
/// mature recall multiplies the interval by the easiness factor as it stood
/// *before* this review's adjustment; any failure resets to (repetition 0,
/// interval 1). The easiness update itself runs on every review:
///
/// `EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))`
///
/// clamped to >= 1.3 and rounded to two decimals.
pub fn calculate_next(
    state: Option<ReviewState>,
    quality: Quality,
    now: DateTime<Utc>,
) -> Result<Schedule, ReviewError> {
    let state = state.unwrap_or_default();
    state.validate()?;

    let (interval, repetition) = if quality.is_passing() {
        let interval = match state.repetition {
            0 => FIRST_INTERVAL,
            1 => SECOND_INTERVAL,
            _ => (state.interval as f64 * state.easiness_factor).round() as i64,
        };
        (interval.min(MAX_INTERVAL), state.repetition + 1)
    } else {
        (FIRST_INTERVAL, 0)
    };

    let q = quality.value() as f64;
    let easiness = state.easiness_factor + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02));
    let easiness = round2(easiness.max(MIN_EASINESS));

    Ok(Schedule {
        easiness_factor: easiness,
        repetition,
        interval,
        next_review_date: now + Duration::days(interval),
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A card is due once its scheduled date has passed.
pub fn is_due(card: &Card, now: DateTime<Utc>) -> bool {
    now >= card.next_review_date
}

/// Lifetime share of correct recalls, 0..=1. Zero for an unreviewed card.
pub fn retention_rate(card: &Card) -> f64 {
    if card.total_reviews <= 0 {
        return 0.0;
    }
    card.correct_reviews as f64 / card.total_reviews as f64
}

/// Folds a graded review into a card: new schedule plus the lifetime
/// counters. `average_quality` is a running mean over all submitted
/// qualities.
pub fn apply_review(
    card: &Card,
    quality: Quality,
    now: DateTime<Utc>,
) -> Result<Card, ReviewError> {
    let schedule = calculate_next(Some(ReviewState::from_card(card)), quality, now)?;
    let total = card.total_reviews + 1;

    let mut updated = card.clone();
    updated.easiness_factor = schedule.easiness_factor;
    updated.repetition = schedule.repetition;
    updated.interval = schedule.interval;
    updated.next_review_date = schedule.next_review_date;
    updated.total_reviews = total;
    if quality.is_passing() {
        updated.correct_reviews += 1;
    }
    updated.average_quality =
        (card.average_quality * card.total_reviews as f64 + quality.value() as f64) / total as f64;
    Ok(updated)
}

/// Forecasts the next `n` due dates assuming every upcoming review scores
/// quality 4. Planning input only; scheduling decisions never consume this.
pub fn predict_review_dates(card: &Card, n: usize) -> Vec<DateTime<Utc>> {
    let mut state = ReviewState::from_card(card);
    let mut date = card.next_review_date;
    let mut dates = Vec::with_capacity(n);
    for _ in 0..n {
        // Quality 4 leaves the easiness factor unchanged, so the simulation
        // only compounds the interval.
        let Ok(schedule) = calculate_next(Some(state), Quality::new(4.0), date) else {
            break;
        };
        state = schedule.state();
        date = schedule.next_review_date;
        dates.push(date);
    }
    dates
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    fn state(ef: f64, rep: i64, interval: i64) -> Option<ReviewState> {
        Some(ReviewState {
            easiness_factor: ef,
            repetition: rep,
            interval,
        })
    }

    #[test]
    fn test_new_card_perfect_recall() {
        let s = calculate_next(state(2.5, 0, 1), Quality::new(5.0), now()).unwrap();
        assert_eq!(s.easiness_factor, 2.6);
        assert_eq!(s.repetition, 1);
        assert_eq!(s.interval, 1);
        assert_eq!(s.next_review_date, now() + Duration::days(1));
    }

    #[test]
    fn test_new_card_good_recall_keeps_easiness() {
        let s = calculate_next(state(2.5, 0, 1), Quality::new(4.0), now()).unwrap();
        assert_eq!(s.easiness_factor, 2.5);
        assert_eq!(s.repetition, 1);
        assert_eq!(s.interval, 1);
    }

    #[test]
    fn test_borderline_pass() {
        let s = calculate_next(state(2.5, 0, 1), Quality::new(3.0), now()).unwrap();
        assert_eq!(s.easiness_factor, 2.36);
        assert_eq!(s.repetition, 1);
        assert_eq!(s.interval, 1);
    }

    #[test]
    fn test_failure_resets() {
        let s = calculate_next(state(2.5, 3, 20), Quality::new(0.0), now()).unwrap();
        assert_eq!(s.easiness_factor, 1.7);
        assert_eq!(s.repetition, 0);
        assert_eq!(s.interval, 1);
    }

    #[test]
    fn test_mature_card_success_uses_pre_update_easiness() {
        let s = calculate_next(state(2.0, 2, 10), Quality::new(4.0), now()).unwrap();
        assert_eq!(s.interval, 20);
        assert_eq!(s.repetition, 3);
        assert_eq!(s.easiness_factor, 2.0);
    }

    #[test]
    fn test_second_success_jumps_to_six_days() {
        let s = calculate_next(state(2.5, 1, 1), Quality::new(4.0), now()).unwrap();
        assert_eq!(s.interval, 6);
        assert_eq!(s.repetition, 2);
    }

    #[test]
    fn test_missing_state_treated_as_fresh() {
        let s = calculate_next(None, Quality::new(4.0), now()).unwrap();
        assert_eq!(s.easiness_factor, 2.5);
        assert_eq!(s.repetition, 1);
        assert_eq!(s.interval, 1);
    }

    #[test]
    fn test_easiness_floor_holds_under_repeated_failure() {
        let mut current = state(2.5, 5, 30);
        for _ in 0..10 {
            let s = calculate_next(current, Quality::new(0.0), now()).unwrap();
            assert!(s.easiness_factor >= MIN_EASINESS);
            current = Some(s.state());
        }
        assert_eq!(current.unwrap().easiness_factor, MIN_EASINESS);
    }

    #[test]
    fn test_invalid_interval_rejected() {
        let err = calculate_next(state(2.5, 0, 0), Quality::new(4.0), now()).unwrap_err();
        assert!(err.to_string().contains("invalid state"));

        let err = calculate_next(state(2.5, 0, -4), Quality::new(4.0), now()).unwrap_err();
        assert!(err.to_string().contains("interval"));
    }

    #[test]
    fn test_non_finite_easiness_rejected() {
        let err = calculate_next(state(f64::NAN, 0, 1), Quality::new(4.0), now()).unwrap_err();
        assert!(err.to_string().contains("easiness"));
    }

    #[test]
    fn test_interval_ceiling() {
        let s = calculate_next(state(2.5, 10, 30_000), Quality::new(5.0), now()).unwrap();
        assert_eq!(s.interval, MAX_INTERVAL);
    }

    #[test]
    fn test_is_due_boundary() {
        let card = Card::new("c1", now());
        assert!(is_due(&card, now()));
        assert!(is_due(&card, now() + Duration::seconds(1)));
        assert!(!is_due(&card, now() - Duration::seconds(1)));
    }

    #[test]
    fn test_retention_rate_zero_reviews() {
        let card = Card::new("c1", now());
        assert_eq!(retention_rate(&card), 0.0);
    }

    #[test]
    fn test_retention_rate() {
        let mut card = Card::new("c1", now());
        card.total_reviews = 8;
        card.correct_reviews = 6;
        assert_eq!(retention_rate(&card), 0.75);
    }

    #[test]
    fn test_apply_review_updates_counters() {
        let card = Card::new("c1", now());
        let card = apply_review(&card, Quality::new(4.0), now()).unwrap();
        assert_eq!(card.total_reviews, 1);
        assert_eq!(card.correct_reviews, 1);
        assert_eq!(card.average_quality, 4.0);
        assert_eq!(card.repetition, 1);

        let card = apply_review(&card, Quality::new(2.0), card.next_review_date).unwrap();
        assert_eq!(card.total_reviews, 2);
        assert_eq!(card.correct_reviews, 1);
        assert_eq!(card.average_quality, 3.0);
        assert_eq!(card.repetition, 0);
        assert_eq!(card.interval, 1);
    }

    #[test]
    fn test_predict_review_dates_compound() {
        let mut card = Card::new("c1", now());
        card.easiness_factor = 2.0;
        card.repetition = 2;
        card.interval = 10;
        card.next_review_date = now();

        let dates = predict_review_dates(&card, 3);
        assert_eq!(dates.len(), 3);
        // 10 * 2.0 = 20 days, then 20 * 2.0 = 40, then 40 * 2.0 = 80.
        assert_eq!(dates[0], now() + Duration::days(20));
        assert_eq!(dates[1], dates[0] + Duration::days(40));
        assert_eq!(dates[2], dates[1] + Duration::days(80));
    }

    #[test]
    fn test_predict_review_dates_fresh_card() {
        let card = Card::new("c1", now());
        let dates = predict_review_dates(&card, 2);
        // First simulated success: 1 day; second: 6 days.
        assert_eq!(dates[0], now() + Duration::days(1));
        assert_eq!(dates[1], dates[0] + Duration::days(6));
    }
}
