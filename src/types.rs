//! Shared data model.
//!
//! Everything here is plain data: the engine computes new values and returns
//! them, persistence belongs to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Easiness factor assigned to a brand-new card.
pub const INITIAL_EASINESS: f64 = 2.5;

/// Floor the easiness factor can never cross.
pub const MIN_EASINESS: f64 = 1.3;

/// Quality rating at which a recall counts as successful.
pub const PASSING_QUALITY: u8 = 3;

/// Highest quality rating a caller can submit.
pub const MAX_QUALITY: u8 = 5;

// ==================== Quality ====================

/// Caller-supplied recall rating, bounded to 0..=5.
///
/// The constructor corrects out-of-range input instead of rejecting it:
/// surfacing a validation error in the middle of a review is worse than a
/// best-effort fix, so raw values are rounded to the nearest integer and
/// clamped into range. Non-finite input collapses to 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quality(u8);

impl Quality {
    pub fn new(raw: f64) -> Self {
        if !raw.is_finite() {
            return Self(0);
        }
        Self(raw.round().clamp(0.0, MAX_QUALITY as f64) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Whether this rating counts as a successful recall.
    pub fn is_passing(self) -> bool {
        self.0 >= PASSING_QUALITY
    }
}

impl From<u8> for Quality {
    fn from(value: u8) -> Self {
        Self(value.min(MAX_QUALITY))
    }
}

// ==================== Card ====================

/// One piece of memorized content together with its scheduling state.
///
/// Owned by the external repository; the engine only reads and rewrites
/// these fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub easiness_factor: f64,
    pub repetition: i64,
    /// Days until the next scheduled review.
    pub interval: i64,
    pub next_review_date: DateTime<Utc>,
    pub total_reviews: i64,
    pub correct_reviews: i64,
    /// Running mean of submitted qualities, 0..=5.
    pub average_quality: f64,
}

impl Card {
    /// A fresh card is due immediately with the default memory state.
    pub fn new(id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            easiness_factor: INITIAL_EASINESS,
            repetition: 0,
            interval: 1,
            next_review_date: now,
            total_reviews: 0,
            correct_reviews: 0,
            average_quality: 0.0,
        }
    }
}

/// One submitted review, the ephemeral input the engine folds into a card
/// and a session. Not persisted by the engine itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardReview {
    pub card_id: String,
    pub quality: Quality,
    pub review_date: DateTime<Utc>,
    pub response_time_ms: Option<i64>,
}

// ==================== Difficulty ====================

/// Subjective difficulty bucket derived from the easiness factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DifficultyLevel {
    VeryEasy,
    Easy,
    Normal,
    Hard,
    VeryHard,
}

impl DifficultyLevel {
    pub fn from_easiness(easiness_factor: f64) -> Self {
        if easiness_factor >= 2.8 {
            Self::VeryEasy
        } else if easiness_factor >= 2.5 {
            Self::Easy
        } else if easiness_factor >= 2.2 {
            Self::Normal
        } else if easiness_factor >= 1.8 {
            Self::Hard
        } else {
            Self::VeryHard
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryEasy => "very-easy",
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
            Self::VeryHard => "very-hard",
        }
    }
}

// ==================== Sessions ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum SessionType {
    Review,
    New,
    #[default]
    Mixed,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Review => "review",
            Self::New => "new",
            Self::Mixed => "mixed",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "review" => Self::Review,
            "new" => Self::New,
            _ => Self::Mixed,
        }
    }
}

/// One sitting of sequential reviews. Created at start, updated once per
/// review, closed exactly once; immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: String,
    pub user_id: String,
    pub deck_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub cards_studied: i64,
    pub cards_correct: i64,
    /// Running mean response time in milliseconds.
    pub average_response_time: f64,
    pub session_type: SessionType,
    pub completed: bool,
}

// ==================== Grades ====================

/// Letter grade for a finished session, from accuracy percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_accuracy(accuracy_percent: f64) -> Self {
        if accuracy_percent >= 90.0 {
            Self::A
        } else if accuracy_percent >= 80.0 {
            Self::B
        } else if accuracy_percent >= 70.0 {
            Self::C
        } else if accuracy_percent >= 60.0 {
            Self::D
        } else {
            Self::F
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

// ==================== Aggregate stats ====================

/// Long-lived per-user statistics, folded forward after each completed
/// session. Reset only by explicit external action (e.g. a new week zeroes
/// `weekly_progress`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyStats {
    pub total_cards: i64,
    pub cards_learned: i64,
    pub cards_mastered: i64,
    pub current_streak: i64,
    pub longest_streak: i64,
    /// Lifetime study time in minutes.
    pub total_study_time: f64,
    /// Lifetime accuracy percent, 0..=100.
    pub average_accuracy: f64,
    pub last_study_date: Option<DateTime<Utc>>,
    pub weekly_goal: i64,
    pub weekly_progress: i64,
}

impl StudyStats {
    pub fn new(weekly_goal: i64) -> Self {
        Self {
            weekly_goal,
            ..Self::default()
        }
    }
}

// ==================== Tests ====================
