//! # memora-algo - spaced repetition scheduling engine
//!
//! Pure Rust implementation of the scheduling core behind the Memora
//! flashcard products:
//!
//! - **Review calculator** - SM-2 state transitions per graded review
//! - **Scheduler** - due-queue selection, prioritization, session sizing,
//!   seven-day forecasting
//! - **Session manager** - study session lifecycle and grading
//! - **Progress aggregator** - streaks, running accuracy, weekly goals,
//!   performance reports
//!
//! Design goals:
//!
//! - **Pure** - every operation is a function of its explicit arguments;
//!   the clock is always a parameter and the crate holds no mutable state
//! - **Deterministic** - identical inputs produce identical schedules and
//!   queue orderings across runs and platforms
//! - **Storage-agnostic** - cards, sessions, and stats are plain data the
//!   caller persists however it likes
//!
//! ## Module structure
//!
//! - [`types`] - shared data model (cards, sessions, stats, quality)
//! - [`config`] - tunable thresholds with production defaults
//! - [`review`] - SM-2 transition and per-card derived queries
//! - [`scheduler`] - due sets, priority queue, session sizing, forecast
//! - [`session`] - session lifecycle and grading
//! - [`progress`] - long-lived statistics and reports
//!
//! ## Example
//!
//! ```rust
//! use chrono::Utc;
//! use memora_algo::{apply_review, due_cards, prioritize, Card, Quality};
//!
//! let now = Utc::now();
//! let card = Card::new("card-1", now);
//! let card = apply_review(&card, Quality::new(4.0), now).unwrap();
//! assert_eq!(card.repetition, 1);
//!
//! // Reviewed a moment ago, so nothing is due yet.
//! let queue = prioritize(&due_cards(&[card], now), now);
//! assert!(queue.is_empty());
//! ```

pub mod config;
pub mod progress;
pub mod review;
pub mod scheduler;
pub mod session;
pub mod types;

pub use config::{EngineConfig, ReportThresholds, SessionSizing};
pub use progress::{
    calculate_streak, daily_accuracy, generate_report, refresh_card_counts, update_stats,
    Achievement, DailyAccuracy, PerformanceReport, ProgressError, Recommendation,
};
pub use review::{
    apply_review, calculate_next, is_due, predict_review_dates, retention_rate, ReviewError,
    ReviewState, Schedule,
};
pub use scheduler::{due_cards, optimal_session_size, prioritize, weekly_plan, DailyForecast};
pub use session::{
    calculate_performance, end_session, record_review, start_session, FinalCounts, SessionError,
    SessionPerformance,
};
pub use types::{
    Card, CardReview, DifficultyLevel, Grade, Quality, SessionType, StudySession, StudyStats,
};
