//! Engine configuration.
//!
//! Tunable constants grouped by concern. Defaults are the production
//! values; callers that need different pacing construct a config and pass
//! it by reference into the operations that consume it.

use serde::{Deserialize, Serialize};

/// Session sizing parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSizing {
    /// Average seconds one card takes to answer.
    pub seconds_per_card: i64,
    /// Floor for one sitting.
    pub min_session_cards: i64,
    /// Ceiling for one sitting.
    pub max_session_cards: i64,
}

impl Default for SessionSizing {
    fn default() -> Self {
        Self {
            seconds_per_card: 30,
            min_session_cards: 10,
            max_session_cards: 50,
        }
    }
}

/// Thresholds feeding the report rule table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportThresholds {
    /// Below this lifetime accuracy percent, recommend re-reviewing.
    pub low_accuracy_percent: f64,
    /// At or above this lifetime accuracy percent, award the accuracy
    /// achievement.
    pub high_accuracy_percent: f64,
    pub streak_achievement_days: i64,
    pub long_streak_achievement_days: i64,
}

impl Default for ReportThresholds {
    fn default() -> Self {
        Self {
            low_accuracy_percent: 70.0,
            high_accuracy_percent: 90.0,
            streak_achievement_days: 7,
            long_streak_achievement_days: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    pub sizing: SessionSizing,
    pub report: ReportThresholds,
    /// Interval length, in days, at which a card counts as mastered.
    pub mastery_interval_days: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sizing: SessionSizing::default(),
            report: ReportThresholds::default(),
            mastery_interval_days: 21,
        }
    }
}
