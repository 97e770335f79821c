//! Study session lifecycle.
//!
//! NotStarted -> InProgress -> Completed. Each operation consumes the
//! session and returns the updated value; nothing here touches shared
//! state. An abandoned session is simply never completed and its counters
//! are discarded by the caller. Card state transitions are a separate
//! concern: the caller pairs each `record_review` with its own
//! `calculate_next`/`apply_review` call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Grade, SessionType, StudySession};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid state: {0}")]
    InvalidState(String),
}

/// Caller-supplied totals merged at session end, for clients that batch
/// their review submissions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalCounts {
    pub cards_studied: Option<i64>,
    pub cards_correct: Option<i64>,
    pub average_response_time: Option<f64>,
}

pub fn start_session(
    user_id: impl Into<String>,
    deck_id: impl Into<String>,
    session_type: SessionType,
    now: DateTime<Utc>,
) -> StudySession {
    let session = StudySession {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.into(),
        deck_id: deck_id.into(),
        start_time: now,
        end_time: None,
        cards_studied: 0,
        cards_correct: 0,
        average_response_time: 0.0,
        session_type,
        completed: false,
    };
    tracing::debug!(
        session_id = %session.id,
        session_type = session_type.as_str(),
        "study session started"
    );
    session
}

/// Folds one answered card into the session counters.
///
/// `is_correct` is the quality >= 3 judgment. The response-time running
/// mean divides by `cards_studied`, so reviews submitted without a time
/// pull nothing in but still widen the divisor on later updates.
pub fn record_review(
    mut session: StudySession,
    is_correct: bool,
    response_time_ms: Option<i64>,
) -> Result<StudySession, SessionError> {
    if session.completed {
        return Err(SessionError::InvalidState(format!(
            "session {} is already completed",
            session.id
        )));
    }
    session.cards_studied += 1;
    if is_correct {
        session.cards_correct += 1;
    }
    if let Some(rt) = response_time_ms {
        let n = session.cards_studied as f64;
        session.average_response_time =
            (session.average_response_time * (n - 1.0) + rt as f64) / n;
    }
    Ok(session)
}

/// Closes a session. Optional `final_counts` overwrite the running
/// counters, letting batching clients submit their totals at the end.
pub fn end_session(
    mut session: StudySession,
    final_counts: Option<FinalCounts>,
    now: DateTime<Utc>,
) -> Result<StudySession, SessionError> {
    if session.completed {
        return Err(SessionError::InvalidState(format!(
            "session {} is already completed",
            session.id
        )));
    }
    if now < session.start_time {
        return Err(SessionError::InvalidState(
            "end time precedes start time".to_string(),
        ));
    }
    if let Some(counts) = final_counts {
        if let Some(v) = counts.cards_studied {
            session.cards_studied = v;
        }
        if let Some(v) = counts.cards_correct {
            session.cards_correct = v;
        }
        if let Some(v) = counts.average_response_time {
            session.average_response_time = v;
        }
    }
    session.end_time = Some(now);
    session.completed = true;
    tracing::debug!(
        session_id = %session.id,
        cards_studied = session.cards_studied,
        cards_correct = session.cards_correct,
        "study session completed"
    );
    Ok(session)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPerformance {
    /// Accuracy percent, 0..=100.
    pub accuracy: f64,
    pub duration_minutes: f64,
    pub cards_per_minute: f64,
    pub grade: Grade,
}

/// Grades a finished session. Zero-card and zero-duration sessions produce
/// zeroes rather than dividing by zero; an open session is an error.
pub fn calculate_performance(session: &StudySession) -> Result<SessionPerformance, SessionError> {
    let Some(end_time) = session.end_time else {
        return Err(SessionError::InvalidState(format!(
            "session {} has not ended",
            session.id
        )));
    };

    let accuracy = if session.cards_studied > 0 {
        session.cards_correct as f64 / session.cards_studied as f64 * 100.0
    } else {
        0.0
    };
    let duration_minutes = (end_time - session.start_time).num_seconds() as f64 / 60.0;
    let cards_per_minute = if duration_minutes > 0.0 {
        session.cards_studied as f64 / duration_minutes
    } else {
        0.0
    };

    Ok(SessionPerformance {
        accuracy,
        duration_minutes,
        cards_per_minute,
        grade: Grade::from_accuracy(accuracy),
    })
}
