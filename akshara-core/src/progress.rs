//! Durable learner progress: per-lesson records, streaks, and unlock gating.
//!
//! The merge and streak policies are pure functions over explicit clock
//! inputs; [`record_completion`] is the orchestrating call that applies
//! them through a [`ProgressStore`]. The progress write is primary, the
//! streak update is best-effort: a streak failure is logged and swallowed
//! so it can never take down a progress write that already succeeded.
//! The two records are independent documents with no transaction across
//! them.

use crate::session::{GameSession, ScoringResult, Track};
use crate::store::{ProgressStore, StoreError};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors from recording a completed session.
#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("session has not been completed; nothing to record")]
    SessionNotCompleted,

    #[error("persistence error: {0}")]
    Persistence(#[from] StoreError),
}

/// Identity of one lesson's progress record: (track, level, lesson).
/// Progress is further scoped per learner by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgressKey {
    pub track: Track,
    pub level: u32,
    pub lesson: u32,
}

impl ProgressKey {
    pub fn new(track: Track, level: u32, lesson: u32) -> Self {
        Self {
            track,
            level,
            lesson,
        }
    }

    /// Stable document id, e.g. `reading_L1_lesson3`.
    pub fn document_id(&self) -> String {
        format!("{}_L{}_lesson{}", self.track, self.level, self.lesson)
    }
}

impl fmt::Display for ProgressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.document_id())
    }
}

/// Durable best-result record for one learner and lesson.
///
/// The score fields always describe the attempt with the highest star
/// rating ever recorded; they never regress on a worse later attempt.
/// `attempts` counts every completed session regardless of outcome, and
/// `completed` stays true once any attempt has passed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonProgress {
    pub track: Track,
    pub level: u32,
    pub lesson: u32,
    pub stars: u8,
    pub percentage: f64,
    pub correct_count: usize,
    pub total_questions: usize,
    pub time_spent_ms: i64,
    pub attempts: u32,
    pub completed: bool,
    pub first_played_at: DateTime<Utc>,
    pub last_played_at: DateTime<Utc>,
}

impl LessonProgress {
    pub fn key(&self) -> ProgressKey {
        ProgressKey::new(self.track, self.level, self.lesson)
    }
}

/// Daily activity streak for one learner. Calendar-day semantics: two
/// completions straddling local midnight count as two different days,
/// however close together in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRecord {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_active_date: NaiveDate,
    pub total_days_active: u32,
}

/// Merge a completed attempt into the existing lesson record.
///
/// Best-score-wins: score fields are overwritten only on a strict star
/// improvement; a tie keeps the earlier attempt's detail but still counts
/// the attempt and refreshes `last_played_at`.
pub fn merge_progress(
    existing: Option<&LessonProgress>,
    key: ProgressKey,
    results: &ScoringResult,
    now: DateTime<Utc>,
) -> LessonProgress {
    let Some(previous) = existing else {
        return LessonProgress {
            track: key.track,
            level: key.level,
            lesson: key.lesson,
            stars: results.stars,
            percentage: results.percentage,
            correct_count: results.correct_count,
            total_questions: results.total_questions,
            time_spent_ms: results.time_spent_ms,
            attempts: 1,
            completed: results.passed,
            first_played_at: now,
            last_played_at: now,
        };
    };

    let mut merged = previous.clone();
    merged.attempts += 1;
    merged.last_played_at = now;
    merged.completed = previous.completed || results.passed;

    if results.stars > previous.stars {
        merged.stars = results.stars;
        merged.percentage = results.percentage;
        merged.correct_count = results.correct_count;
        merged.total_questions = results.total_questions;
        merged.time_spent_ms = results.time_spent_ms;
    }

    merged
}

/// Advance a streak for activity on `today`.
///
/// At most one advance per calendar day: a second completion on the same
/// date returns the record unchanged.
pub fn advance_streak(existing: Option<&StreakRecord>, today: NaiveDate) -> StreakRecord {
    let Some(previous) = existing else {
        return StreakRecord {
            current_streak: 1,
            longest_streak: 1,
            last_active_date: today,
            total_days_active: 1,
        };
    };

    if previous.last_active_date == today {
        return previous.clone();
    }

    let current_streak = if previous.last_active_date.succ_opt() == Some(today) {
        previous.current_streak + 1
    } else {
        1
    };

    StreakRecord {
        current_streak,
        longest_streak: previous.longest_streak.max(current_streak),
        last_active_date: today,
        total_days_active: previous.total_days_active + 1,
    }
}

/// Whether a lesson is available to play. Lesson 1 is always open; any
/// later lesson needs the previous one completed with at least one star.
pub fn is_lesson_unlocked(progress: &[LessonProgress], lesson: u32) -> bool {
    if lesson == 1 {
        return true;
    }
    progress
        .iter()
        .find(|record| record.lesson == lesson - 1)
        // completed implies at least one star; both are checked anyway.
        .map(|record| record.completed && record.stars >= 1)
        .unwrap_or(false)
}

/// Aggregate progress across one track's lessons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSummary {
    pub completed_lessons: u32,
    pub total_lessons: u32,
    pub total_stars: u32,
    pub max_stars: u32,
    /// Completed lessons as a percent of the track, one decimal place.
    pub percentage: f64,
    pub is_complete: bool,
}

/// Summarize a learner's standing across a track.
pub fn track_summary(progress: &[LessonProgress], total_lessons: u32) -> TrackSummary {
    let completed_lessons = progress.iter().filter(|p| p.completed).count() as u32;
    let total_stars: u32 = progress.iter().map(|p| u32::from(p.stars)).sum();
    let percentage = if total_lessons == 0 {
        0.0
    } else {
        (f64::from(completed_lessons) / f64::from(total_lessons) * 1000.0).round() / 10.0
    };

    TrackSummary {
        completed_lessons,
        total_lessons,
        total_stars,
        max_stars: total_lessons * 3,
        percentage,
        is_complete: total_lessons > 0 && completed_lessons == total_lessons,
    }
}

/// Persist a completed session: merge it into the lesson's durable record,
/// then advance the daily streak.
///
/// The progress write failure propagates; a streak failure after a
/// successful progress write is logged and swallowed. Abandoned sessions
/// never reach this call, so partial quizzes leave no trace.
pub async fn record_completion<S: ProgressStore + ?Sized>(
    store: &S,
    session: &GameSession,
) -> Result<LessonProgress, ProgressError> {
    let results = session
        .results()
        .ok_or(ProgressError::SessionNotCompleted)?;
    let key = ProgressKey::new(session.track(), session.level(), session.lesson());
    let learner_id = session.learner_id();
    let now = Utc::now();

    let existing = store.load_progress(learner_id, &key).await?;
    let merged = merge_progress(existing.as_ref(), key, results, now);
    store.save_progress(learner_id, &key, &merged).await?;

    // Streak is best-effort and independent of the progress document.
    let today = Local::now().date_naive();
    if let Err(error) = update_streak(store, learner_id, today).await {
        tracing::warn!(learner_id, %error, "streak update failed after progress write");
    }

    Ok(merged)
}

/// Load, advance, and save the learner's streak for activity on `today`.
/// A same-day repeat is a no-op and writes nothing.
pub async fn update_streak<S: ProgressStore + ?Sized>(
    store: &S,
    learner_id: &str,
    today: NaiveDate,
) -> Result<StreakRecord, StoreError> {
    let existing = store.load_streak(learner_id).await?;
    let updated = advance_streak(existing.as_ref(), today);
    if existing.as_ref() != Some(&updated) {
        store.save_streak(learner_id, &updated).await?;
    }
    Ok(updated)
}
