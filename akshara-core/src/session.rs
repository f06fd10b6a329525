//! Quiz session state machine and scoring.
//!
//! A [`GameSession`] tracks one attempt at a lesson: the fixed question
//! list, a cursor, and every recorded answer. Sessions follow an explicit
//! two-phase protocol: the caller submits answers until the question list
//! is exhausted, then invokes [`GameSession::complete`] as a separate step.
//! The engine never completes a session on its own, so "did the player
//! finish" stays a visible, testable decision in the caller.
//!
//! Sessions live in memory only. An abandoned session is simply dropped;
//! durable progress is written from the scoring results by
//! [`crate::progress::record_completion`].

use crate::question::Question;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Errors from session state transitions.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("answer submitted after all {total} questions were answered")]
    SessionExhausted { total: usize },

    #[error("cannot complete session: {answered} of {total} questions answered")]
    SessionIncomplete { answered: usize, total: usize },
}

/// Learning track a lesson belongs to. This engine drives the reading
/// track; the speaking track shares the same progress records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    Reading,
    Speaking,
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Track::Reading => write!(f, "reading"),
            Track::Speaking => write!(f, "speaking"),
        }
    }
}

/// Score fractions required for each star rating. Boundary-inclusive:
/// a score exactly at a threshold earns that rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StarThresholds {
    /// Fraction correct for three stars.
    pub three: f64,
    /// Fraction correct for two stars.
    pub two: f64,
    /// Fraction correct for one star (the passing bar).
    pub one: f64,
}

impl Default for StarThresholds {
    fn default() -> Self {
        Self {
            three: 0.90,
            two: 0.75,
            one: 0.60,
        }
    }
}

/// Compute the star rating for a finished attempt.
pub fn calculate_stars(correct: usize, total: usize, thresholds: &StarThresholds) -> u8 {
    if total == 0 {
        return 0;
    }
    let fraction = correct as f64 / total as f64;
    if fraction >= thresholds.three {
        3
    } else if fraction >= thresholds.two {
        2
    } else if fraction >= thresholds.one {
        1
    } else {
        0
    }
}

/// One submitted answer, with the correct answer copied from the question
/// at submit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: Uuid,
    pub selected_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
    pub answered_at: DateTime<Utc>,
}

/// Summary of a finished attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub total_questions: usize,
    pub correct_count: usize,
    pub incorrect_count: usize,
    /// Accuracy in percent, 0–100, rounded to one decimal place.
    pub percentage: f64,
    /// Star rating, 0–3.
    pub stars: u8,
    pub time_spent_ms: i64,
    /// True iff at least one star was earned.
    pub passed: bool,
}

/// One in-progress or completed lesson attempt.
///
/// Invariants held at all times:
/// - `answers.len() == current_index`
/// - `correct_count` equals the number of correct answers recorded
/// - `current_index <= questions.len()`
/// - `results` is present iff the session is completed
#[derive(Debug, Clone)]
pub struct GameSession {
    learner_id: String,
    track: Track,
    level: u32,
    lesson: u32,
    questions: Vec<Question>,
    current_index: usize,
    answers: Vec<AnswerRecord>,
    correct_count: usize,
    started_at: DateTime<Utc>,
    completed: bool,
    results: Option<ScoringResult>,
}

impl GameSession {
    /// Start a new attempt over the given questions.
    pub fn new(
        learner_id: impl Into<String>,
        track: Track,
        level: u32,
        lesson: u32,
        questions: Vec<Question>,
    ) -> Self {
        Self::new_at(learner_id, track, level, lesson, questions, Utc::now())
    }

    /// Start a new attempt with an explicit start time (useful for tests).
    pub fn new_at(
        learner_id: impl Into<String>,
        track: Track,
        level: u32,
        lesson: u32,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            learner_id: learner_id.into(),
            track,
            level,
            lesson,
            questions,
            current_index: 0,
            answers: Vec::new(),
            correct_count: 0,
            started_at,
            completed: false,
            results: None,
        }
    }

    /// Record an answer for the current question and advance the cursor.
    ///
    /// Correctness is exact string equality against the question's
    /// transliteration. Returns the recorded answer so the caller can
    /// show feedback.
    pub fn submit_answer(&mut self, selected: &str) -> Result<AnswerRecord, GameError> {
        self.submit_answer_at(selected, Utc::now())
    }

    /// Clock-explicit form of [`GameSession::submit_answer`].
    pub fn submit_answer_at(
        &mut self,
        selected: &str,
        at: DateTime<Utc>,
    ) -> Result<AnswerRecord, GameError> {
        let question =
            self.questions
                .get(self.current_index)
                .ok_or(GameError::SessionExhausted {
                    total: self.questions.len(),
                })?;

        let is_correct = selected == question.correct_answer;
        let record = AnswerRecord {
            question_id: question.id,
            selected_answer: selected.to_string(),
            correct_answer: question.correct_answer.clone(),
            is_correct,
            answered_at: at,
        };

        self.answers.push(record.clone());
        if is_correct {
            self.correct_count += 1;
        }
        self.current_index += 1;
        Ok(record)
    }

    /// Finalize the attempt and attach scoring results.
    ///
    /// Valid only once every question has been answered. Callers must call
    /// this exactly once per session: the only guard is the exhaustion
    /// check, and a second call would re-read the clock and overwrite the
    /// previous results.
    pub fn complete(&mut self, thresholds: &StarThresholds) -> Result<&ScoringResult, GameError> {
        self.complete_at(thresholds, Utc::now())
    }

    /// Clock-explicit form of [`GameSession::complete`].
    pub fn complete_at(
        &mut self,
        thresholds: &StarThresholds,
        now: DateTime<Utc>,
    ) -> Result<&ScoringResult, GameError> {
        if !self.is_exhausted() {
            return Err(GameError::SessionIncomplete {
                answered: self.current_index,
                total: self.questions.len(),
            });
        }

        let total = self.questions.len();
        let stars = calculate_stars(self.correct_count, total, thresholds);
        let percentage = if total == 0 {
            0.0
        } else {
            round_one_decimal(self.correct_count as f64 / total as f64 * 100.0)
        };

        let results = ScoringResult {
            total_questions: total,
            correct_count: self.correct_count,
            incorrect_count: total - self.correct_count,
            percentage,
            stars,
            time_spent_ms: (now - self.started_at).num_milliseconds().max(0),
            passed: stars >= 1,
        };

        self.completed = true;
        Ok(&*self.results.insert(results))
    }

    /// The question awaiting an answer, or `None` once exhausted.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// True once every question has been answered. The session still
    /// needs an explicit [`GameSession::complete`] call after this.
    pub fn is_exhausted(&self) -> bool {
        self.current_index == self.questions.len()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn results(&self) -> Option<&ScoringResult> {
        self.results.as_ref()
    }

    pub fn learner_id(&self) -> &str {
        &self.learner_id
    }

    pub fn track(&self) -> Track {
        self.track
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lesson(&self) -> u32 {
        self.lesson
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
