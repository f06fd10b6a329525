//! Headless lesson runner for shells and tests.
//!
//! [`HeadlessLesson`] owns one [`GameSession`] for its whole lifetime and
//! drives the full loop programmatically: generate questions, collect
//! answers, score, and record progress. UI shells consume this instead of
//! touching the session directly.
//!
//! # Example
//!
//! ```ignore
//! use akshara_core::catalog::LetterCatalog;
//! use akshara_core::headless::{HeadlessLesson, LessonConfig};
//! use akshara_core::store::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = LetterCatalog::telugu();
//!     let store = MemoryStore::new();
//!
//!     let mut lesson = HeadlessLesson::new(LessonConfig::new("kid-1", 1), &catalog);
//!     while let Some(question) = lesson.current_question().cloned() {
//!         lesson.answer(&question.options[0])?;
//!     }
//!
//!     let outcome = lesson.finish(&store).await?;
//!     println!("{} stars", outcome.results.stars);
//!     Ok(())
//! }
//! ```

use crate::catalog::{LetterCatalog, LevelConfig};
use crate::progress::{is_lesson_unlocked, record_completion, LessonProgress, ProgressError};
use crate::question::{generate_questions, Question, QuestionOptions};
use crate::session::{
    AnswerRecord, GameError, GameSession, ScoringResult, StarThresholds, Track,
};
use crate::store::{ProgressStore, StoreError};
use thiserror::Error;

/// Errors from driving a lesson end to end.
#[derive(Debug, Error)]
pub enum LessonError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Progress(#[from] ProgressError),
}

/// Configuration for one lesson run.
#[derive(Debug, Clone)]
pub struct LessonConfig {
    pub learner_id: String,
    pub lesson: u32,
    pub level: LevelConfig,
    pub question_options: QuestionOptions,
}

impl LessonConfig {
    /// Lesson config with the shipped level-1 structure and defaults.
    pub fn new(learner_id: impl Into<String>, lesson: u32) -> Self {
        Self {
            learner_id: learner_id.into(),
            lesson,
            level: LevelConfig::letter_recognition(),
            question_options: QuestionOptions::default(),
        }
    }

    pub fn with_level(mut self, level: LevelConfig) -> Self {
        self.level = level;
        self
    }

    pub fn with_question_options(mut self, options: QuestionOptions) -> Self {
        self.question_options = options;
        self
    }
}

/// Result of finishing a lesson: the attempt's score plus the merged
/// durable record it produced.
#[derive(Debug, Clone)]
pub struct LessonOutcome {
    pub results: ScoringResult,
    pub progress: LessonProgress,
}

/// A lesson attempt that can be driven programmatically.
pub struct HeadlessLesson {
    session: GameSession,
    thresholds: StarThresholds,
}

impl HeadlessLesson {
    /// Generate questions for the lesson's difficulty tier and start a
    /// session over them.
    pub fn new(config: LessonConfig, catalog: &LetterCatalog) -> Self {
        let tier = config.level.difficulty_for_lesson(config.lesson);
        let pool = catalog.by_difficulty(tier);
        let questions = generate_questions(
            &pool,
            config.level.questions_per_lesson,
            &config.question_options,
        );
        let session = GameSession::new(
            config.learner_id,
            Track::Reading,
            config.level.level,
            config.lesson,
            questions,
        );

        Self {
            session,
            thresholds: config.level.thresholds,
        }
    }

    /// The question awaiting an answer, or `None` when the quiz is done.
    pub fn current_question(&self) -> Option<&Question> {
        self.session.current_question()
    }

    /// (answered, total) for progress display.
    pub fn progress(&self) -> (usize, usize) {
        (
            self.session.current_index(),
            self.session.questions().len(),
        )
    }

    /// Submit the learner's selection for the current question.
    pub fn answer(&mut self, selected: &str) -> Result<AnswerRecord, GameError> {
        self.session.submit_answer(selected)
    }

    /// True once every question has been answered.
    pub fn is_finished(&self) -> bool {
        self.session.is_exhausted()
    }

    /// Score the attempt and record it durably.
    ///
    /// If the progress write fails the session keeps its in-memory
    /// results, so the caller can surface the failure and retry `finish`
    /// without replaying the quiz.
    pub async fn finish<S: ProgressStore + ?Sized>(
        &mut self,
        store: &S,
    ) -> Result<LessonOutcome, LessonError> {
        if !self.session.is_completed() {
            self.session.complete(&self.thresholds)?;
        }
        let progress = record_completion(store, &self.session).await?;
        let results = self
            .session
            .results()
            .cloned()
            .ok_or(ProgressError::SessionNotCompleted)?;

        Ok(LessonOutcome { results, progress })
    }

    /// The underlying session, for state queries.
    pub fn session(&self) -> &GameSession {
        &self.session
    }
}

/// Lessons currently available to the learner within a level.
pub async fn unlocked_lessons<S: ProgressStore + ?Sized>(
    store: &S,
    learner_id: &str,
    level: &LevelConfig,
) -> Result<Vec<u32>, StoreError> {
    let progress = store
        .load_level_progress(learner_id, Track::Reading, level.level)
        .await?;
    Ok((1..=level.total_lessons)
        .filter(|lesson| is_lesson_unlocked(&progress, *lesson))
        .collect())
}
