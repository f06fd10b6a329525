//! Telugu letter-learning game engine.
//!
//! This crate provides:
//! - The Telugu letter catalog with difficulty tiers
//! - Quiz generation with similarity-weighted distractors
//! - A session state machine with star-rating scoring
//! - Best-score-wins progress records, lesson unlocking, and daily streaks
//! - Pluggable storage with in-memory and file-backed implementations
//!
//! # Quick Start
//!
//! ```ignore
//! use akshara_core::{HeadlessLesson, LessonConfig, LetterCatalog, MemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = LetterCatalog::telugu();
//!     let store = MemoryStore::new();
//!
//!     let mut lesson = HeadlessLesson::new(LessonConfig::new("kid-1", 1), &catalog);
//!     while let Some(question) = lesson.current_question().cloned() {
//!         // show question.glyph, collect a tap on one of question.options
//!         lesson.answer(&question.options[0])?;
//!     }
//!
//!     let outcome = lesson.finish(&store).await?;
//!     println!("{} stars, {}%", outcome.results.stars, outcome.results.percentage);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod headless;
pub mod persist;
pub mod progress;
pub mod question;
pub mod session;
pub mod store;
pub mod testing;

// Primary public API
pub use catalog::{LetterCatalog, LetterCategory, LetterEntry, LevelConfig};
pub use headless::{unlocked_lessons, HeadlessLesson, LessonConfig, LessonError, LessonOutcome};
pub use persist::FileStore;
pub use progress::{
    advance_streak, is_lesson_unlocked, merge_progress, record_completion, track_summary,
    update_streak, LessonProgress, ProgressError, ProgressKey, StreakRecord, TrackSummary,
};
pub use question::{
    generate_options, generate_questions, generate_questions_with_rng, Question, QuestionOptions,
};
pub use session::{
    calculate_stars, AnswerRecord, GameError, GameSession, ScoringResult, StarThresholds, Track,
};
pub use store::{MemoryStore, ProgressStore, StoreError};
