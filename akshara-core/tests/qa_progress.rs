//! QA tests for durable progress: best-score merges, streaks, lesson
//! unlocking, and the best-effort split between the two writes.

use akshara_core::testing::{answer_with_score, tiered_catalog};
use akshara_core::{
    generate_questions_with_rng, is_lesson_unlocked, record_completion, unlocked_lessons,
    update_streak, FileStore, GameSession, HeadlessLesson, LessonConfig, LessonError,
    LetterCatalog, LevelConfig, MemoryStore, ProgressKey, ProgressStore, QuestionOptions,
    StarThresholds, StoreError, Track,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

/// Build and complete a 10-question session with the given correct count.
fn completed_session(lesson: u32, correct: usize, seed: u64) -> GameSession {
    let catalog = tiered_catalog(12);
    let mut rng = StdRng::seed_from_u64(seed);
    let questions =
        generate_questions_with_rng(catalog.all(), 10, &QuestionOptions::default(), &mut rng);

    let mut session = GameSession::new("kid-1", Track::Reading, 1, lesson, questions);
    answer_with_score(&mut session, correct);
    session.complete(&StarThresholds::default()).unwrap();
    session
}

#[tokio::test]
async fn qa_best_score_wins_across_attempts() {
    let store = MemoryStore::new();

    // 6/10 -> 1 star, 9/10 -> 3 stars, 8/10 -> 2 stars.
    let first = record_completion(&store, &completed_session(1, 6, 1))
        .await
        .unwrap();
    assert_eq!(first.stars, 1);
    assert_eq!(first.attempts, 1);

    let second = record_completion(&store, &completed_session(1, 9, 2))
        .await
        .unwrap();
    assert_eq!(second.stars, 3);
    assert_eq!(second.attempts, 2);

    let third = record_completion(&store, &completed_session(1, 8, 3))
        .await
        .unwrap();
    assert_eq!(third.stars, 3, "worse attempt must not regress the best");
    assert_eq!(third.correct_count, 9);
    assert_eq!(third.attempts, 3);
    assert!(third.completed);
}

#[tokio::test]
async fn qa_incomplete_session_cannot_be_recorded() {
    let store = MemoryStore::new();
    let catalog = tiered_catalog(6);
    let mut rng = StdRng::seed_from_u64(5);
    let questions =
        generate_questions_with_rng(catalog.all(), 5, &QuestionOptions::default(), &mut rng);
    let session = GameSession::new("kid-1", Track::Reading, 1, 1, questions);

    let err = record_completion(&store, &session).await.unwrap_err();
    assert!(matches!(
        err,
        akshara_core::ProgressError::SessionNotCompleted
    ));
}

#[tokio::test]
async fn qa_streak_update_is_idempotent_per_day() {
    let store = MemoryStore::new();
    let today = date("2025-03-10");

    let first = update_streak(&store, "kid-1", today).await.unwrap();
    let second = update_streak(&store, "kid-1", today).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(second.current_streak, 1);
    assert_eq!(second.total_days_active, 1);
}

#[tokio::test]
async fn qa_streak_grows_then_resets_on_gap() {
    let store = MemoryStore::new();

    for day in ["2025-03-10", "2025-03-11", "2025-03-12"] {
        update_streak(&store, "kid-1", date(day)).await.unwrap();
    }
    let streak = store.load_streak("kid-1").await.unwrap().unwrap();
    assert_eq!(streak.current_streak, 3);

    let after_gap = update_streak(&store, "kid-1", date("2025-03-17"))
        .await
        .unwrap();
    assert_eq!(after_gap.current_streak, 1);
    assert_eq!(after_gap.longest_streak, 3);
    assert_eq!(after_gap.total_days_active, 4);
}

#[tokio::test]
async fn qa_unlock_gating() {
    assert!(is_lesson_unlocked(&[], 1));
    assert!(!is_lesson_unlocked(&[], 2));

    let store = MemoryStore::new();
    record_completion(&store, &completed_session(1, 6, 7))
        .await
        .unwrap();

    let progress = store
        .load_level_progress("kid-1", Track::Reading, 1)
        .await
        .unwrap();
    assert!(is_lesson_unlocked(&progress, 2));
    assert!(!is_lesson_unlocked(&progress, 3));
}

// ============================================================================
// Best-effort streak write
// ============================================================================

/// Store whose streak writes always fail; progress writes succeed.
struct BrokenStreakStore {
    inner: MemoryStore,
}

#[async_trait]
impl ProgressStore for BrokenStreakStore {
    async fn load_progress(
        &self,
        learner_id: &str,
        key: &ProgressKey,
    ) -> Result<Option<akshara_core::LessonProgress>, StoreError> {
        self.inner.load_progress(learner_id, key).await
    }

    async fn save_progress(
        &self,
        learner_id: &str,
        key: &ProgressKey,
        record: &akshara_core::LessonProgress,
    ) -> Result<(), StoreError> {
        self.inner.save_progress(learner_id, key, record).await
    }

    async fn load_level_progress(
        &self,
        learner_id: &str,
        track: Track,
        level: u32,
    ) -> Result<Vec<akshara_core::LessonProgress>, StoreError> {
        self.inner.load_level_progress(learner_id, track, level).await
    }

    async fn load_streak(
        &self,
        learner_id: &str,
    ) -> Result<Option<akshara_core::StreakRecord>, StoreError> {
        self.inner.load_streak(learner_id).await
    }

    async fn save_streak(
        &self,
        _learner_id: &str,
        _streak: &akshara_core::StreakRecord,
    ) -> Result<(), StoreError> {
        Err(StoreError::Backend("streak write refused".to_string()))
    }
}

#[tokio::test]
async fn qa_streak_failure_does_not_block_progress_write() {
    let store = BrokenStreakStore {
        inner: MemoryStore::new(),
    };

    let progress = record_completion(&store, &completed_session(1, 9, 9))
        .await
        .expect("progress write must survive a streak failure");
    assert_eq!(progress.stars, 3);

    let saved = store
        .load_progress("kid-1", &ProgressKey::new(Track::Reading, 1, 1))
        .await
        .unwrap();
    assert!(saved.is_some());
    assert!(store.load_streak("kid-1").await.unwrap().is_none());
}

// ============================================================================
// Failure surfacing and retry from the shell
// ============================================================================

/// Store that refuses every write.
struct ReadOnlyStore;

#[async_trait]
impl ProgressStore for ReadOnlyStore {
    async fn load_progress(
        &self,
        _learner_id: &str,
        _key: &ProgressKey,
    ) -> Result<Option<akshara_core::LessonProgress>, StoreError> {
        Ok(None)
    }

    async fn save_progress(
        &self,
        _learner_id: &str,
        _key: &ProgressKey,
        _record: &akshara_core::LessonProgress,
    ) -> Result<(), StoreError> {
        Err(StoreError::Backend("store offline".to_string()))
    }

    async fn load_level_progress(
        &self,
        _learner_id: &str,
        _track: Track,
        _level: u32,
    ) -> Result<Vec<akshara_core::LessonProgress>, StoreError> {
        Ok(Vec::new())
    }

    async fn load_streak(
        &self,
        _learner_id: &str,
    ) -> Result<Option<akshara_core::StreakRecord>, StoreError> {
        Ok(None)
    }

    async fn save_streak(
        &self,
        _learner_id: &str,
        _streak: &akshara_core::StreakRecord,
    ) -> Result<(), StoreError> {
        Err(StoreError::Backend("store offline".to_string()))
    }
}

#[tokio::test]
async fn qa_finish_failure_keeps_results_for_retry() {
    let catalog = LetterCatalog::telugu();
    let mut lesson = HeadlessLesson::new(LessonConfig::new("kid-1", 1), &catalog);
    while let Some(question) = lesson.current_question().cloned() {
        lesson.answer(&question.correct_answer).unwrap();
    }

    // First finish hits a dead store; the attempt's results survive.
    let err = lesson.finish(&ReadOnlyStore).await.unwrap_err();
    assert!(matches!(err, LessonError::Progress(_)));
    assert!(lesson.session().is_completed());
    let results = lesson.session().results().cloned().unwrap();

    // Retry against a working store succeeds without replaying the quiz.
    let store = MemoryStore::new();
    let outcome = lesson.finish(&store).await.unwrap();
    assert_eq!(outcome.results, results);
    assert_eq!(outcome.progress.attempts, 1);
}

// ============================================================================
// File-backed store
// ============================================================================

#[tokio::test]
async fn qa_file_store_persists_across_instances() {
    let temp = TempDir::new().expect("create temp dir");
    let level = LevelConfig::letter_recognition();

    {
        let store = FileStore::new(temp.path());
        record_completion(&store, &completed_session(1, 9, 21))
            .await
            .unwrap();
    }

    // A fresh store over the same directory sees the records.
    let reopened = FileStore::new(temp.path());
    let unlocked = unlocked_lessons(&reopened, "kid-1", &level).await.unwrap();
    assert_eq!(unlocked, vec![1, 2]);

    let streak = reopened.load_streak("kid-1").await.unwrap().unwrap();
    assert_eq!(streak.current_streak, 1);
    assert_eq!(streak.total_days_active, 1);
}
