//! Storage seam for durable learner records.
//!
//! The engine only needs get/put semantics over two document kinds per
//! learner: lesson progress and the daily streak. [`ProgressStore`] is
//! the async trait concrete backends implement; [`MemoryStore`] is the
//! in-process implementation used by tests and demos, and
//! [`crate::persist::FileStore`] is the file-backed one.

use crate::progress::{LessonProgress, ProgressKey, StreakRecord};
use crate::session::Track;
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Durable storage for learner progress and streak documents.
///
/// Calls are modeled as potentially slow remote I/O and may fail; no
/// transaction spans the progress and streak documents. Each learner's
/// records are only written by that learner's own active session, so the
/// store does no locking. Simultaneous play on two devices is
/// last-writer-wins.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn load_progress(
        &self,
        learner_id: &str,
        key: &ProgressKey,
    ) -> Result<Option<LessonProgress>, StoreError>;

    async fn save_progress(
        &self,
        learner_id: &str,
        key: &ProgressKey,
        progress: &LessonProgress,
    ) -> Result<(), StoreError>;

    /// Every lesson record for one track and level, for unlock checks and
    /// track summaries.
    async fn load_level_progress(
        &self,
        learner_id: &str,
        track: Track,
        level: u32,
    ) -> Result<Vec<LessonProgress>, StoreError>;

    async fn load_streak(&self, learner_id: &str) -> Result<Option<StreakRecord>, StoreError>;

    async fn save_streak(
        &self,
        learner_id: &str,
        streak: &StreakRecord,
    ) -> Result<(), StoreError>;
}

/// In-memory store backed by hash maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    progress: Mutex<HashMap<(String, ProgressKey), LessonProgress>>,
    streaks: Mutex<HashMap<String, StreakRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn load_progress(
        &self,
        learner_id: &str,
        key: &ProgressKey,
    ) -> Result<Option<LessonProgress>, StoreError> {
        let progress = self.progress.lock().await;
        Ok(progress.get(&(learner_id.to_string(), *key)).cloned())
    }

    async fn save_progress(
        &self,
        learner_id: &str,
        key: &ProgressKey,
        record: &LessonProgress,
    ) -> Result<(), StoreError> {
        let mut progress = self.progress.lock().await;
        progress.insert((learner_id.to_string(), *key), record.clone());
        Ok(())
    }

    async fn load_level_progress(
        &self,
        learner_id: &str,
        track: Track,
        level: u32,
    ) -> Result<Vec<LessonProgress>, StoreError> {
        let progress = self.progress.lock().await;
        let mut records: Vec<LessonProgress> = progress
            .iter()
            .filter(|((owner, key), _)| {
                owner == learner_id && key.track == track && key.level == level
            })
            .map(|(_, record)| record.clone())
            .collect();
        records.sort_by_key(|record| record.lesson);
        Ok(records)
    }

    async fn load_streak(&self, learner_id: &str) -> Result<Option<StreakRecord>, StoreError> {
        let streaks = self.streaks.lock().await;
        Ok(streaks.get(learner_id).cloned())
    }

    async fn save_streak(
        &self,
        learner_id: &str,
        streak: &StreakRecord,
    ) -> Result<(), StoreError> {
        let mut streaks = self.streaks.lock().await;
        streaks.insert(learner_id.to_string(), streak.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::merge_progress;
    use crate::session::ScoringResult;
    use chrono::Utc;

    fn sample_record(lesson: u32) -> LessonProgress {
        let results = ScoringResult {
            total_questions: 10,
            correct_count: 9,
            incorrect_count: 1,
            percentage: 90.0,
            stars: 3,
            time_spent_ms: 20_000,
            passed: true,
        };
        merge_progress(
            None,
            ProgressKey::new(Track::Reading, 1, lesson),
            &results,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_progress_round_trip() {
        let store = MemoryStore::new();
        let record = sample_record(1);
        let key = record.key();

        assert!(store.load_progress("kid-1", &key).await.unwrap().is_none());
        store.save_progress("kid-1", &key, &record).await.unwrap();

        let loaded = store.load_progress("kid-1", &key).await.unwrap().unwrap();
        assert_eq!(loaded, record);

        // Scoped per learner.
        assert!(store.load_progress("kid-2", &key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_level_progress_is_sorted_by_lesson() {
        let store = MemoryStore::new();
        for lesson in [3, 1, 2] {
            let record = sample_record(lesson);
            store
                .save_progress("kid-1", &record.key(), &record)
                .await
                .unwrap();
        }

        let records = store
            .load_level_progress("kid-1", Track::Reading, 1)
            .await
            .unwrap();
        let lessons: Vec<u32> = records.iter().map(|r| r.lesson).collect();
        assert_eq!(lessons, vec![1, 2, 3]);

        let other_track = store
            .load_level_progress("kid-1", Track::Speaking, 1)
            .await
            .unwrap();
        assert!(other_track.is_empty());
    }
}
