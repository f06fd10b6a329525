//! File-backed learner store.
//!
//! One versioned JSON document per learner holds every lesson record plus
//! the streak. Documents are small (tens of records), so each update
//! reads and rewrites the whole file.

use crate::progress::{LessonProgress, ProgressKey, StreakRecord};
use crate::session::Track;
use crate::store::{ProgressStore, StoreError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Current save file version.
const SAVE_VERSION: u32 = 1;

/// On-disk document for one learner.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SavedLearner {
    version: u32,
    learner_id: String,
    progress: Vec<LessonProgress>,
    streak: Option<StreakRecord>,
}

impl SavedLearner {
    fn empty(learner_id: &str) -> Self {
        Self {
            version: SAVE_VERSION,
            learner_id: learner_id.to_string(),
            progress: Vec::new(),
            streak: None,
        }
    }
}

/// A [`ProgressStore`] that keeps one JSON file per learner in a
/// directory. The directory is created on first write; a missing file
/// reads as an empty record set.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of a learner's save file. Non-alphanumeric id characters are
    /// replaced so arbitrary ids stay filesystem-safe.
    pub fn learner_path(&self, learner_id: &str) -> PathBuf {
        let sanitized: String = learner_id
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        self.dir.join(format!("{sanitized}.json"))
    }

    async fn load_document(&self, learner_id: &str) -> Result<SavedLearner, StoreError> {
        let path = self.learner_path(learner_id);
        if !path.exists() {
            return Ok(SavedLearner::empty(learner_id));
        }

        let content = fs::read_to_string(&path).await?;
        let saved: SavedLearner = serde_json::from_str(&content)?;

        if saved.version != SAVE_VERSION {
            return Err(StoreError::Backend(format!(
                "save version mismatch in {}: expected {SAVE_VERSION}, found {}",
                path.display(),
                saved.version
            )));
        }

        Ok(saved)
    }

    async fn save_document(&self, saved: &SavedLearner) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).await?;
        let content = serde_json::to_string_pretty(saved)?;
        fs::write(self.learner_path(&saved.learner_id), content).await?;
        Ok(())
    }
}

#[async_trait]
impl ProgressStore for FileStore {
    async fn load_progress(
        &self,
        learner_id: &str,
        key: &ProgressKey,
    ) -> Result<Option<LessonProgress>, StoreError> {
        let saved = self.load_document(learner_id).await?;
        Ok(saved
            .progress
            .into_iter()
            .find(|record| record.key() == *key))
    }

    async fn save_progress(
        &self,
        learner_id: &str,
        key: &ProgressKey,
        record: &LessonProgress,
    ) -> Result<(), StoreError> {
        let mut saved = self.load_document(learner_id).await?;
        match saved.progress.iter_mut().find(|r| r.key() == *key) {
            Some(existing) => *existing = record.clone(),
            None => saved.progress.push(record.clone()),
        }
        self.save_document(&saved).await
    }

    async fn load_level_progress(
        &self,
        learner_id: &str,
        track: Track,
        level: u32,
    ) -> Result<Vec<LessonProgress>, StoreError> {
        let saved = self.load_document(learner_id).await?;
        let mut records: Vec<LessonProgress> = saved
            .progress
            .into_iter()
            .filter(|record| record.track == track && record.level == level)
            .collect();
        records.sort_by_key(|record| record.lesson);
        Ok(records)
    }

    async fn load_streak(&self, learner_id: &str) -> Result<Option<StreakRecord>, StoreError> {
        let saved = self.load_document(learner_id).await?;
        Ok(saved.streak)
    }

    async fn save_streak(
        &self,
        learner_id: &str,
        streak: &StreakRecord,
    ) -> Result<(), StoreError> {
        let mut saved = self.load_document(learner_id).await?;
        saved.streak = Some(streak.clone());
        self.save_document(&saved).await
    }
}

/// List learner ids with a save file in the directory.
pub async fn list_learners(dir: impl AsRef<Path>) -> Result<Vec<String>, StoreError> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut learners = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            let content = fs::read_to_string(&path).await?;
            if let Ok(saved) = serde_json::from_str::<SavedLearner>(&content) {
                learners.push(saved.learner_id);
            }
        }
    }

    learners.sort();
    Ok(learners)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{advance_streak, merge_progress};
    use crate::session::ScoringResult;
    use chrono::Utc;
    use tempfile::TempDir;

    fn sample_record(lesson: u32, stars: u8) -> LessonProgress {
        let correct = usize::from(stars) * 3;
        let results = ScoringResult {
            total_questions: 10,
            correct_count: correct,
            incorrect_count: 10 - correct,
            percentage: correct as f64 * 10.0,
            stars,
            time_spent_ms: 15_000,
            passed: stars >= 1,
        };
        merge_progress(
            None,
            ProgressKey::new(Track::Reading, 1, lesson),
            &results,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_empty() {
        let temp = TempDir::new().expect("create temp dir");
        let store = FileStore::new(temp.path());

        let key = ProgressKey::new(Track::Reading, 1, 1);
        assert!(store.load_progress("kid-1", &key).await.unwrap().is_none());
        assert!(store.load_streak("kid-1").await.unwrap().is_none());
        assert!(store
            .load_level_progress("kid-1", Track::Reading, 1)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_progress_and_streak_round_trip() {
        let temp = TempDir::new().expect("create temp dir");
        let store = FileStore::new(temp.path().join("data"));

        let record = sample_record(1, 3);
        store
            .save_progress("kid-1", &record.key(), &record)
            .await
            .unwrap();

        let streak = advance_streak(None, "2025-03-10".parse().unwrap());
        store.save_streak("kid-1", &streak).await.unwrap();

        let loaded = store
            .load_progress("kid-1", &record.key())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded, record);
        assert_eq!(store.load_streak("kid-1").await.unwrap().unwrap(), streak);
    }

    #[tokio::test]
    async fn test_save_replaces_existing_lesson_record() {
        let temp = TempDir::new().expect("create temp dir");
        let store = FileStore::new(temp.path());

        let first = sample_record(2, 1);
        let improved = sample_record(2, 3);
        let key = first.key();

        store.save_progress("kid-1", &key, &first).await.unwrap();
        store.save_progress("kid-1", &key, &improved).await.unwrap();

        let records = store
            .load_level_progress("kid-1", Track::Reading, 1)
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].stars, 3);
    }

    #[tokio::test]
    async fn test_level_filter_and_order() {
        let temp = TempDir::new().expect("create temp dir");
        let store = FileStore::new(temp.path());

        for lesson in [3, 1, 2] {
            let record = sample_record(lesson, 2);
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
    }

    #[tokio::test]
    async fn test_version_mismatch_is_an_error() {
        let temp = TempDir::new().expect("create temp dir");
        let store = FileStore::new(temp.path());

        let path = store.learner_path("kid-1");
        std::fs::write(
            &path,
            r#"{"version": 99, "learner_id": "kid-1", "progress": [], "streak": null}"#,
        )
        .expect("write stale save");

        let err = store.load_streak("kid-1").await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[tokio::test]
    async fn test_learner_path_sanitization() {
        let store = FileStore::new("/data");
        let path = store.learner_path("kid/../../etc");
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert_eq!(name, "kid_______etc.json");
    }

    #[tokio::test]
    async fn test_list_learners() {
        let temp = TempDir::new().expect("create temp dir");
        let store = FileStore::new(temp.path());

        for learner in ["zoe", "ana"] {
            let record = sample_record(1, 1);
            store
                .save_progress(learner, &record.key(), &record)
                .await
                .unwrap();
        }

        let learners = list_learners(temp.path()).await.unwrap();
        assert_eq!(learners, vec!["ana", "zoe"]);
    }
}
