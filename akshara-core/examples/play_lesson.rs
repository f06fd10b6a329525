//! Scripted demo: play one lesson perfectly and print the outcome.
//!
//! Run with: `cargo run -p akshara-core --example play_lesson`

use akshara_core::{
    track_summary, unlocked_lessons, HeadlessLesson, LessonConfig, LetterCatalog, LevelConfig,
    MemoryStore, ProgressStore, Track,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = LetterCatalog::telugu();
    let store = MemoryStore::new();
    let level = LevelConfig::letter_recognition();

    let mut lesson = HeadlessLesson::new(LessonConfig::new("demo-kid", 1), &catalog);

    while let Some(question) = lesson.current_question().cloned() {
        let (answered, total) = lesson.progress();
        println!(
            "Q{}/{}: {}  options: {}",
            answered + 1,
            total,
            question.glyph,
            question.options.join(", ")
        );
        let record = lesson.answer(&question.correct_answer)?;
        println!(
            "  -> {} ({})",
            record.selected_answer,
            if record.is_correct { "correct" } else { "wrong" }
        );
    }

    let outcome = lesson.finish(&store).await?;
    println!(
        "\nFinished: {} stars, {}% in {}ms (passed: {})",
        outcome.results.stars,
        outcome.results.percentage,
        outcome.results.time_spent_ms,
        outcome.results.passed
    );

    let unlocked = unlocked_lessons(&store, "demo-kid", &level).await?;
    println!("Unlocked lessons: {unlocked:?}");

    let progress = store
        .load_level_progress("demo-kid", Track::Reading, level.level)
        .await?;
    let summary = track_summary(&progress, level.total_lessons);
    println!(
        "Track: {}/{} lessons, {}/{} stars",
        summary.completed_lessons, summary.total_lessons, summary.total_stars, summary.max_stars
    );

    Ok(())
}
