//! Terminal quiz runner for the akshara learning engine.
//!
//! Presents one lesson as a line-based quiz: shows a Telugu glyph and
//! four numbered transliterations, reads the pick from stdin, and records
//! progress to a per-learner JSON file when the lesson ends.

use akshara_core::{
    track_summary, unlocked_lessons, FileStore, HeadlessLesson, LessonConfig, LessonError,
    LetterCatalog, LevelConfig, MemoryStore, ProgressStore, Track,
};
use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "akshara", about = "Telugu letter-matching quiz")]
struct Args {
    /// Learner whose progress is tracked.
    #[arg(long, default_value = "learner")]
    learner: String,

    /// Lesson number within level 1 (1-10).
    #[arg(long, default_value_t = 1)]
    lesson: u32,

    /// Directory for progress files. Omit to play without saving.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Show progress and streak for the learner, then exit.
    #[arg(long)]
    status: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let catalog = LetterCatalog::telugu();
    let level = LevelConfig::letter_recognition();

    let store: Box<dyn ProgressStore> = match &args.data_dir {
        Some(dir) => Box::new(FileStore::new(dir.clone())),
        None => Box::new(MemoryStore::new()),
    };

    if args.status {
        return print_status(store.as_ref(), &args.learner, &level).await;
    }

    if args.lesson < 1 || args.lesson > level.total_lessons {
        bail!(
            "lesson {} out of range (level has {} lessons)",
            args.lesson,
            level.total_lessons
        );
    }

    let unlocked = unlocked_lessons(store.as_ref(), &args.learner, &level).await?;
    if !unlocked.contains(&args.lesson) {
        bail!(
            "lesson {} is locked; pass lesson {} first (unlocked: {:?})",
            args.lesson,
            args.lesson - 1,
            unlocked
        );
    }

    let config = LessonConfig::new(args.learner.clone(), args.lesson);
    let mut lesson = HeadlessLesson::new(config, &catalog);

    println!(
        "{} — lesson {} ({} questions). Type the option number and press enter.\n",
        level.name,
        args.lesson,
        lesson.progress().1
    );

    let stdin = io::stdin();
    while let Some(question) = lesson.current_question().cloned() {
        let (answered, total) = lesson.progress();
        println!("Question {}/{}:   {}", answered + 1, total, question.glyph);
        for (index, option) in question.options.iter().enumerate() {
            println!("  {}. {}", index + 1, option);
        }

        let selected = read_choice(&stdin, question.options.len())?;
        let record = lesson.answer(&question.options[selected])?;
        if record.is_correct {
            println!("Correct!\n");
        } else {
            println!("Not quite — the answer was {}\n", record.correct_answer);
        }
    }

    // Record progress; a failed save keeps the results in memory so the
    // player can retry instead of losing the attempt.
    let outcome = loop {
        match lesson.finish(store.as_ref()).await {
            Ok(outcome) => break outcome,
            Err(LessonError::Progress(error)) => {
                eprintln!("Could not save progress: {error}");
                if !prompt_yes(&stdin, "Retry saving? [y/N] ")? {
                    bail!("progress was not saved");
                }
            }
            Err(error) => return Err(error.into()),
        }
    };

    println!(
        "Lesson complete: {}/{} correct ({}%), {} star(s){}",
        outcome.results.correct_count,
        outcome.results.total_questions,
        outcome.results.percentage,
        outcome.results.stars,
        if outcome.results.passed {
            ""
        } else {
            " — not passed yet, 60% unlocks the next lesson"
        }
    );
    println!(
        "Best for this lesson: {} star(s) over {} attempt(s)",
        outcome.progress.stars, outcome.progress.attempts
    );

    let unlocked = unlocked_lessons(store.as_ref(), &args.learner, &level).await?;
    if let Some(next) = unlocked.iter().find(|&&l| l > args.lesson) {
        println!("Lesson {next} is unlocked.");
    }

    Ok(())
}

/// Read a 1-based option number from stdin.
fn read_choice(stdin: &io::Stdin, option_count: usize) -> Result<usize> {
    loop {
        print!("> ");
        io::stdout().flush().context("flush prompt")?;

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .context("read answer from stdin")?;
        if read == 0 {
            bail!("stdin closed mid-quiz");
        }

        match line.trim().parse::<usize>() {
            Ok(choice) if (1..=option_count).contains(&choice) => return Ok(choice - 1),
            _ => println!("Enter a number between 1 and {option_count}."),
        }
    }
}

fn prompt_yes(stdin: &io::Stdin, prompt: &str) -> Result<bool> {
    print!("{prompt}");
    io::stdout().flush().context("flush prompt")?;
    let mut line = String::new();
    stdin
        .lock()
        .read_line(&mut line)
        .context("read confirmation")?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

async fn print_status(store: &dyn ProgressStore, learner: &str, level: &LevelConfig) -> Result<()> {
    let progress = store
        .load_level_progress(learner, Track::Reading, level.level)
        .await?;
    let summary = track_summary(&progress, level.total_lessons);

    println!("{learner} — {}", level.name);
    println!(
        "Lessons completed: {}/{} ({}%), stars {}/{}",
        summary.completed_lessons,
        summary.total_lessons,
        summary.percentage,
        summary.total_stars,
        summary.max_stars
    );

    for record in &progress {
        println!(
            "  lesson {}: {} star(s), best {}%, {} attempt(s)",
            record.lesson, record.stars, record.percentage, record.attempts
        );
    }

    if let Some(streak) = store.load_streak(learner).await? {
        println!(
            "Streak: {} day(s) (longest {}, {} active days, last {})",
            streak.current_streak,
            streak.longest_streak,
            streak.total_days_active,
            streak.last_active_date
        );
    }

    Ok(())
}
