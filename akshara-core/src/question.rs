//! Quiz construction: question and distractor selection.
//!
//! Every public entry point has a `_with_rng` twin that takes an explicit
//! random source, so tests can drive generation deterministically with a
//! seeded [`rand::rngs::StdRng`].

use crate::catalog::LetterEntry;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// One quiz item: a glyph prompt and a set of transliteration options.
/// Immutable for the lifetime of its session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    /// The glyph shown to the learner.
    pub glyph: String,
    /// The transliteration that counts as correct.
    pub correct_answer: String,
    /// Candidate answers in presentation order. Contains `correct_answer`.
    pub options: Vec<String>,
    /// Catalog id of the letter this question was built from.
    pub source_letter_id: String,
}

/// Tunables for question generation.
#[derive(Debug, Clone, Copy)]
pub struct QuestionOptions {
    /// Number of answer options per question, including the correct one.
    pub option_count: usize,
    /// Drop options whose transliteration duplicates an earlier one.
    ///
    /// Distinct letters can share an answer string, which makes a question
    /// with both of them answerable only by luck. Off by default: the
    /// shipped behavior keeps duplicates, and turning this on can leave a
    /// question with fewer than `option_count` options.
    pub dedupe_transliterations: bool,
}

impl Default for QuestionOptions {
    fn default() -> Self {
        Self {
            option_count: 4,
            dedupe_transliterations: false,
        }
    }
}

impl QuestionOptions {
    pub fn with_option_count(mut self, count: usize) -> Self {
        self.option_count = count;
        self
    }

    pub fn with_dedupe_transliterations(mut self, dedupe: bool) -> Self {
        self.dedupe_transliterations = dedupe;
        self
    }
}

/// Build a quiz of `count` questions from the given letter pool.
pub fn generate_questions(
    pool: &[LetterEntry],
    count: usize,
    opts: &QuestionOptions,
) -> Vec<Question> {
    generate_questions_with_rng(pool, count, opts, &mut rand::thread_rng())
}

/// Build a quiz with an explicit random source.
///
/// The pool is shuffled and the first `min(count, pool.len())` letters
/// each become one question. When the pool is smaller than `count`, the
/// remainder is drawn with replacement, so a short lesson pool repeats
/// letters rather than shortening the quiz.
pub fn generate_questions_with_rng<R: Rng>(
    pool: &[LetterEntry],
    count: usize,
    opts: &QuestionOptions,
    rng: &mut R,
) -> Vec<Question> {
    if pool.is_empty() {
        return Vec::new();
    }

    let mut shuffled: Vec<&LetterEntry> = pool.iter().collect();
    shuffled.shuffle(rng);
    shuffled.truncate(count);

    while shuffled.len() < count {
        shuffled.push(&pool[rng.gen_range(0..pool.len())]);
    }

    shuffled
        .into_iter()
        .map(|correct| build_question(correct, pool, opts, rng))
        .collect()
}

fn build_question<R: Rng>(
    correct: &LetterEntry,
    pool: &[LetterEntry],
    opts: &QuestionOptions,
    rng: &mut R,
) -> Question {
    let entries = generate_options(correct, pool, opts.option_count, rng);
    let mut options: Vec<String> = entries
        .iter()
        .map(|entry| entry.transliteration.clone())
        .collect();

    if opts.dedupe_transliterations {
        let mut seen = HashSet::new();
        options.retain(|option| seen.insert(option.clone()));
    }

    options.shuffle(rng);

    Question {
        id: Uuid::new_v4(),
        glyph: correct.glyph.clone(),
        correct_answer: correct.transliteration.clone(),
        options,
        source_letter_id: correct.id.clone(),
    }
}

/// Pick `count` option entries for one question: the correct letter plus
/// distractors drawn without replacement.
///
/// Distractors within one difficulty tier of the correct letter are
/// preferred (harder discrimination); only once that subset is exhausted
/// does selection fall back to the rest of the pool. When the pool cannot
/// supply `count - 1` distractors at all, the result is simply shorter
/// than requested. Callers must tolerate under-filled option sets.
pub fn generate_options<'a, R: Rng>(
    correct: &'a LetterEntry,
    pool: &'a [LetterEntry],
    count: usize,
    rng: &mut R,
) -> Vec<&'a LetterEntry> {
    let mut options = vec![correct];

    let mut similar: Vec<&LetterEntry> = pool
        .iter()
        .filter(|entry| {
            entry.id != correct.id && entry.difficulty.abs_diff(correct.difficulty) <= 1
        })
        .collect();

    while options.len() < count && !similar.is_empty() {
        let index = rng.gen_range(0..similar.len());
        options.push(similar.swap_remove(index));
    }

    if options.len() < count {
        let mut rest: Vec<&LetterEntry> = pool
            .iter()
            .filter(|entry| options.iter().all(|chosen| chosen.id != entry.id))
            .collect();
        while options.len() < count && !rest.is_empty() {
            let index = rng.gen_range(0..rest.len());
            options.push(rest.swap_remove(index));
        }
    }

    options
}
