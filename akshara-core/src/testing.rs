//! Test support: synthetic catalogs and scripted play.

use crate::catalog::{LetterCatalog, LetterCategory, LetterEntry};
use crate::session::GameSession;

/// Build one synthetic letter entry.
pub fn letter(id: &str, glyph: &str, transliteration: &str, difficulty: u8) -> LetterEntry {
    LetterEntry {
        id: id.to_string(),
        glyph: glyph.to_string(),
        transliteration: transliteration.to_string(),
        category: LetterCategory::Consonant,
        group: None,
        difficulty,
    }
}

/// A catalog with `per_tier` entries in each of tiers 1–3. Every entry
/// gets a unique transliteration, so answer strings never collide.
pub fn tiered_catalog(per_tier: usize) -> LetterCatalog {
    let mut entries = Vec::with_capacity(per_tier * 3);
    for tier in 1..=3u8 {
        for i in 0..per_tier {
            entries.push(letter(
                &format!("t{tier}-{i}"),
                "అ",
                &format!("t{tier}x{i}"),
                tier,
            ));
        }
    }
    LetterCatalog::new(entries)
}

/// Answer every remaining question correctly.
pub fn answer_all_correct(session: &mut GameSession) {
    while let Some(question) = session.current_question().cloned() {
        session
            .submit_answer(&question.correct_answer)
            .expect("session not exhausted");
    }
}

/// Answer the first `correct` remaining questions correctly and the rest
/// deliberately wrong, exhausting the session.
pub fn answer_with_score(session: &mut GameSession, correct: usize) {
    let mut right = 0;
    while let Some(question) = session.current_question().cloned() {
        if right < correct {
            session
                .submit_answer(&question.correct_answer)
                .expect("session not exhausted");
            right += 1;
        } else {
            session
                .submit_answer("__wrong__")
                .expect("session not exhausted");
        }
    }
}
