//! Telugu letter catalog: the static content model for the reading track.
//!
//! The catalog is an explicitly constructed, immutable value that callers
//! inject into the question generator. [`LetterCatalog::telugu`] ships the
//! full alphabet (16 vowels and 36 consonants) tagged with difficulty
//! tiers; [`LetterCatalog::new`] builds synthetic catalogs for tests.

use crate::session::StarThresholds;
use serde::{Deserialize, Serialize};

/// Broad classification of a letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterCategory {
    Vowel,
    Consonant,
}

/// One learnable symbol.
///
/// `id` is unique across the catalog. `transliteration` is not: distinct
/// letters may romanize identically (retroflex and dental variants both
/// render as "tha", "dha", "na", "la", "sha"), so consumers must
/// distinguish options by entry identity rather than by answer string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetterEntry {
    pub id: String,
    /// The displayed symbol. Opaque to the engine.
    pub glyph: String,
    /// Canonical romanized answer string.
    pub transliteration: String,
    pub category: LetterCategory,
    /// Varga (consonant row) or other sub-grouping, for display only.
    pub group: Option<String>,
    /// Difficulty tier, 1–3.
    pub difficulty: u8,
}

/// Immutable set of learnable letters.
#[derive(Debug, Clone)]
pub struct LetterCatalog {
    entries: Vec<LetterEntry>,
}

impl LetterCatalog {
    /// Build a catalog from explicit entries.
    pub fn new(entries: Vec<LetterEntry>) -> Self {
        Self { entries }
    }

    /// The shipped Telugu alphabet.
    pub fn telugu() -> Self {
        let entries = TELUGU_LETTERS
            .iter()
            .map(|&(id, glyph, transliteration, category, group, difficulty)| LetterEntry {
                id: id.to_string(),
                glyph: glyph.to_string(),
                transliteration: transliteration.to_string(),
                category,
                group: group.map(str::to_string),
                difficulty,
            })
            .collect();
        Self { entries }
    }

    /// Every entry, in catalog order.
    pub fn all(&self) -> &[LetterEntry] {
        &self.entries
    }

    /// Entries at the given difficulty tier, in catalog order. An
    /// out-of-range tier yields an empty vec, not an error.
    pub fn by_difficulty(&self, tier: u8) -> Vec<LetterEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.difficulty == tier)
            .cloned()
            .collect()
    }

    /// Look up a single entry by id.
    pub fn get(&self, id: &str) -> Option<&LetterEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Structure of one level of the reading track: how many lessons it has,
/// how long each quiz is, and how attempts are scored.
#[derive(Debug, Clone)]
pub struct LevelConfig {
    pub level: u32,
    pub name: String,
    pub total_lessons: u32,
    pub questions_per_lesson: usize,
    pub thresholds: StarThresholds,
}

impl LevelConfig {
    /// Level 1: letter recognition. Ten lessons of ten questions, split
    /// four/four/two across the three difficulty tiers.
    pub fn letter_recognition() -> Self {
        Self {
            level: 1,
            name: "Letter Recognition".to_string(),
            total_lessons: 10,
            questions_per_lesson: 10,
            thresholds: StarThresholds::default(),
        }
    }

    /// Difficulty tier for a lesson: lessons 1–4 draw tier 1 letters,
    /// 5–8 tier 2, and anything past that tier 3.
    pub fn difficulty_for_lesson(&self, lesson: u32) -> u8 {
        if lesson <= 4 {
            1
        } else if lesson <= 8 {
            2
        } else {
            3
        }
    }
}

type LetterRow = (
    &'static str,
    &'static str,
    &'static str,
    LetterCategory,
    Option<&'static str>,
    u8,
);

#[rustfmt::skip]
const TELUGU_LETTERS: &[LetterRow] = &[
    // Vowels (అచ్చులు)
    ("vowel-1",  "అ",  "a",   LetterCategory::Vowel, None, 1),
    ("vowel-2",  "ఆ",  "aa",  LetterCategory::Vowel, None, 1),
    ("vowel-3",  "ఇ",  "i",   LetterCategory::Vowel, None, 1),
    ("vowel-4",  "ఈ",  "ee",  LetterCategory::Vowel, None, 1),
    ("vowel-5",  "ఉ",  "u",   LetterCategory::Vowel, None, 2),
    ("vowel-6",  "ఊ",  "oo",  LetterCategory::Vowel, None, 2),
    ("vowel-7",  "ఋ",  "ru",  LetterCategory::Vowel, None, 3),
    ("vowel-8",  "ౠ",  "ruu", LetterCategory::Vowel, None, 3),
    ("vowel-9",  "ఎ",  "e",   LetterCategory::Vowel, None, 2),
    ("vowel-10", "ఏ",  "ae",  LetterCategory::Vowel, None, 2),
    ("vowel-11", "ఐ",  "ai",  LetterCategory::Vowel, None, 2),
    ("vowel-12", "ఒ",  "o",   LetterCategory::Vowel, None, 2),
    ("vowel-13", "ఓ",  "oh",  LetterCategory::Vowel, None, 2),
    ("vowel-14", "ఔ",  "au",  LetterCategory::Vowel, None, 3),
    ("vowel-15", "అం", "am",  LetterCategory::Vowel, None, 3),
    ("vowel-16", "అః", "ah",  LetterCategory::Vowel, None, 3),

    // Ka varga (క వర్గం)
    ("consonant-1",  "క", "ka",  LetterCategory::Consonant, Some("ka-varga"), 1),
    ("consonant-2",  "ఖ", "kha", LetterCategory::Consonant, Some("ka-varga"), 2),
    ("consonant-3",  "గ", "ga",  LetterCategory::Consonant, Some("ka-varga"), 1),
    ("consonant-4",  "ఘ", "gha", LetterCategory::Consonant, Some("ka-varga"), 2),
    ("consonant-5",  "ఙ", "nga", LetterCategory::Consonant, Some("ka-varga"), 3),

    // Cha varga (చ వర్గం)
    ("consonant-6",  "చ", "cha",  LetterCategory::Consonant, Some("cha-varga"), 1),
    ("consonant-7",  "ఛ", "chha", LetterCategory::Consonant, Some("cha-varga"), 2),
    ("consonant-8",  "జ", "ja",   LetterCategory::Consonant, Some("cha-varga"), 1),
    ("consonant-9",  "ఝ", "jha",  LetterCategory::Consonant, Some("cha-varga"), 2),
    ("consonant-10", "ఞ", "nya",  LetterCategory::Consonant, Some("cha-varga"), 3),

    // Ta varga (ట వర్గం), retroflex
    ("consonant-11", "ట", "ta",  LetterCategory::Consonant, Some("ta-varga"), 1),
    ("consonant-12", "ఠ", "tha", LetterCategory::Consonant, Some("ta-varga"), 2),
    ("consonant-13", "డ", "da",  LetterCategory::Consonant, Some("ta-varga"), 1),
    ("consonant-14", "ఢ", "dha", LetterCategory::Consonant, Some("ta-varga"), 2),
    ("consonant-15", "ణ", "na",  LetterCategory::Consonant, Some("ta-varga"), 2),

    // Tha varga (త వర్గం), dental
    ("consonant-16", "త", "tha",  LetterCategory::Consonant, Some("tha-varga"), 1),
    ("consonant-17", "థ", "thha", LetterCategory::Consonant, Some("tha-varga"), 2),
    ("consonant-18", "ద", "dha",  LetterCategory::Consonant, Some("tha-varga"), 1),
    ("consonant-19", "ధ", "dhha", LetterCategory::Consonant, Some("tha-varga"), 2),
    ("consonant-20", "న", "na",   LetterCategory::Consonant, Some("tha-varga"), 1),

    // Pa varga (ప వర్గం)
    ("consonant-21", "ప", "pa",  LetterCategory::Consonant, Some("pa-varga"), 1),
    ("consonant-22", "ఫ", "pha", LetterCategory::Consonant, Some("pa-varga"), 2),
    ("consonant-23", "బ", "ba",  LetterCategory::Consonant, Some("pa-varga"), 1),
    ("consonant-24", "భ", "bha", LetterCategory::Consonant, Some("pa-varga"), 2),
    ("consonant-25", "మ", "ma",  LetterCategory::Consonant, Some("pa-varga"), 1),

    // Remaining consonants
    ("consonant-26", "య",   "ya",   LetterCategory::Consonant, Some("additional"), 1),
    ("consonant-27", "ర",   "ra",   LetterCategory::Consonant, Some("additional"), 1),
    ("consonant-28", "ల",   "la",   LetterCategory::Consonant, Some("additional"), 1),
    ("consonant-29", "వ",   "va",   LetterCategory::Consonant, Some("additional"), 1),
    ("consonant-30", "శ",   "sha",  LetterCategory::Consonant, Some("additional"), 2),
    ("consonant-31", "ష",   "sha",  LetterCategory::Consonant, Some("additional"), 2),
    ("consonant-32", "స",   "sa",   LetterCategory::Consonant, Some("additional"), 1),
    ("consonant-33", "హ",   "ha",   LetterCategory::Consonant, Some("additional"), 1),
    ("consonant-34", "ళ",   "la",   LetterCategory::Consonant, Some("additional"), 2),
    ("consonant-35", "క్ష", "ksha", LetterCategory::Consonant, Some("additional"), 3),
    ("consonant-36", "ఱ",   "rra",  LetterCategory::Consonant, Some("additional"), 3),
];
