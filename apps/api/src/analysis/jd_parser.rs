//! JD Requirement Extractor: splits a job description into actionable
//! requirement lines.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::experience::patterns::BULLET_PREFIX;
use crate::analysis::lexicon::{is_culture_line, ACTION_WORDS, REQUIREMENT_HEAD_HINT};

pub const MAX_REQUIREMENTS: usize = 20;
const MIN_LINE_CHARS: usize = 10;
const MIN_SENTENCE_CHARS: usize = 20;

static GLYPHS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[•·▪◦●—–]+").expect("glyph pattern"));
static SEMICOLONS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[；;]+").expect("semicolon pattern"));
static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[。！？；.!?]+").expect("sentence pattern"));

/// Action verb, a digit, or a responsibilities/requirements hint.
fn is_actionable(s: &str) -> bool {
    ACTION_WORDS.is_match(s) || s.chars().any(|c| c.is_ascii_digit()) || REQUIREMENT_HEAD_HINT.is_match(s)
}

fn long_enough(s: &str, min_chars: usize) -> bool {
    s.chars().count() >= min_chars && !is_culture_line(s)
}

/// Ordered requirement lines, at most [`MAX_REQUIREMENTS`]. When no line is
/// actionable, falls back to every non-culture sentence of 20+ chars.
pub fn extract_requirements(jd_text: &str) -> Vec<String> {
    let with_breaks = GLYPHS.replace_all(jd_text, "\n");
    let normalized = SEMICOLONS.replace_all(&with_breaks, "；");

    let mut requirements: Vec<String> = normalized
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| BULLET_PREFIX.replace(l, "").trim().to_string())
        .filter(|s| long_enough(s, MIN_LINE_CHARS) && is_actionable(s))
        .take(MAX_REQUIREMENTS)
        .collect();

    if requirements.is_empty() {
        requirements = SENTENCE_END
            .split(&normalized)
            .map(str::trim)
            .filter(|s| long_enough(s, MIN_SENTENCE_CHARS))
            .take(MAX_REQUIREMENTS)
            .map(String::from)
            .collect();
    }
    requirements
}
