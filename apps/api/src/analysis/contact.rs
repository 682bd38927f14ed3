//! Contact extraction: email and phone anywhere, name by proximity.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::lexicon::{SECTION_WORDS_EN, SECTION_WORDS_ZH};
use crate::analysis::period::has_period;
use crate::models::resume::ContactInfo;

/// Lines above the first email/phone line that may hold the name.
const NAME_LOOKBACK: usize = 3;
/// Leading lines always considered.
const NAME_HEAD_LINES: usize = 8;
const NAME_MAX_CHARS: usize = 40;
const MIN_PHONE_DIGITS: usize = 8;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}").expect("email pattern")
});

static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[+(]?\d[\d \t().-]{7,}\d").expect("phone pattern"));

static TITLE_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][a-z][A-Za-z'-]*$").expect("title word"));

static UPPER_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Z'-]+$").expect("upper word"));

static PROFILE_SLUG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:linkedin\.com/in/|github\.com/)([a-z0-9_-]+)").expect("profile slug")
});

static BANNED_NAME_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "professional", "experience", "work", "skills", "skill", "education", "project",
        "projects", "certification", "certifications", "summary", "objective", "profile",
        "references", "awards", "publications", "languages", "contact", "history",
        "employment", "resume", "curriculum", "vitae",
    ]
    .into_iter()
    .collect()
});

/// Words people append to profile handles.
static SLUG_DESCRIPTORS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "cv", "resume", "profile", "official", "dev", "developer", "design", "designer", "pro",
        "au", "me", "hq", "page", "portfolio", "work",
    ]
    .into_iter()
    .collect()
});

/// First phone-like run that is not a date range.
fn find_phone(text: &str) -> Option<String> {
    PHONE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .find(|candidate| {
            candidate.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS
                && !has_period(candidate)
        })
        .map(String::from)
}

fn looks_like_name(line: &str) -> bool {
    if line.chars().count() > NAME_MAX_CHARS
        || SECTION_WORDS_EN.is_match(line)
        || SECTION_WORDS_ZH.is_match(line)
        || line.contains('@')
        || line.chars().any(|c| c.is_ascii_digit())
    {
        return false;
    }
    let words: Vec<&str> = line.split_whitespace().collect();
    if !(2..=4).contains(&words.len()) {
        return false;
    }
    let banned = words.iter().any(|w| {
        let letters: String = w
            .chars()
            .filter(|c| c.is_ascii_alphabetic() || *c == '\'' || *c == '-')
            .collect::<String>()
            .to_lowercase();
        BANNED_NAME_WORDS.contains(letters.as_str())
    });
    if banned {
        return false;
    }
    words.iter().all(|w| TITLE_WORD.is_match(w)) || words.iter().all(|w| UPPER_WORD.is_match(w))
}

/// Candidate line indexes: above the first email line, above the first phone
/// line, then the head of the document. Deduplicated, order kept.
fn name_candidates(lines: &[&str]) -> Vec<usize> {
    let mut order = Vec::new();
    let push_above = |anchor: Option<usize>, order: &mut Vec<usize>| {
        if let Some(anchor) = anchor {
            order.extend(anchor.saturating_sub(NAME_LOOKBACK)..anchor);
        }
    };
    let email_line = lines.iter().position(|l| l.contains('@'));
    let phone_line = lines.iter().position(|l| find_phone(l).is_some());
    push_above(email_line, &mut order);
    push_above(phone_line, &mut order);
    order.extend(0..lines.len().min(NAME_HEAD_LINES));

    let mut seen = HashSet::new();
    order.retain(|i| seen.insert(*i));
    order
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Derives "Jane Citizen" from `linkedin.com/in/jane-citizen-123` style links.
fn name_from_profile_url(text: &str) -> Option<String> {
    let slug = PROFILE_SLUG.captures(text)?.get(1)?.as_str();
    let mut parts: Vec<&str> = slug
        .split(['-', '_'])
        .filter(|p| !p.is_empty() && !p.chars().any(|c| c.is_ascii_digit()))
        .collect();
    while parts
        .last()
        .is_some_and(|p| SLUG_DESCRIPTORS.contains(p.to_lowercase().as_str()))
    {
        parts.pop();
    }
    if parts.len() < 2 {
        return None;
    }
    Some(parts.iter().map(|p| title_case(p)).collect::<Vec<_>>().join(" "))
}

pub fn extract_contact(text: &str) -> ContactInfo {
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    let name = name_candidates(&lines)
        .into_iter()
        .map(|i| lines[i])
        .find(|l| looks_like_name(l))
        .map(String::from)
        .or_else(|| name_from_profile_url(text));

    ContactInfo {
        name,
        email: EMAIL.find(text).map(|m| m.as_str().to_string()),
        phone: find_phone(text),
    }
}
