//! Education extraction: anchor on degree keywords or an education section,
//! then read degree, field, school and period from a small line window.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::lexicon::{EDUCATION_HEADER, SECTION_WORDS_EN, SECTION_WORDS_ZH};
use crate::analysis::period::find_period;
use crate::models::resume::EducationEntry;

/// Lines read after an anchor line.
const WINDOW_AFTER: usize = 2;
const MAX_ENTRIES: usize = 2;

/// Degree patterns, most specific first, with the label they normalize to.
static DEGREES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)\bph\.?\s?d\b|\bdoctor(?:ate)?\s+of\b|博士", "PhD"),
        (r"(?i)\bmba\b|\bmaster\s+of\s+business\s+administration\b|工商管理硕士", "MBA"),
        (r"(?i)\bmaster(?:'?s)?\b|\bm\.?sc\b|\bm\.\s?(?:a|eng|com)\b|硕士|研究生", "Master"),
        (r"(?i)\bbachelor(?:'?s)?\b|\bb\.?sc\b|\bb\.\s?(?:a|eng|com)\b|\bbcom\b|本科|学士", "Bachelor"),
        (r"(?i)\bassociate\s+(?:degree|of)\b|大专|专科", "Associate"),
        (r"(?i)\b(?:advanced\s+)?diploma\b|文凭", "Diploma"),
        (r"(?i)\bcert(?:ificate)?\s+(?:i{1,3}|iv|in|of)\b|结业证书", "Certificate"),
    ]
    .into_iter()
    .map(|(p, label)| (Regex::new(p).expect("degree pattern"), label))
    .collect()
});

static FIELD_IN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[Ii]n\s+(\p{Lu}[\p{L}&' ]*?)\s*(?:[,(|–—]|\s-\s|\s(?:at|from)\s|(?:19|20)\d{2}|$)")
        .expect("field in")
});

static FIELD_OF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[Oo]f\s+(\p{Lu}[\p{L}&' ]*?)\s*(?:[,(|–—]|\s-\s|\s(?:at|from|in)\s|(?:19|20)\d{2}|$)")
        .expect("field of")
});

static PARENTHETICAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([^()]{2,60})\)").expect("parenthetical"));

static SCHOOL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:\p{Lu}[\p{L}&'.-]*\s+){0,4}(?:University|College|Institute|School|Academy|TAFE|Polytechnic)(?:\s+of(?:\s+\p{Lu}[\p{L}&'.-]*){1,4})?|\p{Han}{2,12}(?:大学|学院|学校)",
    )
    .expect("school")
});

static INSTITUTION_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:University|College|Institute|School|Academy|TAFE|Polytechnic)$").expect("institution word")
});

fn degree_of(line: &str) -> Option<&'static str> {
    DEGREES.iter().find(|(re, _)| re.is_match(line)).map(|(_, label)| *label)
}

/// Another résumé section starts here (short line of section vocabulary).
fn is_other_section_header(line: &str) -> bool {
    line.split_whitespace().count() <= 4
        && (SECTION_WORDS_EN.is_match(line) || SECTION_WORDS_ZH.is_match(line))
        && degree_of(line).is_none()
        && !EDUCATION_HEADER.is_match(line)
}

/// Words up to the first institution keyword, so "Commerce University of
/// Melbourne" yields "Commerce".
fn cut_before_institution(field: &str) -> String {
    field
        .split_whitespace()
        .take_while(|w| !INSTITUTION_WORD.is_match(w))
        .collect::<Vec<_>>()
        .join(" ")
}

fn field_of(line: &str) -> Option<String> {
    let captured = FIELD_IN
        .captures(line)
        .or_else(|| FIELD_OF.captures(line))
        .and_then(|c| c.get(1))
        .map(|m| cut_before_institution(m.as_str()))
        .or_else(|| {
            PARENTHETICAL
                .captures(line)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim().to_string())
                .filter(|p| find_period(p).is_none() && !p.chars().any(|c| c.is_ascii_digit()))
        })?;
    let field = captured.trim();
    (!field.is_empty()).then(|| field.to_string())
}

fn school_of(line: &str, field: Option<&str>) -> Option<String> {
    let found = SCHOOL.find(line)?.as_str().trim();
    let school = match field {
        Some(f) => found.strip_prefix(f).map(str::trim_start).unwrap_or(found),
        None => found,
    };
    let school = school.strip_prefix("The ").unwrap_or(school).trim();
    (!school.is_empty()).then(|| school.to_string())
}

fn read_window(window: &[&str]) -> EducationEntry {
    let mut entry = EducationEntry::default();
    for line in window {
        if entry.degree.is_none() {
            entry.degree = degree_of(line).map(String::from);
            if entry.degree.is_some() && entry.field.is_none() {
                entry.field = field_of(line);
            }
        }
        if entry.school.is_none() {
            entry.school = school_of(line, entry.field.as_deref());
        }
        if entry.period.is_none() {
            entry.period = find_period(line).map(|m| m.normalized);
        }
    }
    entry
}

fn dedup_key(entry: &EducationEntry) -> (String, String, String) {
    let norm = |v: &Option<String>| v.as_deref().unwrap_or_default().trim().to_lowercase();
    (norm(&entry.school), norm(&entry.degree), norm(&entry.period))
}

pub fn extract_education(text: &str) -> Vec<EducationEntry> {
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    let mut in_section = false;
    let mut i = 0;

    while i < lines.len() && out.len() < MAX_ENTRIES {
        let line = lines[i];
        if EDUCATION_HEADER.is_match(line) {
            in_section = true;
            i += 1;
            continue;
        }
        if is_other_section_header(line) {
            in_section = false;
            i += 1;
            continue;
        }
        if !in_section && degree_of(line).is_none() {
            i += 1;
            continue;
        }

        // window: anchor plus up to two lines, stopping at a section header or
        // at a second degree line
        let mut end = i + 1;
        let mut has_degree = degree_of(line).is_some();
        while end < lines.len() && end <= i + WINDOW_AFTER {
            let next = lines[end];
            if EDUCATION_HEADER.is_match(next) || is_other_section_header(next) {
                break;
            }
            let next_degree = degree_of(next).is_some();
            if next_degree && has_degree {
                break;
            }
            has_degree |= next_degree;
            end += 1;
        }

        let entry = read_window(&lines[i..end]);
        let needed = if in_section { 1 } else { 2 };
        if entry.field_count() >= needed && seen.insert(dedup_key(&entry)) {
            out.push(entry);
            i = end;
        } else {
            i += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_with_school_first() {
        let text = "EDUCATION\nMonash University\nBachelor of Commerce (Marketing)\n2016 - 2019\n\nSKILLS\nExcel";
        let edu = extract_education(text);
        assert_eq!(edu.len(), 1);
        assert_eq!(edu[0].school.as_deref(), Some("Monash University"));
        assert_eq!(edu[0].degree.as_deref(), Some("Bachelor"));
        assert_eq!(edu[0].field.as_deref(), Some("Commerce"));
        assert_eq!(edu[0].period.as_deref(), Some("2016 - 2019"));
    }

    #[test]
    fn test_degree_anchor_without_header() {
        let text = "Jane Citizen\nMaster of Data Science, RMIT University, 2021 - 2023\nBarista @ Cafe Roma";
        let edu = extract_education(text);
        assert_eq!(edu.len(), 1);
        assert_eq!(edu[0].degree.as_deref(), Some("Master"));
        assert_eq!(edu[0].field.as_deref(), Some("Data Science"));
        assert_eq!(edu[0].school.as_deref(), Some("RMIT University"));
    }

    #[test]
    fn test_field_before_school_is_cut() {
        let edu = extract_education("Bachelor of Arts in Psychology University of Melbourne");
        assert_eq!(edu[0].field.as_deref(), Some("Psychology"));
        assert_eq!(edu[0].school.as_deref(), Some("University of Melbourne"));
    }

    #[test]
    fn test_chinese_degree_line() {
        let edu = extract_education("教育背景\n复旦大学 本科 2015.09 - 2019.06");
        assert_eq!(edu.len(), 1);
        assert_eq!(edu[0].degree.as_deref(), Some("Bachelor"));
        assert_eq!(edu[0].school.as_deref(), Some("复旦大学"));
    }

    #[test]
    fn test_lone_keyword_outside_section_is_rejected() {
        assert!(extract_education("Sent a diploma-style thank you card").is_empty());
    }

    #[test]
    fn test_capped_and_deduplicated() {
        let text = "MBA, Melbourne Business School, 2020 - 2021\n\
                    MBA, Melbourne Business School, 2020 - 2021\n\
                    Master of Finance, Monash University\n\
                    Diploma of Hospitality, Box Hill Institute";
        let edu = extract_education(text);
        assert_eq!(edu.len(), 2);
        assert_eq!(edu[0].degree.as_deref(), Some("MBA"));
        assert_eq!(edu[1].degree.as_deref(), Some("Master"));
    }
}
