//! Fit Scoring: token/bigram overlap between JD requirements and résumé bullets.
//!
//! Algorithm, per requirement:
//! 1. stem the requirement's tokens and take their bigrams
//! 2. score every bullet as `max(token_ov, keyword_ov) * 0.6 + bigram_ov * 0.4`
//! 3. score every entry's role/company context with 0.5/0.5 weights
//! 4. keep the top 4 distinct candidates scoring >= 0.2; the requirement
//!    score is the best candidate score

use std::collections::HashSet;

use crate::analysis::text::{bigrams, stem_all, tokenize};
use crate::models::coverage::RequirementMatch;
use crate::models::resume::{Term, WorkEntry};

const MAX_MATCHED_BULLETS: usize = 4;
pub const MIN_MATCH_SCORE: f64 = 0.2;

/// `|A ∩ B| / max(|A|, |B|)`, counting each item of `b` found in `a`.
/// Zero when either side is empty.
pub fn normalized_overlap(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let set: HashSet<&str> = a.iter().map(String::as_str).collect();
    let hits = b.iter().filter(|x| set.contains(x.as_str())).count();
    hits as f64 / a.len().max(b.len()) as f64
}

pub fn round3(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}

/// A résumé text prepared for overlap scoring.
#[derive(Debug, Clone)]
pub struct Scorable {
    pub text: String,
    /// Unstemmed tokens, compared against JD keyword parts.
    pub raw: Vec<String>,
    pub stems: Vec<String>,
    pub grams: Vec<String>,
}

impl Scorable {
    pub fn new(text: &str) -> Self {
        let raw = tokenize(text);
        let stems = stem_all(&raw);
        let grams = bigrams(&stems);
        Self { text: text.to_string(), raw, stems, grams }
    }
}

/// Overlap weights for a candidate kind.
#[derive(Debug, Clone, Copy)]
pub struct Weights {
    pub tokens: f64,
    pub bigrams: f64,
}

pub const BULLET_WEIGHTS: Weights = Weights { tokens: 0.6, bigrams: 0.4 };
pub const CONTEXT_WEIGHTS: Weights = Weights { tokens: 0.5, bigrams: 0.5 };

/// Scores `candidate` against a query's stems and bigrams. `keyword_parts`
/// may be empty, in which case only the token overlap counts.
pub fn overlap_score(
    query: &Scorable,
    keyword_parts: &[String],
    candidate: &Scorable,
    weights: Weights,
) -> f64 {
    let token_ov = normalized_overlap(&query.stems, &candidate.stems);
    let keyword_ov = normalized_overlap(keyword_parts, &candidate.raw);
    let gram_ov = normalized_overlap(&query.grams, &candidate.grams);
    token_ov.max(keyword_ov) * weights.tokens + gram_ov * weights.bigrams
}

/// JD terms split into single words ("customer service" → customer, service).
pub fn keyword_parts(jd_terms: &[Term]) -> Vec<String> {
    jd_terms
        .iter()
        .flat_map(|t| t.text.split(|c: char| c.is_whitespace() || c == '-'))
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

pub fn match_requirements(
    requirements: &[String],
    entries: &[WorkEntry],
    jd_terms: &[Term],
) -> Vec<RequirementMatch> {
    let keywords = keyword_parts(jd_terms);
    let bullets: Vec<Scorable> = entries
        .iter()
        .flat_map(|e| e.bullets.iter())
        .map(|b| Scorable::new(b))
        .collect();
    let contexts: Vec<Scorable> = entries
        .iter()
        .map(WorkEntry::context_text)
        .filter(|c| !c.is_empty())
        .map(|c| Scorable::new(&c))
        .collect();

    requirements
        .iter()
        .map(|requirement| {
            let query = Scorable::new(requirement);
            let mut scored: Vec<(&str, f64)> = bullets
                .iter()
                .map(|b| (b.text.as_str(), overlap_score(&query, &keywords, b, BULLET_WEIGHTS)))
                .chain(
                    contexts
                        .iter()
                        .map(|c| (c.text.as_str(), overlap_score(&query, &keywords, c, CONTEXT_WEIGHTS))),
                )
                .collect();

            // stable: equal scores keep bullet-pool order
            scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

            let best = scored.first().map(|(_, s)| s.max(0.0)).unwrap_or(0.0);
            let mut seen = HashSet::new();
            let picked = scored
                .iter()
                .filter(|(text, _)| seen.insert(text.to_lowercase()))
                .take(MAX_MATCHED_BULLETS)
                .filter(|(_, score)| *score >= MIN_MATCH_SCORE)
                .map(|(text, _)| text.to_string())
                .collect();

            RequirementMatch {
                requirement: requirement.clone(),
                bullets: picked,
                score: round3(best),
            }
        })
        .collect()
}

/// `round(100 * mean(score))`, 0 when there are no matches.
pub fn coverage_pct(matches: &[RequirementMatch]) -> u32 {
    if matches.is_empty() {
        return 0;
    }
    let mean = matches.iter().map(|m| m.score).sum::<f64>() / matches.len() as f64;
    (mean * 100.0).round().clamp(0.0, 100.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::text::top_terms;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn entry(role: &str, company: &str, bullets: &[&str]) -> WorkEntry {
        WorkEntry {
            bullets: words(bullets),
            ..WorkEntry::header(Some(role.into()), Some(company.into()), None, false)
        }
    }

    #[test]
    fn test_normalized_overlap_bounds() {
        let a = words(&["order", "stock", "email"]);
        assert_eq!(normalized_overlap(&a, &a), 1.0);
        assert_eq!(normalized_overlap(&a, &words(&["cash", "till"])), 0.0);
        assert_eq!(normalized_overlap(&a, &[]), 0.0);
        assert_eq!(normalized_overlap(&[], &a), 0.0);
        let half = normalized_overlap(&words(&["a1", "b1"]), &words(&["a1", "c1", "d1", "e1"]));
        assert!((half - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_identical_bullet_scores_one() {
        let req = "Handle enquiries and quotes via email and phone";
        let entries = vec![entry("Sales Assistant", "Market Hub", &[req, "Restocked shelves"])];
        let matches = match_requirements(&[req.to_string()], &entries, &top_terms(req));
        assert_eq!(matches.len(), 1);
        assert!((matches[0].score - 1.0).abs() < 1e-9);
        assert_eq!(matches[0].bullets[0], req);
    }

    #[test]
    fn test_context_is_fallback_pool() {
        let entries = vec![entry("Receptionist", "XYZ Clinic", &[])];
        let req = "Receptionist for a busy clinic".to_string();
        let matches = match_requirements(&[req], &entries, &[]);
        assert!(matches[0].score >= MIN_MATCH_SCORE);
        assert_eq!(matches[0].bullets, vec!["Receptionist XYZ Clinic"]);
    }

    #[test]
    fn test_weak_candidates_are_dropped_and_capped() {
        let bullets: Vec<String> = (0..6).map(|i| format!("Processed orders batch{i}")).collect();
        let refs: Vec<&str> = bullets.iter().map(String::as_str).collect();
        let entries = vec![entry("Clerk", "Depot", &refs), entry("Painter", "Studio", &["Painted murals"])];
        let matches = match_requirements(&["Process orders".to_string()], &entries, &[]);
        assert_eq!(matches[0].bullets.len(), MAX_MATCHED_BULLETS);
        assert!(!matches[0].bullets.iter().any(|b| b.contains("murals")));
    }

    #[test]
    fn test_no_candidates() {
        let matches = match_requirements(&["Drive a forklift".to_string()], &[], &[]);
        assert_eq!(matches[0].score, 0.0);
        assert!(matches[0].bullets.is_empty());
    }

    #[test]
    fn test_coverage_pct() {
        let m = |score| RequirementMatch { requirement: String::new(), bullets: vec![], score };
        assert_eq!(coverage_pct(&[]), 0);
        assert_eq!(coverage_pct(&[m(1.0), m(0.5)]), 75);
        assert_eq!(coverage_pct(&[m(0.333)]), 33);
    }
}
