//! Category coverage: which fixed JD categories the résumé backs up, with the
//! single best (entry, bullet) as evidence.
//!
//! Scores, per active category:
//! - entry context baseline: 0.5 when the category token is in role+company,
//!   plus 0.2 when a hint phrase is
//! - bullet: `concept(0.5) + phrase(0.2) + max(baseline, hint(0.2))`, at most 1,
//!   where `phrase` is a multi-word hint and `hint` a single-word one
//!
//! Covered when the best bullet-backed score reaches 0.5, or the best context
//! score of an entry without bullets reaches 0.3.

use crate::analysis::lexicon::{CategoryDef, CATEGORIES};
use crate::analysis::text::{contains_phrase, match_tokens, normalize, stem};
use crate::models::coverage::{CoverageItem, Evidence};
use crate::models::resume::WorkEntry;

const CONCEPT_HIT: f64 = 0.5;
const PHRASE_HIT: f64 = 0.2;
const HINT_HIT: f64 = 0.2;
const BULLET_COVERED: f64 = 0.5;
const CONTEXT_COVERED: f64 = 0.3;

/// Best category score an entry reached, and which bullet reached it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EntryScore {
    pub score: f64,
    pub best_bullet: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryCoverage {
    pub items: Vec<CoverageItem>,
    /// One per input entry, same order.
    pub entry_scores: Vec<EntryScore>,
}

/// Normalized text and stemmed tokens of one piece of résumé text.
struct Probe {
    normalized: String,
    stems: Vec<String>,
}

impl Probe {
    fn new(text: &str) -> Self {
        Self { normalized: normalize(text), stems: match_tokens(text) }
    }

    fn has_token(&self, token: &str) -> bool {
        self.stems.iter().any(|s| s == token)
    }

    fn has_hint(&self, cat: &CategoryDef, multi_word: bool) -> bool {
        cat.hints
            .iter()
            .filter(|h| h.contains(' ') == multi_word)
            .any(|h| contains_phrase(&self.normalized, h))
    }

    fn has_any_hint(&self, cat: &CategoryDef) -> bool {
        self.has_hint(cat, true) || self.has_hint(cat, false)
    }
}

/// Categories the JD asks for, in table order.
pub fn active_categories(jd_text: &str) -> Vec<&'static CategoryDef> {
    if jd_text.trim().is_empty() {
        return Vec::new();
    }
    let jd = Probe::new(jd_text);
    CATEGORIES
        .iter()
        .filter(|cat| jd.has_token(&stem(cat.key)) || jd.has_any_hint(cat))
        .collect()
}

fn context_baseline(cat: &CategoryDef, context: &Probe) -> f64 {
    let mut score = 0.0;
    if context.has_token(&stem(cat.key)) {
        score += CONCEPT_HIT;
    }
    if context.has_any_hint(cat) {
        score += HINT_HIT;
    }
    score
}

fn bullet_score(cat: &CategoryDef, bullet: &Probe, baseline: f64) -> f64 {
    let concept = if bullet.has_token(&stem(cat.key)) { CONCEPT_HIT } else { 0.0 };
    let phrase = if bullet.has_hint(cat, true) { PHRASE_HIT } else { 0.0 };
    let hint = if bullet.has_hint(cat, false) { HINT_HIT } else { 0.0 };
    (concept + phrase + baseline.max(hint)).min(1.0)
}

fn make_evidence(entries: &[WorkEntry], index: usize, bullet: Option<usize>, score: f64) -> Evidence {
    let entry = &entries[index];
    Evidence {
        work_index: index,
        role: entry.role.clone(),
        company: entry.company.clone(),
        bullet: bullet.and_then(|b| entry.bullets.get(b).cloned()),
        score,
    }
}

pub fn category_coverage(entries: &[WorkEntry], jd_text: &str) -> CategoryCoverage {
    let active = active_categories(jd_text);
    let mut entry_scores = vec![EntryScore::default(); entries.len()];
    if active.is_empty() {
        return CategoryCoverage { items: Vec::new(), entry_scores };
    }

    let contexts: Vec<Probe> = entries.iter().map(|e| Probe::new(&e.context_text())).collect();
    let bullets: Vec<Vec<Probe>> = entries
        .iter()
        .map(|e| e.bullets.iter().map(|b| Probe::new(b)).collect())
        .collect();

    let items = active
        .into_iter()
        .map(|cat| {
            // (entry, bullet, score); first maximum wins
            let mut best_bullet: Option<(usize, usize, f64)> = None;
            let mut best_context: Option<(usize, f64)> = None;

            for (i, entry) in entries.iter().enumerate() {
                let baseline = context_baseline(cat, &contexts[i]);
                if entry.bullets.is_empty() {
                    if best_context.map_or(true, |(_, s)| baseline > s) {
                        best_context = Some((i, baseline));
                    }
                    if baseline > entry_scores[i].score {
                        entry_scores[i] = EntryScore { score: baseline, best_bullet: None };
                    }
                    continue;
                }
                for (j, probe) in bullets[i].iter().enumerate() {
                    let score = bullet_score(cat, probe, baseline);
                    if best_bullet.map_or(true, |(_, _, s)| score > s) {
                        best_bullet = Some((i, j, score));
                    }
                    if score > entry_scores[i].score {
                        entry_scores[i] = EntryScore { score, best_bullet: Some(j) };
                    }
                }
            }

            let top_bullet = best_bullet.map_or(0.0, |(_, _, s)| s);
            let top_context = best_context.map_or(0.0, |(_, s)| s);
            let covered = top_bullet >= BULLET_COVERED || top_context >= CONTEXT_COVERED;

            let strongest = match (best_bullet, best_context) {
                (Some((i, j, s)), Some((_, c))) if s >= c => Some(make_evidence(entries, i, Some(j), s)),
                (_, Some((i, c))) => Some(make_evidence(entries, i, None, c)),
                (Some((i, j, s)), None) => Some(make_evidence(entries, i, Some(j), s)),
                (None, None) => None,
            };

            CoverageItem {
                key: cat.key.to_string(),
                label_en: cat.label_en.to_string(),
                label_zh: cat.label_zh.to_string(),
                covered,
                evidence: strongest.filter(|_| covered),
            }
        })
        .collect();

    CategoryCoverage { items, entry_scores }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_JD: &str = "We are seeking a customer service oriented team member to handle enquiries and quotes, \
        process orders, maintain inventory records, and communicate with clients via email and phone. \
        Experience with front desk/reception is a plus.";

    fn entry(role: &str, company: &str, bullets: &[&str]) -> WorkEntry {
        WorkEntry {
            bullets: bullets.iter().map(|b| b.to_string()).collect(),
            ..WorkEntry::header(Some(role.into()), Some(company.into()), None, false)
        }
    }

    fn item<'a>(cov: &'a CategoryCoverage, key: &str) -> &'a CoverageItem {
        cov.items.iter().find(|i| i.key == key).unwrap()
    }

    #[test]
    fn test_active_categories_from_jd() {
        let keys: Vec<_> = active_categories(SAMPLE_JD).iter().map(|c| c.key).collect();
        for key in ["customer-service", "orders", "inventory", "reception", "communication"] {
            assert!(keys.contains(&key), "{key} should be active");
        }
        assert!(!keys.contains(&"cash-handling"));
        assert!(active_categories("").is_empty());
    }

    #[test]
    fn test_bullet_evidence() {
        let entries = vec![
            entry(
                "Customer Service Representative",
                "Bright Stores",
                &["Handle enquiries and quotes via email and phone", "Process orders and update inventory records"],
            ),
            entry("Sales Assistant", "Market Hub", &["Follow up leads and prepare quotes"]),
        ];
        let cov = category_coverage(&entries, SAMPLE_JD);

        let orders = item(&cov, "orders");
        assert!(orders.covered);
        let ev = orders.evidence.as_ref().unwrap();
        assert_eq!(ev.work_index, 0);
        assert_eq!(ev.bullet.as_deref(), Some("Process orders and update inventory records"));
        assert!(ev.score >= 0.5 && ev.score <= 1.0);

        assert!(cov.entry_scores[0].score >= cov.entry_scores[1].score);
    }

    #[test]
    fn test_context_only_coverage() {
        let entries = vec![
            entry("Customer Service Assistant", "ABC Retail", &[]),
            entry("Receptionist", "XYZ Clinic", &[]),
        ];
        let cov = category_coverage(&entries, SAMPLE_JD);
        let reception = item(&cov, "reception");
        assert!(reception.covered);
        let ev = reception.evidence.as_ref().unwrap();
        assert_eq!(ev.work_index, 1);
        assert_eq!(ev.bullet, None);
        assert_eq!(cov.entry_scores[1].best_bullet, None);
    }

    #[test]
    fn test_uncovered_category_has_no_evidence() {
        let entries = vec![entry("Barista", "Cafe Roma", &["Made coffee for the morning rush"])];
        let cov = category_coverage(&entries, "Handle cash and EFTPOS payments at the till");
        let cash = item(&cov, "cash-handling");
        assert!(!cash.covered);
        assert!(cash.evidence.is_none());
    }

    #[test]
    fn test_adding_keyword_bullet_never_lowers_score() {
        let jd = "Maintain inventory and stock levels";
        let mut entries = vec![entry("Clerk", "Depot", &["Swept floors"])];
        let before = item(&category_coverage(&entries, jd), "inventory")
            .evidence
            .as_ref()
            .map_or(0.0, |e| e.score);
        entries[0].bullets.push("Counted inventory every Friday".into());
        let after = item(&category_coverage(&entries, jd), "inventory").evidence.clone().unwrap();
        assert!(after.score >= before);
        assert!(after.score >= 0.5);
    }

    #[test]
    fn test_empty_jd_scores_nothing() {
        let entries = vec![entry("Clerk", "Depot", &["Counted inventory"])];
        let cov = category_coverage(&entries, "  ");
        assert!(cov.items.is_empty());
        assert_eq!(cov.entry_scores, vec![EntryScore::default()]);
    }
}
