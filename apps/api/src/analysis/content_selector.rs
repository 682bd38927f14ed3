//! Content Selector: ranks parsed entries and splits them into primary and
//! additional tiers for the generated document.
//!
//! Algorithm:
//! 1. Rank by best category score (stable, descending)
//! 2. If every score is zero, rescore by whole-JD token/bigram overlap
//! 3. If still zero, fall back to non-volunteer entries in document order
//! 4. `primary` = top `min_primary`, best-matching bullet moved to the front
//! 5. `additional` = next `additional_count`, preferring non-volunteer,
//!    higher score, more bullets; bullets capped
//! 6. Each tier is presented most recent first

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::analysis::coverage::EntryScore;
use crate::analysis::fit_scoring::{overlap_score, Scorable, BULLET_WEIGHTS, CONTEXT_WEIGHTS};
use crate::analysis::period::sort_by_recency;
use crate::models::coverage::SelectionResult;
use crate::models::resume::WorkEntry;

/// Tier sizes for selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionParams {
    pub min_primary: usize,
    pub additional_count: usize,
    pub additional_bullet_cap: usize,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            min_primary: 2,
            additional_count: 1,
            additional_bullet_cap: 3,
        }
    }
}

/// An entry index with its relevance.
#[derive(Debug, Clone, Copy)]
struct RankedEntry {
    index: usize,
    score: f64,
    best_bullet: Option<usize>,
}

fn by_score_desc(a: &RankedEntry, b: &RankedEntry) -> Ordering {
    b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal)
}

/// Whole-JD overlap against each entry's bullets and role/company context.
fn rank_by_jd_overlap(entries: &[WorkEntry], jd_text: &str) -> Vec<RankedEntry> {
    let query = Scorable::new(jd_text);
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let context = Scorable::new(&entry.context_text());
            let mut ranked = RankedEntry {
                index,
                score: overlap_score(&query, &[], &context, CONTEXT_WEIGHTS),
                best_bullet: None,
            };
            for (j, bullet) in entry.bullets.iter().enumerate() {
                let score = overlap_score(&query, &[], &Scorable::new(bullet), BULLET_WEIGHTS);
                if score > ranked.score {
                    ranked.score = score;
                    ranked.best_bullet = Some(j);
                }
            }
            ranked
        })
        .collect()
}

fn rank(entries: &[WorkEntry], scores: &[EntryScore], jd_text: &str) -> Vec<RankedEntry> {
    let from_categories: Vec<RankedEntry> = (0..entries.len())
        .map(|index| {
            let s = scores.get(index).copied().unwrap_or_default();
            RankedEntry { index, score: s.score, best_bullet: s.best_bullet }
        })
        .collect();

    let mut ranked = if from_categories.iter().any(|r| r.score > 0.0) {
        from_categories
    } else {
        rank_by_jd_overlap(entries, jd_text)
    };

    if ranked.iter().all(|r| r.score <= 0.0) {
        // nothing matched at all: keep paid work in document order
        return ranked
            .into_iter()
            .filter(|r| !entries[r.index].volunteer)
            .collect();
    }

    // stable: ties keep document order
    ranked.sort_by(by_score_desc);
    ranked
}

/// Moves the best bullet to the front and drops case-insensitive duplicates.
fn lead_with_best(entry: &WorkEntry, best_bullet: Option<usize>) -> WorkEntry {
    let mut bullets = entry.bullets.clone();
    if let Some(best) = best_bullet.filter(|b| *b < bullets.len()) {
        let lead = bullets.remove(best);
        bullets.insert(0, lead);
    }
    let mut seen = HashSet::new();
    bullets.retain(|b| seen.insert(b.trim().to_lowercase()));
    WorkEntry { bullets, ..entry.clone() }
}

pub fn select_experiences(
    entries: &[WorkEntry],
    scores: &[EntryScore],
    jd_text: &str,
    params: &SelectionParams,
) -> SelectionResult {
    let ranked = rank(entries, scores, jd_text);
    let split = params.min_primary.min(ranked.len());
    let (top, rest) = ranked.split_at(split);

    let mut primary: Vec<WorkEntry> = top
        .iter()
        .map(|r| lead_with_best(&entries[r.index], r.best_bullet))
        .collect();

    let mut remainder = rest.to_vec();
    remainder.sort_by(|a, b| {
        let (ea, eb) = (&entries[a.index], &entries[b.index]);
        ea.volunteer
            .cmp(&eb.volunteer)
            .then_with(|| by_score_desc(a, b))
            .then_with(|| eb.bullets.len().cmp(&ea.bullets.len()))
            .then_with(|| a.index.cmp(&b.index))
    });

    let mut additional: Vec<WorkEntry> = remainder
        .iter()
        .take(params.additional_count)
        .map(|r| {
            let mut entry = lead_with_best(&entries[r.index], r.best_bullet);
            entry.bullets.truncate(params.additional_bullet_cap);
            entry
        })
        .collect();

    sort_by_recency(&mut primary);
    sort_by_recency(&mut additional);

    SelectionResult { primary, additional }
}
