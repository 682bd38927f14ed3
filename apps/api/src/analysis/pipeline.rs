//! The shared analysis entry point. Single and batch requests both go
//! through [`analyze`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::contact::extract_contact;
use crate::analysis::content_selector::{select_experiences, SelectionParams};
use crate::analysis::coverage::category_coverage;
use crate::analysis::education::extract_education;
use crate::analysis::experience::{parse_work_experience_with, ParseOptions};
use crate::analysis::fit_scoring::{coverage_pct, match_requirements};
use crate::analysis::jd_parser::extract_requirements;
use crate::analysis::skills::classify_skills;
use crate::analysis::text::top_terms;
use crate::models::coverage::{CoverageItem, RequirementMatch, SelectionResult};
use crate::models::resume::{ContactInfo, EducationEntry, SkillClassification, Term, WorkEntry};

const HIGHLIGHT_JD_TERMS: usize = 20;
const HIGHLIGHT_RESUME_TERMS: usize = 10;

/// Tunables for one analysis run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    pub parse: ParseOptions,
    pub selection: SelectionParams,
}

/// Everything the engine derives from one résumé/JD pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub contact: ContactInfo,
    pub education: Vec<EducationEntry>,
    pub work_experience: Vec<WorkEntry>,
    pub resume_terms: Vec<Term>,
    pub jd_terms: Vec<Term>,
    pub resume_skills: SkillClassification,
    pub jd_skills: SkillClassification,
    /// JD terms that also rank among the résumé terms.
    pub jd_matched_skills: Vec<String>,
    pub requirements: Vec<String>,
    pub requirement_matches: Vec<RequirementMatch>,
    pub coverage_pct: u32,
    pub category_coverage: Vec<CoverageItem>,
    pub selection: SelectionResult,
    pub highlight_terms: Vec<String>,
}

/// Coverage items plus a fresh selection for caller-supplied entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reselection {
    pub category_coverage: Vec<CoverageItem>,
    pub selection: SelectionResult,
}

fn highlight_terms(jd_terms: &[Term], resume_terms: &[Term]) -> Vec<String> {
    let mut seen = HashSet::new();
    jd_terms
        .iter()
        .take(HIGHLIGHT_JD_TERMS)
        .chain(resume_terms.iter().take(HIGHLIGHT_RESUME_TERMS))
        .filter(|t| seen.insert(t.text.as_str()))
        .map(|t| t.text.clone())
        .collect()
}

/// Scores `entries` against the JD and partitions them.
pub fn reselect(entries: &[WorkEntry], jd_text: &str, params: &SelectionParams) -> Reselection {
    let coverage = category_coverage(entries, jd_text);
    let selection = select_experiences(entries, &coverage.entry_scores, jd_text, params);
    Reselection {
        category_coverage: coverage.items,
        selection,
    }
}

/// Runs every extractor and scorer over one résumé and an optional JD.
/// Never fails; empty input yields an empty report.
pub fn analyze(resume_text: &str, jd_text: Option<&str>, config: &EngineConfig) -> AnalysisReport {
    let jd_text = jd_text.unwrap_or_default();

    let work_experience = parse_work_experience_with(resume_text, &config.parse);
    let resume_terms = top_terms(resume_text);
    let jd_terms = top_terms(jd_text);

    let resume_term_set: HashSet<&str> = resume_terms.iter().map(|t| t.text.as_str()).collect();
    let jd_matched_skills = jd_terms
        .iter()
        .filter(|t| resume_term_set.contains(t.text.as_str()))
        .map(|t| t.text.clone())
        .collect();

    let requirements = extract_requirements(jd_text);
    let requirement_matches = match_requirements(&requirements, &work_experience, &jd_terms);
    let Reselection { category_coverage, selection } =
        reselect(&work_experience, jd_text, &config.selection);

    debug!(
        entries = work_experience.len(),
        requirements = requirements.len(),
        categories = category_coverage.len(),
        "analysis complete"
    );

    AnalysisReport {
        contact: extract_contact(resume_text),
        education: extract_education(resume_text),
        resume_skills: classify_skills(&resume_terms),
        jd_skills: classify_skills(&jd_terms),
        highlight_terms: highlight_terms(&jd_terms, &resume_terms),
        coverage_pct: coverage_pct(&requirement_matches),
        jd_matched_skills,
        requirements,
        requirement_matches,
        category_coverage,
        selection,
        work_experience,
        resume_terms,
        jd_terms,
    }
}
