use serde::{Deserialize, Serialize};

use crate::models::resume::WorkEntry;

/// The single best résumé support for a covered category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub work_index: usize,
    pub role: Option<String>,
    pub company: Option<String>,
    /// `None` when the support comes from role/company context alone.
    pub bullet: Option<String>,
    pub score: f64, // 0.0 – 1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageItem {
    pub key: String,
    pub label_en: String,
    pub label_zh: String,
    pub covered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Evidence>,
}

/// Résumé bullets (or role/company context) supporting one JD requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementMatch {
    pub requirement: String,
    pub bullets: Vec<String>, // at most 4, each scoring >= 0.2
    pub score: f64,
}

/// Ranked two-tier partition of work entries. Not necessarily exhaustive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub primary: Vec<WorkEntry>,
    pub additional: Vec<WorkEntry>,
}
