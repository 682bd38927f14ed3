use serde::{Deserialize, Serialize};

/// One work or volunteer position recovered from résumé text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Normalized as `"<start> - <end>"` when a date range was detected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default)]
    pub volunteer: bool,
}

impl WorkEntry {
    /// Builds an entry with no bullets, dropping blank fields.
    pub fn header(
        role: Option<String>,
        company: Option<String>,
        period: Option<String>,
        volunteer: bool,
    ) -> Self {
        let non_blank = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        Self {
            role: non_blank(role),
            company: non_blank(company),
            period: non_blank(period),
            bullets: Vec::new(),
            volunteer,
        }
    }

    /// Role and company joined with a space. This is the "context" text used when
    /// an entry has no bullets to score.
    pub fn context_text(&self) -> String {
        [self.role.as_deref(), self.company.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermKind {
    Unigram,
    Bigram,
    Trigram,
}

/// A normalized word or phrase with its frequency inside one corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub text: String,
    pub frequency: u32,
    pub kind: TermKind,
}

/// Hard (tool/technical) vs soft (general) skills. The two lists are disjoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillClassification {
    pub hard: Vec<String>,
    pub soft: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    /// One of Bachelor, Master, PhD, MBA, Associate, Diploma, Certificate.
    pub degree: Option<String>,
    pub field: Option<String>,
    pub school: Option<String>,
    pub period: Option<String>,
}

impl EducationEntry {
    pub fn field_count(&self) -> usize {
        [&self.degree, &self.field, &self.school, &self.period]
            .iter()
            .filter(|f| f.is_some())
            .count()
    }
}
