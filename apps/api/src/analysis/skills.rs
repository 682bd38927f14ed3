//! Skill Classifier: splits ranked terms into hard (tool/technical) and soft skills.
//!
//! Rules, first match wins:
//! 1. canonical phrase pattern → fixed label and bucket
//! 2. hard lexicon word or phrase → hard
//! 3. soft hint → soft
//! 4. exclusion filters (digits, org/location/role fragments, leading "during") → dropped
//! 5. anything else → soft

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::resume::{SkillClassification, Term};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Hard,
    Soft,
}

static HARD_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // engineering
        "javascript", "typescript", "python", "java", "c++", "c#", "golang", "ruby", "php",
        "swift", "kotlin", "rust", "react", "vue", "angular", "next", "nuxt", "svelte", "node",
        "express", "nestjs", "webpack", "vite", "tailwind", "css", "scss", "sass", "html",
        "graphql", "rest", "api", "docker", "kubernetes", "k8s", "terraform", "ansible", "linux",
        "unix", "macos", "windows", "aws", "gcp", "azure", "cloud", "mysql", "postgres",
        "postgresql", "mongodb", "redis", "sqlite", "sql", "database", "pytorch", "tensorflow",
        "nlp",
        // design, marketing, commerce and office tools
        "figma", "canva", "photoshop", "illustrator", "premiere", "seo", "sem", "crm",
        "hubspot", "mailchimp", "ga4", "analytics", "shopify", "wordpress", "wix",
        "squarespace", "copywriting", "design", "graphic", "video", "editing", "content", "ads",
        "excel", "spreadsheet", "spreadsheets", "xero", "myob", "quickbooks", "salesforce",
        "zendesk", "sap",
    ]
    .into_iter()
    .collect()
});

static HARD_PHRASES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "after effects",
        "google ads",
        "facebook ads",
        "meta ads",
        "content creation",
        "video editing",
        "graphic design",
        "google analytics",
        "social media management",
        "microsoft office",
        "ms office",
    ]
    .into_iter()
    .collect()
});

/// Canonical phrase patterns tried against the whole term. Terms arrive
/// normalized, so separators may be spaces or hyphens.
static CANONICAL: Lazy<Vec<(Regex, &'static str, Bucket)>> = Lazy::new(|| {
    [
        (r"\bdesign(?:ed|ing)?[\s-]+marketing[\s-]+posters\b", "poster design", Bucket::Hard),
        (r"\bmarketing[\s-]+posters\b", "poster design", Bucket::Hard),
        (r"\bcontent[\s-]+social[\s-]+media\b", "social media content creation", Bucket::Hard),
        (r"\bsocial[\s-]+media[\s-]+content\b", "social media content creation", Bucket::Hard),
        (r"\bsocial[\s-]+media\b", "social media", Bucket::Hard),
        (r"\bgoogle[\s-]+ads?\b", "google ads", Bucket::Hard),
        (r"\b(?:facebook|meta)[\s-]+ads?\b", "facebook/meta ads", Bucket::Hard),
        (r"\bgoogle[\s-]+(?:analytics|ga4)\b", "google analytics", Bucket::Hard),
        (r"\bvideo[\s-]+editing\b", "video editing", Bucket::Hard),
        (r"\bgraphic[\s-]+design\b", "graphic design", Bucket::Hard),
        (r"\bcustomer[\s-]+(?:service|support|care)\b", "customer service", Bucket::Soft),
        (r"\bcash[\s-]+handling\b", "cash handling", Bucket::Soft),
        (r"\bdata[\s-]+entry\b", "data entry", Bucket::Hard),
    ]
    .into_iter()
    .map(|(p, label, bucket)| (Regex::new(&format!("(?i){p}")).expect("canonical skill pattern"), label, bucket))
    .collect()
});

/// Words that are soft skills in their own right. Checked before exclusions
/// so e.g. "team leadership" survives the role filter.
static SOFT_HINTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "communication", "teamwork", "collaboration", "leadership", "problem-solving",
        "reception", "scheduling", "inventory", "orders", "sales", "negotiation", "multitasking",
        "organization", "organizational", "punctual", "reliable", "adaptable", "empathy",
        "沟通", "团队合作", "领导力", "客户服务", "接待", "收银",
    ]
    .into_iter()
    .collect()
});

static NON_SKILL_PARTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // places and schools
        "melbourne", "sydney", "brisbane", "perth", "adelaide", "beijing", "shanghai", "york",
        "los", "angeles", "london", "paris", "tokyo", "university", "college", "school",
        "academy", "institute", "campus", "rmit", "vic", "nsw",
        // brands and organizations
        "kfc", "mcdonald", "mcdonalds", "starbucks", "woolworths", "coles",
        // roles
        "crew", "member", "student", "intern", "assistant", "coordinator", "manager", "host",
        "hostess", "cashier", "server", "waiter", "waitress",
        // generic non-skills
        "provided", "provide", "brand", "designed", "designing", "created", "creating",
        "during", "customers", "through", "assisted", "engagement", "supported", "visual",
        "posters",
    ]
    .into_iter()
    .collect()
});

static ORG_LIKE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(company|\binc\.?|\bco\.|corp\.?|\bltd\.?|\bllc\b|\bpty\b|studio|agency|group)")
        .expect("org pattern")
});

static LOC_LIKE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(melbourne|sydney|brisbane|beijing|shanghai|new\s+york|los\s+angeles|london|paris|tokyo)")
        .expect("location pattern")
});

static ROLE_LIKE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(crew|member|student|intern|assistant|coordinator|manager|host|hostess|cashier|server|waiter|waitress)")
        .expect("role pattern")
});

static SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s-]+").expect("split pattern"));

fn classify_one(raw: &str) -> Option<(String, Bucket)> {
    if let Some((_, label, bucket)) = CANONICAL.iter().find(|(re, _, _)| re.is_match(raw)) {
        return Some((label.to_string(), *bucket));
    }

    let parts: Vec<String> = SPLIT
        .split(raw.trim())
        .filter(|p| !p.is_empty())
        .map(|p| p.to_lowercase())
        .collect();
    if parts.is_empty() {
        return None;
    }
    let label = parts.join(" ");

    let is_hard = HARD_PHRASES.contains(label.as_str())
        || parts.iter().any(|p| HARD_WORDS.contains(p.as_str()));
    if is_hard {
        return Some((label, Bucket::Hard));
    }

    let is_soft_hint = SOFT_HINTS.contains(raw.trim().to_lowercase().as_str())
        || parts.iter().any(|p| SOFT_HINTS.contains(p.as_str()));
    if is_soft_hint {
        return Some((label, Bucket::Soft));
    }

    let excluded = raw.chars().any(|c| c.is_ascii_digit())
        || parts.iter().any(|p| NON_SKILL_PARTS.contains(p.as_str()))
        || ORG_LIKE.is_match(raw)
        || LOC_LIKE.is_match(raw)
        || ROLE_LIKE.is_match(raw)
        || parts.first().is_some_and(|p| p == "during");
    if excluded {
        return None;
    }

    Some((label, Bucket::Soft))
}

/// Classifies terms into disjoint, deduplicated hard/soft lists, in first-seen order.
pub fn classify_skills(terms: &[Term]) -> SkillClassification {
    classify_texts(terms.iter().map(|t| t.text.as_str()))
}

pub fn classify_texts<'a>(texts: impl IntoIterator<Item = &'a str>) -> SkillClassification {
    let mut out = SkillClassification::default();
    let mut seen = HashSet::new();

    for text in texts {
        let Some((label, bucket)) = classify_one(text) else {
            continue;
        };
        // one label, one bucket: whichever claims it first
        if !seen.insert(label.clone()) {
            continue;
        }
        match bucket {
            Bucket::Hard => out.hard.push(label),
            Bucket::Soft => out.soft.push(label),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(words: &[&str]) -> SkillClassification {
        classify_texts(words.iter().copied())
    }

    #[test]
    fn test_canonical_patterns_win() {
        let s = classify(&["customer-service", "social media content", "google ad"]);
        assert_eq!(s.soft, vec!["customer service"]);
        assert_eq!(s.hard, vec!["social media content creation", "google ads"]);
    }

    #[test]
    fn test_hard_lexicon_matches_any_part() {
        let s = classify(&["python scripting", "after effects", "excel"]);
        assert_eq!(s.hard, vec!["python scripting", "after effects", "excel"]);
        assert!(s.soft.is_empty());
    }

    #[test]
    fn test_exclusions_drop_non_skills() {
        let s = classify(&["melbourne cbd", "crew member", "2019", "during peak", "acme pty ltd", "friendly"]);
        assert!(s.hard.is_empty());
        assert_eq!(s.soft, vec!["friendly"]);
    }

    #[test]
    fn test_soft_hint_survives_role_filter() {
        let s = classify(&["team leadership"]);
        assert_eq!(s.soft, vec!["team leadership"]);
    }

    #[test]
    fn test_buckets_are_disjoint_and_deduplicated() {
        let s = classify(&["customer service", "customer-service", "design", "design", "customer care"]);
        assert_eq!(s.soft, vec!["customer service"]);
        assert_eq!(s.hard, vec!["design"]);
        let hard: HashSet<_> = s.hard.iter().collect();
        assert!(s.soft.iter().all(|l| !hard.contains(l)));
    }

    #[test]
    fn test_classify_skills_reads_term_text() {
        use crate::models::resume::TermKind;
        let terms = vec![Term { text: "figma".into(), frequency: 2, kind: TermKind::Unigram }];
        assert_eq!(classify_skills(&terms).hard, vec!["figma"]);
    }
}
