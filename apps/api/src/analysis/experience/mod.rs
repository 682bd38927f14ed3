//! Work-Experience Parser: a line-oriented state machine that segments
//! résumé text into work and volunteer entries.
//!
//! Every line is checked, in order, against:
//! 1. section headers (toggle work/volunteer/other, close the open entry)
//! 2. the header detectors, in their configured order
//! 3. the bullet stage (unlabeled headers, volunteer splits, bullets)

pub mod detectors;
pub mod patterns;

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::analysis::period::{find_period, strip_period};
use crate::models::resume::WorkEntry;

use self::detectors::{DetectorTier, HeaderDetector, HeaderMatch, PeriodAnchoredDetector};
use self::patterns::{
    company_looks_valid, derive_role_part, extract_company_from_role, is_location_line,
    is_noise_line, is_volunteer_marker, role_looks_valid, role_looks_valid_within,
    trim_separators, trim_trailing_punct, ACTION_VERB, BULLET_PREFIX, ORG_HINT_VOL, ROLE_HINT,
    VOL_SIGNAL,
};

const RECLAIM_WINDOW: usize = 3;
const MIN_BULLET_CHARS: usize = 8;

static WORK_SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:(?:(?:relevant|professional)\s+)?(?:work|professional|employment|career|job)\s+(?:experience|history|background)|experience|employment|工作\s*经历|工作经验|实习经历|职业经历|工作履历)\s*:?$",
    )
    .expect("work section pattern")
});

static VOLUNTEER_SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:volunteer(?:ing)?(?:\s+(?:experience|work|history))?|community\s+(?:involvement|service)|志愿者?\s*经历|志愿服务)\s*:?$",
    )
    .expect("volunteer section pattern")
});

static OTHER_SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:education(?:al)?(?:\s+background)?|(?:(?:technical|key|core)\s+)?skills?|projects?|certifications?|awards?|publications?|references?|languages?|interests?|hobbies|summary|profile|(?:career\s+)?objective|about\s+me|contact|教育背景|教育经历|教育|技能|项目经历|证书|荣誉|个人简介|联系方式)\s*:?$",
    )
    .expect("other section pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Work,
    Volunteer,
    Other,
}

fn section_of(line: &str) -> Option<Section> {
    let line = line.trim();
    if WORK_SECTION.is_match(line) {
        Some(Section::Work)
    } else if VOLUNTEER_SECTION.is_match(line) {
        Some(Section::Volunteer)
    } else if OTHER_SECTION.is_match(line) {
        Some(Section::Other)
    } else {
        None
    }
}

/// Tunable parser behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    /// Header detectors, tried in this order; the first match wins.
    pub tiers: Vec<DetectorTier>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            tiers: DetectorTier::DEFAULT_ORDER.to_vec(),
        }
    }
}

struct Parser<'o> {
    options: &'o ParseOptions,
    items: Vec<WorkEntry>,
    current: Option<usize>,
    section: Section,
}

impl<'o> Parser<'o> {
    fn new(options: &'o ParseOptions) -> Self {
        Self {
            options,
            items: Vec::new(),
            current: None,
            section: Section::Work,
        }
    }

    fn start_entry(&mut self, header: HeaderMatch) {
        let volunteer = self.section == Section::Volunteer
            || is_volunteer_marker(header.role.as_deref(), header.company.as_deref());
        let entry = WorkEntry::header(header.role, header.company, header.period, volunteer);
        self.items.push(entry);
        self.current = Some(self.items.len() - 1);
    }

    fn detect_header(&self, line: &str) -> Option<(&'static dyn HeaderDetector, HeaderMatch)> {
        self.options.tiers.iter().find_map(|tier| {
            let detector = tier.detector();
            detector.detect(line).map(|m| (detector, m))
        })
    }

    /// Returns true when the following line was consumed as part of this one.
    fn feed(&mut self, line: &str, next: Option<&str>) -> bool {
        if let Some(section) = section_of(line) {
            debug!(?section, line, "section header");
            self.section = section;
            self.current = None;
            return false;
        }

        if let Some((detector, header)) = self.detect_header(line) {
            let tier = detector.tier();
            if self.section == Section::Other {
                // skills lines ("Customer Service Excellence", "Excel | Canva") look
                // like headers too; undated ones need a delimiter and a job title
                let titled = header.role.as_deref().is_some_and(|r| ROLE_HINT.is_match(r));
                if header.period.is_none() && !(tier == DetectorTier::Delimiter && titled) {
                    return false;
                }
                self.section = Section::Work;
            }
            debug!(%tier, role = ?header.role, company = ?header.company, "header line");
            self.start_entry(header);
            return false;
        }

        if self.section == Section::Other {
            return false;
        }
        self.bullet_stage(line, next)
    }

    fn bullet_stage(&mut self, line: &str, next: Option<&str>) -> bool {
        let glyph = BULLET_PREFIX.is_match(line);
        let stripped = BULLET_PREFIX.replace(line, "");
        let cleaned = stripped
            .trim()
            .trim_end_matches(|c: char| matches!(c, '.' | ';' | ':' | ',') || c.is_whitespace())
            .to_string();
        if cleaned.is_empty() || is_location_line(&cleaned) || is_noise_line(&cleaned) {
            return false;
        }

        if cleaned.chars().count() > MIN_BULLET_CHARS {
            let period = find_period(&cleaned);

            if period.is_none() && !glyph {
                if let Some((header, consumed)) = unlabeled_header(&cleaned, next) {
                    debug!(role = ?header.role, consumed, "unlabeled header");
                    self.start_entry(header);
                    return consumed;
                }
            }

            if let Some(period) = period {
                let before = strip_period(&cleaned, &period);
                let before = trim_separators(&before).to_string();

                if before.is_empty() {
                    // a bare date line completes the open entry's header
                    if let Some(idx) = self.current {
                        let entry = &mut self.items[idx];
                        if entry.period.is_none() {
                            entry.period = Some(period.normalized);
                        }
                    }
                    return false;
                }

                if looks_like_organization(&before) {
                    self.reclaim_volunteer(before, period.normalized);
                    return false;
                }

                if let Some(header) = PeriodAnchoredDetector.detect(&cleaned) {
                    debug!(role = ?header.role, "dated header in bullet stream");
                    self.start_entry(header);
                    return false;
                }

                let role = derive_role_part(&before, None);
                if role_looks_valid_within(&role, 10) {
                    debug!(%role, "loose dated header");
                    self.start_entry(HeaderMatch {
                        role: Some(role),
                        company: None,
                        period: Some(period.normalized),
                    });
                    return false;
                }
            }
        }

        match self.current {
            Some(idx) => {
                let in_volunteer = self.section == Section::Volunteer;
                let entry = &mut self.items[idx];
                if in_volunteer || VOL_SIGNAL.is_match(&cleaned) || ORG_HINT_VOL.is_match(&cleaned) {
                    entry.volunteer = true;
                }
                entry.bullets.push(cleaned);
            }
            None => debug!(line = cleaned.as_str(), "dropped line before first entry"),
        }
        false
    }

    /// Splits "Organization Jan 2023 – Present" into a `Volunteer` entry and
    /// moves trailing volunteer-flavored bullets of the open entry into it.
    fn reclaim_volunteer(&mut self, organization: String, period: String) {
        let mut moved = Vec::new();
        if let Some(idx) = self.current {
            let in_volunteer = self.section == Section::Volunteer;
            let source = &mut self.items[idx];
            let window_start = source.bullets.len().saturating_sub(RECLAIM_WINDOW);
            let mut k = window_start;
            while k < source.bullets.len() {
                if VOL_SIGNAL.is_match(&source.bullets[k]) {
                    moved.push(source.bullets.remove(k));
                } else {
                    k += 1;
                }
            }
            if !moved.is_empty() {
                // the flag may have come only from the bullets that just left
                source.volunteer = in_volunteer
                    || is_volunteer_marker(source.role.as_deref(), source.company.as_deref())
                    || source.bullets.iter().any(|b| VOL_SIGNAL.is_match(b) || ORG_HINT_VOL.is_match(b));
            }
        }
        debug!(%organization, moved = moved.len(), "volunteer split");

        let org_key = organization.to_lowercase();
        let existing = self.items.iter().position(|w| {
            w.role.as_deref().is_some_and(|r| r.eq_ignore_ascii_case("volunteer"))
                && w.company
                    .as_deref()
                    .is_some_and(|c| trim_trailing_punct(c).to_lowercase() == org_key)
                && w.period
                    .as_deref()
                    .is_some_and(|p| p.to_lowercase() == period.to_lowercase())
        });

        match existing {
            Some(idx) => {
                let entry = &mut self.items[idx];
                union_bullets(&mut entry.bullets, moved);
                entry.volunteer = true;
                self.current = Some(idx);
            }
            None => {
                let mut entry = WorkEntry::header(
                    Some("Volunteer".to_string()),
                    Some(organization),
                    Some(period),
                    true,
                );
                entry.bullets = moved;
                self.items.push(entry);
                self.current = Some(self.items.len() - 1);
            }
        }
    }
}

/// A header-like line without its own date range, confirmed by the next line
/// (a bare date range or a company name) or by a company glued to its tail.
fn unlabeled_header(line: &str, next: Option<&str>) -> Option<(HeaderMatch, bool)> {
    let glued = extract_company_from_role(line);
    let role = derive_role_part(line, glued.as_deref());
    if !role_looks_valid(&role) {
        return None;
    }

    let next = next.map(str::trim).filter(|n| !n.is_empty());
    let next_period = next.and_then(|n| {
        let p = find_period(n)?;
        let rest = strip_period(n, &p);
        let rest = trim_separators(&rest).to_string();
        if rest.is_empty() {
            Some((p.normalized, None))
        } else if company_looks_valid(&rest) {
            Some((p.normalized, Some(rest)))
        } else {
            None
        }
    });
    let next_company = next
        .filter(|n| find_period(n).is_none() && company_looks_valid(n))
        .map(|n| trim_trailing_punct(n).to_string());

    if let Some((period, rest_company)) = next_period {
        let company = glued.or(rest_company);
        return Some((HeaderMatch { role: Some(role), company, period: Some(period) }, true));
    }
    if glued.is_some() {
        return Some((HeaderMatch { role: Some(role), company: glued, period: None }, false));
    }
    next_company.map(|company| {
        (HeaderMatch { role: Some(role), company: Some(company), period: None }, true)
    })
}

fn looks_like_organization(text: &str) -> bool {
    !text.is_empty()
        && ORG_HINT_VOL.is_match(text)
        && !ACTION_VERB.is_match(text)
        && !text.starts_with(|c: char| c.is_lowercase())
}

fn union_bullets(into: &mut Vec<String>, more: Vec<String>) {
    let mut seen: HashSet<String> = into.iter().map(|b| b.to_lowercase()).collect();
    for bullet in more {
        if seen.insert(bullet.to_lowercase()) {
            into.push(bullet);
        }
    }
}

fn key_part(value: Option<&str>) -> String {
    trim_trailing_punct(value.unwrap_or_default().trim()).to_lowercase()
}

/// Normalized `role|company|period` identity of an entry.
pub fn entry_key(entry: &WorkEntry) -> String {
    format!(
        "{}|{}|{}",
        key_part(entry.role.as_deref()),
        key_part(entry.company.as_deref()),
        key_part(entry.period.as_deref())
    )
}

/// Merges entries sharing a key: bullets unioned case-insensitively, volunteer
/// flags OR'd, missing fields backfilled. Keeps first-seen order. Idempotent.
pub fn merge_entries(entries: Vec<WorkEntry>) -> Vec<WorkEntry> {
    let mut merged: Vec<WorkEntry> = Vec::with_capacity(entries.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let key = entry_key(&entry);
        match index.get(&key) {
            None => {
                index.insert(key, merged.len());
                merged.push(entry);
            }
            Some(&at) => {
                let is_volunteer_role = key_part(entry.role.as_deref()) == "volunteer";
                let existing = &mut merged[at];
                union_bullets(&mut existing.bullets, entry.bullets);
                existing.volunteer |= entry.volunteer || is_volunteer_role;
                if existing.company.is_none() {
                    existing.company = entry.company;
                }
                if existing.period.is_none() {
                    existing.period = entry.period;
                }
            }
        }
    }
    merged
}

pub fn parse_work_experience_with(text: &str, options: &ParseOptions) -> Vec<WorkEntry> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let mut parser = Parser::new(options);

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        if line.is_empty() {
            i += 1;
            continue;
        }
        let next = lines[i + 1..].iter().copied().find(|l| !l.is_empty());
        let consumed = parser.feed(line, next);
        i += 1;
        if consumed {
            // skip blank lines up to and including the consumed one
            while i < lines.len() && lines[i].is_empty() {
                i += 1;
            }
            i += 1;
        }
    }

    merge_entries(parser.items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_work_experience(text: &str) -> Vec<WorkEntry> {
        parse_work_experience_with(text, &ParseOptions::default())
    }

    fn entry(role: &str, company: Option<&str>, period: Option<&str>, bullets: &[&str]) -> WorkEntry {
        let mut e = WorkEntry::header(Some(role.into()), company.map(String::from), period.map(String::from), false);
        e.bullets = bullets.iter().map(|b| b.to_string()).collect();
        e
    }

    #[test]
    fn test_single_delimiter_header_yields_one_empty_entry() {
        let got = parse_work_experience("Customer Service Manager | Bright Stores | Jan 2022 - Present");
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].role.as_deref(), Some("Customer Service Manager"));
        assert_eq!(got[0].company.as_deref(), Some("Bright Stores"));
        assert_eq!(got[0].period.as_deref(), Some("Jan 2022 - Present"));
        assert!(got[0].bullets.is_empty());
        assert!(!got[0].volunteer);
    }

    #[test]
    fn test_volunteer_section_organization_line() {
        let text = "VOLUNTEER EXPERIENCE\n\
                    Bethel Bread of Life Church Jan 2023 – Present\n\
                    • Served meals to community members every Sunday\n\
                    • Sorted donations";
        let got = parse_work_experience(text);
        assert_eq!(got.len(), 1);
        let v = &got[0];
        assert!(v.volunteer);
        assert_eq!(v.role.as_deref(), Some("Volunteer"));
        assert_eq!(v.company.as_deref(), Some("Bethel Bread of Life Church"));
        assert_eq!(v.period.as_deref(), Some("Jan 2023 - Present"));
        assert_eq!(v.bullets, vec!["Served meals to community members every Sunday", "Sorted donations"]);
    }

    #[test]
    fn test_full_resume_segments_entries_and_skips_education() {
        let text = r#"Jane Smith
jane@example.com | 0412 345 678

WORK EXPERIENCE
Customer Service Manager | Bright Stores | Jan 2022 - Present
• Handled customer enquiries via phone and email
• Processed orders and maintained inventory records.
Sales Assistant @ Acme Co
Jan 2019 - Dec 2021
- Served customers at the front counter

EDUCATION
Bachelor of Business, RMIT University 2015 - 2018
"#;
        let got = parse_work_experience(text);
        assert_eq!(got.len(), 2, "{got:#?}");
        assert_eq!(got[0].bullets.len(), 2);
        assert_eq!(got[0].bullets[1], "Processed orders and maintained inventory records");
        assert_eq!(got[1].role.as_deref(), Some("Sales Assistant"));
        assert_eq!(got[1].company.as_deref(), Some("Acme Co"));
        assert_eq!(got[1].period.as_deref(), Some("Jan 2019 - Dec 2021"));
        assert_eq!(got[1].bullets, vec!["Served customers at the front counter"]);
    }

    #[test]
    fn test_bullets_never_hold_header_lines() {
        let text = "Barista at Cafe Roma\n- Made coffee\nReceptionist - Harbour Dental 2019 - 2021\n- Booked appointments";
        let got = parse_work_experience(text);
        assert_eq!(got.len(), 2);
        assert!(got.iter().all(|e| e.bullets.len() == 1));
    }

    #[test]
    fn test_volunteer_reclaim_moves_trailing_signal_bullets() {
        let text = "WORK EXPERIENCE\n\
                    Barista @ Cafe Roma | Jan 2020 - Dec 2022\n\
                    • Made coffee for 200 customers daily\n\
                    • Volunteered at church food drive\n\
                    Bethel Bread of Life Church Jan 2023 – Present\n\
                    • Packed food parcels";
        let got = parse_work_experience(text);
        assert_eq!(got.len(), 2, "{got:#?}");
        assert_eq!(got[0].bullets, vec!["Made coffee for 200 customers daily"]);
        assert!(!got[0].volunteer);
        assert!(got[1].volunteer);
        assert_eq!(got[1].bullets, vec!["Volunteered at church food drive", "Packed food parcels"]);
    }

    #[test]
    fn test_other_sections_are_ignored() {
        let text = "SKILLS\nCustomer Service Excellence\nExcel, Canva\nREFERENCES\nAvailable on request";
        assert!(parse_work_experience(text).is_empty());
    }

    #[test]
    fn test_career_history_after_summary_block() {
        let text = "SUMMARY\n\
                    Friendly and reliable student.\n\
                    CAREER HISTORY\n\
                    Barista @ Cafe Roma\n\
                    - Made coffee for 200 customers\n\
                    Sales Assistant | Bright Stores\n\
                    - Restocked shelves";
        let got = parse_work_experience(text);
        assert_eq!(got.len(), 2, "{got:#?}");
        assert_eq!(got[0].role.as_deref(), Some("Barista"));
        assert_eq!(got[0].company.as_deref(), Some("Cafe Roma"));
        assert_eq!(got[0].bullets, vec!["Made coffee for 200 customers"]);
        assert_eq!(got[1].role.as_deref(), Some("Sales Assistant"));
        assert_eq!(got[1].company.as_deref(), Some("Bright Stores"));
        assert_eq!(got[1].bullets, vec!["Restocked shelves"]);
    }

    #[test]
    fn test_undated_delimiter_header_leaves_other_section() {
        let text = "PROFILE\n\
                    Friendly and reliable student.\n\
                    Barista @ Cafe Roma\n\
                    - Made coffee for 200 customers";
        let got = parse_work_experience(text);
        assert_eq!(got.len(), 1, "{got:#?}");
        assert_eq!(got[0].company.as_deref(), Some("Cafe Roma"));
        assert_eq!(got[0].bullets, vec!["Made coffee for 200 customers"]);
    }

    #[test]
    fn test_skills_lines_stay_out_of_work_entries() {
        let text = "SKILLS\nExcel | Canva\nCustomer Service Excellence";
        assert!(parse_work_experience(text).is_empty());
    }

    #[test]
    fn test_tier_order_is_configurable() {
        let line = "Cashier    Fresh Mart    Jan 2018    Dec 2019";
        assert_eq!(parse_work_experience(line).len(), 1);
        let none = ParseOptions { tiers: vec![] };
        assert!(parse_work_experience_with(line, &none).is_empty());
    }

    #[test]
    fn test_merge_unions_and_backfills() {
        let a = entry("Barista", Some("Cafe Roma"), None, &["Made coffee"]);
        let mut b = entry("barista", Some("Cafe Roma."), None, &["made coffee", "Cleaned tables"]);
        b.volunteer = true;
        let merged = merge_entries(vec![a, b]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].bullets, vec!["Made coffee", "Cleaned tables"]);
        assert!(merged[0].volunteer);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let entries = vec![
            entry("Barista", Some("Cafe Roma"), Some("2019 - 2020"), &["a", "b"]),
            entry("Barista", Some("Cafe Roma"), Some("2019 - 2020 "), &["B", "c"]),
            entry("Volunteer", Some("Church"), None, &["x"]),
            entry("Cook", None, None, &[]),
        ];
        let once = merge_entries(entries);
        let twice = merge_entries(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 3);
    }

    #[test]
    fn test_entry_key_normalizes_case_and_trailing_punctuation() {
        let a = entry("Barista.", Some("Cafe Roma;"), Some("2019 - 2020"), &[]);
        let b = entry("barista", Some("cafe roma"), Some("2019 - 2020"), &[]);
        assert_eq!(entry_key(&a), entry_key(&b));
    }
}
