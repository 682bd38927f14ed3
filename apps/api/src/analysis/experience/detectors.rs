//! Header detector strategies. Each one looks at a single line and either
//! recognizes a role/company/period header or declines.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::experience::patterns::{
    company_looks_valid, derive_role_part, extract_company_from_role, role_looks_valid, split_camel,
    tail_proper_run, trim_separators, trim_trailing_punct, COLUMN_GAP, DELIMITER, EMPLOYMENT_TYPE,
    LOC_HINT, MONTHS,
};
use crate::analysis::period::{find_period, strip_period};

/// A recognized header line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeaderMatch {
    pub role: Option<String>,
    pub company: Option<String>,
    pub period: Option<String>,
}

impl HeaderMatch {
    fn new(role: String, company: Option<String>, period: Option<String>) -> Self {
        Self {
            role: Some(role),
            company: company.map(|c| trim_trailing_punct(&c).to_string()),
            period,
        }
    }
}

pub trait HeaderDetector: Send + Sync {
    fn tier(&self) -> DetectorTier;
    fn detect(&self, line: &str) -> Option<HeaderMatch>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorTier {
    /// `role @|at|-|| company (period)`
    Delimiter,
    /// A date range plus a header-like remainder.
    #[serde(rename = "period")]
    PeriodAnchored,
    /// A trailing proper-case company, no date range.
    NoPeriod,
    /// Two or more columns separated by wide gaps.
    Column,
}

impl DetectorTier {
    pub const DEFAULT_ORDER: [DetectorTier; 4] = [
        DetectorTier::Delimiter,
        DetectorTier::PeriodAnchored,
        DetectorTier::NoPeriod,
        DetectorTier::Column,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DetectorTier::Delimiter => "delimiter",
            DetectorTier::PeriodAnchored => "period",
            DetectorTier::NoPeriod => "no_period",
            DetectorTier::Column => "column",
        }
    }

    pub fn detector(self) -> &'static dyn HeaderDetector {
        match self {
            DetectorTier::Delimiter => &DelimiterDetector,
            DetectorTier::PeriodAnchored => &PeriodAnchoredDetector,
            DetectorTier::NoPeriod => &NoPeriodDetector,
            DetectorTier::Column => &ColumnDetector,
        }
    }
}

impl fmt::Display for DetectorTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown header tier '{0}' (expected delimiter, period, no_period or column)")]
pub struct UnknownTier(pub String);

impl FromStr for DetectorTier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "delimiter" => Ok(DetectorTier::Delimiter),
            "period" | "period_anchored" => Ok(DetectorTier::PeriodAnchored),
            "no_period" => Ok(DetectorTier::NoPeriod),
            "column" => Ok(DetectorTier::Column),
            other => Err(UnknownTier(other.to_string())),
        }
    }
}

fn first_valid_company(segments: &[&str]) -> Option<String> {
    segments.iter().find_map(|seg| {
        if company_looks_valid(seg) {
            return Some(seg.to_string());
        }
        // "Acme Co, Melbourne": the part before the comma may still be a company
        let head = seg.split(',').next().unwrap_or_default().trim();
        (head.len() < seg.len() && company_looks_valid(head)).then(|| head.to_string())
    })
}

/// Company from the trailing proper-case run, else from the role's own tail.
fn company_from_tail_or_role(before_period: &str, role_text: &str) -> Option<String> {
    tail_proper_run(before_period)
        .filter(|c| !LOC_HINT.is_match(c))
        .or_else(|| extract_company_from_role(role_text))
}

pub struct DelimiterDetector;

impl HeaderDetector for DelimiterDetector {
    fn tier(&self) -> DetectorTier {
        DetectorTier::Delimiter
    }

    fn detect(&self, line: &str) -> Option<HeaderMatch> {
        let period = find_period(line);
        let text = match &period {
            Some(p) => strip_period(line, p),
            None => line.trim().to_string(),
        };
        let text = trim_separators(&text).to_string();
        let segments: Vec<&str> = DELIMITER
            .split(&text)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if segments.len() < 2 {
            return None;
        }
        let role_seg = segments[0];
        if !role_looks_valid(role_seg) {
            return None;
        }
        let period = period.map(|p| p.normalized);

        if let Some(company) = first_valid_company(&segments[1..]) {
            let role = derive_role_part(role_seg, Some(&company));
            return role_looks_valid(&role).then(|| HeaderMatch::new(role, Some(company), period));
        }

        if let Some(company) = company_from_tail_or_role(&text, role_seg) {
            let role = derive_role_part(role_seg, Some(&company));
            if role_looks_valid(&role) {
                return Some(HeaderMatch::new(role, Some(company), period));
            }
        }

        // "Sales Assistant | Part-time | Jan 2021 - Present": role-only, employment type kept
        if segments[1..].iter().any(|s| EMPLOYMENT_TYPE.is_match(s)) {
            let role = derive_role_part(&text, None);
            if role_looks_valid(&role) {
                return Some(HeaderMatch {
                    role: Some(role),
                    company: None,
                    period,
                });
            }
        }
        None
    }
}

pub struct PeriodAnchoredDetector;

impl HeaderDetector for PeriodAnchoredDetector {
    fn tier(&self) -> DetectorTier {
        DetectorTier::PeriodAnchored
    }

    fn detect(&self, line: &str) -> Option<HeaderMatch> {
        let period = find_period(line)?;
        let before = strip_period(line, &period);
        let before = trim_separators(&before);
        if before.is_empty() {
            return None;
        }

        let segments: Vec<&str> = DELIMITER
            .split(before)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if segments.len() >= 2 {
            let company = segments[segments.len() - 1];
            let role_seed = segments[..segments.len() - 1].join(" ");
            if company_looks_valid(company) && role_looks_valid(&role_seed) {
                return Some(HeaderMatch::new(role_seed, Some(company.to_string()), Some(period.normalized)));
            }
        }

        let company = company_from_tail_or_role(before, before)?;
        let role = derive_role_part(before, Some(&company));
        role_looks_valid(&role).then(|| HeaderMatch::new(role, Some(company), Some(period.normalized)))
    }
}

pub struct NoPeriodDetector;

impl HeaderDetector for NoPeriodDetector {
    fn tier(&self) -> DetectorTier {
        DetectorTier::NoPeriod
    }

    fn detect(&self, line: &str) -> Option<HeaderMatch> {
        if find_period(line).is_some() {
            return None;
        }
        let norm = split_camel(line).split_whitespace().collect::<Vec<_>>().join(" ");
        let tail = tail_proper_run(&norm).filter(|c| !LOC_HINT.is_match(c));
        let candidates = tail.into_iter().chain(extract_company_from_role(&norm));
        for company in candidates {
            let role = derive_role_part(&norm, Some(&company));
            if role != norm && role_looks_valid(&role) {
                return Some(HeaderMatch::new(role, Some(company), None));
            }
        }
        None
    }
}

pub struct ColumnDetector;

fn looks_month_year(s: &str) -> bool {
    MONTHS.is_match(s) || s.split(|c: char| !c.is_ascii_digit()).any(|d| d.len() == 4)
}

impl HeaderDetector for ColumnDetector {
    fn tier(&self) -> DetectorTier {
        DetectorTier::Column
    }

    fn detect(&self, line: &str) -> Option<HeaderMatch> {
        let camel = split_camel(line);
        let parts: Vec<&str> = COLUMN_GAP
            .split(camel.trim())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if parts.len() < 2 {
            return None;
        }
        let company = parts[1];
        let role = derive_role_part(parts[0], Some(company));
        if !role_looks_valid(&role) || !company_looks_valid(company) {
            return None;
        }
        let period = if parts.len() >= 4 && looks_month_year(parts[2]) && looks_month_year(parts[3]) {
            Some(format!("{} - {}", parts[2], parts[3]))
        } else {
            find_period(line).map(|p| p.normalized)
        };
        Some(HeaderMatch::new(role, Some(company.to_string()), period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(role: &str, company: Option<&str>, period: Option<&str>) -> HeaderMatch {
        HeaderMatch {
            role: Some(role.to_string()),
            company: company.map(String::from),
            period: period.map(String::from),
        }
    }

    #[test]
    fn test_delimiter_pipe_with_period() {
        let got = DelimiterDetector.detect("Customer Service Manager | Bright Stores | Jan 2022 - Present");
        assert_eq!(got, Some(hm("Customer Service Manager", Some("Bright Stores"), Some("Jan 2022 - Present"))));
    }

    #[test]
    fn test_delimiter_at_and_dash() {
        assert_eq!(
            DelimiterDetector.detect("Barista at Cafe Roma"),
            Some(hm("Barista", Some("Cafe Roma"), None))
        );
        assert_eq!(
            DelimiterDetector.detect("Receptionist - Harbour Dental 2019 - 2021"),
            Some(hm("Receptionist", Some("Harbour Dental"), Some("2019 - 2021")))
        );
    }

    #[test]
    fn test_delimiter_company_before_comma() {
        assert_eq!(
            DelimiterDetector.detect("Sales Assistant @ Acme Co, Melbourne"),
            Some(hm("Sales Assistant", Some("Acme Co"), None))
        );
    }

    #[test]
    fn test_delimiter_employment_type_is_role_only() {
        let got = DelimiterDetector.detect("Sales Assistant | Part-time | Jan 2021 - Present").unwrap();
        assert_eq!(got.company, None);
        assert_eq!(got.period.as_deref(), Some("Jan 2021 - Present"));
        assert!(got.role.unwrap().starts_with("Sales Assistant"));
    }

    #[test]
    fn test_delimiter_rejects_bullets() {
        assert_eq!(DelimiterDetector.detect("Answered calls - Front Desk"), None);
        assert_eq!(DelimiterDetector.detect("• Barista @ Cafe Roma"), None);
        assert_eq!(DelimiterDetector.detect("Skills: Excel | Canva"), None);
    }

    #[test]
    fn test_period_anchored_tail_company() {
        assert_eq!(
            PeriodAnchoredDetector.detect("Store Assistant Green Grocers Mar 2020 - Dec 2021"),
            Some(hm("Store Assistant", Some("Green Grocers"), Some("Mar 2020 - Dec 2021")))
        );
        assert_eq!(PeriodAnchoredDetector.detect("Jan 2020 - Present"), None);
    }

    #[test]
    fn test_period_anchored_glued_company() {
        assert_eq!(
            PeriodAnchoredDetector.detect("Crew MemberPopSushi Jan 2019 - Feb 2020"),
            Some(hm("Crew Member", Some("Pop Sushi"), Some("Jan 2019 - Feb 2020")))
        );
    }

    #[test]
    fn test_no_period_header() {
        assert_eq!(
            NoPeriodDetector.detect("Kitchen Assistant Luigi Trattoria"),
            Some(hm("Kitchen Assistant", Some("Luigi Trattoria"), None))
        );
        assert_eq!(
            NoPeriodDetector.detect("Sales Assistant Acme"),
            Some(hm("Sales Assistant", Some("Acme"), None))
        );
        assert_eq!(NoPeriodDetector.detect("Jane Smith"), None);
        assert_eq!(NoPeriodDetector.detect("Answered phones for Acme Corp"), None);
    }

    #[test]
    fn test_column_layout() {
        assert_eq!(
            ColumnDetector.detect("Cashier    Fresh Mart    Jan 2018    Dec 2019"),
            Some(hm("Cashier", Some("Fresh Mart"), Some("Jan 2018 - Dec 2019")))
        );
        assert_eq!(ColumnDetector.detect("Cashier Fresh Mart"), None);
    }

    #[test]
    fn test_tier_parsing_and_default_order() {
        assert_eq!("no_period".parse::<DetectorTier>(), Ok(DetectorTier::NoPeriod));
        assert_eq!(" Period ".parse::<DetectorTier>(), Ok(DetectorTier::PeriodAnchored));
        assert!("bogus".parse::<DetectorTier>().is_err());
        for tier in DetectorTier::DEFAULT_ORDER {
            assert_eq!(tier.detector().tier(), tier);
            assert_eq!(tier.as_str().parse::<DetectorTier>(), Ok(tier));
        }
        let json = serde_json::to_string(&DetectorTier::PeriodAnchored).unwrap();
        assert_eq!(json, r#""period""#);
    }
}
