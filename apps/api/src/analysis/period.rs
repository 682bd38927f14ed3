//! Date-range detection and end-date inference.
//!
//! A period is `<start><sep><end>` where either side is a month-name date,
//! a season, a bare year, or a numeric/CJK year-month, and the end may be an
//! open marker (present, now, current, today, 至今, 现在).

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::models::resume::WorkEntry;

const MONTH: &str = r"\b(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\b\.?,?";
const SEASON: &str = r"\b(?:spring|summer|autumn|fall|winter)";
const YEAR: &str = r"(?:19|20)\d{2}";

static PERIOD: Lazy<Regex> = Lazy::new(|| {
    let date = format!(
        r"(?:{MONTH}\s*{YEAR}|{SEASON}\s+{YEAR}|\d{{1,2}}\s*/\s*{YEAR}|{YEAR}(?:\s*年\s*\d{{1,2}}\s*月?|\s*[./]\s*\d{{1,2}}\b|\s*年)?)"
    );
    let open = r"(?:(?:present|now|current|today)\b|至今|现在)";
    let pattern = format!(
        r"(?i)(?P<start>{date})(?:\s*(?:[-–—−~～]+|\bto\b|至)\s*(?P<end>{date}|{open})|\s*(?P<open>至今))"
    );
    Regex::new(&pattern).expect("period pattern compiles")
});

static OPEN_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:\b(?:present|now|current|today)\b|至今|现在)").expect("open end"));

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:19|20)\d{2}").expect("year"));

static MONTH_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)|\b(spring|summer|autumn|fall|winter)")
        .expect("month name")
});

static NUMERIC_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:(?:19|20)\d{2}\s*(?:年|[./])\s*(\d{1,2}))|(?:\b(\d{1,2})\s*/\s*(?:19|20)\d{2})")
        .expect("numeric month")
});

/// A date range found inside a line.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodMatch {
    /// Byte range of the whole match in the searched text.
    pub start: usize,
    pub end: usize,
    pub normalized: String,
}

fn squash(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_caps(caps: &Captures) -> String {
    let start = caps.name("start").map(|m| squash(m.as_str())).unwrap_or_default();
    let end = caps
        .name("end")
        .or_else(|| caps.name("open"))
        .map(|m| squash(m.as_str()))
        .unwrap_or_default();
    format!("{start} - {end}")
}

/// First date range in `text`, if any.
pub fn find_period(text: &str) -> Option<PeriodMatch> {
    let caps = PERIOD.captures(text)?;
    let whole = caps.get(0)?;
    Some(PeriodMatch {
        start: whole.start(),
        end: whole.end(),
        normalized: normalize_caps(&caps),
    })
}

pub fn has_period(text: &str) -> bool {
    PERIOD.is_match(text)
}

/// Text with the first date range cut out, whitespace trimmed.
pub fn strip_period(text: &str, m: &PeriodMatch) -> String {
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..m.start]);
    out.push(' ');
    out.push_str(&text[m.end..]);
    squash(&out)
}

/// Sort key for "most recent first" ordering. `Present` outranks every date,
/// `Unknown` ranks below everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RecencyKey {
    Unknown,
    Date(NaiveDate),
    Present,
}

fn month_from_name(name: &str) -> u32 {
    match name.to_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" | "spring" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" | "summer" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" | "autumn" | "fall" => 9,
        "oct" => 10,
        "nov" => 11,
        _ => 12,
    }
}

fn date_of(side: &str) -> Option<NaiveDate> {
    let year: i32 = YEAR_RE.find(side)?.as_str().parse().ok()?;
    let month = if let Some(caps) = MONTH_NAME.captures(side) {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| month_from_name(m.as_str()))
            .unwrap_or(12)
    } else if let Some(caps) = NUMERIC_MONTH.captures(side) {
        caps.get(1)
            .or_else(|| caps.get(2))
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .filter(|m| (1..=12).contains(m))
            .unwrap_or(12)
    } else {
        // a bare year counts as ending in December
        12
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Infers the end of a period string.
pub fn recency_key(period: Option<&str>) -> RecencyKey {
    let Some(period) = period.map(str::trim).filter(|p| !p.is_empty()) else {
        return RecencyKey::Unknown;
    };
    if let Some(caps) = PERIOD.captures(period) {
        if caps.name("open").is_some() {
            return RecencyKey::Present;
        }
        if let Some(end) = caps.name("end") {
            if OPEN_END.is_match(end.as_str()) {
                return RecencyKey::Present;
            }
            if let Some(date) = date_of(end.as_str()) {
                return RecencyKey::Date(date);
            }
        }
    }
    if OPEN_END.is_match(period) {
        return RecencyKey::Present;
    }
    // free-form period: take the last year mentioned
    let last_year = YEAR_RE.find_iter(period).last().map(|m| m.start());
    match last_year.and_then(|at| date_of(&period[at..])) {
        Some(date) => RecencyKey::Date(date),
        None => RecencyKey::Unknown,
    }
}

/// Stable sort, most recent end date first.
pub fn sort_by_recency(entries: &mut [WorkEntry]) {
    entries.sort_by(|a, b| recency_key(b.period.as_deref()).cmp(&recency_key(a.period.as_deref())));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32) -> RecencyKey {
        RecencyKey::Date(NaiveDate::from_ymd_opt(y, m, 1).unwrap())
    }

    #[test]
    fn test_find_period_month_names() {
        let line = "Sales Assistant @ Acme Co Jan 2020 – Present";
        let m = find_period(line).unwrap();
        assert_eq!(m.normalized, "Jan 2020 - Present");
        assert_eq!(&line[m.start..m.end], "Jan 2020 – Present");
    }

    #[test]
    fn test_find_period_variants() {
        assert_eq!(find_period("2018 - 2019").unwrap().normalized, "2018 - 2019");
        assert_eq!(find_period("March 2021 to June 2022").unwrap().normalized, "March 2021 - June 2022");
        assert_eq!(find_period("03/2019 - 05/2021").unwrap().normalized, "03/2019 - 05/2021");
        assert_eq!(find_period("2019.03 ~ 2021.05").unwrap().normalized, "2019.03 - 2021.05");
        assert_eq!(find_period("2020年3月 至 2022年5月").unwrap().normalized, "2020年3月 - 2022年5月");
        assert_eq!(find_period("2020年3月至今").unwrap().normalized, "2020年3月 - 至今");
        assert_eq!(find_period("Summer 2022 - Now").unwrap().normalized, "Summer 2022 - Now");
    }

    #[test]
    fn test_no_period_in_plain_text() {
        assert!(find_period("Answered 40 calls per day").is_none());
        assert_eq!(find_period("Marketing 2019 - 2020").unwrap().normalized, "2019 - 2020");
        assert!(find_period("Managed 2019 budget").is_none());
        assert!(!has_period("Team of 12 - 15 staff"));
    }

    #[test]
    fn test_strip_period_leaves_remainder() {
        let line = "Barista, Cafe Roma Jan 2019 - Dec 2020";
        let m = find_period(line).unwrap();
        assert_eq!(strip_period(line, &m), "Barista, Cafe Roma");
    }

    #[test]
    fn test_recency_key_order() {
        assert_eq!(recency_key(Some("Jan 2020 - Present")), RecencyKey::Present);
        assert_eq!(recency_key(Some("2020年3月 - 至今")), RecencyKey::Present);
        assert_eq!(recency_key(Some("Jan 2018 - Mar 2019")), date(2019, 3));
        assert_eq!(recency_key(Some("2017 - 2018")), date(2018, 12));
        assert_eq!(recency_key(Some("2019.03 - 2021.05")), date(2021, 5));
        assert_eq!(recency_key(None), RecencyKey::Unknown);
        assert_eq!(recency_key(Some("sometime")), RecencyKey::Unknown);
        assert!(RecencyKey::Present > date(2099, 1));
        assert!(RecencyKey::Unknown < date(1990, 1));
    }

    #[test]
    fn test_sort_by_recency_is_stable_and_descending() {
        let mk = |role: &str, period: Option<&str>| {
            WorkEntry::header(Some(role.into()), None, period.map(String::from), false)
        };
        let mut entries = vec![
            mk("a", Some("2015 - 2016")),
            mk("b", None),
            mk("c", Some("Jan 2020 - Present")),
            mk("d", Some("2015 - 2016")),
            mk("e", Some("Feb 2019 - Mar 2021")),
        ];
        sort_by_recency(&mut entries);
        let order: Vec<_> = entries.iter().map(|e| e.role.clone().unwrap()).collect();
        assert_eq!(order, vec!["c", "e", "a", "d", "b"]);
    }
}
