//! Header-shape vocabulary and the small helpers the detectors share.

use once_cell::sync::Lazy;
use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("experience pattern compiles")
}

pub static ROLE_HINT: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)(manager|assistant|intern|coordinator|specialist|engineer|designer|consultant|associate|lead|analyst|marketing|sales|customer|service|support|operator|representative|ambassador|officer|creator|editor|videographer|copywriter|social\s+media|crew|member|barista|cashier|server|waiter|waitress|receptionist|supervisor|leader|clerk|administrator|attendant|volunteer|经理|助理|实习生|专员|主管|店员|收银员|前台|客服)",
    )
});

static TITLE_CASE: Lazy<Regex> =
    Lazy::new(|| compile(r"^[A-Z][A-Za-z&/\-]+(?:\s+[A-Z][A-Za-z&/\-]+){0,6}$"));

pub static ACTION_VERB: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)\b(manage|managed|designed|develop|developed|implement|implemented|optimized|built|led|coordinated|analyzed|researched|supported|maintain|maintained|delivered|drove|owned|planned|executed|wrote|captured|collected|assist|assisted|create|created|filmed|edited|produced|taught|guided|ensure|ensured|worked|collaborated|answered|handle|handled|processed|served|greeted|prepared|trained|organized|organised|distributed|responded|resolved|increased|reduced|achieved|operated|performed|provided|helped|conducted|promoted|restocked|cleaned|updated|monitored|recorded|scheduled|booked)\b",
    )
});

static NON_TITLE_PREP: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\b(for|with|to|in|on|by|from)\b"));

static COMPANY_SHAPE: Lazy<Regex> = Lazy::new(|| compile(r"^[A-Z][A-Za-z0-9 &'.’-]+$"));

pub static COMPANY_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)(\binc\.?|\bltd\.?|\bllc\b|\bco\.|\bgroup\b|\bagency\b|\bstudio\b|\bcorp\.?|\bcompany\b|\blimited\b|\bpty\b|\bgmbh\b|\bcorporation\b|有限公司|公司|集团)",
    )
});

static INSTITUTION: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\b(university|college|school|academy|institute)\b"));

static BAD_COMPANY_WORDS: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)\b(promotions|videos|photos|content|social\s+media|customer|marketing|campaigns|sales)\b")
});

pub static MONTHS: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)\b(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\b",
    )
});

pub static LOC_HINT: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)\b(melbourne|sydney|brisbane|perth|adelaide|beijing|shanghai|kunming|china|australia|united\s+states|usa|uk|england|canada|singapore|hong\s*kong|taiwan|new\s+zealand|victoria|vic|nsw|queensland|guangdong)\b",
    )
});

pub static SECTION_BAD_HEAD: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)\b(skills?|projects?|certifications?|awards?|publications?|summary|profile|objective|about\s+me|interests?|hobbies|languages?|social\s+media\s+platforms?)\b",
    )
});

pub static PLATFORM_BRANDS: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)(\b(?:tiktok|douyin|xiaohongshu|redbook|wechat|we\s*chat|instagram|facebook|meta|youtube|twitter|x|linkedin|snapchat|pinterest)\b|小红书|抖音|微信)",
    )
});

pub static ORG_HINT_VOL: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)(church|foundation|community\s*(?:center|church)?|food\s*bank|charity|ministry|\bngo\b|non\s*-?\s*profit|nonprofit|outreach|donation|bethel|bread\s+of\s+life|sunday\s+school)",
    )
});

pub static VOL_SIGNAL: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)(volunteer|志愿|义工|charity|foundation|non\s*-?\s*profit|nonprofit|community\s+(?:service|center|church)|\bngo\b|donation|fund\s*raising|church|ministry|outreach|mentor|student\s+council|sunday\s+school)",
    )
});

pub static EMPLOYMENT_TYPE: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)(\b(?:intern(?:ship)?|freelance(?:r)?|contract(?:or)?|part[-\s]?time|full[-\s]?time|temporary|temp|casual|self[-\s]*employed|volunteer)\b|兼职|全职|实习)",
    )
});

static TAIL_PROPER: Lazy<Regex> =
    Lazy::new(|| compile(r"\b[A-Z][A-Za-z0-9&'.]+(?:\s+[A-Z][A-Za-z0-9&'.]+){0,2}$"));

static PROPER_TOKEN: Lazy<Regex> = Lazy::new(|| compile(r"^[A-Z][A-Za-z'’.\-]+$"));

pub static BULLET_PREFIX: Lazy<Regex> =
    Lazy::new(|| compile(r"^(?:[–•\-*·▪●○◦►]+|\(?\d{1,2}[.)])\s*"));

static CAMEL: Lazy<Regex> = Lazy::new(|| compile(r"([a-z])([A-Z])"));
static AFTER_CLOSER: Lazy<Regex> = Lazy::new(|| compile(r"([)/\]])([A-Z])"));

/// `role @ company`, `role | company`, `role – company`, `role - company`, `role at company`.
pub static DELIMITER: Lazy<Regex> =
    Lazy::new(|| compile(r"\s*(?:@|\||[–—]|\s-\s|\s(?i:at)\s)\s*"));

pub static COLUMN_GAP: Lazy<Regex> = Lazy::new(|| compile(r"\s{2,}|\t"));

const OPEN_WORDS: &[&str] = &["present", "now", "current", "today"];

/// Inserts a space at lower→upper boundaries and after `)`, `/`, `]`
/// before an uppercase letter ("MemberPopSushi" → "Member Pop Sushi").
pub fn split_camel(s: &str) -> String {
    let spaced = CAMEL.replace_all(s, "$1 $2");
    AFTER_CLOSER.replace_all(&spaced, "$1 $2").into_owned()
}

pub fn squash(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn trim_trailing_punct(s: &str) -> &str {
    s.trim_end_matches(|c: char| matches!(c, '.' | ',' | ';') || c.is_whitespace())
}

/// Trims header separators left dangling after a period or company is cut out.
pub fn trim_separators(s: &str) -> &str {
    s.trim_matches(|c: char| matches!(c, '|' | '@' | '-' | '–' | '—' | ',' | '/') || c.is_whitespace())
}

fn starts_uppercase_or_han(s: &str) -> bool {
    s.chars()
        .next()
        .map(|c| c.is_uppercase() || crate::analysis::text::is_han(c))
        .unwrap_or(false)
}

/// A plausible job title: Title-Case-like or containing a role noun, with no
/// action verb, no colon, no section keyword and no non-title preposition.
pub fn role_looks_valid_within(role: &str, max_words: usize) -> bool {
    let role = role.trim();
    if role.is_empty() || !starts_uppercase_or_han(role) || role.contains(':') {
        return false;
    }
    if ACTION_VERB.is_match(role) || NON_TITLE_PREP.is_match(role) || SECTION_BAD_HEAD.is_match(role) {
        return false;
    }
    TITLE_CASE.is_match(role)
        || (ROLE_HINT.is_match(role) && role.split_whitespace().count() <= max_words)
}

pub fn role_looks_valid(role: &str) -> bool {
    role_looks_valid_within(role, 8)
}

/// Rejects months, locations, employment types, banned words and platform names.
fn passes_company_filters(candidate: &str) -> bool {
    !MONTHS.is_match(candidate)
        && !LOC_HINT.is_match(candidate)
        && !EMPLOYMENT_TYPE.is_match(candidate)
        && !BAD_COMPANY_WORDS.is_match(candidate)
        && !PLATFORM_BRANDS.is_match(candidate)
        && !OPEN_WORDS.contains(&candidate.to_lowercase().as_str())
}

pub fn company_looks_valid(company: &str) -> bool {
    let company = trim_trailing_punct(company.trim());
    if company.is_empty() {
        return false;
    }
    let shaped = COMPANY_SHAPE.is_match(company)
        || COMPANY_SUFFIX.is_match(company)
        || INSTITUTION.is_match(company);
    shaped && passes_company_filters(company)
}

/// The trailing run of 1–3 proper-case words, when it looks like a company.
/// Leading role nouns are not part of it ("Assistant Green Grocers" → "Green Grocers").
pub fn tail_proper_run(text: &str) -> Option<String> {
    let run = TAIL_PROPER.find(text.trim())?.as_str();
    let words: Vec<&str> = run
        .split_whitespace()
        .skip_while(|w| ROLE_HINT.is_match(w))
        .collect();
    let candidate = trim_trailing_punct(&words.join(" ")).to_string();
    (!candidate.is_empty() && passes_company_filters(&candidate)).then_some(candidate)
}

/// Company name glued to the end of a role ("Crew MemberPopSushi" → "Pop Sushi"):
/// up to 3 trailing proper-case tokens, stopping at a role noun. Never the
/// whole text, so the role survives.
pub fn extract_company_from_role(role_text: &str) -> Option<String> {
    let norm = squash(&split_camel(role_text));
    let tokens: Vec<&str> = norm.split(' ').collect();
    let mut taken: Vec<&str> = Vec::new();
    for token in tokens.iter().rev() {
        if taken.len() == 3 || !PROPER_TOKEN.is_match(token) || ROLE_HINT.is_match(token) {
            break;
        }
        taken.push(token);
    }
    if taken.is_empty() || taken.len() == tokens.len() {
        return None;
    }
    taken.reverse();
    let company = trim_trailing_punct(&taken.join(" ")).to_string();
    let usable = !company.is_empty()
        && !ROLE_HINT.is_match(&company)
        && !MONTHS.is_match(&company)
        && !LOC_HINT.is_match(&company)
        && !OPEN_WORDS.contains(&company.to_lowercase().as_str());
    usable.then_some(company)
}

/// The role text with a trailing company (and its separator) removed.
pub fn derive_role_part(role_text: &str, company: Option<&str>) -> String {
    let mut role = squash(&split_camel(role_text));
    if let Some(company) = company.map(str::trim).filter(|c| !c.is_empty()) {
        let body = trim_trailing_punct(&role);
        if let Some(rest) = body.strip_suffix(company) {
            let rest = rest.trim_end();
            let rest = rest
                .strip_suffix(" at")
                .or_else(|| rest.strip_suffix(" At"))
                .or_else(|| rest.strip_suffix(" AT"))
                .unwrap_or(rest);
            role = rest.to_string();
        }
    }
    trim_separators(&role).to_string()
}

pub fn is_volunteer_marker(role: Option<&str>, company: Option<&str>) -> bool {
    role.is_some_and(|r| r.to_lowercase().contains("volunteer"))
        || company.is_some_and(|c| ORG_HINT_VOL.is_match(c))
}

/// Short line naming only a place ("Melbourne, VIC").
pub fn is_location_line(line: &str) -> bool {
    line.split_whitespace().count() <= 5
        && LOC_HINT.is_match(line)
        && !line.chars().any(|c| c.is_ascii_digit())
        && !ACTION_VERB.is_match(line)
        && !INSTITUTION.is_match(line)
}

static SECTION_LABEL: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)^(?:(?:technical|key|core|soft|hard)\s+)?(?:skills?|projects?|certifications?|awards?|publications?|summary|profile|objective|about\s+me|interests?|hobbies|languages?|social\s+media(?:\s+platforms?)?|tools?)\s*(?::|$)",
    )
});

/// Skills/platform lists and section labels that slipped into the bullet stream.
pub fn is_noise_line(line: &str) -> bool {
    if SECTION_LABEL.is_match(line) {
        return true;
    }
    PLATFORM_BRANDS.find_iter(line).count() >= 2 && !ACTION_VERB.is_match(line)
}
