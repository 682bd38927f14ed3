//! Process-wide vocabulary shared by the analysis modules.
//!
//! Everything here is immutable after first use. Module-specific tables
//! (skill lexicons, header-shape patterns) live next to the code that uses them.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

// ────────────────────────────────────────────────────────────────────────────
// Stopwords
// ────────────────────────────────────────────────────────────────────────────

pub static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // articles, prepositions, auxiliaries
        "the", "and", "a", "an", "to", "of", "in", "for", "on", "with", "by", "is", "are", "as",
        "at", "from", "or", "that", "this", "your", "you", "we", "our", "be", "will", "if",
        "without", "been", "being", "its", "they", "their", "he", "she", "i", "me", "my", "was",
        "were", "has", "had", "also", "all", "etc", "per", "within", "across", "about",
        // modal / ability words
        "can", "would", "could", "should", "must", "may", "might",
        // common JD fillers
        "new", "one", "great", "ideal", "fill", "successful", "better", "have", "before", "even",
        "then", "always", "full", "any", "fun", "largest", "fastest", "growing",
        "fastest-growing", "plus", "strong", "excellent", "ability", "able", "including",
        // interrogatives
        "who", "what", "why", "how", "where", "when", "which", "whom", "whose",
        // generic verbs
        "make", "makes", "made", "making", "do", "does", "did", "done", "use", "uses", "using",
        "work", "works", "worked", "working", "keep", "keeps", "keeping", "want", "wants",
        "wanted", "like", "likes", "liked", "need", "needs", "needed", "needing", "ensure",
        "ensures", "ensured", "ensuring", "help", "helps", "helped", "helping", "just", "now",
        "into", "actually",
        // generic nouns
        "person", "people", "team", "experience", "role", "roles", "candidate", "candidates",
        "agency", "recruitment", "tasked", "highly", "regarded", "issue", "issues", "seeking",
        "oriented",
        // months
        "jan", "january", "feb", "february", "mar", "march", "apr", "april", "jun", "june",
        "jul", "july", "aug", "august", "sep", "sept", "september", "oct", "october", "nov",
        "november", "dec", "december", "present",
        // places that show up in JD boilerplate
        "australia",
        // ZH fillers
        "我们", "你的", "以及", "或者", "相关", "具有", "能够", "进行",
    ]
    .into_iter()
    .collect()
});

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

// ────────────────────────────────────────────────────────────────────────────
// Canonicalization tables
// ────────────────────────────────────────────────────────────────────────────

/// British → American spelling, whole words, lowercase.
pub const SPELLING: &[(&str, &str)] = &[
    ("organise", "organize"),
    ("organised", "organized"),
    ("organising", "organizing"),
    ("organisation", "organization"),
    ("organisations", "organizations"),
    ("organisational", "organizational"),
    ("centre", "center"),
    ("centres", "centers"),
    ("colour", "color"),
    ("behaviour", "behavior"),
    ("analyse", "analyze"),
    ("analysed", "analyzed"),
    ("analysing", "analyzing"),
    ("enquiry", "inquiry"),
    ("enquiries", "inquiries"),
    ("programme", "program"),
    ("programmes", "programs"),
    ("licence", "license"),
    ("catalogue", "catalog"),
    ("travelling", "traveling"),
    ("labour", "labor"),
    ("favour", "favor"),
    ("honour", "honor"),
    ("realise", "realize"),
    ("prioritise", "prioritize"),
    ("prioritising", "prioritizing"),
    ("specialise", "specialize"),
    ("specialised", "specialized"),
    ("utilise", "utilize"),
    ("optimise", "optimize"),
    ("optimised", "optimized"),
    ("customise", "customize"),
    ("finalise", "finalize"),
    ("modelling", "modeling"),
    ("cancelled", "canceled"),
    ("fulfil", "fulfill"),
    ("fulfilment", "fulfillment"),
    ("defence", "defense"),
    ("cheque", "check"),
    ("cheques", "checks"),
    ("recognised", "recognized"),
    ("summarise", "summarize"),
    ("co-ordinate", "coordinate"),
    ("co-ordinated", "coordinated"),
    ("co-ordinator", "coordinator"),
];

/// Phrase → canonical token. Canonical tokens stay inside the token grammar
/// (`[a-z0-9+.#-]`), so a canonicalized phrase tokenizes as one term. Category
/// keys are canonical tokens too.
pub const SYNONYMS: &[(&str, &str)] = &[
    ("customer service", "customer-service"),
    ("customer services", "customer-service"),
    ("customer support", "customer-service"),
    ("customer care", "customer-service"),
    ("client service", "customer-service"),
    ("client services", "customer-service"),
    ("call center", "customer-service"),
    ("call centers", "customer-service"),
    ("contact center", "customer-service"),
    ("help desk", "customer-service"),
    ("helpdesk", "customer-service"),
    ("front desk", "reception"),
    ("front of house", "reception"),
    ("front-of-house", "reception"),
    ("receptionist", "reception"),
    ("reception desk", "reception"),
    ("order processing", "orders"),
    ("process orders", "orders"),
    ("processing orders", "orders"),
    ("processed orders", "orders"),
    ("order fulfillment", "orders"),
    ("order management", "orders"),
    ("purchase orders", "orders"),
    ("stock control", "inventory"),
    ("stock management", "inventory"),
    ("inventory management", "inventory"),
    ("inventory control", "inventory"),
    ("stock take", "inventory"),
    ("stocktake", "inventory"),
    ("stocktaking", "inventory"),
    ("stock levels", "inventory"),
    ("business development", "sales"),
    ("retail sales", "sales"),
    ("upselling", "sales"),
    ("cross-selling", "sales"),
    ("cash handling", "cash-handling"),
    ("handling cash", "cash-handling"),
    ("cash register", "cash-handling"),
    ("point of sale", "cash-handling"),
    ("eftpos", "cash-handling"),
    ("data entry", "data-entry"),
    ("data input", "data-entry"),
    ("appointment booking", "scheduling"),
    ("appointment scheduling", "scheduling"),
    ("calendar management", "scheduling"),
    ("diary management", "scheduling"),
    ("rostering", "scheduling"),
    ("communication skills", "communication"),
    ("verbal communication", "communication"),
    ("written communication", "communication"),
    ("interpersonal skills", "communication"),
    ("digital marketing", "marketing"),
];

pub static SPELLING_MAP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| SPELLING.iter().copied().collect());

pub static SYNONYM_MAP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| SYNONYMS.iter().copied().collect());

/// Whole-word alternation over a phrase table, longest phrases first so the
/// leftmost-first regex semantics prefer "customer services" over "customer service".
fn phrase_alternation(phrases: &[(&str, &str)]) -> Regex {
    let mut keys: Vec<&str> = phrases.iter().map(|(k, _)| *k).collect();
    keys.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    let alternation = keys
        .iter()
        .map(|k| {
            k.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{alternation})\b")).expect("phrase table compiles")
}

pub static SPELLING_RE: Lazy<Regex> = Lazy::new(|| phrase_alternation(SPELLING));
pub static SYNONYM_RE: Lazy<Regex> = Lazy::new(|| phrase_alternation(SYNONYMS));

// ────────────────────────────────────────────────────────────────────────────
// Categories
// ────────────────────────────────────────────────────────────────────────────

/// A fixed coverage category. `key` is also the canonical token the synonym
/// table produces for it.
#[derive(Debug)]
pub struct CategoryDef {
    pub key: &'static str,
    pub label_en: &'static str,
    pub label_zh: &'static str,
    /// Normalized-form phrases (post spelling/synonym pass) that signal the category.
    pub hints: &'static [&'static str],
}

pub static CATEGORIES: &[CategoryDef] = &[
    CategoryDef {
        key: "customer-service",
        label_en: "Customer Service",
        label_zh: "客户服务",
        hints: &["inquiries", "complaints", "customers", "clients", "customer satisfaction", "客服", "客户"],
    },
    CategoryDef {
        key: "sales",
        label_en: "Sales",
        label_zh: "销售",
        hints: &["quotes", "leads", "sales targets", "upsell", "revenue", "销售"],
    },
    CategoryDef {
        key: "orders",
        label_en: "Order Processing",
        label_zh: "订单处理",
        hints: &["order", "dispatch", "deliveries", "shipping", "订单"],
    },
    CategoryDef {
        key: "inventory",
        label_en: "Inventory",
        label_zh: "库存管理",
        hints: &["stock", "restock", "replenish", "warehouse", "库存"],
    },
    CategoryDef {
        key: "reception",
        label_en: "Reception",
        label_zh: "前台接待",
        hints: &["greet", "greeted", "greeting", "visitors", "phone calls", "check-in", "前台", "接待"],
    },
    CategoryDef {
        key: "communication",
        label_en: "Communication",
        label_zh: "沟通",
        hints: &["email", "phone", "communicate", "correspondence", "liaise", "沟通"],
    },
    CategoryDef {
        key: "scheduling",
        label_en: "Scheduling",
        label_zh: "排班与日程",
        hints: &["appointments", "bookings", "roster", "calendar", "shifts", "排班", "预约"],
    },
    CategoryDef {
        key: "cash-handling",
        label_en: "Cash Handling",
        label_zh: "收银",
        hints: &["cash", "payments", "till", "refunds", "收银"],
    },
    CategoryDef {
        key: "data-entry",
        label_en: "Data Entry",
        label_zh: "数据录入",
        hints: &["records", "spreadsheet", "spreadsheets", "excel", "database", "录入"],
    },
    CategoryDef {
        key: "marketing",
        label_en: "Marketing",
        label_zh: "市场营销",
        hints: &["campaign", "campaigns", "promotion", "promotions", "social media", "brand", "营销", "推广"],
    },
];

// ────────────────────────────────────────────────────────────────────────────
// JD vocabulary
// ────────────────────────────────────────────────────────────────────────────

/// Bilingual action verbs that mark a JD line as an actionable requirement.
pub static ACTION_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(负责|搭建|制定|管理|优化|推进|执行|监控|分析|协作|设计|开发|测试|维护|运营|跟进|对接|落地|产出|输出|研究|调研|策划|监督|组织|编写|撰写|安排|协调|提升|确保|参与|改进|跟踪|汇报|处理|接待|\b(?:prepare|manage|lead|build|design|develop|implement|execute|monitor|analy[sz]e|coordinate|plan|schedule|deliver|maintain|support|improve|ensure|participate|track|report|handle|process|answer|respond|assist|greet|serve|communicate|organi[sz]e|create|review|update|resolve|follow)\w*)",
    )
    .expect("action word pattern compiles")
});

/// Lines hinting at a responsibilities/requirements block.
pub static REQUIREMENT_HEAD_HINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(职责|要求|岗位|职位|描述|关键|任务|目标|responsibilit|requirement|dut(?:y|ies)|expectation|\bmust\b|\bneed|you\s+will|we\s+expect)",
    )
    .expect("head hint pattern compiles")
});

/// Culture / marketing-superlative lines that are never requirements.
pub static CULTURE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(inclusive|supportive|rewarding|great\s+place|we\s+value|celebrate|culture|company\s+values|diverse|diversity|belonging|perks|benefits\s+include)",
        r"(价值观|使命|愿景|文化|包容|多元|归属|支持性|奖励|氛围|庆祝|成长机会|发展机会|幸福感|工作环境|福利|团队氛围)",
        r"(?i)(largest|fastest[- ]?growing|industry[- ]?leading|world[- ]?class|award[- ]?winning)\s+(company|business|brand|team|transport|courier|taxi|retailer)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("culture pattern compiles"))
    .collect()
});

pub fn is_culture_line(line: &str) -> bool {
    CULTURE_PATTERNS.iter().any(|re| re.is_match(line))
}

// ────────────────────────────────────────────────────────────────────────────
// Résumé section vocabulary
// ────────────────────────────────────────────────────────────────────────────

/// Section-header vocabulary anywhere in a line (used to reject name candidates).
pub static SECTION_WORDS_EN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(profile|summary|objective|experience|work\s+experience|professional\s+experience|skills?|education|certifications?|projects?|references?|awards?|publications?|languages?|contact|work\s+history|employment|curriculum\s+vitae|resume|volunteer(?:ing)?)\b",
    )
    .expect("section words compile")
});

pub static SECTION_WORDS_ZH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(简介|摘要|概述|个人简介|工作经历|工作经验|专业经历|教育|教育背景|技能|证书|项目|参考|荣誉|出版物|语言|联系方式|个人信息|志愿)")
        .expect("zh section words compile")
});

pub static EDUCATION_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:education(?:al)?(?:\s+(?:background|history|and\s+training|and\s+qualifications))?|academic\s+(?:background|history)|qualifications|教育背景|教育经历|教育|学历)\s*:?$")
        .expect("education header compiles")
});
