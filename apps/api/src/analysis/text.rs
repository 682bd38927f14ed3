//! Normalizer, tokenizer, n-gram term ranking and the light stemmer.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::analysis::lexicon::{is_stopword, SPELLING_MAP, SPELLING_RE, SYNONYM_MAP, SYNONYM_RE};
use crate::models::resume::{Term, TermKind};

static SLASH_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*/+\s*").expect("slash pattern"));

static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z0-9+.#-]{3,}|\p{Han}{2,}").expect("token pattern"));

/// Default term-list limits (unigrams, bigrams, trigrams).
pub const TOP_WORDS: usize = 18;
pub const TOP_BIGRAMS: usize = 10;
pub const TOP_TRIGRAMS: usize = 6;

/// Lowercases, expands `&`, collapses slashes, then applies the spelling and
/// synonym tables (whole words).
pub fn normalize(text: &str) -> String {
    let lower = text.to_lowercase().replace('&', " and ");
    let collapsed = SLASH_RUN.replace_all(&lower, " ");
    let spelled = SPELLING_RE.replace_all(&collapsed, |caps: &Captures| {
        let word = &caps[0];
        SPELLING_MAP.get(word).copied().unwrap_or(word).to_string()
    });
    SYNONYM_RE
        .replace_all(&spelled, |caps: &Captures| {
            let phrase = caps[0].split_whitespace().collect::<Vec<_>>().join(" ");
            SYNONYM_MAP
                .get(phrase.as_str())
                .map(|c| c.to_string())
                .unwrap_or(phrase)
        })
        .into_owned()
}

/// Tokens of already-normalized text.
fn tokens_of_normalized(normalized: &str) -> Vec<String> {
    TOKEN
        .find_iter(normalized)
        .filter_map(|m| {
            let raw = m.as_str();
            let is_han = raw.chars().next().map(is_han).unwrap_or(false);
            let token = if is_han {
                raw
            } else {
                // "phone." and "-led" carry edge punctuation from the grammar
                let trimmed = raw.trim_matches(|c| c == '.' || c == '-');
                if trimmed.chars().count() < 3 {
                    return None;
                }
                trimmed
            };
            (token.chars().count() > 1 && !is_stopword(token)).then(|| token.to_string())
        })
        .collect()
}

/// Normalizes and splits text into content tokens, stopwords removed.
pub fn tokenize(text: &str) -> Vec<String> {
    tokens_of_normalized(&normalize(text))
}

pub fn is_han(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{F900}'..='\u{FAFF}')
}

pub fn contains_han(text: &str) -> bool {
    text.chars().any(is_han)
}

/// Single-pass suffix stripping for words longer than 4 chars.
/// Only ever used for overlap scoring, never for display.
pub fn stem(word: &str) -> String {
    let lower = word.to_lowercase();
    if lower.chars().count() <= 4 {
        return lower;
    }
    if let Some(s) = lower.strip_suffix("ing") {
        s.to_string()
    } else if let Some(s) = lower.strip_suffix("ed").or_else(|| lower.strip_suffix("es")) {
        s.to_string()
    } else if let Some(s) = lower.strip_suffix('s') {
        s.to_string()
    } else {
        lower
    }
}

pub fn stem_all(words: &[String]) -> Vec<String> {
    words.iter().map(|w| stem(w)).collect()
}

/// Tokenized, canonicalized and stemmed: the comparison form for overlap scoring.
pub fn match_tokens(text: &str) -> Vec<String> {
    stem_all(&tokenize(text))
}

pub fn bigrams(words: &[String]) -> Vec<String> {
    words.windows(2).map(|w| w.join(" ")).collect()
}

pub fn trigrams(words: &[String]) -> Vec<String> {
    words.windows(3).map(|w| w.join(" ")).collect()
}

/// `needle` occurs in already-normalized `haystack` as whole words
/// (CJK phrases match as substrings, since Han text has no word breaks).
pub fn contains_phrase(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    if contains_han(needle) {
        return haystack.contains(needle);
    }
    let is_word = |c: char| c.is_alphanumeric() || c == '-';
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before_ok = haystack[..start].chars().next_back().map_or(true, |c| !is_word(c));
        let after_ok = haystack[end..].chars().next().map_or(true, |c| !is_word(c));
        before_ok && after_ok
    })
}

/// Frequency-ranked items; ties keep first-occurrence order.
fn top_k(items: &[String], limit: usize) -> Vec<(String, u32)> {
    let mut order: Vec<String> = Vec::new();
    let mut freq: HashMap<&str, u32> = HashMap::new();
    for item in items {
        let count = freq.entry(item.as_str()).or_insert(0);
        if *count == 0 {
            order.push(item.clone());
        }
        *count += 1;
    }
    let mut ranked: Vec<(String, u32)> = order
        .into_iter()
        .map(|k| {
            let f = freq.get(k.as_str()).copied().unwrap_or(0);
            (k, f)
        })
        .collect();
    // stable: equal frequencies stay in first-seen order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}

/// Ranked term list: top trigrams, then top bigrams, then top single words,
/// each deduplicated against everything before it.
pub fn top_terms_with(text: &str, limit_words: usize, limit_bi: usize, limit_tri: usize) -> Vec<Term> {
    let tokens = tokenize(text);
    let tri = top_k(&trigrams(&tokens), limit_tri);
    let bi = top_k(&bigrams(&tokens), limit_bi);
    let words = top_k(&tokens, limit_words);

    let mut seen = std::collections::HashSet::new();
    let mut terms = Vec::new();
    let tagged = tri
        .into_iter()
        .map(|t| (t, TermKind::Trigram))
        .chain(bi.into_iter().map(|t| (t, TermKind::Bigram)))
        .chain(words.into_iter().map(|t| (t, TermKind::Unigram)));
    for ((text, frequency), kind) in tagged {
        if seen.insert(text.clone()) {
            terms.push(Term { text, frequency, kind });
        }
    }
    terms
}

pub fn top_terms(text: &str) -> Vec<Term> {
    top_terms_with(text, TOP_WORDS, TOP_BIGRAMS, TOP_TRIGRAMS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_applies_spelling_and_synonyms() {
        let n = normalize("Organised the Call Centre & front desk/reception");
        assert!(n.contains("organized"));
        assert!(n.contains("customer-service"), "call centre → call center → canonical: {n}");
        assert!(n.contains(" and "));
        assert!(!n.contains('/'));
    }

    #[test]
    fn test_synonyms_are_whole_word_only() {
        // "stocktaker" must not be rewritten by the "stocktake" entry
        assert!(normalize("stocktaker").contains("stocktaker"));
    }

    #[test]
    fn test_tokenize_drops_stopwords_and_short_tokens() {
        let toks = tokenize("I am the best at C++ and Go, via email.");
        assert!(toks.contains(&"c++".to_string()));
        assert!(toks.contains(&"email".to_string()), "trailing dot trimmed: {toks:?}");
        assert!(!toks.contains(&"the".to_string()));
        assert!(!toks.iter().any(|t| t == "go" || t == "am"));
    }

    #[test]
    fn test_tokenize_keeps_han_runs() {
        let toks = tokenize("负责客户 a 接待");
        assert_eq!(toks, vec!["负责客户".to_string(), "接待".to_string()]);
    }

    #[test]
    fn test_stem_rules() {
        assert_eq!(stem("handling"), "handl");
        assert_eq!(stem("managed"), "manag");
        assert_eq!(stem("quotes"), "quot");
        assert_eq!(stem("orders"), "order");
        assert_eq!(stem("sing"), "sing"); // too short
        assert_eq!(stem("Emails"), "email");
    }

    #[test]
    fn test_ngrams_have_no_gaps() {
        let words: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        assert_eq!(bigrams(&words), vec!["a b", "b c", "c d"]);
        assert_eq!(trigrams(&words), vec!["a b c", "b c d"]);
        assert!(trigrams(&words[..2]).is_empty());
    }

    #[test]
    fn test_top_terms_puts_phrases_before_words() {
        let text = "inventory records inventory records accurate inventory records daily";
        let terms = top_terms(text);
        assert_eq!(terms[0].kind, TermKind::Trigram);
        let first_word = terms.iter().position(|t| t.kind == TermKind::Unigram).unwrap();
        assert!(terms[..first_word].iter().all(|t| t.kind != TermKind::Unigram));
        let inv = terms.iter().find(|t| t.text == "inventory").unwrap();
        assert_eq!(inv.frequency, 3);
    }

    #[test]
    fn test_top_terms_respects_limits() {
        let text = (0..50).map(|i| format!("word{i:02}")).collect::<Vec<_>>().join(" ");
        let terms = top_terms_with(&text, 5, 2, 1);
        let words = terms.iter().filter(|t| t.kind == TermKind::Unigram).count();
        assert_eq!(words, 5);
        assert_eq!(terms.len(), 8);
    }

    #[test]
    fn test_contains_phrase_whole_word() {
        assert!(contains_phrase("answered phone calls daily", "phone calls"));
        assert!(!contains_phrase("smartphones", "phone"));
        assert!(contains_phrase("负责前台工作", "前台"));
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(tokenize("").is_empty());
        assert!(top_terms("   ").is_empty());
    }
}
