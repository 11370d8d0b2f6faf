// src/util.rs — Shared text helpers for task analysis and persona matching

use std::collections::HashSet;

/// Words dropped when pulling keywords out of a task description.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did", "will",
    "would", "could", "should", "may", "might", "can", "this", "that", "these", "those",
];

/// Extra stop words used by persona generation (pronouns and "help").
const GENERATION_STOP_WORDS: &[&str] = &[
    "help", "me", "my", "you", "your", "we", "our", "us", "they", "their",
];

/// Current UTC time as RFC 3339, the timestamp format of every stored record.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Truncate a string for display/logging (UTF-8 safe).
///
/// Returns a substring of at most `max_len` bytes, ensuring the cut
/// point falls on a valid UTF-8 character boundary.
pub fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        &s[..end]
    }
}

/// Lower-cased `task` and `context` joined by a single space.
pub fn combined_text(task: &str, context: &str) -> String {
    format!("{task} {context}").to_lowercase()
}

/// Number of keywords that occur as substrings of `text`.
/// Each keyword counts at most once.
pub fn keyword_hits(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|kw| text.contains(*kw)).count()
}

/// Pick the label with the strictly highest keyword count.
///
/// Ties resolve to the label registered first; `None` when nothing matched.
pub fn best_label<'a, T: Copy>(text: &str, table: &[(T, &'a [&'a str])]) -> Option<T> {
    let mut best: Option<(T, usize)> = None;
    for (label, keywords) in table {
        let hits = keyword_hits(text, keywords);
        if hits == 0 {
            continue;
        }
        match best {
            Some((_, top)) if hits <= top => {}
            _ => best = Some((*label, hits)),
        }
    }
    best.map(|(label, _)| label)
}

/// Alphabetic lower-cased words of `text`, in order.
fn alpha_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_ascii_alphabetic())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_ascii_lowercase())
}

/// Extract meaningful keywords: alphabetic words longer than two characters
/// that are not stop words. Order and duplicates are preserved.
pub fn extract_keywords(text: &str) -> Vec<String> {
    alpha_words(text)
        .filter(|w| w.len() > 2 && !STOP_WORDS.contains(&w.as_str()))
        .collect()
}

/// Keyword extraction used for persona synthesis: a wider stop list and at
/// most `limit` keywords.
pub fn extract_task_keywords(text: &str, limit: usize) -> Vec<String> {
    alpha_words(text)
        .filter(|w| {
            w.len() > 2
                && !STOP_WORDS.contains(&w.as_str())
                && !GENERATION_STOP_WORDS.contains(&w.as_str())
        })
        .take(limit)
        .collect()
}

/// Word-set Jaccard similarity (intersection over union of lower-cased
/// whitespace tokens). Empty input on either side yields 0.0.
pub fn token_jaccard(a: &str, b: &str) -> f64 {
    let words_a: HashSet<String> = a.split_whitespace().map(|w| w.to_lowercase()).collect();
    let words_b: HashSet<String> = b.split_whitespace().map(|w| w.to_lowercase()).collect();

    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }

    let intersection = words_a.intersection(&words_b).count();
    let union = words_a.union(&words_b).count();

    intersection as f64 / union as f64
}

/// Character-sequence similarity ratio in [0, 1].
///
/// Sørensen–Dice over character bigrams of the lower-cased inputs. This
/// approximates a longest-matching-block ratio (Ratcliff/Obershelp): both are
/// 1.0 for equal strings and 0.0 for disjoint ones, but values in between
/// differ, and bigram overlap ignores the order in which blocks occur.
pub fn sequence_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    strsim::sorensen_dice(&a.to_lowercase(), &b.to_lowercase()).clamp(0.0, 1.0)
}

/// Capitalise the first letter of each word ("machine learning" → "Machine Learning").
pub fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Persona id from a display name: lower-case, alphanumerics only, words
/// joined by underscores ("Tech Expert!" → "tech_expert").
pub fn sanitize_id(name: &str) -> String {
    slug::slugify(name).replace('-', "_")
}
