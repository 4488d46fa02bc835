//! Key-term extraction for content-similarity search.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

static MARKDOWN_SYNTAX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[#*`\[\]\(\)]").unwrap());

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "was", "are", "be", "been", "this", "that", "these", "those", "it", "its",
    "we", "our", "you", "your", "they", "their", "will", "can", "should", "would", "could",
    "have", "has", "had", "do", "does", "did", "not", "if", "then", "than", "when", "where", "how",
    "why", "what", "which", "who", "whom", "whose",
];

const MAX_TERMS: usize = 20;

/// Extracts up to [`MAX_TERMS`] key terms from `content`, ordered by
/// descending frequency (ties broken by first appearance). Strips markdown
/// syntax, lowercases, and drops stopwords and anything length <= 3 or
/// containing non-alphanumeric characters.
pub fn extract_key_terms(content: &str) -> Vec<String> {
    let cleaned = MARKDOWN_SYNTAX.replace_all(content, " ").to_lowercase();
    let stop_words: HashSet<&str> = STOP_WORDS.iter().copied().collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for word in cleaned.split_whitespace() {
        if word.len() > 3 && !stop_words.contains(word) && word.chars().all(|c| c.is_alphanumeric()) {
            let count = counts.entry(word).or_insert(0);
            if *count == 0 {
                order.push(word);
            }
            *count += 1;
        }
    }

    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order.truncate(MAX_TERMS);
    order.into_iter().map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_stopwords_and_short_words() {
        let terms = extract_key_terms("The quick fox and a dog in the yard");
        assert!(!terms.contains(&"the".to_string()));
        assert!(!terms.contains(&"and".to_string()));
        assert!(!terms.contains(&"dog".to_string())); // length 3, dropped
        assert!(terms.contains(&"quick".to_string()));
        assert!(terms.contains(&"yard".to_string()));
    }

    #[test]
    fn strips_markdown_syntax() {
        let terms = extract_key_terms("# Heading\n`code` and *emphasis* [link](url)");
        assert!(terms.contains(&"heading".to_string()));
        assert!(terms.contains(&"emphasis".to_string()));
    }

    #[test]
    fn orders_by_frequency_then_first_appearance() {
        let terms = extract_key_terms("alpha beta alpha gamma beta alpha");
        assert_eq!(terms, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn caps_at_twenty_terms() {
        let content: String = (0..30).map(|i| format!("word{i:02} ")).collect();
        let terms = extract_key_terms(&content);
        assert_eq!(terms.len(), 20);
    }
}
