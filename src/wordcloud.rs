// Word frequencies for the society-name word cloud.
use crate::types::{TokenCount, TokenFrequency};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// English stop words, compared case-insensitively.
static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
        "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
        "between", "both", "but", "by", "can", "cannot", "could", "did", "do", "does", "doing",
        "down", "during", "each", "else", "ever", "few", "for", "from", "further", "get", "had",
        "has", "have", "having", "he", "her", "here", "hers", "herself", "him", "himself",
        "his", "how", "however", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
        "me", "more", "most", "my", "myself", "no", "nor", "not", "of", "off", "on", "once",
        "only", "or", "other", "otherwise", "ought", "our", "ours", "ourselves", "out", "over",
        "own", "same", "shall", "she", "should", "since", "so", "some", "such", "than", "that",
        "the", "their", "theirs", "them", "themselves", "then", "there", "these", "they",
        "this", "those", "through", "to", "too", "under", "until", "up", "very", "was", "we",
        "were", "what", "when", "where", "which", "while", "who", "whom", "why", "with",
        "would", "you", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

#[derive(Debug, Clone)]
pub struct CloudOptions {
    pub remove_stopwords: bool,
    /// Lower-case every token before counting.
    pub case_fold: bool,
    /// Tokens shorter than this many characters are ignored.
    pub min_length: usize,
    pub include_numbers: bool,
    pub max_words: usize,
}

impl Default for CloudOptions {
    fn default() -> Self {
        Self {
            remove_stopwords: true,
            case_fold: false,
            min_length: 1,
            include_numbers: false,
            max_words: 200,
        }
    }
}

impl CloudOptions {
    /// Plain whitespace tokenization: every token counts, case-sensitive.
    pub fn raw() -> Self {
        Self {
            remove_stopwords: false,
            case_fold: false,
            min_length: 1,
            include_numbers: true,
            max_words: usize::MAX,
        }
    }
}

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token.to_lowercase().as_str())
}

/// Split `text` on whitespace and normalise each token according to `options`.
pub fn tokenize<'a>(text: &'a str, options: &'a CloudOptions) -> impl Iterator<Item = String> + 'a {
    text.split_whitespace().filter_map(move |raw| {
        let token = if options.remove_stopwords || !options.include_numbers {
            // "(Kerala)" and "Ltd." count as "Kerala" and "Ltd"
            raw.trim_matches(|c: char| !c.is_alphanumeric())
        } else {
            raw
        };
        if token.is_empty() || token.chars().count() < options.min_length {
            return None;
        }
        if !options.include_numbers && token.chars().all(|c| c.is_numeric()) {
            return None;
        }
        if options.remove_stopwords && is_stopword(token) {
            return None;
        }
        Some(if options.case_fold {
            token.to_lowercase()
        } else {
            token.to_string()
        })
    })
}

/// Count tokens in `text`, most frequent first, ties in first-seen order.
pub fn token_frequency(text: &str, options: &CloudOptions) -> TokenFrequency {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for token in tokenize(text, options) {
        *counts.entry(token).or_insert(0) += 1;
    }
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    // Stable sort keeps first-seen order among equal counts.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(options.max_words);

    let max = ranked.first().map(|(_, c)| *c).unwrap_or(0);
    let entries = ranked
        .into_iter()
        .map(|(token, count)| TokenCount {
            token,
            count,
            weight: count as f64 / max as f64,
        })
        .collect();
    TokenFrequency { entries }
}
