//! Update text normalization for similarity scoring.
//!
//! Produces a term-frequency bag per update: case-folded, split on
//! non-alphanumeric characters, short tokens and common English function
//! words dropped. No stemming; the scorer seam is where the metric varies.

use std::collections::BTreeMap;

/// Tokens shorter than this are dropped before the stopword check.
const MIN_TOKEN_LEN: usize = 2;

/// Sorted for binary search.
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "did", "do", "for", "from",
    "had", "has", "have", "he", "her", "his", "i", "if", "in", "into", "is", "it", "its", "me",
    "my", "no", "not", "of", "on", "or", "our", "she", "so", "that", "the", "their", "then",
    "there", "these", "they", "this", "to", "up", "was", "we", "were", "will", "with", "you",
];

fn is_stopword(token: &str) -> bool {
    STOPWORDS.binary_search(&token).is_ok()
}

/// Term-frequency view of one update's text. Ephemeral; computed per
/// scoring pass and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedDoc {
    pub terms: BTreeMap<String, u32>,
    pub token_count: usize,
}

impl NormalizedDoc {
    /// True for the zero vector. Scorers must treat this as
    /// similarity-undefined (score 0.0), never as identical.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Raw text that cannot be normalized at all. Scoring skips the pairs
/// touching such an update instead of failing the whole batch.
#[derive(Debug, thiserror::Error)]
#[error("text contains control character {0:?} and cannot be normalized")]
pub struct TokenizeError(pub char);

/// Normalize one update's raw text into a term-frequency document.
///
/// Empty or all-stopword text yields an empty document, which is valid
/// output, not an error. Only genuinely corrupt text (embedded NUL or
/// other non-whitespace control characters) is rejected.
pub fn normalize(text: &str) -> Result<NormalizedDoc, TokenizeError> {
    if let Some(bad) = text
        .chars()
        .find(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'))
    {
        return Err(TokenizeError(bad));
    }

    let mut terms: BTreeMap<String, u32> = BTreeMap::new();
    let mut token_count = 0;
    for raw in text.split(|c: char| !c.is_alphanumeric()) {
        if raw.len() < MIN_TOKEN_LEN {
            continue;
        }
        let token = raw.to_lowercase();
        if is_stopword(&token) {
            continue;
        }
        *terms.entry(token).or_insert(0) += 1;
        token_count += 1;
    }
    Ok(NormalizedDoc { terms, token_count })
}
