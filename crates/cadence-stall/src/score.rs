//! Pairwise similarity between normalized update documents.

use crate::tokenize::NormalizedDoc;

/// Strategy seam for the pairwise metric. Implementations must be
/// deterministic and symmetric, return values in [0, 1], and score any
/// pair involving a zero vector as 0.0 (defined, never NaN).
pub trait SimilarityScorer: Send + Sync {
    fn score(&self, a: &NormalizedDoc, b: &NormalizedDoc) -> f64;
}

/// Term-frequency cosine similarity. The default metric.
#[derive(Debug, Clone, Copy, Default)]
pub struct CosineScorer;

impl SimilarityScorer for CosineScorer {
    fn score(&self, a: &NormalizedDoc, b: &NormalizedDoc) -> f64 {
        // frequencies stay integral until the final division, so
        // score(A, A) lands on exactly 1.0 for realistic documents
        let mut dot = 0u64;
        let mut na = 0u64;
        let mut nb = 0u64;
        for (term, &fa) in &a.terms {
            na += u64::from(fa) * u64::from(fa);
            if let Some(&fb) = b.terms.get(term) {
                dot += u64::from(fa) * u64::from(fb);
            }
        }
        for &fb in b.terms.values() {
            nb += u64::from(fb) * u64::from(fb);
        }
        if dot == 0 || na == 0 || nb == 0 {
            return 0.0;
        }
        ((dot as f64) / ((na as f64) * (nb as f64)).sqrt()).min(1.0)
    }
}

/// Jaccard overlap of term sets. Coarser than cosine; keeps the seam
/// honest and is handy when frequency spikes should not dominate.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlapScorer;

impl SimilarityScorer for OverlapScorer {
    fn score(&self, a: &NormalizedDoc, b: &NormalizedDoc) -> f64 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }
        let inter = a.terms.keys().filter(|t| b.terms.contains_key(*t)).count();
        let union = a.terms.len() + b.terms.len() - inter;
        inter as f64 / union as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::normalize;

    fn doc(text: &str) -> NormalizedDoc {
        normalize(text).unwrap()
    }

    #[test]
    fn cosine_is_symmetric() {
        let a = doc("fixed bug in login");
        let b = doc("started new feature work");
        let s = CosineScorer;
        assert_eq!(s.score(&a, &b), s.score(&b, &a));
    }

    #[test]
    fn identical_nonempty_docs_score_exactly_one() {
        let a = doc("fixed bug in login module again");
        assert_eq!(CosineScorer.score(&a, &a), 1.0);
        assert_eq!(OverlapScorer.score(&a, &a), 1.0);
    }

    #[test]
    fn zero_vectors_score_zero_not_nan() {
        let empty = doc("");
        let full = doc("shipped the report");
        for scorer in [&CosineScorer as &dyn SimilarityScorer, &OverlapScorer] {
            assert_eq!(scorer.score(&empty, &full), 0.0);
            assert_eq!(scorer.score(&full, &empty), 0.0);
            assert_eq!(scorer.score(&empty, &empty), 0.0);
        }
    }

    #[test]
    fn disjoint_docs_score_zero() {
        let a = doc("database migration finished");
        let b = doc("hired two designers");
        assert_eq!(CosineScorer.score(&a, &b), 0.0);
        assert_eq!(OverlapScorer.score(&a, &b), 0.0);
    }

    #[test]
    fn near_identical_texts_cross_the_default_threshold() {
        let a = doc("fixed bug in login");
        let b = doc("fixed bug in login module");
        // {fixed, bug, login} vs {fixed, bug, login, module}: 3/sqrt(3*4)
        let got = CosineScorer.score(&a, &b);
        let expected = 3.0 / (12.0f64).sqrt();
        assert!((got - expected).abs() < 1e-12);
        assert!(got >= 0.85);
    }

    #[test]
    fn repeated_terms_weigh_into_cosine_but_not_overlap() {
        let a = doc("deploy deploy deploy pipeline");
        let b = doc("deploy pipeline");
        let cosine = CosineScorer.score(&a, &b);
        let overlap = OverlapScorer.score(&a, &b);
        assert!(cosine < 1.0);
        assert_eq!(overlap, 1.0);
    }
}
