//! Stall-window detection over a time-ordered similarity sequence.

use serde::{Deserialize, Serialize};

/// Similarity between one consecutive same-author pair of updates.
/// Edges for one author are strictly ordered by `date_a`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityEdge {
    pub author: String,
    pub update_a_id: String,
    pub update_b_id: String,
    pub date_a: String,
    pub date_b: String,
    pub score: f64,
}

/// A maximal run of consecutive edges at or above the threshold.
/// `score` is the mean over the merged edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StalledPeriod {
    pub author: String,
    pub start_date: String,
    pub end_date: String,
    pub score: f64,
}

/// Scan edges in date order and group threshold-crossing runs into
/// stalled periods. A single qualifying edge yields a period spanning
/// just that edge's two dates; no qualifying edges yields an empty vec.
pub fn detect_stalls(edges: &[SimilarityEdge], threshold: f64) -> Vec<StalledPeriod> {
    let mut periods = Vec::new();
    let mut open: Option<(usize, usize)> = None;
    for (i, edge) in edges.iter().enumerate() {
        if edge.score >= threshold {
            open = match open {
                Some((first, _)) => Some((first, i)),
                None => Some((i, i)),
            };
        } else if let Some((first, last)) = open.take() {
            periods.push(close_period(edges, first, last));
        }
    }
    if let Some((first, last)) = open {
        periods.push(close_period(edges, first, last));
    }
    periods
}

fn close_period(edges: &[SimilarityEdge], first: usize, last: usize) -> StalledPeriod {
    let run = &edges[first..=last];
    let score = run.iter().map(|e| e.score).sum::<f64>() / run.len() as f64;
    StalledPeriod {
        author: edges[first].author.clone(),
        start_date: edges[first].date_a.clone(),
        end_date: edges[last].date_b.clone(),
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(date_a: &str, date_b: &str, score: f64) -> SimilarityEdge {
        SimilarityEdge {
            author: "A - Dev".to_string(),
            update_a_id: format!("upd_{date_a}"),
            update_b_id: format!("upd_{date_b}"),
            date_a: date_a.to_string(),
            date_b: date_b.to_string(),
            score,
        }
    }

    #[test]
    fn no_qualifying_edges_yields_empty() {
        let edges = vec![edge("d1", "d2", 0.2), edge("d2", "d3", 0.5)];
        assert!(detect_stalls(&edges, 0.85).is_empty());
    }

    #[test]
    fn single_qualifying_edge_spans_its_two_dates() {
        let edges = vec![edge("d1", "d2", 0.9), edge("d2", "d3", 0.1)];
        let periods = detect_stalls(&edges, 0.85);
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].start_date, "d1");
        assert_eq!(periods[0].end_date, "d2");
        assert_eq!(periods[0].score, 0.9);
    }

    #[test]
    fn consecutive_run_merges_into_one_period() {
        let edges = vec![
            edge("d1", "d2", 0.9),
            edge("d2", "d3", 0.88),
            edge("d3", "d4", 0.92),
        ];
        let periods = detect_stalls(&edges, 0.85);
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].start_date, "d1");
        assert_eq!(periods[0].end_date, "d4");
        let mean = (0.9 + 0.88 + 0.92) / 3.0;
        assert!((periods[0].score - mean).abs() < 1e-12);
    }

    #[test]
    fn sub_threshold_gap_splits_periods() {
        let edges = vec![
            edge("d1", "d2", 0.9),
            edge("d2", "d3", 0.3),
            edge("d3", "d4", 0.95),
            edge("d4", "d5", 0.86),
        ];
        let periods = detect_stalls(&edges, 0.85);
        assert_eq!(periods.len(), 2);
        assert_eq!((&*periods[0].start_date, &*periods[0].end_date), ("d1", "d2"));
        assert_eq!((&*periods[1].start_date, &*periods[1].end_date), ("d3", "d5"));
    }

    #[test]
    fn open_period_at_sequence_end_is_flushed() {
        let edges = vec![edge("d1", "d2", 0.1), edge("d2", "d3", 0.9)];
        let periods = detect_stalls(&edges, 0.85);
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].start_date, "d2");
        assert_eq!(periods[0].end_date, "d3");
    }

    #[test]
    fn score_exactly_at_threshold_qualifies() {
        let edges = vec![edge("d1", "d2", 0.85)];
        assert_eq!(detect_stalls(&edges, 0.85).len(), 1);
    }

    #[test]
    fn empty_edge_sequence_is_fine() {
        assert!(detect_stalls(&[], 0.85).is_empty());
    }
}
