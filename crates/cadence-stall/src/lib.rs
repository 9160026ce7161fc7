//! Stalled-progress detection.
//!
//! Flags authors whose consecutive weekly updates stay semantically
//! near-identical. The pipeline is a pure batch pass over an
//! [`UpdateSource`](cadence_core::UpdateSource) window: normalize each
//! update into a term-frequency document, score consecutive same-author
//! pairs, then merge threshold-crossing runs into stalled periods.
//!
//! ```no_run
//! use cadence_stall::{analyze_stalling, StallParams};
//! # fn demo(store: &dyn cadence_core::UpdateSource) -> anyhow::Result<()> {
//! let report = analyze_stalling(store, &StallParams::default())?;
//! for author in &report.results {
//!     if !author.stalled_periods.is_empty() {
//!         println!("{} looks stalled", author.author);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod detect;
pub mod report;
pub mod score;
pub mod tokenize;

pub use detect::{detect_stalls, SimilarityEdge, StalledPeriod};
pub use report::{
    analyze_stalling, analyze_stalling_at, analyze_stalling_with, AuthorReport, StallParams,
    StallReport,
};
pub use score::{CosineScorer, OverlapScorer, SimilarityScorer};
pub use tokenize::{normalize, NormalizedDoc, TokenizeError};
