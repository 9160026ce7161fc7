pub mod error;
pub mod member;
pub mod source;
pub mod types;
pub mod update;

pub use error::AnalysisError;
pub use source::UpdateSource;
pub use types::*;
pub use update::{format_rfc3339, new_update, new_update_at, now_rfc3339, parse_rfc3339};
