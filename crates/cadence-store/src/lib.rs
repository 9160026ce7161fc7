//! Local-first storage for cadence workspaces.
//!
//! A workspace is a directory with a `.cadence/` folder holding two
//! append-only JSONL files (`roster.jsonl`, `updates.jsonl`), a
//! `config.json`, and an advisory lock file. All mutation goes through
//! [`Store`] under a [`WorkspaceLock`].

pub mod config;
pub mod lock;
pub mod paths;
pub mod seed;
pub mod store;

pub use config::{AnalysisDefaults, ExtractionConfig, FeatureToggles, WorkspaceConfig};
pub use lock::WorkspaceLock;
pub use paths::CadencePaths;
pub use seed::seed_workspace;
pub use store::{init_workspace, Store};
