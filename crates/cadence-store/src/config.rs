//! Workspace configuration, stored at `.cadence/config.json`.
//!
//! Loading is tolerant: a missing or unparseable file yields defaults, and
//! unknown keys are ignored, so older workspaces keep working.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::paths::CadencePaths;

/// Defaults for the stalled-progress analysis surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisDefaults {
    /// Window size in days.
    pub days: i64,
    /// Similarity cutoff, in (0,1).
    pub threshold: f64,
    /// Per-author document cap; newest updates win.
    pub max_updates_per_author: usize,
}

impl Default for AnalysisDefaults {
    fn default() -> Self {
        Self {
            days: 60,
            threshold: 0.85,
            max_updates_per_author: 200,
        }
    }
}

/// Settings for the chat-API field extractor.
///
/// The API key itself is never stored here; it is read from the
/// `OPENAI_API_KEY` environment variable at call time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractionConfig {
    pub api_base: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4".to_string(),
            timeout_secs: 30,
            max_retries: 2,
        }
    }
}

/// Route-group toggles for the HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeatureToggles {
    pub analytics: bool,
    pub team_updates: bool,
    pub copilot: bool,
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self {
            analytics: true,
            team_updates: true,
            copilot: true,
        }
    }
}

/// Top-level workspace configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkspaceConfig {
    pub analysis: AnalysisDefaults,
    pub extraction: ExtractionConfig,
    pub features: FeatureToggles,
}

impl WorkspaceConfig {
    /// Load from `.cadence/config.json`.
    /// Returns defaults if the file is missing or unparseable.
    pub fn load(paths: &CadencePaths) -> Self {
        let content = match std::fs::read_to_string(&paths.config_json) {
            Ok(c) => c,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&content) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(
                    "unparseable {} ({e}); using defaults",
                    paths.config_json.display()
                );
                Self::default()
            }
        }
    }

    /// Write the configuration as pretty JSON.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = WorkspaceConfig::default();
        assert_eq!(cfg.analysis.days, 60);
        assert_eq!(cfg.analysis.threshold, 0.85);
        assert_eq!(cfg.analysis.max_updates_per_author, 200);
        assert!(cfg.features.analytics);
        assert!(cfg.features.copilot);
        assert_eq!(cfg.extraction.model, "gpt-4");
    }

    #[test]
    fn load_missing_file_gives_defaults() {
        let paths = CadencePaths::discover("/nonexistent/cadence/ws");
        assert_eq!(WorkspaceConfig::load(&paths), WorkspaceConfig::default());
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let json = r#"{"analysis": {"threshold": 0.9}}"#;
        let cfg: WorkspaceConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.analysis.threshold, 0.9);
        assert_eq!(cfg.analysis.days, 60);
        assert_eq!(cfg.extraction.timeout_secs, 30);
    }

    #[test]
    fn save_and_load_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = CadencePaths::discover(tmp.path());
        paths.ensure_layout().unwrap();

        let mut cfg = WorkspaceConfig::default();
        cfg.analysis.days = 14;
        cfg.features.copilot = false;
        cfg.save(&paths.config_json).unwrap();

        let loaded = WorkspaceConfig::load(&paths);
        assert_eq!(loaded, cfg);
    }
}
