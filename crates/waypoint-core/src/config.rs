//! Manifest configuration that the store and CLI share.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the manifest lives when nothing else is configured.
pub const DEFAULT_MANIFEST_PATH: &str = "output/pipeline_manifest.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// JSON file backing the manifest.
    pub manifest_path: PathBuf,

    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable ones.
    pub log_json: bool,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl ManifestConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `WAYPOINT_MANIFEST_PATH`: manifest JSON file
    /// - `WAYPOINT_LOG_LEVEL`: default log filter
    /// - `WAYPOINT_LOG_JSON`: `1`/`true` for JSON logs
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(s) = lookup("WAYPOINT_MANIFEST_PATH") {
            if !s.trim().is_empty() {
                cfg.manifest_path = PathBuf::from(s);
            }
        }

        if let Some(s) = lookup("WAYPOINT_LOG_LEVEL") {
            if !s.trim().is_empty() {
                cfg.log_level = s;
            }
        }

        if let Some(s) = lookup("WAYPOINT_LOG_JSON") {
            if let Some(v) = parse_flag(&s) {
                cfg.log_json = v;
            }
        }

        cfg
    }

    /// Manifest path as the string form stored and logged everywhere else.
    pub fn manifest_path_str(&self) -> String {
        self.manifest_path.to_string_lossy().into_owned()
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
