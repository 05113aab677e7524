//! Optional YAML config file layered over environment defaults.
//!
//! ```yaml
//! manifest_path: output/pipeline_manifest.json
//! log_level: debug
//! log_json: false
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use waypoint_core::config::ManifestConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub manifest_path: Option<String>,
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub log_json: Option<bool>,
}

pub fn parse_config_file(yaml: &str) -> Result<ConfigFile, serde_yaml::Error> {
    // An empty document is a valid, empty config.
    if yaml.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str(yaml)
}

pub fn read_config_file(path: &Path) -> Result<ConfigFile, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("reading config {}: {e}", path.display()))?;
    Ok(parse_config_file(&text)?)
}

pub fn apply_config_file(cfg: &mut ManifestConfig, doc: &ConfigFile) {
    if let Some(path) = &doc.manifest_path {
        cfg.manifest_path = path.into();
    }
    if let Some(level) = &doc.log_level {
        cfg.log_level = level.clone();
    }
    if let Some(json) = doc.log_json {
        cfg.log_json = json;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn file_overrides_defaults() {
        let doc = parse_config_file("manifest_path: /runs/202509A/manifest.json\nlog_json: true\n").unwrap();
        let mut cfg = ManifestConfig::default();
        apply_config_file(&mut cfg, &doc);
        assert_eq!(cfg.manifest_path, PathBuf::from("/runs/202509A/manifest.json"));
        assert!(cfg.log_json);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn empty_file_changes_nothing() {
        let doc = parse_config_file("\n").unwrap();
        let mut cfg = ManifestConfig::default();
        apply_config_file(&mut cfg, &doc);
        assert_eq!(cfg, ManifestConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_config_file("manifest: x\n").is_err());
    }
}
