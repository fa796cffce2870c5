use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use super::types::IcropperConfig;

/// A loaded configuration file with its associated directory.
///
/// Paths in the config are relative to the config file location,
/// so we need to track where the config was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The parsed configuration
    pub config: IcropperConfig,
    /// The directory containing the config file
    pub config_dir: PathBuf,
}

impl LoadedConfig {
    /// Load a config file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let config: IcropperConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        let config_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self { config, config_dir })
    }

    /// Source directory, relative to the config file directory.
    pub fn resolve_src_path(&self) -> PathBuf {
        self.config_dir.join(&self.config.src_path)
    }

    /// Output directory, relative to the config file directory.
    pub fn resolve_out_path(&self) -> PathBuf {
        self.config_dir.join(&self.config.out_path)
    }
}

/// Split whitespace-separated entries and expand glob patterns under `src_dir`.
///
/// Plain names are kept as given, so they stay the identity of the image in
/// the descriptor.
pub fn expand_source_files(entries: &[String], src_dir: &Path) -> Result<Vec<String>> {
    let mut results = Vec::new();

    for name in entries.iter().flat_map(|entry| entry.split_whitespace()) {
        if !is_glob_pattern(name) {
            results.push(name.to_string());
            continue;
        }

        let full_pattern = src_dir.join(name);
        let pattern_str = full_pattern.to_string_lossy();
        let paths = glob::glob(&pattern_str)
            .with_context(|| format!("invalid glob pattern: {}", name))?;

        let mut matched = Vec::new();
        for entry in paths {
            let path = entry.with_context(|| format!("failed to read glob entry: {}", name))?;
            let relative = path.strip_prefix(src_dir).unwrap_or(&path);
            matched.push(relative.to_string_lossy().into_owned());
        }
        matched.sort();
        results.extend(matched);
    }

    Ok(results)
}

/// Check if a pattern contains glob characters.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?') || pattern.contains('[')
}

/// Apply a partial config file on top of an inherited config.
///
/// Only the keys present in the file change; everything else keeps the
/// inherited value rather than falling back to the defaults.
pub fn overlay_config(base: &IcropperConfig, path: &Path) -> Result<IcropperConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let overlay: Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    let mut merged =
        serde_json::to_value(base).context("failed to serialize inherited config")?;
    merge_values(&mut merged, overlay);

    serde_json::from_value(merged)
        .with_context(|| format!("invalid config values in {}", path.display()))
}

fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                base.insert(key, value);
            }
        }
        (base, overlay) => *base = overlay,
    }
}
