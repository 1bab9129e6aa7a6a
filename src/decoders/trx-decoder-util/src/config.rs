// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! `[trx-decoder]` section of `trx-rs.toml`.
//!
//! ```toml
//! [trx-decoder]
//! log_level = "info"       # process log level
//! verbosity = "warning"    # default decoder threshold
//! json_output = false
//!
//! [trx-decoder.overrides]
//! "FoobarCorp-XY3000" = "debug"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::level::Level;

pub const SECTION_KEY: &str = "trx-decoder";
const CONFIG_FILE_NAME: &str = "trx-rs.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(PathBuf, String),

    #[error("Failed to parse config file {0}: {1}")]
    ParseError(PathBuf, String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Process log level for the tracing subscriber
    pub log_level: Option<String>,
    /// Threshold for decoders without an override
    pub verbosity: Level,
    /// Per-decoder thresholds, keyed by decoder name
    pub overrides: BTreeMap<String, Level>,
    /// Also write decoder log events as JSON lines
    pub json_output: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            verbosity: Level::Warning,
            overrides: BTreeMap::new(),
            json_output: false,
        }
    }
}

impl DecoderConfig {
    /// Threshold for the decoder called `name`.
    ///
    /// Override keys match case-insensitively, ignoring punctuation, so
    /// `foobarcorp_xy3000` selects `FoobarCorp-XY3000`.
    pub fn verbosity_for(&self, name: &str) -> Level {
        let wanted = normalize_name(name);
        self.overrides
            .iter()
            .find(|(key, _)| normalize_name(key) == wanted)
            .map(|(_, level)| *level)
            .unwrap_or(self.verbosity)
    }

    /// Parse the `[trx-decoder]` section out of a full TOML document.
    ///
    /// Returns `Ok(None)` when the section is absent.
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Option<Self>, ConfigError> {
        let table: toml::Table = toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;

        let Some(section) = table.get(SECTION_KEY) else {
            return Ok(None);
        };

        // Round-trip through a string so serde defaults apply to the section.
        let section_toml = toml::to_string(section)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;
        let cfg = toml::from_str::<Self>(&section_toml)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;
        Ok(Some(cfg))
    }

    /// Load from a specific file; the `[trx-decoder]` section must exist.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e.to_string()))?;
        Self::from_toml_str(&content, path)?.ok_or_else(|| {
            ConfigError::ParseError(
                path.to_path_buf(),
                format!("missing [{}] section", SECTION_KEY),
            )
        })
    }

    /// Load the first default-path file that has a `[trx-decoder]` section
    /// (CWD, then XDG config, then /etc). Falls back to defaults.
    pub fn load_from_default_paths() -> Result<(Self, Option<PathBuf>), ConfigError> {
        for path in config_search_paths() {
            if !path.exists() {
                continue;
            }
            let content = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e.to_string()))?;
            if let Some(cfg) = Self::from_toml_str(&content, &path)? {
                return Ok((cfg, Some(path)));
            }
        }
        Ok((Self::default(), None))
    }
}

fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("trx-rs").join(CONFIG_FILE_NAME));
    }
    paths.push(PathBuf::from("/etc/trx-rs").join(CONFIG_FILE_NAME));
    paths
}

/// Normalize a decoder name to lowercase alphanumeric.
pub fn normalize_name(name: &str) -> String {
    name.to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}
