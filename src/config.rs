// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Engine configuration

use crate::error::{PartDiffError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 50 MiB
pub const DEFAULT_MAX_PAYLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// File picked up by [`EngineConfig::load`] from the working directory
pub const CONFIG_FILE_NAME: &str = "partdiff.toml";

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest accepted model (or material library) payload in bytes
    pub max_payload_bytes: u64,
    /// Replace a part's material with the one embedded in a freshly
    /// loaded model, when the model carries any
    pub seed_materials_from_hints: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            seed_materials_from_hints: true,
        }
    }
}

impl EngineConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| PartDiffError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: EngineConfig = toml::from_str(&content)
            .map_err(|e| PartDiffError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `partdiff.toml` when present, then apply environment
    /// overrides (`PARTDIFF_MAX_PAYLOAD_BYTES`, `PARTDIFF_SEED_MATERIALS`).
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE_NAME).exists() {
            Self::from_file(CONFIG_FILE_NAME)?
        } else {
            Self::default()
        };

        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(limit) = lookup("PARTDIFF_MAX_PAYLOAD_BYTES") {
            self.max_payload_bytes = limit.trim().parse().map_err(|_| {
                PartDiffError::Config(format!(
                    "PARTDIFF_MAX_PAYLOAD_BYTES must be a byte count, got {:?}",
                    limit
                ))
            })?;
        }

        if let Some(seed) = lookup("PARTDIFF_SEED_MATERIALS") {
            self.seed_materials_from_hints = seed.trim().parse().map_err(|_| {
                PartDiffError::Config(format!(
                    "PARTDIFF_SEED_MATERIALS must be true or false, got {:?}",
                    seed
                ))
            })?;
        }

        self.validate()
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| PartDiffError::Config(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|source| PartDiffError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn validate(&self) -> Result<()> {
        if self.max_payload_bytes == 0 {
            return Err(PartDiffError::Config(
                "max_payload_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_payload_bytes, 52_428_800);
        assert!(config.seed_materials_from_hints);
    }

    #[test]
    fn test_save_and_load_round_trip() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join(CONFIG_FILE_NAME);

        let config = EngineConfig {
            max_payload_bytes: 1024,
            seed_materials_from_hints: false,
        };
        config.save(&path)?;
        assert_eq!(EngineConfig::from_file(&path)?, config);
        Ok(())
    }

    #[test]
    fn test_partial_file_keeps_defaults() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "max_payload_bytes = 2048\n")?;

        let config = EngineConfig::from_file(&path)?;
        assert_eq!(config.max_payload_bytes, 2048);
        assert!(config.seed_materials_from_hints);
        Ok(())
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PARTDIFF_MAX_PAYLOAD_BYTES", "4096"),
            ("PARTDIFF_SEED_MATERIALS", "false"),
        ]
        .into_iter()
        .collect();

        let mut config = EngineConfig::default();
        config
            .apply_overrides(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.max_payload_bytes, 4096);
        assert!(!config.seed_materials_from_hints);
    }

    #[test]
    fn test_invalid_override_is_config_error() {
        let mut config = EngineConfig::default();
        let err = config
            .apply_overrides(|name| (name == "PARTDIFF_MAX_PAYLOAD_BYTES").then(|| "lots".into()))
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Config);

        let err = config
            .apply_overrides(|name| (name == "PARTDIFF_MAX_PAYLOAD_BYTES").then(|| "0".into()))
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Config);
    }
}
