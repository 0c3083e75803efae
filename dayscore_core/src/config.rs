//! Configuration file support for Dayscore.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/dayscore/config.toml`.
//! It carries the data directory, stored per-category score profiles,
//! compensation rules, and custom category definitions.

use crate::catalog::Catalog;
use crate::types::{Category, CompensationRule, ScoreProfile};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    /// Stored score profiles keyed by category id; categories without one
    /// fall back to the rule-derived default at evaluation time
    #[serde(default)]
    pub profiles: HashMap<String, ScoreProfile>,

    /// Cross-category compensation rules
    #[serde(default, rename = "compensation")]
    pub compensation_rules: Vec<CompensationRule>,

    /// Custom categories layered over the built-in catalog
    #[serde(default, rename = "category")]
    pub categories: Vec<Category>,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("dayscore")
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("dayscore").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// The catalog with this config's custom categories applied
    pub fn catalog(&self) -> Catalog {
        crate::catalog::get_default_catalog().with_overrides(&self.categories)
    }

    /// Validate stored profiles and compensation rules against a catalog,
    /// collecting human-readable errors
    pub fn validate(&self, catalog: &Catalog) -> Vec<String> {
        let mut errors = Vec::new();

        for (category_id, profile) in &self.profiles {
            if !catalog.categories.contains_key(category_id) {
                errors.push(format!(
                    "Profile references unknown category '{}'",
                    category_id
                ));
            }
            if let Err(e) = profile.validate() {
                errors.push(format!("Profile '{}': {}", category_id, e));
            }
        }

        for rule in &self.compensation_rules {
            if let Err(e) = rule.validate() {
                errors.push(format!(
                    "Compensation rule {} -> {}: {}",
                    rule.from_category, rule.to_category, e
                ));
            }
            for endpoint in [&rule.from_category, &rule.to_category] {
                if !catalog.categories.contains_key(endpoint) {
                    errors.push(format!(
                        "Compensation rule {} -> {} references unknown category '{}'",
                        rule.from_category, rule.to_category, endpoint
                    ));
                }
            }
        }

        errors
    }
}
