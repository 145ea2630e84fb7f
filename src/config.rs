//! Configuration management for maskpin
//!
//! Handles loading and saving PIN entry preferences: length bounds, the
//! accepted character set, the mask glyph, the retry budget and prompts.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::prompt::DEFAULT_MISMATCH_NOTICE;
use crate::reader::DEFAULT_MASK;
use crate::validate::{Charset, PinPolicy};

/// Environment variable that overrides the config file location
pub const CONFIG_PATH_ENV: &str = "MASKPIN_CONFIG";

/// maskpin configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_min_length")]
    pub min_length: usize,

    #[serde(default = "default_max_length")]
    pub max_length: usize,

    #[serde(default = "default_mask")]
    pub mask: char,

    /// Enter+confirm rounds allowed before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_prompt")]
    pub prompt: String,

    #[serde(default = "default_confirm_prompt")]
    pub confirm_prompt: String,

    /// Shown after a mismatched round; empty to stay silent
    #[serde(default = "default_mismatch_notice")]
    pub mismatch_notice: String,

    /// "digits", "alphanumeric", "printable", or a [charset] table with
    /// `custom = "..."`. Kept last so it can serialize as a table.
    #[serde(default)]
    pub charset: Charset,
}

fn default_min_length() -> usize {
    4
}

fn default_max_length() -> usize {
    8
}

fn default_mask() -> char {
    DEFAULT_MASK
}

fn default_max_attempts() -> u32 {
    3
}

fn default_prompt() -> String {
    "Enter PIN: ".to_string()
}

fn default_confirm_prompt() -> String {
    "Confirm PIN: ".to_string()
}

fn default_mismatch_notice() -> String {
    DEFAULT_MISMATCH_NOTICE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            max_length: default_max_length(),
            mask: default_mask(),
            max_attempts: default_max_attempts(),
            prompt: default_prompt(),
            confirm_prompt: default_confirm_prompt(),
            mismatch_notice: default_mismatch_notice(),
            charset: Charset::default(),
        }
    }
}

impl Config {
    /// Get config directory path (~/.maskpin)
    pub fn config_dir() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(".maskpin"))
            .ok_or_else(|| anyhow!("Could not find home directory"))
    }

    /// Get config file path: $MASKPIN_CONFIG, or ~/.maskpin/config.toml
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from the default location, or return defaults if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from `path`, or return defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory {}", dir.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        // Atomic write: write to temp file then rename
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, &contents)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path)
            .with_context(|| format!("Failed to rename config file to {}", path.display()))?;

        Ok(())
    }

    /// The notice to show between rounds, if any
    pub fn notice(&self) -> Option<String> {
        Some(self.mismatch_notice.clone()).filter(|notice| !notice.is_empty())
    }

    /// Build the checked validation policy these settings describe
    pub fn policy(&self) -> Result<PinPolicy> {
        PinPolicy::new(self.min_length, self.max_length, self.charset.clone())
            .context("Invalid PIN settings in configuration")
    }

    /// Reject settings that could never produce a PIN
    pub fn check(&self) -> Result<()> {
        self.policy()?;
        if self.max_attempts == 0 {
            bail!("max_attempts must be at least 1");
        }
        Ok(())
    }
}
