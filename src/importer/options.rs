//! Import options and limits

use super::slug::{SlugSuffix, MAX_SLUG_LEN};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Length limits applied to a draft, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Longest accepted title
    pub max_title_len: usize,
    /// Longest accepted body
    pub max_body_len: usize,
    /// Excerpts are truncated to this length
    pub max_excerpt_len: usize,
    /// Meta titles are truncated to this length
    pub max_meta_title_len: usize,
    /// Slug bases are truncated to this length
    pub max_slug_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_title_len: 500,
            max_body_len: 200_000,
            max_excerpt_len: 200,
            max_meta_title_len: 200,
            max_slug_len: MAX_SLUG_LEN,
        }
    }
}

/// Options for markdown import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Length limits
    pub limits: Limits,
    /// Slug suffix strategy
    pub suffix: SlugSuffix,
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the slug suffix strategy
    pub fn with_suffix(mut self, suffix: SlugSuffix) -> Self {
        self.suffix = suffix;
        self
    }

    /// Replace the length limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Read options from the `[import]` section of a TOML document. A
    /// document without that section yields the defaults.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let full_config: toml::Value = toml::from_str(content)?;
        match full_config.get("import") {
            Some(section) => {
                let options: ImportOptions = section.clone().try_into()?;
                Ok(options)
            }
            None => Ok(Self::default()),
        }
    }

    /// Load options from a TOML config file. The file must exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            anyhow::bail!("config not found: {}", path.display());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        log::debug!("loaded config {}", path.display());
        Self::from_toml_str(&content)
    }
}
