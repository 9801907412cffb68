//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,
    pub static_dir: String,

    // Writing
    pub render_drafts: bool,
    pub excerpt_length: usize,
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub math: MathConfig,

    // Date format (moment-style pattern)
    pub date_format: String,

    // Feed
    pub feed_limit: usize,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: String::new(),
            author: String::new(),
            language: "en".to_string(),

            url: "http://localhost".to_string(),
            root: "/".to_string(),

            content_dir: "content/blog".to_string(),
            public_dir: "public".to_string(),
            static_dir: "static".to_string(),

            render_drafts: false,
            excerpt_length: crate::content::DEFAULT_EXCERPT_LENGTH,
            highlight: HighlightConfig::default(),
            math: MathConfig::default(),

            date_format: "MMMM DD, YYYY".to_string(),

            feed_limit: 20,
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid site configuration in {:?}", path))?;
        Ok(config)
    }

    /// Site-wide metadata handed to every page
    pub fn metadata(&self) -> SiteMetadata {
        SiteMetadata {
            title: self.title.clone(),
            description: self.description.clone(),
            author: self.author.clone(),
            url: self.url.trim_end_matches('/').to_string(),
            root: self.root.clone(),
            language: self.language.clone(),
        }
    }
}

/// Read-only site metadata, built once at the start of a build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteMetadata {
    pub title: String,
    pub description: String,
    pub author: String,
    /// Absolute site URL without a trailing slash
    pub url: String,
    pub root: String,
    pub language: String,
}

/// Syntax highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Syntect theme used to generate the highlight stylesheet
    pub theme: String,
    pub line_numbers: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "InspiredGitHub".to_string(),
            line_numbers: false,
        }
    }
}

/// Math typesetting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MathConfig {
    pub enable: bool,
}

impl Default for MathConfig {
    fn default() -> Self {
        Self { enable: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.content_dir, "content/blog");
        assert_eq!(config.excerpt_length, 160);
        assert_eq!(config.date_format, "MMMM DD, YYYY");
        assert!(config.math.enable);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Gopher Notes
author: Test User
url: https://example.com/
highlight:
  theme: base16-ocean.dark
social:
  github: someone
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Gopher Notes");
        assert_eq!(config.highlight.theme, "base16-ocean.dark");
        assert!(!config.highlight.line_numbers);
        assert_eq!(config.public_dir, "public");
        assert!(config.extra.contains_key("social"));

        let meta = config.metadata();
        assert_eq!(meta.url, "https://example.com");
        assert_eq!(meta.title, "Gopher Notes");
    }
}
