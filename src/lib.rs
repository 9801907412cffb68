//! inkpost: a static blog generator for markdown posts
//!
//! Posts are indexed into an ordered, slug-keyed index, rendered once to
//! HTML, and written out as static pages with an index, an Atom feed and a
//! JSON page-data file per post.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod render;
pub mod server;
pub mod templates;

pub use error::{BuildError, BuildResult};

use anyhow::Result;
use std::path::{Path, PathBuf};

/// A blog site rooted at a directory
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Markdown content directory
    pub content_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Static files copied verbatim into the output
    pub static_dir: PathBuf,
    /// Whether posts marked `draft: true` are published
    pub include_drafts: bool,
}

impl Site {
    /// Open a site from a directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Build a site from an already loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let static_dir = base_dir.join(&config.static_dir);
        let include_drafts = config.render_drafts;

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
            static_dir,
            include_drafts,
        }
    }

    /// Publish drafts regardless of `render_drafts`
    pub fn with_drafts(mut self, include: bool) -> Self {
        self.include_drafts = self.include_drafts || include;
        self
    }

    /// Path of the site configuration file
    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join("_config.yml")
    }

    /// Generate the static site
    pub fn build(&self) -> Result<generator::BuildReport> {
        commands::build::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post
    pub fn new_post(&self, title: &str) -> Result<PathBuf> {
        commands::new::run(self, title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_config_file() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();

        assert_eq!(site.content_dir, dir.path().join("content/blog"));
        assert_eq!(site.public_dir, dir.path().join("public"));
        assert!(!site.include_drafts);
    }

    #[test]
    fn test_config_file_overrides_dirs() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "title: Gopher Notes\ncontent_dir: posts\npublic_dir: out\nrender_drafts: true\n",
        )
        .unwrap();

        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.config.title, "Gopher Notes");
        assert_eq!(site.content_dir, dir.path().join("posts"));
        assert_eq!(site.public_dir, dir.path().join("out"));
        assert!(site.include_drafts);
    }

    #[test]
    fn test_drafts_flag_only_widens() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap().with_drafts(true);
        assert!(site.include_drafts);

        let site = site.with_drafts(false);
        assert!(site.include_drafts);
    }
}
