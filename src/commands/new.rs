//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::FrontMatter;
use crate::Site;

/// Scaffold `<content_dir>/<slug>/index.md` and return its path
pub fn run(site: &Site, title: &str) -> Result<PathBuf> {
    let now = chrono::Local::now();
    create_post(site, title, &now.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Create a post dated `date`; refuses to overwrite an existing post
pub fn create_post(site: &Site, title: &str, date: &str) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("cannot derive a slug from title {:?}", title);
    }

    let target_dir = site.content_dir.join(&slug);
    let file_path = target_dir.join("index.md");
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let front_matter = FrontMatter {
        title: Some(title.to_string()),
        date: Some(date.to_string()),
        description: Some(String::new()),
        ..FrontMatter::default()
    };
    let content = format!("---\n{}---\n\n", serde_yaml::to_string(&front_matter)?);

    fs::create_dir_all(&target_dir)?;
    fs::write(&file_path, content)?;

    tracing::info!("Created: {:?}", file_path);
    Ok(file_path)
}
