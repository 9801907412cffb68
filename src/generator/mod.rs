//! Generator module - writes the static site from the content index

use anyhow::Result;
use rayon::prelude::*;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};
use walkdir::WalkDir;

use crate::config::SiteMetadata;
use crate::content::{permalink, ContentIndex, ContentIndexer};
use crate::error::{BuildError, BuildResult};
use crate::helpers::{
    absolutize_urls, cdata, date_xml, escape_xml, full_url_for, strip_invalid_xml_chars,
};
use crate::render::PageRenderer;
use crate::templates::TemplateRenderer;
use crate::Site;

/// What a build produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub posts: usize,
    pub assets: usize,
    /// Directory the site was published to
    pub output: PathBuf,
    pub elapsed: Duration,
}

/// Static site generator using the embedded Tera templates
pub struct Generator {
    site: Site,
    templates: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Result<Self> {
        let templates = TemplateRenderer::new(site.config.math.enable)?;

        Ok(Self {
            site: site.clone(),
            templates,
        })
    }

    /// Index the content and generate the entire site.
    ///
    /// The site is written to a staging directory next to the public
    /// directory and swapped in only once every step has succeeded; a failed
    /// build leaves the previous output untouched.
    pub fn generate(&self) -> Result<BuildReport> {
        let start = Instant::now();
        let output = check_output_dir(&self.site)?;

        let indexer = ContentIndexer::new(&self.site);
        let index = indexer.index_all()?;
        if index.is_empty() {
            tracing::warn!("No posts found in {:?}", self.site.content_dir);
        }
        tracing::info!("Indexed {} posts", index.len());

        let stylesheet = indexer
            .renderer()
            .stylesheet()
            .map_err(|e| e.at_path(&self.site.config_path()))?;

        let staging = staging_dir(&output)?;
        if staging.exists() {
            fs::remove_dir_all(&staging).map_err(|e| BuildError::io(&staging, e))?;
        }
        fs::create_dir_all(&staging).map_err(|e| BuildError::io(&staging, e))?;

        let assets = match self.write_site(&staging, &index, &stylesheet) {
            Ok(assets) => assets,
            Err(e) => {
                if let Err(cleanup) = fs::remove_dir_all(&staging) {
                    tracing::warn!("Failed to remove {:?}: {}", staging, cleanup);
                }
                return Err(e);
            }
        };

        if output.exists() {
            fs::remove_dir_all(&output).map_err(|e| BuildError::io(&output, e))?;
        }
        fs::rename(&staging, &output).map_err(|e| BuildError::io(&output, e))?;

        Ok(BuildReport {
            posts: index.len(),
            assets,
            output,
            elapsed: start.elapsed(),
        })
    }

    /// Write every output file under `out`; returns the number of copied assets
    fn write_site(&self, out: &Path, index: &ContentIndex, stylesheet: &str) -> Result<usize> {
        let meta = self.site.config.metadata();
        let pages = PageRenderer::new(index, &meta, &self.site.config.date_format);

        self.generate_post_pages(out, index, &pages, &meta)?;
        self.generate_index_page(out, &pages, &meta)?;
        self.generate_atom_feed(out, index, &pages, &meta)?;
        write_file(&out.join("css").join("highlight.css"), stylesheet)?;

        let mut assets = copy_dir(&self.site.static_dir, out, |relative| relative.to_path_buf())?;
        assets += copy_dir(&self.site.content_dir, out, permalink::asset_path)?;
        tracing::info!("Copied {} asset files", assets);

        Ok(assets)
    }

    /// Render every post page and its page-data file
    fn generate_post_pages(
        &self,
        out: &Path,
        index: &ContentIndex,
        pages: &PageRenderer<'_>,
        meta: &SiteMetadata,
    ) -> Result<()> {
        let slugs: Vec<&str> = index.slugs().collect();

        slugs.par_iter().try_for_each(|slug| -> Result<()> {
            let page = pages.render(slug)?;
            let html = self.templates.render_post(meta, &page)?;

            let output_path = out.join(slug).join("index.html");
            write_file(&output_path, html)?;

            let data_path = out.join("page-data").join(slug).join("page-data.json");
            write_file(&data_path, serde_json::to_string_pretty(&page)?)?;

            tracing::debug!("Generated post: {:?}", output_path);
            Ok(())
        })
    }

    fn generate_index_page(
        &self,
        out: &Path,
        pages: &PageRenderer<'_>,
        meta: &SiteMetadata,
    ) -> Result<()> {
        let html = self.templates.render_index(meta, &pages.summaries())?;
        write_file(&out.join("index.html"), html)?;
        tracing::debug!("Generated index page");
        Ok(())
    }

    /// Generate the Atom feed for the most recent posts
    fn generate_atom_feed(
        &self,
        out: &Path,
        index: &ContentIndex,
        pages: &PageRenderer<'_>,
        meta: &SiteMetadata,
    ) -> Result<()> {
        let feed = atom_feed(index, pages, meta, self.site.config.feed_limit);
        write_file(&out.join("atom.xml"), feed)?;
        tracing::info!("Generated atom.xml");
        Ok(())
    }
}

/// Copy every non-markdown file under `dir` into `out`, placing each at
/// `dest(relative_path)`
fn copy_dir<F>(dir: &Path, out: &Path, dest: F) -> Result<usize>
where
    F: Fn(&Path) -> PathBuf,
{
    if !dir.exists() {
        return Ok(0);
    }

    let mut copied = 0;
    let walker = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry in {:?}: {}", dir, e);
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }

        let ext = path.extension().and_then(|e| e.to_str());
        if matches!(ext, Some("md") | Some("markdown")) {
            continue;
        }

        let relative = path.strip_prefix(dir)?;
        let target = out.join(dest(relative));
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
        }
        fs::copy(path, &target).map_err(|e| BuildError::io(path, e))?;
        copied += 1;
    }

    Ok(copied)
}

/// Build the Atom document for the newest `limit` posts
pub fn atom_feed(
    index: &ContentIndex,
    pages: &PageRenderer<'_>,
    meta: &SiteMetadata,
    limit: usize,
) -> String {
    let updated = index
        .records()
        .next()
        .map(|r| date_xml(&r.date))
        .unwrap_or_else(|| chrono::Utc::now().to_rfc3339());
    let home = full_url_for(meta, "");

    let mut feed = String::new();
    feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    feed.push('\n');
    feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
    feed.push('\n');
    feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&meta.title)));
    if !meta.description.is_empty() {
        feed.push_str(&format!(
            "  <subtitle>{}</subtitle>\n",
            escape_xml(&meta.description)
        ));
    }
    feed.push_str(&format!(
        "  <link href=\"{}\" rel=\"self\"/>\n",
        full_url_for(meta, "atom.xml")
    ));
    feed.push_str(&format!("  <link href=\"{}\"/>\n", home));
    feed.push_str(&format!("  <updated>{}</updated>\n", updated));
    feed.push_str(&format!("  <id>{}</id>\n", home));
    if !meta.author.is_empty() {
        feed.push_str(&format!(
            "  <author><name>{}</name></author>\n",
            escape_xml(&meta.author)
        ));
    }

    for record in index.records().take(limit) {
        let link = format!("{}{}", meta.url, pages.path_for(record));
        let published = date_xml(&record.date);
        let content = strip_invalid_xml_chars(&absolutize_urls(&record.html, &meta.url));

        feed.push_str("  <entry>\n");
        feed.push_str(&format!("    <title>{}</title>\n", escape_xml(&record.title)));
        feed.push_str(&format!("    <link href=\"{}\"/>\n", link));
        feed.push_str(&format!("    <id>{}</id>\n", link));
        feed.push_str(&format!("    <published>{}</published>\n", published));
        feed.push_str(&format!("    <updated>{}</updated>\n", published));
        feed.push_str(&format!(
            "    <summary>{}</summary>\n",
            escape_xml(&strip_invalid_xml_chars(record.description_or_excerpt()))
        ));
        feed.push_str(&format!(
            "    <content type=\"html\"><![CDATA[{}]]></content>\n",
            cdata(&content)
        ));
        feed.push_str("  </entry>\n");
    }

    feed.push_str("</feed>\n");
    feed
}

/// Resolve the public directory and make sure deleting it cannot touch the
/// site itself or its sources.
///
/// Refused when the public directory is the site directory or one of its
/// ancestors, or when it overlaps the content or static directory.
pub fn check_output_dir(site: &Site) -> Result<PathBuf> {
    let public = resolve_path(&site.public_dir)?;
    let base = resolve_path(&site.base_dir)?;

    if base.starts_with(&public) {
        anyhow::bail!(
            "refusing to use {:?} as the public directory: it contains the site itself",
            site.public_dir
        );
    }

    for (name, dir) in [("content", &site.content_dir), ("static", &site.static_dir)] {
        let dir = resolve_path(dir)?;
        if dir.starts_with(&public) || public.starts_with(&dir) {
            anyhow::bail!(
                "refusing to use {:?} as the public directory: it overlaps the {} directory {:?}",
                site.public_dir,
                name,
                dir
            );
        }
    }

    Ok(public)
}

/// Remove the public directory after [`check_output_dir`] has cleared it.
/// Returns whether anything was deleted.
pub fn remove_public_dir(site: &Site) -> Result<bool> {
    let public = check_output_dir(site)?;
    if !public.exists() {
        return Ok(false);
    }
    fs::remove_dir_all(&public).map_err(|e| BuildError::io(&public, e))?;
    Ok(true)
}

/// Absolute form of `path` with `.` and `..` folded away. The longest
/// existing prefix is canonicalized so symlinks resolve the same way for
/// paths that do and do not exist yet.
fn resolve_path(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }

    let mut existing = normalized.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(canonical) = fs::canonicalize(existing) {
            return Ok(missing.iter().rev().fold(canonical, |acc, name| acc.join(name)));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return Ok(normalized),
        }
    }
}

/// Hidden sibling of the public directory that a build is written into
fn staging_dir(public: &Path) -> Result<PathBuf> {
    match (public.parent(), public.file_name()) {
        (Some(parent), Some(name)) => {
            Ok(parent.join(format!(".{}.staging", name.to_string_lossy())))
        }
        _ => anyhow::bail!("{:?} cannot be used as the public directory", public),
    }
}

fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> BuildResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| BuildError::io(path, e))
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().map(|s| s.starts_with('.')).unwrap_or(false)
}
