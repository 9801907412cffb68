//! Content indexer - walks the content directory and builds the record index

use indexmap::map::Entry;
use indexmap::IndexMap;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::excerpt::derive_excerpt;
use super::record::{ContentRecord, RecordId};
use super::{permalink, FrontMatter, MarkdownRenderer};
use crate::error::{BuildError, BuildResult};
use crate::Site;

/// Knobs for a single indexing pass
#[derive(Debug, Clone)]
pub struct IndexOptions {
    pub excerpt_length: usize,
    pub include_drafts: bool,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            excerpt_length: super::DEFAULT_EXCERPT_LENGTH,
            include_drafts: false,
        }
    }
}

/// Parses every document under the content directory into records
pub struct ContentIndexer {
    content_dir: PathBuf,
    renderer: MarkdownRenderer,
    options: IndexOptions,
}

impl ContentIndexer {
    /// Create an indexer configured from the site
    pub fn new(site: &Site) -> Self {
        let config = &site.config;
        let renderer = MarkdownRenderer::with_options(
            &config.highlight.theme,
            config.highlight.line_numbers,
            config.math.enable,
        );
        let options = IndexOptions {
            excerpt_length: config.excerpt_length,
            include_drafts: site.include_drafts,
        };
        Self::with_renderer(&site.content_dir, renderer, options)
    }

    pub fn with_renderer(
        content_dir: impl Into<PathBuf>,
        renderer: MarkdownRenderer,
        options: IndexOptions,
    ) -> Self {
        Self {
            content_dir: content_dir.into(),
            renderer,
            options,
        }
    }

    pub fn renderer(&self) -> &MarkdownRenderer {
        &self.renderer
    }

    /// Render a markdown body to HTML
    pub fn render_html(&self, raw_body: &str) -> BuildResult<String> {
        self.renderer.render(raw_body)
    }

    /// Parse and render every document, returning the complete index.
    ///
    /// Documents are processed in parallel; this returns only once all of
    /// them are done, and the first failure aborts the whole pass.
    pub fn index_all(&self) -> BuildResult<ContentIndex> {
        let files = self.markdown_files()?;
        tracing::debug!("Indexing {} documents in {:?}", files.len(), self.content_dir);

        let parsed: Vec<Option<ContentRecord>> = files
            .par_iter()
            .map(|path| self.index_document(path))
            .collect::<BuildResult<_>>()?;

        let mut records: Vec<ContentRecord> = parsed.into_iter().flatten().collect();

        // Newest first; slug order breaks ties so output is stable
        records.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));

        ContentIndex::from_records(records)
    }

    /// Index one document; `None` when it is a draft and drafts are off
    pub fn index_document(&self, path: &Path) -> BuildResult<Option<ContentRecord>> {
        let content = fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
        let (fm, body) = FrontMatter::parse(&content, path)?;

        let title = fm.require_title(path)?;
        let date = fm.require_date(path)?;

        if fm.draft && !self.options.include_drafts {
            tracing::warn!("Skipping draft {:?}", path);
            return Ok(None);
        }

        let relative = path.strip_prefix(&self.content_dir).unwrap_or(path);
        let slug = permalink::slug_from_path(relative);
        if slug.is_empty() {
            return Err(BuildError::parse(
                path,
                "cannot derive a slug; place the post in its own file or folder",
            ));
        }

        let html = self.render_html(body).map_err(|e| e.at_path(path))?;
        let excerpt = derive_excerpt(body, self.options.excerpt_length);

        Ok(Some(ContentRecord {
            id: RecordId::from_relative(relative),
            slug,
            title,
            date,
            description: fm.description,
            raw_body: body.to_string(),
            html,
            excerpt,
            source: path.to_path_buf(),
            draft: fm.draft,
            extra: fm.extra,
        }))
    }

    /// All markdown files under the content directory, in path order
    fn markdown_files(&self) -> BuildResult<Vec<PathBuf>> {
        if !self.content_dir.exists() {
            tracing::warn!("Content directory {:?} does not exist", self.content_dir);
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.content_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()))
        {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.content_dir.clone());
                BuildError::io(path, e.into())
            })?;
            let path = entry.path();
            if entry.file_type().is_file() && is_markdown_file(path) {
                files.push(path.to_path_buf());
            }
        }
        Ok(files)
    }
}

/// Read-only record set with slug lookup, ordered newest first
#[derive(Debug, Default)]
pub struct ContentIndex {
    records: IndexMap<String, ContentRecord>,
}

impl ContentIndex {
    /// Build an index from records already in display order
    pub fn from_records(records: Vec<ContentRecord>) -> BuildResult<Self> {
        let mut map: IndexMap<String, ContentRecord> = IndexMap::with_capacity(records.len());
        for record in records {
            match map.entry(record.slug.clone()) {
                Entry::Occupied(existing) => {
                    return Err(BuildError::DuplicateSlug {
                        slug: record.slug,
                        first: existing.get().source.clone(),
                        second: record.source,
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
            }
        }
        Ok(Self { records: map })
    }

    /// Look up a record by slug; surrounding slashes are ignored
    pub fn get_by_slug(&self, slug: &str) -> BuildResult<&ContentRecord> {
        let key = permalink::normalize(slug);
        self.records.get(key).ok_or_else(|| BuildError::NotFound {
            slug: key.to_string(),
        })
    }

    /// Neighbours of a record in index order: (older, newer)
    pub fn neighbors(&self, slug: &str) -> (Option<&ContentRecord>, Option<&ContentRecord>) {
        let Some(pos) = self.records.get_index_of(permalink::normalize(slug)) else {
            return (None, None);
        };
        let older = self.records.get_index(pos + 1).map(|(_, r)| r);
        let newer = pos
            .checked_sub(1)
            .and_then(|i| self.records.get_index(i))
            .map(|(_, r)| r);
        (older, newer)
    }

    pub fn records(&self) -> impl Iterator<Item = &ContentRecord> {
        self.records.values()
    }

    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}
