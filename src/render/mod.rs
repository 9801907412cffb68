//! Page renderer - resolves a slug into a fully formed page payload
//!
//! The payload is what the layout, SEO and body templates consume. Body HTML
//! comes from the indexer and is passed through untouched; sanitising it is
//! the indexer's job, never this module's.

use serde::Serialize;

use crate::config::SiteMetadata;
use crate::content::{permalink, ContentIndex, ContentRecord};
use crate::error::BuildResult;
use crate::helpers::{format_date, url_for};

/// Props for the site-wide layout wrapper
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutProps {
    /// Site title
    pub title: String,
    /// Path of the page being rendered
    pub location: String,
}

/// Metadata injected into the document head
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Seo {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub title: String,
    /// Display form, e.g. "February 06, 2021"
    pub date: String,
    /// Machine-readable form for `<time datetime>`
    pub date_iso: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub title: String,
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Nav {
    /// The next older post
    pub previous: Option<NavLink>,
    /// The next newer post
    pub next: Option<NavLink>,
}

/// A fully resolved page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagePayload {
    pub slug: String,
    pub layout: LayoutProps,
    pub seo: Seo,
    pub header: Header,
    /// Pre-rendered body, embedded verbatim
    pub body_html: String,
    pub nav: Nav,
}

/// One entry of the post listing on the index page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostSummary {
    pub title: String,
    pub path: String,
    pub date: String,
    pub date_iso: String,
    pub description: String,
}

/// Builds page payloads from the finished index
pub struct PageRenderer<'a> {
    index: &'a ContentIndex,
    site: &'a SiteMetadata,
    date_format: &'a str,
}

impl<'a> PageRenderer<'a> {
    pub fn new(index: &'a ContentIndex, site: &'a SiteMetadata, date_format: &'a str) -> Self {
        Self {
            index,
            site,
            date_format,
        }
    }

    /// Resolve `slug` into a page; an unknown slug is `NotFound`
    pub fn render(&self, slug: &str) -> BuildResult<PagePayload> {
        let record = self.index.get_by_slug(slug)?;
        let (older, newer) = self.index.neighbors(&record.slug);

        Ok(PagePayload {
            slug: record.slug.clone(),
            layout: LayoutProps {
                title: self.site.title.clone(),
                location: self.path_for(record),
            },
            seo: Seo {
                title: record.title.clone(),
                description: record.description_or_excerpt().to_string(),
            },
            header: Header {
                title: record.title.clone(),
                date: format_date(&record.date, self.date_format),
                date_iso: record.date.format("%Y-%m-%d").to_string(),
            },
            body_html: record.html.clone(),
            nav: Nav {
                previous: older.map(|r| self.nav_link(r)),
                next: newer.map(|r| self.nav_link(r)),
            },
        })
    }

    /// Listing entries for every record, in index order
    pub fn summaries(&self) -> Vec<PostSummary> {
        self.index
            .records()
            .map(|record| PostSummary {
                title: record.title.clone(),
                path: self.path_for(record),
                date: format_date(&record.date, self.date_format),
                date_iso: record.date.format("%Y-%m-%d").to_string(),
                description: record.description_or_excerpt().to_string(),
            })
            .collect()
    }

    /// Root-relative URL of a record's page
    pub fn path_for(&self, record: &ContentRecord) -> String {
        url_for(&self.site.root, &permalink::url_path("/", &record.slug))
    }

    fn nav_link(&self, record: &ContentRecord) -> NavLink {
        NavLink {
            title: record.title.clone(),
            path: self.path_for(record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::RecordId;
    use crate::error::BuildError;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    fn record(slug: &str, day: u32, description: Option<&str>) -> ContentRecord {
        ContentRecord {
            id: RecordId::from_relative(Path::new(&format!("{slug}/index.md"))),
            slug: slug.to_string(),
            title: format!("Title {slug}"),
            date: NaiveDate::from_ymd_opt(2021, 2, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            description: description.map(str::to_string),
            raw_body: String::new(),
            html: "<p>body of <em>".to_string() + slug + "</em></p>",
            excerpt: format!("excerpt of {slug}"),
            source: PathBuf::from(format!("content/blog/{slug}/index.md")),
            draft: false,
            extra: HashMap::new(),
        }
    }

    fn site() -> SiteMetadata {
        SiteMetadata {
            title: "Gopher Notes".to_string(),
            description: String::new(),
            author: String::new(),
            url: "https://example.com".to_string(),
            root: "/".to_string(),
            language: "en".to_string(),
        }
    }

    fn index() -> ContentIndex {
        ContentIndex::from_records(vec![
            record("keep-alive", 20, Some("Reusing TCP connections")),
            record("cookie-jar", 6, None),
            record("empty-description", 1, Some("")),
        ])
        .unwrap()
    }

    #[test]
    fn test_payload_for_cookie_jar() {
        let index = index();
        let site = site();
        let renderer = PageRenderer::new(&index, &site, "MMMM DD, YYYY");

        let page = renderer.render("cookie-jar").unwrap();
        assert_eq!(page.layout.title, "Gopher Notes");
        assert_eq!(page.layout.location, "/cookie-jar/");
        assert_eq!(page.seo.title, "Title cookie-jar");
        assert_eq!(page.seo.description, "excerpt of cookie-jar");
        assert_eq!(page.header.date, "February 06, 2021");
        assert_eq!(page.header.date_iso, "2021-02-06");
        assert_eq!(page.body_html, "<p>body of <em>cookie-jar</em></p>");
        assert_eq!(page.nav.previous.as_ref().unwrap().path, "/empty-description/");
        assert_eq!(page.nav.next.as_ref().unwrap().title, "Title keep-alive");
    }

    #[test]
    fn test_description_overrides_excerpt_verbatim() {
        let index = index();
        let site = site();
        let renderer = PageRenderer::new(&index, &site, "MMMM DD, YYYY");
        let page = renderer.render("/keep-alive/").unwrap();
        assert_eq!(page.seo.description, "Reusing TCP connections");
        assert!(page.nav.next.is_none());
    }

    #[test]
    fn test_empty_description_falls_back_to_excerpt() {
        let index = index();
        let site = site();
        let renderer = PageRenderer::new(&index, &site, "MMMM DD, YYYY");
        let page = renderer.render("empty-description").unwrap();
        assert_eq!(page.seo.description, "excerpt of empty-description");
        assert!(page.nav.previous.is_none());
    }

    #[test]
    fn test_unknown_slug_is_not_found() {
        let index = index();
        let site = site();
        let renderer = PageRenderer::new(&index, &site, "MMMM DD, YYYY");
        assert!(matches!(
            renderer.render("no-such-post"),
            Err(BuildError::NotFound { .. })
        ));
    }

    #[test]
    fn test_summaries_respect_root() {
        let index = index();
        let mut site = site();
        site.root = "/blog/".to_string();
        let renderer = PageRenderer::new(&index, &site, "YYYY-MM-DD");
        let summaries = renderer.summaries();
        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].path, "/blog/keep-alive/");
        assert_eq!(summaries[0].date, "2021-02-20");
        assert_eq!(summaries[1].description, "excerpt of cookie-jar");
    }
}
