//! Built-in page templates using the Tera template engine
//!
//! The layout, post and index templates are embedded in the binary. HTML
//! autoescaping stays on; only the pre-rendered post body and generated
//! paths are inserted with `safe`.

use std::error::Error as _;
use std::path::PathBuf;
use tera::{Context, Tera};

use crate::config::SiteMetadata;
use crate::error::{BuildError, BuildResult, RenderStage};
use crate::helpers::url_for;
use crate::render::{PagePayload, PostSummary};

/// Template renderer with the embedded default theme
pub struct TemplateRenderer {
    tera: Tera,
    math: bool,
}

impl TemplateRenderer {
    /// Create a renderer with all templates loaded; `math` links the KaTeX
    /// stylesheet from every page
    pub fn new(math: bool) -> BuildResult<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("default/layout.html")),
            ("post.html", include_str!("default/post.html")),
            ("index.html", include_str!("default/index.html")),
        ])
        .map_err(|e| template_error("<templates>", &e))?;

        Ok(Self { tera, math })
    }

    /// Render one post page
    pub fn render_post(&self, site: &SiteMetadata, page: &PagePayload) -> BuildResult<String> {
        let mut context = self.base_context(site, &page.layout.location);
        context.insert("layout", &page.layout);
        context.insert("seo", &page.seo);
        context.insert("header", &page.header);
        context.insert("body_html", &page.body_html);
        context.insert("nav", &page.nav);

        self.render("post.html", &context, &page.layout.location)
    }

    /// Render the index page listing every post
    pub fn render_index(&self, site: &SiteMetadata, posts: &[PostSummary]) -> BuildResult<String> {
        let root = url_for(&site.root, "");
        let mut context = self.base_context(site, &root);
        context.insert("posts", posts);

        self.render("index.html", &context, &root)
    }

    fn base_context(&self, site: &SiteMetadata, location: &str) -> Context {
        let root = url_for(&site.root, "");
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("root", &root);
        context.insert("is_root", &(location == root));
        context.insert("math", &self.math);
        context
    }

    fn render(&self, name: &str, context: &Context, location: &str) -> BuildResult<String> {
        self.tera
            .render(name, context)
            .map_err(|e| template_error(location, &e))
    }
}

/// Tera nests the useful detail in the source chain
fn template_error(location: &str, err: &tera::Error) -> BuildError {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    BuildError::render(PathBuf::from(location), RenderStage::Template, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Header, LayoutProps, Nav, NavLink, Seo};

    fn site() -> SiteMetadata {
        SiteMetadata {
            title: "Gopher Notes".to_string(),
            description: "Notes on Go networking".to_string(),
            author: "Ada".to_string(),
            url: "https://example.com".to_string(),
            root: "/".to_string(),
            language: "en".to_string(),
        }
    }

    fn page() -> PagePayload {
        PagePayload {
            slug: "cookie-jar".to_string(),
            layout: LayoutProps {
                title: "Gopher Notes".to_string(),
                location: "/cookie-jar/".to_string(),
            },
            seo: Seo {
                title: "Cookies & Jars".to_string(),
                description: "How the <net/http> cookie jar works".to_string(),
            },
            header: Header {
                title: "Cookies & Jars".to_string(),
                date: "February 06, 2021".to_string(),
                date_iso: "2021-02-06".to_string(),
            },
            body_html: "<p>Hello <strong>jar</strong></p>".to_string(),
            nav: Nav {
                previous: Some(NavLink {
                    title: "Older".to_string(),
                    path: "/older/".to_string(),
                }),
                next: None,
            },
        }
    }

    #[test]
    fn test_post_page() {
        let renderer = TemplateRenderer::new(false).unwrap();
        let html = renderer.render_post(&site(), &page()).unwrap();

        assert!(html.contains("<title>Cookies &amp; Jars | Gopher Notes</title>"));
        assert!(html.contains(r#"<meta name="description" content="How the &lt;net"#));
        assert!(html.contains("<p>Hello <strong>jar</strong></p>"));
        assert!(html.contains("February 06, 2021"));
        assert!(html.contains(r#"<a href="/older/" rel="prev">"#));
        assert!(!html.contains("rel=\"next\""));
        assert!(html.contains(r#"class="header-link-home""#));
        assert!(!html.contains("katex.min.css"));
    }

    #[test]
    fn test_index_page() {
        let renderer = TemplateRenderer::new(true).unwrap();
        let posts = vec![PostSummary {
            title: "Keep-Alive".to_string(),
            path: "/keep-alive/".to_string(),
            date: "February 20, 2021".to_string(),
            date_iso: "2021-02-20".to_string(),
            description: "Reusing TCP connections".to_string(),
        }];
        let html = renderer.render_index(&site(), &posts).unwrap();

        assert!(html.contains(r#"<h1 class="main-heading">"#));
        assert!(html.contains(r#"href="/keep-alive/""#));
        assert!(html.contains("Reusing TCP connections"));
        assert!(html.contains("katex.min.css"));
    }

    #[test]
    fn test_empty_index() {
        let renderer = TemplateRenderer::new(false).unwrap();
        let html = renderer.render_index(&site(), &[]).unwrap();
        assert!(html.contains("No blog posts found."));
    }
}
