//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::SiteMetadata;

/// Characters escaped in a URL path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for("/blog/", "/cookie-jar/") // -> "/blog/cookie-jar/"
/// ```
pub fn url_for(root: &str, path: &str) -> String {
    let root = root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, encode_path(path))
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&site, "/cookie-jar/") // -> "https://example.com/cookie-jar/"
/// ```
pub fn full_url_for(site: &SiteMetadata, path: &str) -> String {
    format!("{}{}", site.url.trim_end_matches('/'), url_for(&site.root, path))
}

/// Encode a URL path
pub fn encode_path(path: &str) -> String {
    utf8_percent_encode(path, PATH_SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(url: &str, root: &str) -> SiteMetadata {
        SiteMetadata {
            title: "t".to_string(),
            description: String::new(),
            author: String::new(),
            url: url.to_string(),
            root: root.to_string(),
            language: "en".to_string(),
        }
    }

    #[test]
    fn test_url_for() {
        assert_eq!(url_for("/", "/cookie-jar/"), "/cookie-jar/");
        assert_eq!(url_for("/blog/", "cookie-jar/"), "/blog/cookie-jar/");
        assert_eq!(url_for("/blog", ""), "/blog/");
    }

    #[test]
    fn test_full_url_for() {
        let meta = site("https://example.com", "/");
        assert_eq!(full_url_for(&meta, "/a/"), "https://example.com/a/");

        let meta = site("https://example.com", "/blog/");
        assert_eq!(full_url_for(&meta, "atom.xml"), "https://example.com/blog/atom.xml");
    }

    #[test]
    fn test_encode_path() {
        assert_eq!(encode_path("a b/c"), "a%20b/c");
        assert_eq!(encode_path("cookie-jar/"), "cookie-jar/");
    }
}
