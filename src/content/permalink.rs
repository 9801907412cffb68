//! Slug and URL path derivation

use std::path::{Component, Path, PathBuf};

/// Derive a record slug from a path relative to the content directory.
///
/// The extension is dropped, a trailing `index` segment is dropped (so a
/// post living in its own folder is named after the folder), and every
/// remaining segment is slugified. Segments are joined with `/`; the result
/// has no leading or trailing slash. Returns an empty string for a root
/// `index.md`.
pub fn slug_from_path(relative: &Path) -> String {
    let without_ext = relative.with_extension("");
    let mut segments: Vec<String> = without_ext
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if segments.last().map(|s| s == "index").unwrap_or(false) {
        segments.pop();
    }

    segments
        .iter()
        .map(|s| slug::slugify(s))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Output location of a file that sits next to the posts, such as an image in
/// a post's folder. Directories are slugified the same way post slugs are so
/// relative links from the post keep working; the file name is kept.
pub fn asset_path(relative: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    if let Some(parent) = relative.parent() {
        for component in parent.components() {
            if let Component::Normal(s) = component {
                let segment = slug::slugify(s.to_string_lossy());
                if !segment.is_empty() {
                    out.push(segment);
                }
            }
        }
    }
    if let Some(name) = relative.file_name() {
        out.push(name);
    }
    out
}

/// Normalize a slug given by a caller (`/cookie-jar/` and `cookie-jar` are the same)
pub fn normalize(slug: &str) -> &str {
    slug.trim_matches('/')
}

/// URL path for a slug, relative to the site root
pub fn url_path(root: &str, slug: &str) -> String {
    let root = root.trim_end_matches('/');
    format!("{}/{}/", root, slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_index_uses_folder_name() {
        assert_eq!(
            slug_from_path(Path::new("cookie-jar/index.md")),
            "cookie-jar"
        );
    }

    #[test]
    fn test_flat_file_and_nested_dirs() {
        assert_eq!(slug_from_path(Path::new("Keep Alive.md")), "keep-alive");
        assert_eq!(
            slug_from_path(Path::new("2021/HTTP Reuse/index.markdown")),
            "2021/http-reuse"
        );
    }

    #[test]
    fn test_root_index_is_empty() {
        assert_eq!(slug_from_path(Path::new("index.md")), "");
    }

    #[test]
    fn test_asset_path_follows_post_folder() {
        assert_eq!(
            asset_path(Path::new("Cookie Jar/jar diagram.png")),
            PathBuf::from("cookie-jar/jar diagram.png")
        );
        assert_eq!(asset_path(Path::new("logo.svg")), PathBuf::from("logo.svg"));
    }

    #[test]
    fn test_normalize_and_url_path() {
        assert_eq!(normalize("/cookie-jar/"), "cookie-jar");
        assert_eq!(url_path("/", "cookie-jar"), "/cookie-jar/");
        assert_eq!(url_path("/blog/", "a/b"), "/blog/a/b/");
    }
}
