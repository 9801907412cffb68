//! Content record model

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Stable record identifier: the source path relative to the content directory
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn from_relative(relative: &std::path::Path) -> Self {
        let joined = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        RecordId(joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One indexed markdown post.
///
/// Built once per build by the indexer and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct ContentRecord {
    pub id: RecordId,

    /// URL path segment, unique across the index
    pub slug: String,

    pub title: String,

    pub date: NaiveDateTime,

    /// Author-supplied summary; may be absent or empty
    pub description: Option<String>,

    /// Markdown source with front-matter removed
    pub raw_body: String,

    /// Rendered HTML body, safe to embed verbatim
    pub html: String,

    /// Plain-text summary derived from `raw_body`
    pub excerpt: String,

    /// Full source file path
    #[serde(skip)]
    pub source: PathBuf,

    pub draft: bool,

    /// Custom front-matter fields
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl ContentRecord {
    /// The description when it carries text, otherwise the excerpt.
    ///
    /// An empty or whitespace-only description counts as absent.
    pub fn description_or_excerpt(&self) -> &str {
        match self.description.as_deref() {
            Some(description) if !description.trim().is_empty() => description,
            _ => &self.excerpt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::Path;

    fn record(description: Option<&str>) -> ContentRecord {
        ContentRecord {
            id: RecordId::from_relative(Path::new("cookie-jar/index.md")),
            slug: "cookie-jar".to_string(),
            title: "Cookie Jar".to_string(),
            date: NaiveDate::from_ymd_opt(2021, 2, 6)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            description: description.map(str::to_string),
            raw_body: String::new(),
            html: String::new(),
            excerpt: "derived excerpt".to_string(),
            source: PathBuf::from("content/blog/cookie-jar/index.md"),
            draft: false,
            extra: HashMap::new(),
        }
    }

    #[test]
    fn test_description_wins_when_non_empty() {
        assert_eq!(record(Some("hand written")).description_or_excerpt(), "hand written");
    }

    #[test]
    fn test_empty_or_absent_description_falls_back() {
        assert_eq!(record(None).description_or_excerpt(), "derived excerpt");
        assert_eq!(record(Some("")).description_or_excerpt(), "derived excerpt");
        assert_eq!(record(Some("  \n")).description_or_excerpt(), "derived excerpt");
    }

    #[test]
    fn test_record_id_uses_forward_slashes() {
        let id = RecordId::from_relative(Path::new("2021").join("post.md").as_path());
        assert_eq!(id.as_str(), "2021/post.md");
    }
}
