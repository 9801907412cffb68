//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{BuildError, BuildResult};

const FENCE: &str = "---";

/// Front-matter data from a post
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub draft: bool,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Split a document into its front-matter and body.
    ///
    /// A document without a leading `---` block yields empty front-matter and
    /// the whole text as body; the required-field checks reject it later. An
    /// opened but unclosed block, or one that is not a YAML mapping, is a
    /// parse error.
    pub fn parse<'a>(content: &'a str, path: &Path) -> BuildResult<(Self, &'a str)> {
        let content = content.trim_start_matches('\u{feff}');
        let trimmed = content.trim_start();

        let Some(after_open) = trimmed.strip_prefix(FENCE) else {
            return Ok((FrontMatter::default(), content));
        };
        // The opening fence must be alone on its line
        let Some(after_open) = strip_line_end(after_open) else {
            return Ok((FrontMatter::default(), content));
        };

        let (yaml, body) = split_at_closing_fence(after_open)
            .ok_or_else(|| BuildError::parse(path, "front-matter block is not closed with `---`"))?;

        if yaml.trim().is_empty() {
            return Ok((FrontMatter::default(), body));
        }

        let fm: FrontMatter = serde_yaml::from_str(yaml)
            .map_err(|e| BuildError::parse(path, format!("malformed front-matter: {}", e)))?;
        Ok((fm, body))
    }

    /// The title, if present and non-blank
    pub fn require_title(&self, path: &Path) -> BuildResult<String> {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => Ok(title.to_string()),
            _ => Err(BuildError::MissingField {
                path: path.to_path_buf(),
                field: "title",
            }),
        }
    }

    /// Parse the date field; absent is a missing field, unparseable a parse error
    pub fn require_date(&self, path: &Path) -> BuildResult<NaiveDateTime> {
        let raw = match self.date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw,
            _ => {
                return Err(BuildError::MissingField {
                    path: path.to_path_buf(),
                    field: "date",
                })
            }
        };
        parse_date_string(raw)
            .ok_or_else(|| BuildError::parse(path, format!("invalid date `{}`", raw)))
    }
}

fn strip_line_end(s: &str) -> Option<&str> {
    let rest = s.trim_start_matches([' ', '\t']);
    if rest.is_empty() {
        Some(rest)
    } else {
        rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))
    }
}

/// Find the line holding only `---`; returns (yaml, body after the fence line)
fn split_at_closing_fence(s: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    for line in s.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            let yaml = &s[..offset];
            let body = &s[offset + line.len()..];
            return Some((yaml, body.trim_start_matches(['\n', '\r'])));
        }
        offset += line.len();
    }
    None
}

/// Parse a date string in the ISO-like forms authors write
fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y/%m/%d %H:%M:%S",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // RFC 3339 keeps the calendar date as written, not shifted to local time
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    None
}
