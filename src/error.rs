//! Build error taxonomy
//!
//! Every variant is fatal: a static build is all-or-nothing, so nothing in
//! the pipeline recovers from these locally. Each variant names the document
//! (or slug) and the stage that failed so the operator can find it.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias for the build pipeline
pub type BuildResult<T> = std::result::Result<T, BuildError>;

/// Rendering stage that produced a [`BuildError::Render`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStage {
    Math,
    Highlight,
    Template,
}

impl fmt::Display for RenderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderStage::Math => "math",
            RenderStage::Highlight => "highlight",
            RenderStage::Template => "template",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum BuildError {
    /// Front-matter block is malformed or a field has an invalid value
    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// A required front-matter field is absent
    #[error("failed to parse {}: missing required field `{field}`", path.display())]
    MissingField { path: PathBuf, field: &'static str },

    /// Two documents derived the same slug
    #[error(
        "duplicate slug `{slug}`: {} and {}",
        first.display(),
        second.display()
    )]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("failed to render {} ({stage}): {message}", path.display())]
    Render {
        path: PathBuf,
        stage: RenderStage,
        message: String,
    },

    /// A page was requested for a slug the index does not contain
    #[error("no content record for slug `{slug}`")]
    NotFound { slug: String },

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        BuildError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn render(path: impl Into<PathBuf>, stage: RenderStage, message: impl Into<String>) -> Self {
        BuildError::Render {
            path: path.into(),
            stage,
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach a document path to a render error produced without one
    pub(crate) fn at_path(self, path: &std::path::Path) -> Self {
        match self {
            BuildError::Render {
                path: p,
                stage,
                message,
            } if p.as_os_str().is_empty() => BuildError::Render {
                path: path.to_path_buf(),
                stage,
                message,
            },
            other => other,
        }
    }

    /// Whether this error belongs to the ParseError class
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            BuildError::Parse { .. } | BuildError::MissingField { .. } | BuildError::DuplicateSlug { .. }
        )
    }
}
