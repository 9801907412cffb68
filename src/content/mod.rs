//! Content module - front-matter, markdown rendering, and the record index

mod excerpt;
mod frontmatter;
pub mod indexer;
mod markdown;
pub mod permalink;
mod record;

pub use excerpt::{derive_excerpt, plain_text, DEFAULT_EXCERPT_LENGTH};
pub use frontmatter::FrontMatter;
pub use indexer::{ContentIndex, ContentIndexer, IndexOptions};
pub use markdown::MarkdownRenderer;
pub use record::{ContentRecord, RecordId};
