//! Helper functions shared by the renderer, templates and feed

mod date;
mod url;
mod xml;

pub use date::*;
pub use url::*;
pub use xml::*;
