//! List indexed posts

use anyhow::Result;

use crate::content::{ContentIndex, ContentIndexer};
use crate::Site;

/// Print every record in index order
pub fn run(site: &Site) -> Result<()> {
    let index = ContentIndexer::new(site).index_all()?;

    println!("Posts ({}):", index.len());
    for line in listing(&index) {
        println!("  {}", line);
    }

    Ok(())
}

/// One line per record: date, slug, title, and a marker for drafts
pub fn listing(index: &ContentIndex) -> Vec<String> {
    index
        .records()
        .map(|record| {
            let mut line = format!(
                "{} {} - {}",
                record.date.format("%Y-%m-%d"),
                record.slug,
                record.title
            );
            if record.draft {
                line.push_str(" [draft]");
            }
            line
        })
        .collect()
}
