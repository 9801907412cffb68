//! Clean the public directory

use anyhow::Result;

use crate::generator::remove_public_dir;
use crate::Site;

/// Remove the generated output
pub fn run(site: &Site) -> Result<()> {
    if remove_public_dir(site)? {
        tracing::info!("Deleted: {:?}", site.public_dir);
    } else {
        tracing::info!("Nothing to clean at {:?}", site.public_dir);
    }
    Ok(())
}
