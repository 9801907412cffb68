//! Build the static site

use anyhow::Result;
use notify::Watcher;
use std::path::PathBuf;
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::generator::{BuildReport, Generator};
use crate::Site;

/// Rebuilds closer together than this are folded into one
const DEBOUNCE: Duration = Duration::from_millis(500);

/// Index the content and write the site
pub fn run(site: &Site) -> Result<BuildReport> {
    let generator = Generator::new(site)?;
    let report = generator.generate()?;

    tracing::info!(
        "Generated {} posts in {:.2}s",
        report.posts,
        report.elapsed.as_secs_f64()
    );

    Ok(report)
}

/// Rebuild from a fresh read of the site directory, so edits to
/// `_config.yml` apply to the next pass
pub fn rebuild(site: &Site) -> Result<BuildReport> {
    let fresh = Site::new(&site.base_dir)?.with_drafts(site.include_drafts);
    run(&fresh)
}

/// Paths whose changes trigger a rebuild
pub fn watched_paths(site: &Site) -> Vec<PathBuf> {
    [
        site.content_dir.clone(),
        site.static_dir.clone(),
        site.config_path(),
    ]
    .into_iter()
    .filter(|p| p.exists())
    .collect()
}

/// Watch for file changes and rebuild until the watcher goes away
pub async fn watch(site: &Site) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    for path in watched_paths(site) {
        let mode = if path.is_dir() {
            notify::RecursiveMode::Recursive
        } else {
            notify::RecursiveMode::NonRecursive
        };
        watcher.watch(&path, mode)?;
        tracing::debug!("Watching: {:?}", path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut pending = false;
    let mut last_event = Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => {
                tracing::debug!("Change: {:?}", event.paths);
                pending = true;
                last_event = Instant::now();
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if pending && last_event.elapsed() >= DEBOUNCE {
            pending = false;
            tracing::info!("Files changed, rebuilding...");
            if let Err(e) = rebuild(site) {
                tracing::error!("Build failed: {:#}", e);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_watched_paths_skip_missing() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("content/blog")).unwrap();
        let site = Site::new(dir.path()).unwrap();

        let paths = watched_paths(&site);
        assert_eq!(paths, vec![dir.path().join("content/blog")]);
    }

    #[test]
    fn test_rebuild_picks_up_config_changes() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("content/blog")).unwrap();
        let site = Site::new(dir.path()).unwrap();
        run(&site).unwrap();
        assert!(dir.path().join("public/index.html").exists());

        fs::write(dir.path().join("_config.yml"), "public_dir: out\n").unwrap();
        rebuild(&site).unwrap();
        assert!(dir.path().join("out/index.html").exists());
    }
}
