//! File watching for dev-mode rebuilds.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Events emitted by the source watcher.
#[derive(Debug, Clone)]
pub enum SourceEvent {
    /// A docs page changed.
    PageChanged(PathBuf),

    /// The site configuration changed.
    ConfigChanged(PathBuf),

    /// Anything else under a watched path.
    Changed(PathBuf),
}

/// Watches docs sources and the site config for changes.
pub struct SourceWatcher {
    _watcher: RecommendedWatcher,
}

impl SourceWatcher {
    /// Watch the given paths. Returns the watcher and a channel of
    /// debounced events.
    pub fn new(
        paths: &[PathBuf],
    ) -> Result<(Self, async_mpsc::Receiver<SourceEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(64);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        for path in paths {
            if path.exists() {
                watcher
                    .watch(path, RecursiveMode::Recursive)
                    .map_err(std::io::Error::other)?;
            }
        }

        std::thread::spawn(move || {
            let debounce = Duration::from_millis(100);
            let mut last_event = std::time::Instant::now() - debounce;

            while let Ok(event) = sync_rx.recv() {
                let now = std::time::Instant::now();
                if now.duration_since(last_event) < debounce {
                    continue;
                }
                last_event = now;

                for path in event.paths {
                    if let Some(e) = classify(&path, &event.kind) {
                        let _ = async_tx.blocking_send(e);
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

fn classify(path: &Path, kind: &notify::EventKind) -> Option<SourceEvent> {
    use notify::EventKind;

    if !matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) {
        return None;
    }

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

    if ext == "md" || ext == "markdown" {
        Some(SourceEvent::PageChanged(path.to_path_buf()))
    } else if name == "site.toml" {
        Some(SourceEvent::ConfigChanged(path.to_path_buf()))
    } else {
        Some(SourceEvent::Changed(path.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn classifies_by_file_kind() {
        let kind = notify::EventKind::Modify(notify::event::ModifyKind::Any);

        assert!(matches!(
            classify(Path::new("docs/index.md"), &kind),
            Some(SourceEvent::PageChanged(_))
        ));
        assert!(matches!(
            classify(Path::new("site.toml"), &kind),
            Some(SourceEvent::ConfigChanged(_))
        ));
        assert!(matches!(
            classify(Path::new("assets/logo.svg"), &kind),
            Some(SourceEvent::Changed(_))
        ));
    }

    #[tokio::test]
    async fn reports_page_changes() {
        let temp = tempdir().unwrap();

        let (watcher, mut rx) = SourceWatcher::new(&[temp.path().to_path_buf()]).unwrap();

        // Give the OS watcher time to register.
        tokio::time::sleep(Duration::from_millis(100)).await;

        fs::write(temp.path().join("page.md"), "# Hello").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(3), rx.recv()).await;
        drop(watcher);

        assert!(event.is_ok(), "timeout waiting for watch event");
        assert!(event.unwrap().is_some(), "channel should not be closed");
    }
}
