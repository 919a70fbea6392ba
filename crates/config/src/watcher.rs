use crate::{load, PowertrackConfig};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Watches the config file and forwards every successfully re-parsed config.
///
/// Edits that fail to parse or validate are logged and skipped, so the
/// receiver only ever sees usable configurations.
///
/// # Example
/// ```no_run
/// # async fn demo() {
/// let (_, mut rx) = powertrack_config::ConfigWatcher::spawn("/home/user/.config/powertrack/powertrack.toml");
/// while let Some(cfg) = rx.recv().await {
///     println!("now printing as {:?}", cfg.global.output);
/// }
/// # }
/// ```
pub struct ConfigWatcher {
    path: PathBuf,
}

impl ConfigWatcher {
    /// Spawn a filesystem watcher for `path`.
    /// Returns the watcher handle and a receiver of reloaded configs.
    pub fn spawn(path: impl AsRef<Path>) -> (Self, mpsc::Receiver<PowertrackConfig>) {
        let (tx, rx) = mpsc::channel(1);
        let path = path.as_ref().to_path_buf();
        let watcher = Self { path: path.clone() };

        tokio::spawn(watch_loop(path, tx));

        (watcher, rx)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn watch_loop(path: PathBuf, tx: mpsc::Sender<PowertrackConfig>) {
    use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
    use std::time::Duration;

    let (sync_tx, mut sync_rx) = mpsc::channel::<notify::Result<Event>>(16);

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = sync_tx.blocking_send(res);
        },
        Config::default().with_poll_interval(Duration::from_secs(2)),
    ) {
        Ok(w) => w,
        Err(e) => {
            error!("Failed to create filesystem watcher: {e}");
            return;
        }
    };

    // Editors often replace the file, so watch the directory and filter.
    let target_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if let Err(e) = watcher.watch(&target_dir, RecursiveMode::NonRecursive) {
        warn!("Not watching '{}' for config changes: {e}", target_dir.display());
        return;
    }

    info!("Watching config file: {}", path.display());

    while let Some(event) = sync_rx.recv().await {
        let event = match event {
            Ok(e) => e,
            Err(e) => {
                warn!("Watcher error: {e}");
                continue;
            }
        };

        use notify::EventKind::*;
        if !matches!(event.kind, Modify(_) | Create(_)) || !event.paths.iter().any(|p| p.file_name() == path.file_name()) {
            continue;
        }

        match load(&path) {
            Ok(cfg) => {
                if tx.send(cfg).await.is_err() {
                    break; // receiver dropped
                }
            }
            Err(e) => warn!("Config reload failed: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Write via rename, the way most editors save.
    fn replace(path: &Path, contents: &str) {
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, contents).expect("write temp config");
        std::fs::rename(&tmp, path).expect("rename into place");
    }

    #[tokio::test]
    async fn reload_skips_invalid_edits() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("powertrack.toml");
        replace(&path, "[global]\nmock = true\n");

        let (watcher, mut rx) = ConfigWatcher::spawn(&path);
        assert_eq!(watcher.path(), path.as_path());
        tokio::time::sleep(Duration::from_millis(300)).await;

        replace(&path, "[trackers.power]\nfrequency = 0.0\n");
        tokio::time::sleep(Duration::from_millis(300)).await;
        replace(&path, "[global]\npoll_interval_ms = 250\n");

        let cfg = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("reload within timeout")
            .expect("watcher still running");
        assert_eq!(cfg.global.poll_interval_ms, 250);
        assert!(cfg.validate().is_ok());
    }
}
