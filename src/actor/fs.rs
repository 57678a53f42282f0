//! FileSystem Actor
//!
//! Watches for stylesheet changes and sends debounced compile requests to
//! the CompilerActor. Implements the "Watcher-First" pattern for zero event
//! loss.
//!
//! ```text
//! Watcher → Debouncer (pure timing) → CompilerMsg::Compile
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;
use tokio::sync::mpsc;

use super::messages::{CompilerMsg, request_compile};
use crate::compile::CompileOutcome;
use crate::config::Config;
use crate::logger;

/// Extensions that count as stylesheet sources.
const STYLE_EXTENSIONS: &[&str] = &["scss", "sass", "css"];

/// FileSystem Actor - watches for stylesheet changes
pub struct FsActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    _watcher: RecommendedWatcher,
    /// Channel to send messages to CompilerActor
    compiler_tx: mpsc::Sender<CompilerMsg>,
    /// Debouncer state
    debouncer: Debouncer,
    /// Configuration for the compile pair
    config: Arc<Config>,
}

impl FsActor {
    /// Create a new FsActor with Watcher-First pattern
    ///
    /// The watcher starts immediately, buffering events while the caller
    /// performs the startup compile. This eliminates the "vacuum period".
    pub fn new(
        paths: Vec<PathBuf>,
        compiler_tx: mpsc::Sender<CompilerMsg>,
        config: Arc<Config>,
    ) -> notify::Result<Self> {
        // Create sync channel for notify (it doesn't support async)
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        // Start watching all paths (skip non-existent paths)
        for path in &paths {
            if path.exists() {
                watcher.watch(path, RecursiveMode::Recursive)?;
            } else {
                crate::debug!("watch"; "skipping missing path: {}", path.display());
            }
        }

        let debouncer = Debouncer::new(
            config.watch.debounce_ms,
            config.watch.cooldown_ms,
            Some(config.compile.target.clone()),
        );

        Ok(Self {
            notify_rx,
            _watcher: watcher,
            compiler_tx,
            debouncer,
            config,
        })
    }

    /// Run the actor event loop
    pub async fn run(self) {
        // Extract fields before consuming self
        let notify_rx = self.notify_rx;
        let compiler_tx = self.compiler_tx;
        let config = self.config;
        let mut debouncer = self.debouncer;

        let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(64);

        // Spawn a thread to poll notify events and send to async channel
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break; // Receiver dropped
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        loop {
            tokio::select! {
                biased;
                event = async_rx.recv() => match event {
                    Some(event) => debouncer.add_event(&event),
                    None => break,
                },
                _ = tokio::time::sleep(debouncer.sleep_duration()) => {
                    if let Some(changed) = debouncer.take_if_ready()
                        && recompile(&compiler_tx, &config, &changed).await.is_err()
                    {
                        break;
                    }
                }
            }
        }
    }
}

/// Send one compile request for a batch of changed stylesheets.
///
/// Returns `Err(())` if the CompilerActor shut down.
async fn recompile(
    compiler_tx: &mpsc::Sender<CompilerMsg>,
    config: &Config,
    changed: &FxHashSet<PathBuf>,
) -> Result<(), ()> {
    for path in changed {
        crate::debug!("watch"; "changed: {}", path.display());
    }

    let started = Instant::now();
    match request_compile(compiler_tx, config.compile.request()).await {
        Ok(CompileOutcome::Written { target, bytes }) => {
            logger::status_success(&format!(
                "{} ({} bytes, {:.0?})",
                target.display(),
                bytes,
                started.elapsed()
            ));
            Ok(())
        }
        Ok(CompileOutcome::Unchanged { target }) => {
            logger::status_unchanged(&format!("{} unchanged", target.display()));
            Ok(())
        }
        Err(e) => {
            if compiler_tx.is_closed() {
                return Err(());
            }
            logger::status_error("compile failed", &e.to_string());
            Ok(())
        }
    }
}

// =============================================================================
// Debouncer
// =============================================================================

/// Pure debouncer: only handles timing and event deduplication.
///
/// Collects changed stylesheet paths, flushes after a quiet window, with a
/// cooldown between flushes so our own target writes can't retrigger a storm.
struct Debouncer {
    /// Changed paths (dedup is free via set key uniqueness)
    changed: FxHashSet<PathBuf>,
    last_event: Option<Instant>,
    last_flush: Option<Instant>,
    debounce: Duration,
    cooldown: Duration,
    /// The compile target - our own output never counts as a change.
    ignore: Option<PathBuf>,
}

impl Debouncer {
    fn new(debounce_ms: u64, cooldown_ms: u64, ignore: Option<PathBuf>) -> Self {
        Self {
            changed: FxHashSet::default(),
            last_event: None,
            last_flush: None,
            debounce: Duration::from_millis(debounce_ms),
            cooldown: Duration::from_millis(cooldown_ms),
            ignore,
        }
    }

    /// Add a notify event, filtering non-stylesheets and editor artifacts.
    fn add_event(&mut self, event: &notify::Event) {
        use notify::EventKind;

        match event.kind {
            EventKind::Create(_) | EventKind::Remove(_) => {}
            EventKind::Modify(modify) => {
                // Ignore metadata-only changes (mtime/atime/chmod noise)
                // may trigger endless rebuild loops
                if matches!(modify, notify::event::ModifyKind::Metadata(_)) {
                    return;
                }
            }
            _ => return,
        }

        for path in &event.paths {
            if !is_stylesheet(path) || is_temp_file(path) {
                continue;
            }
            if self.ignore.as_deref() == Some(path.as_path()) {
                continue;
            }

            crate::debug!("watch"; "event: {}", path.display());
            self.changed.insert(path.clone());
            self.last_event = Some(Instant::now());
        }
    }

    /// Take the changed set if debounce + cooldown elapsed.
    fn take_if_ready(&mut self) -> Option<FxHashSet<PathBuf>> {
        if !self.is_ready() {
            return None;
        }

        self.last_event = None;
        self.last_flush = Some(Instant::now());
        Some(std::mem::take(&mut self.changed))
    }

    fn is_ready(&self) -> bool {
        let Some(last_event) = self.last_event else {
            return false;
        };

        if last_event.elapsed() < self.debounce {
            return false;
        }

        if let Some(last_flush) = self.last_flush
            && last_flush.elapsed() < self.cooldown
        {
            return false;
        }

        !self.changed.is_empty()
    }

    /// Precise sleep duration until next possible ready time.
    fn sleep_duration(&self) -> Duration {
        let Some(last_event) = self.last_event else {
            return Duration::from_secs(86400);
        };

        let debounce_remaining = self.debounce.saturating_sub(last_event.elapsed());

        let cooldown_remaining = self
            .last_flush
            .map(|t| self.cooldown.saturating_sub(t.elapsed()))
            .unwrap_or(Duration::ZERO);

        debounce_remaining
            .max(cooldown_remaining)
            .max(Duration::from_millis(1))
    }
}

fn is_stylesheet(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| STYLE_EXTENSIONS.contains(&ext))
}

/// Check if path is a temp/backup file (editor artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use notify::EventKind;
    use notify::event::{CreateKind, DataChange, MetadataKind, ModifyKind};

    fn modify_event(path: &str) -> notify::Event {
        notify::Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Any)))
            .add_path(PathBuf::from(path))
    }

    #[test]
    fn test_filters_non_stylesheets() {
        let mut debouncer = Debouncer::new(0, 0, None);
        debouncer.add_event(&modify_event("/site/readme.md"));
        debouncer.add_event(&modify_event("/site/app.js"));
        assert!(debouncer.take_if_ready().is_none());
    }

    #[test]
    fn test_filters_temp_files() {
        let mut debouncer = Debouncer::new(0, 0, None);
        debouncer.add_event(&modify_event("/site/.main.scss.swp"));
        debouncer.add_event(&modify_event("/site/main.scss~"));
        debouncer.add_event(&modify_event("/site/main.scss.bak"));
        assert!(debouncer.take_if_ready().is_none());
    }

    #[test]
    fn test_filters_metadata_events() {
        let mut debouncer = Debouncer::new(0, 0, None);
        let event = notify::Event::new(EventKind::Modify(ModifyKind::Metadata(
            MetadataKind::WriteTime,
        )))
        .add_path(PathBuf::from("/site/main.scss"));
        debouncer.add_event(&event);
        assert!(debouncer.take_if_ready().is_none());
    }

    #[test]
    fn test_filters_own_target() {
        let mut debouncer = Debouncer::new(0, 0, Some(PathBuf::from("/site/css/main.css")));
        debouncer.add_event(&modify_event("/site/css/main.css"));
        assert!(debouncer.take_if_ready().is_none());
    }

    #[test]
    fn test_collects_and_dedups_stylesheet_changes() {
        let mut debouncer = Debouncer::new(0, 0, None);
        debouncer.add_event(&modify_event("/site/scss/main.scss"));
        debouncer.add_event(&modify_event("/site/scss/main.scss"));
        debouncer.add_event(
            &notify::Event::new(EventKind::Create(CreateKind::File))
                .add_path(PathBuf::from("/site/scss/_new.scss")),
        );

        let changed = debouncer.take_if_ready().unwrap();
        assert_eq!(changed.len(), 2);
        assert!(changed.contains(&PathBuf::from("/site/scss/main.scss")));
        assert!(changed.contains(&PathBuf::from("/site/scss/_new.scss")));
    }

    #[test]
    fn test_not_ready_within_debounce_window() {
        let mut debouncer = Debouncer::new(60_000, 0, None);
        debouncer.add_event(&modify_event("/site/main.scss"));
        assert!(!debouncer.is_ready());
        assert!(debouncer.take_if_ready().is_none());
        // Event survives until the window elapses
        assert_eq!(debouncer.changed.len(), 1);
    }

    #[test]
    fn test_cooldown_blocks_immediate_reflush() {
        let mut debouncer = Debouncer::new(0, 60_000, None);
        debouncer.add_event(&modify_event("/site/main.scss"));
        assert!(debouncer.take_if_ready().is_some());

        debouncer.add_event(&modify_event("/site/main.scss"));
        assert!(!debouncer.is_ready());
    }

    #[test]
    fn test_sleep_duration_idles_without_events() {
        let debouncer = Debouncer::new(300, 800, None);
        assert_eq!(debouncer.sleep_duration(), Duration::from_secs(86400));
    }
}
