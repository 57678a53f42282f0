//! `[watch]` section.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Watch-mode settings: debounce timing and extra watched paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Quiet window before a change batch is flushed.
    pub debounce_ms: u64,
    /// Minimum gap between two flushes.
    pub cooldown_ms: u64,
    /// Extra directories to watch besides the source file's directory.
    pub paths: Vec<PathBuf>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            cooldown_ms: 800,
            paths: Vec::new(),
        }
    }
}

impl WatchConfig {
    /// Drop configured paths that don't exist (after root resolution).
    pub fn filter_existing_paths(&mut self) {
        self.paths.retain(|p| {
            let exists = p.exists();
            if !exists {
                crate::debug!("config"; "watch path not found, ignoring: {}", p.display());
            }
            exists
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.watch.debounce_ms, 300);
        assert_eq!(config.watch.cooldown_ms, 800);
        assert!(config.watch.paths.is_empty());
    }

    #[test]
    fn test_section_overrides() {
        let config = test_parse_config(
            "[watch]\ndebounce_ms = 50\ncooldown_ms = 100\npaths = [\"vendor/scss\"]",
        );
        assert_eq!(config.watch.debounce_ms, 50);
        assert_eq!(config.watch.cooldown_ms, 100);
        assert_eq!(config.watch.paths, vec![PathBuf::from("vendor/scss")]);
    }

    #[test]
    fn test_filter_existing_paths() {
        let dir = tempfile::tempdir().unwrap();
        let mut watch = WatchConfig {
            paths: vec![dir.path().to_path_buf(), dir.path().join("missing")],
            ..WatchConfig::default()
        };
        watch.filter_existing_paths();
        assert_eq!(watch.paths, vec![dir.path().to_path_buf()]);
    }
}
