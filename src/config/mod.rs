//! Configuration management for `glaze.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                      |
//! |-------------|----------------------------------------------|
//! | `[compile]` | Source/target pair, minify, compile-on-start |
//! | `[watch]`   | Debounce timing, extra watched paths         |

mod compile;
mod error;
mod watch;

pub use compile::CompileConfig;
pub use error::ConfigError;
pub use watch::WatchConfig;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::cli::{Cli, Commands};
use crate::log;

/// Root configuration structure representing glaze.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Compile settings
    #[serde(default)]
    pub compile: CompileConfig,

    /// Watch mode settings
    #[serde(default)]
    pub watch: WatchConfig,
}

impl Config {
    /// Load configuration for the given CLI invocation.
    ///
    /// Searches upward from cwd for the config file. A missing file yields
    /// pure defaults rooted at the current directory - the service has
    /// meaningful defaults for every key.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                config.config_path = path;
                config
            }
            None => {
                crate::debug!("config"; "{} not found, using defaults", cli.config.display());
                let mut config = Self::default();
                config.root = std::env::current_dir()?;
                config
            }
        };

        config.finalize(cli);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Resolve paths against the project root and apply CLI overrides.
    fn finalize(&mut self, cli: &Cli) {
        if let Commands::Build { args } = &cli.command {
            if let Some(source) = &args.source {
                self.compile.source = source.clone();
            }
            if let Some(target) = &args.target {
                self.compile.target = target.clone();
            }
            if let Some(minify) = args.minify {
                self.compile.minify = minify;
            }
        }

        let root = self.root.clone();
        self.compile.source = resolve_path(&root, &self.compile.source);
        self.compile.target = resolve_path(&root, &self.compile.target);
        self.watch.paths = self
            .watch
            .paths
            .iter()
            .map(|p| resolve_path(&root, p))
            .collect();
        self.watch.filter_existing_paths();
    }

    /// Full validation across sections.
    fn validate(&self) -> Result<()> {
        self.compile.validate()?;
        Ok(())
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }
}

/// Expand `~` and resolve relative paths against the project root.
fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());
    if expanded.is_absolute() {
        expanded
    } else {
        root.join(expanded)
    }
}

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    // First check if config_name is an absolute path
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

/// Print warning about unknown fields.
fn print_unknown_fields_warning(fields: &[String], path: &Path) {
    let display_path = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy());
    log!("warning"; "unknown fields in {}, ignoring:", display_path);
    for field in fields {
        eprintln!("- {field}");
    }
}

// ============================================================================
// Test helpers
// ============================================================================

/// Parse a config from TOML content (tests only).
#[cfg(test)]
pub(crate) fn test_parse_config(content: &str) -> Config {
    let (config, _) = Config::parse_with_ignored(content).expect("test config should parse");
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_fields_are_collected() {
        let (_, ignored) =
            Config::parse_with_ignored("[compile]\nminify = true\ncompress = true").unwrap();
        assert_eq!(ignored, vec!["compile.compress".to_string()]);
    }

    #[test]
    fn test_known_fields_are_not_flagged() {
        let (_, ignored) =
            Config::parse_with_ignored("[compile]\nminify = false\n[watch]\ndebounce_ms = 10")
                .unwrap();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(Config::parse_with_ignored("[compile\nbroken").is_err());
    }

    #[test]
    fn test_resolve_path_relative() {
        let resolved = resolve_path(Path::new("/project"), Path::new("scss/main.scss"));
        assert_eq!(resolved, PathBuf::from("/project/scss/main.scss"));
    }

    #[test]
    fn test_resolve_path_absolute_wins() {
        let resolved = resolve_path(Path::new("/project"), Path::new("/abs/main.scss"));
        assert_eq!(resolved, PathBuf::from("/abs/main.scss"));
    }
}
