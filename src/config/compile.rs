//! `[compile]` section.
//!
//! # Example
//!
//! ```toml
//! [compile]
//! source = "scss/main.scss"
//! target = "css/main.css"
//! minify = true
//! on_start = true
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::compile::CompileRequest;

/// Compile settings: the configured source/target pair and its options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    /// Stylesheet entry file.
    pub source: PathBuf,
    /// Compiled CSS target.
    pub target: PathBuf,
    /// Minify compiled output.
    pub minify: bool,
    /// Compile the configured pair on startup.
    pub on_start: bool,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("scss/main.scss"),
            target: PathBuf::from("css/main.css"),
            minify: true,
            on_start: true,
        }
    }
}

impl CompileConfig {
    /// Full request for the configured pair.
    ///
    /// Startup, watch and one-shot builds all go through this.
    pub fn request(&self) -> CompileRequest {
        CompileRequest {
            source: Some(self.source.clone()),
            target: Some(self.target.clone()),
            minify: Some(self.minify),
        }
    }

    /// Validate compile configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.as_os_str().is_empty() {
            return Err(ConfigError::Validation("compile.source is empty".into()));
        }
        if self.target.as_os_str().is_empty() {
            return Err(ConfigError::Validation("compile.target is empty".into()));
        }
        if self.source == self.target {
            return Err(ConfigError::Validation(format!(
                "compile.source and compile.target are the same file: {}",
                self.source.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.compile.source, PathBuf::from("scss/main.scss"));
        assert_eq!(config.compile.target, PathBuf::from("css/main.css"));
        assert!(config.compile.minify);
        assert!(config.compile.on_start);
    }

    #[test]
    fn test_section_overrides() {
        let config = test_parse_config(
            r#"
[compile]
source = "styles/app.scss"
target = "public/app.css"
minify = false
on_start = false
"#,
        );
        assert_eq!(config.compile.source, PathBuf::from("styles/app.scss"));
        assert_eq!(config.compile.target, PathBuf::from("public/app.css"));
        assert!(!config.compile.minify);
        assert!(!config.compile.on_start);
    }

    #[test]
    fn test_request_carries_configured_values() {
        let config = test_parse_config("[compile]\nminify = false");
        let request = config.compile.request();
        assert_eq!(request.source, Some(PathBuf::from("scss/main.scss")));
        assert_eq!(request.target, Some(PathBuf::from("css/main.css")));
        assert_eq!(request.minify, Some(false));
    }

    #[test]
    fn test_same_source_and_target_rejected() {
        let config = test_parse_config(
            "[compile]\nsource = \"main.css\"\ntarget = \"main.css\"",
        );
        let err = config.compile.validate().unwrap_err();
        assert!(err.to_string().contains("same file"));
    }

    #[test]
    fn test_empty_source_rejected() {
        let config = test_parse_config("[compile]\nsource = \"\"");
        assert!(config.compile.validate().is_err());
    }
}
