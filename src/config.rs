//! Configuration loaded from `<config_dir>/coursepeek/config.toml`.
//!
//! Every key is optional; a missing file means defaults throughout.
//!
//! ```toml
//! [[profiles]]
//! name = "mirror"
//! hosts = ["moodle.example.edu"]
//! offered_extensions = [".pdf", ".docx"]
//!
//! [[profiles.indirection]]
//! name = "resource-viewer"
//! path_contains = ["/mod/resource/view.php"]
//!
//! [assets]
//! mammoth = "https://mirror.example.edu/mammoth.browser.min.js"
//!
//! [reflow]
//! settle_delay_ms = 1500
//!
//! [http]
//! timeout_secs = 60
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::portal::{PortalProfile, PortalRegistry};
use crate::reflow::DEFAULT_SETTLE_DELAY;
use crate::transport::HttpConfig;
use crate::viewer::{ConverterAssets, ViewerOptions};

/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_ENV: &str = "COURSEPEEK_CONFIG_DIR";

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReflowSection {
    pub settle_delay_ms: u64,
}

impl Default for ReflowSection {
    fn default() -> Self {
        Self {
            settle_delay_ms: u64::try_from(DEFAULT_SETTLE_DELAY.as_millis()).unwrap_or(2000),
        }
    }
}

/// Parsed `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extra portal profiles; a name matching a built-in replaces it.
    pub profiles: Vec<PortalProfile>,
    pub assets: ConverterAssets,
    pub reflow: ReflowSection,
    pub http: HttpConfig,
}

impl Config {
    /// Load from `dir/config.toml`, or defaults if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        toml::from_str(&content).with_context(|| format!("invalid TOML in {}", path.display()))
    }

    /// Profile registry with built-ins plus configured profiles.
    pub fn registry(&self) -> PortalRegistry {
        PortalRegistry::with_profiles(self.profiles.clone())
    }

    pub fn viewer_options(&self) -> ViewerOptions {
        ViewerOptions {
            assets: self.assets.clone(),
            settle_delay: Duration::from_millis(self.reflow.settle_delay_ms),
        }
    }
}

/// Resolve the configuration directory: explicit override, then
/// `COURSEPEEK_CONFIG_DIR`, then the platform config dir.
pub fn config_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("coursepeek")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.viewer_options().settle_delay, DEFAULT_SETTLE_DELAY);
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
[[profiles]]
name = "mirror"
hosts = ["moodle.example.edu"]
offered_extensions = [".pdf", ".pptx"]

[[profiles.indirection]]
name = "resource-viewer"
path_contains = ["/mod/resource/view.php"]

[assets]
sheetjs = "https://mirror.example.edu/xlsx.full.min.js"

[reflow]
settle_delay_ms = 500

[http]
timeout_secs = 60
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.profiles.len(), 1);
        assert_eq!(config.profiles[0].indirection.len(), 1);
        assert_eq!(config.http.timeout_secs, 60);
        assert_eq!(config.http.connect_timeout_secs, 10);

        let options = config.viewer_options();
        assert_eq!(options.settle_delay, Duration::from_millis(500));
        assert_eq!(options.assets.sheetjs, "https://mirror.example.edu/xlsx.full.min.js");
        assert_eq!(options.assets.mammoth, ConverterAssets::default().mammoth);

        let registry = config.registry();
        assert!(registry.get("mirror").is_some());
        assert_eq!(registry.profiles().last().unwrap().name, "broad");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn invalid_file_names_its_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[reflow\nsettle_delay_ms = ").unwrap();
        let err = Config::load_from(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("config.toml"));
    }

    #[test]
    fn explicit_dir_wins() {
        let dir = Path::new("/tmp/coursepeek-explicit");
        assert_eq!(config_dir(Some(dir)), dir);
    }
}
