//! Theme preferences.
//!
//! One persisted [`Theme`] per themed viewer kind, stored under that kind's
//! fixed key (see [`DocumentKind::theme_key`]). Reads happen at every
//! viewer build; writes are last-writer-wins.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::kind::DocumentKind;

/// Color scheme applied inside a viewer document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Sepia,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::Sepia];

    /// Value used in markup and storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Sepia => "sepia",
        }
    }

    /// Label shown in the theme switcher.
    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::Sepia => "Sepia",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "sepia" => Ok(Theme::Sepia),
            other => Err(format!("unknown theme: {other} (expected light, dark or sepia)")),
        }
    }
}

/// Persisted theme preferences, keyed by viewer kind.
pub trait ThemeStore: Send + Sync {
    /// Current preference for `kind`; [`Theme::Light`] when unset or when the
    /// kind has no theme switcher.
    fn get(&self, kind: DocumentKind) -> Theme;

    /// Persist a preference. Fails for kinds without a theme switcher.
    fn set(&self, kind: DocumentKind, theme: Theme) -> Result<()>;
}

fn key_for(kind: DocumentKind) -> Result<&'static str> {
    kind.theme_key()
        .with_context(|| format!("{kind} viewers have no theme switcher"))
}

/// Process-local store, lost on exit.
#[derive(Default)]
pub struct MemoryThemeStore {
    values: Mutex<BTreeMap<String, Theme>>,
}

impl MemoryThemeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ThemeStore for MemoryThemeStore {
    fn get(&self, kind: DocumentKind) -> Theme {
        let Some(key) = kind.theme_key() else {
            return Theme::default();
        };
        self.values
            .lock()
            .ok()
            .and_then(|values| values.get(key).copied())
            .unwrap_or_default()
    }

    fn set(&self, kind: DocumentKind, theme: Theme) -> Result<()> {
        let key = key_for(kind)?;
        self.values
            .lock()
            .map_err(|_| anyhow::anyhow!("theme store lock poisoned"))?
            .insert(key.to_string(), theme);
        Ok(())
    }
}

/// JSON file store, e.g. `~/.config/coursepeek/themes.json`:
///
/// ```json
/// {"docxPreviewTheme": "dark", "xlsxPreviewTheme": "sepia"}
/// ```
///
/// The file is re-read on every `get`, so preferences written by another
/// process are picked up by the next build.
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<config_dir>/themes.json`.
    pub fn in_dir(config_dir: &Path) -> Self {
        Self::new(config_dir.join("themes.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, Theme>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON in {}", self.path.display()))
    }

    fn save(&self, values: &BTreeMap<String, Theme>) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;

        // Write-then-rename: readers never see a torn file.
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(serde_json::to_string_pretty(values)?.as_bytes())?;
        tmp.persist(&self.path)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}

impl ThemeStore for FileThemeStore {
    fn get(&self, kind: DocumentKind) -> Theme {
        let Some(key) = kind.theme_key() else {
            return Theme::default();
        };
        match self.load() {
            Ok(values) => values.get(key).copied().unwrap_or_default(),
            Err(e) => {
                warn!("Ignoring theme preferences: {e:#}");
                Theme::default()
            }
        }
    }

    fn set(&self, kind: DocumentKind, theme: Theme) -> Result<()> {
        let key = key_for(kind)?;
        let mut values = self.load().unwrap_or_else(|e| {
            warn!("Overwriting unreadable theme preferences: {e:#}");
            BTreeMap::new()
        });
        values.insert(key.to_string(), theme);
        self.save(&values)?;
        debug!(key, theme = %theme, "Theme preference saved");
        Ok(())
    }
}
