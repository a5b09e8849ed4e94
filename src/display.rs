//! Where finished viewer pages go.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::viewer::ViewerDocument;

/// Hands a viewer page to the user.
pub trait ViewerDisplay {
    /// Present `document`, returning where it was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be written.
    fn present(&self, document: &ViewerDocument) -> Result<PathBuf>;
}

/// Writes the page to a fixed path.
pub struct FileDisplay {
    path: PathBuf,
}

impl FileDisplay {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ViewerDisplay for FileDisplay {
    fn present(&self, document: &ViewerDocument) -> Result<PathBuf> {
        std::fs::write(&self.path, &document.markup)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        info!(path = %self.path.display(), bytes = document.markup.len(), "Viewer saved");
        Ok(self.path.clone())
    }
}

/// Writes the page to a kept temp file and opens it in the system browser,
/// the equivalent of a new browsing context.
pub struct BrowserDisplay {
    dir: Option<PathBuf>,
    launch: bool,
}

impl BrowserDisplay {
    pub fn new() -> Self {
        Self {
            dir: None,
            launch: true,
        }
    }

    /// Write pages below `dir` instead of the system temp dir.
    #[must_use]
    pub fn in_dir(mut self, dir: &Path) -> Self {
        self.dir = Some(dir.to_path_buf());
        self
    }

    /// Only write the page; don't start a browser.
    #[must_use]
    pub fn without_launch(mut self) -> Self {
        self.launch = false;
        self
    }

    fn write_page(&self, document: &ViewerDocument) -> Result<PathBuf> {
        let stem: String = document
            .display_name
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '.' { c } else { '-' })
            .collect();

        let prefix = format!("coursepeek-{stem}-");
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix).suffix(".html");
        let mut file = match &self.dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .context("failed to create viewer file")?;

        file.write_all(document.markup.as_bytes())
            .context("failed to write viewer file")?;

        let (_, path) = file.keep().context("failed to keep viewer file")?;
        info!(path = %path.display(), "Viewer written");
        Ok(path)
    }
}

impl Default for BrowserDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewerDisplay for BrowserDisplay {
    fn present(&self, document: &ViewerDocument) -> Result<PathBuf> {
        let path = self.write_page(document)?;
        if self.launch {
            if let Err(e) = open::that(&path) {
                warn!("Could not open browser: {e}");
            }
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::DocumentKind;

    fn document() -> ViewerDocument {
        ViewerDocument {
            markup: "<!DOCTYPE html><title>x</title>".to_string(),
            kind: DocumentKind::Pdf,
            display_name: "Urnik 2024.pdf".to_string(),
        }
    }

    #[test]
    fn file_display_writes_markup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.html");
        let written = FileDisplay::new(&path).present(&document()).unwrap();
        assert_eq!(written, path);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "<!DOCTYPE html><title>x</title>"
        );
    }

    #[test]
    fn browser_display_keeps_html_file() {
        let dir = tempfile::tempdir().unwrap();
        let display = BrowserDisplay::new().in_dir(dir.path()).without_launch();
        let path = display.present(&document()).unwrap();
        assert!(path.starts_with(dir.path()));
        assert_eq!(path.extension().unwrap(), "html");
        let file_name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(file_name.starts_with("coursepeek-Urnik-2024.pdf-"));
        assert!(std::fs::read_to_string(&path).unwrap().contains("<title>x</title>"));
    }
}
