use std::path::Path;

use anyhow::{bail, Result};

use coursepeek::{DocumentKind, FileThemeStore, Theme, ThemeStore};

fn ensure_themed(kind: DocumentKind) -> Result<()> {
    if kind.theme_key().is_none() {
        bail!("{kind} viewers have no theme. Use docx, pptx or xlsx.");
    }
    Ok(())
}

pub fn cmd_theme_get(kind: DocumentKind, config_dir: &Path) -> Result<()> {
    ensure_themed(kind)?;
    let store = FileThemeStore::in_dir(config_dir);
    println!("{}", store.get(kind));
    Ok(())
}

pub fn cmd_theme_set(kind: DocumentKind, theme: Theme, config_dir: &Path) -> Result<()> {
    ensure_themed(kind)?;
    let store = FileThemeStore::in_dir(config_dir);
    store.set(kind, theme)?;
    eprintln!("🎨 {kind} viewers now open in {} theme", theme.label());
    Ok(())
}
