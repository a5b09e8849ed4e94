use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Result};

use coursepeek::{
    BrowserDisplay, Config, FileDisplay, FileThemeStore, HttpTransport, Inspection, Previewer,
    ViewerDisplay,
};

use super::{describe, parse_page_url, select_profile};

pub async fn cmd_preview(
    href: &str,
    page: &str,
    profile: Option<&str>,
    output: Option<&Path>,
    no_open: bool,
    config_dir: &Path,
) -> Result<()> {
    let config = Config::load_from(config_dir)?;
    let page = parse_page_url(page)?;
    let profile = select_profile(&config.registry(), profile, &page)?;

    let previewer = Previewer::with_options(
        Arc::new(HttpTransport::with_config(&config.http)?),
        profile,
        Arc::new(FileThemeStore::in_dir(config_dir)),
        &config.viewer_options(),
    );

    let link = match previewer.inspect(href, &page) {
        Inspection::Offered(link) => link,
        Inspection::Unresolvable => bail!("Cannot resolve '{href}' against {page}"),
        Inspection::NotOffered(url) => bail!(
            "No preview offered for {url} under profile '{}'",
            previewer.profile().name
        ),
    };

    eprintln!("🔎 {} ({})", link.url, describe(&link.classification));

    let document = previewer.activate(&link).await?;

    let path = match output {
        Some(path) => FileDisplay::new(path).present(&document)?,
        None if no_open => BrowserDisplay::new().without_launch().present(&document)?,
        None => BrowserDisplay::new().present(&document)?,
    };

    eprintln!("📄 {} viewer for {}", document.kind, document.display_name);
    println!("{}", path.display());

    Ok(())
}
