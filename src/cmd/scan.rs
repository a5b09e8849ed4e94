use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use coursepeek::{Config, FileThemeStore, HttpTransport, Previewer};

use super::{describe, parse_page_url, select_profile};

pub async fn cmd_scan(
    page: &str,
    profile: Option<&str>,
    html_file: Option<&Path>,
    config_dir: &Path,
) -> Result<()> {
    let config = Config::load_from(config_dir)?;
    let page = parse_page_url(page)?;
    let profile = select_profile(&config.registry(), profile, &page)?;
    let transport = Arc::new(HttpTransport::with_config(&config.http)?);

    let html = match html_file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => transport.fetch_text(&page).await?,
    };

    let previewer = Previewer::with_options(
        transport,
        profile,
        Arc::new(FileThemeStore::in_dir(config_dir)),
        &config.viewer_options(),
    );

    let links = previewer.scan(&html, &page);
    for link in &links {
        println!("{}\t{}", describe(&link.classification), link.url);
    }
    eprintln!(
        "\n({} previewable links, profile '{}')",
        links.len(),
        previewer.profile().name
    );

    Ok(())
}
