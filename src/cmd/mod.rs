mod preview;
mod profiles;
mod scan;
mod theme;

use anyhow::{Context, Result};
use url::Url;

use coursepeek::{Classification, PortalProfile, PortalRegistry};

pub use preview::cmd_preview;
pub use profiles::cmd_profiles;
pub use scan::cmd_scan;
pub use theme::{cmd_theme_get, cmd_theme_set};

fn parse_page_url(page: &str) -> Result<Url> {
    Url::parse(page).with_context(|| format!("invalid page URL: {page}"))
}

/// Named profile if given, otherwise the first profile covering `page`.
fn select_profile(
    registry: &PortalRegistry,
    name: Option<&str>,
    page: &Url,
) -> Result<PortalProfile> {
    let profile = match name {
        Some(name) => registry
            .get(name)
            .with_context(|| format!("unknown profile: {name}. Run `coursepeek profiles`."))?,
        None => registry
            .for_page(page)
            .with_context(|| format!("no portal profile covers {page}"))?,
    };
    Ok(profile.clone())
}

fn describe(classification: &Classification) -> String {
    match classification {
        Classification::Direct(kind) => kind.label().to_string(),
        Classification::Indirect(rule) => format!("via {rule}"),
    }
}
