//! The preview pipeline.
//!
//! ```text
//! anchor ─► normalize ─► classify ─┬─► (indirect) probe ─► classify suffix ─┐
//!                                  └─► (direct) ───────────────────────────┤
//!                                                                          ▼
//!                        viewer ◄─ build (theme) ◄─ fetch ◄─ dispatch ◄─ target
//! ```
//!
//! [`Previewer::inspect`] decides whether an anchor gets a preview
//! affordance at all; [`Previewer::activate`] runs the network half for one
//! offered link. Activations are independent and may run concurrently on
//! the same `Previewer`.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::classify::{classify, classify_suffix, Classification};
use crate::error::{PreviewError, Result};
use crate::fetch::AssetFetcher;
use crate::kind::DocumentKind;
use crate::normalize::{display_name, LinkCandidate};
use crate::portal::PortalProfile;
use crate::resolve::RedirectResolver;
use crate::scan::extract_candidates;
use crate::theme::ThemeStore;
use crate::transport::Transport;
use crate::viewer::{
    BuildContext, Dispatch, ViewerDocument, ViewerOptions, ViewerRouter, UNSUPPORTED_MESSAGE,
};

/// An anchor that gets a preview affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewLink {
    pub raw_reference: String,
    pub url: Url,
    pub classification: Classification,
}

impl PreviewLink {
    pub fn is_indirect(&self) -> bool {
        matches!(self.classification, Classification::Indirect(_))
    }
}

/// Outcome of examining one anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inspection {
    /// The reference does not parse against the page URL. Ignored.
    Unresolvable,
    /// Resolved, but its kind is unknown under the active profile: outside
    /// the permitted hosts, or neither an offered suffix nor an indirection
    /// link. Terminal.
    NotOffered(Url),
    Offered(PreviewLink),
}

/// Final location of an activated link and the one kind attributed to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub url: Url,
    pub kind: DocumentKind,
}

/// Runs the pipeline for one portal profile.
pub struct Previewer {
    transport: Arc<dyn Transport>,
    profile: PortalProfile,
    themes: Arc<dyn ThemeStore>,
    router: ViewerRouter,
}

impl Previewer {
    pub fn new(
        transport: Arc<dyn Transport>,
        profile: PortalProfile,
        themes: Arc<dyn ThemeStore>,
    ) -> Self {
        Self::with_options(transport, profile, themes, &ViewerOptions::default())
    }

    pub fn with_options(
        transport: Arc<dyn Transport>,
        profile: PortalProfile,
        themes: Arc<dyn ThemeStore>,
        options: &ViewerOptions,
    ) -> Self {
        Self {
            transport,
            profile,
            themes,
            router: ViewerRouter::with_options(options),
        }
    }

    pub fn profile(&self) -> &PortalProfile {
        &self.profile
    }

    /// Decide whether the anchor `raw` on page `base` is previewable.
    pub fn inspect(&self, raw: &str, base: &Url) -> Inspection {
        let candidate = LinkCandidate::new(raw, base);
        let Some(url) = candidate.resolved_url else {
            debug!(reference = %candidate.raw_reference, "Ignoring unresolvable reference");
            return Inspection::Unresolvable;
        };

        if !self.profile.permits(&url) {
            debug!(%url, profile = %self.profile.name, "Outside permitted hosts");
            return Inspection::NotOffered(url);
        }

        let classification = classify(&url, &self.profile);
        let offered = match &classification {
            Classification::Indirect(_) => true,
            Classification::Direct(_) => self.profile.offers_suffix(&url),
        };
        if !offered {
            return Inspection::NotOffered(url);
        }

        Inspection::Offered(PreviewLink {
            raw_reference: candidate.raw_reference,
            url,
            classification,
        })
    }

    /// Every offered link in a page snapshot, in document order.
    pub fn scan(&self, html: &str, page: &Url) -> Vec<PreviewLink> {
        extract_candidates(html)
            .into_iter()
            .filter_map(|anchor| match self.inspect(&anchor.href, page) {
                Inspection::Offered(link) => Some(link),
                Inspection::Unresolvable | Inspection::NotOffered(_) => None,
            })
            .collect()
    }

    /// Final URL and kind of `link`. Indirection links are probed; a failed
    /// probe keeps the original URL, whose suffix then decides the kind.
    pub async fn resolve_target(&self, link: &PreviewLink) -> ResolvedTarget {
        match &link.classification {
            Classification::Direct(kind) => ResolvedTarget {
                url: link.url.clone(),
                kind: *kind,
            },
            Classification::Indirect(rule) => {
                debug!(%rule, url = %link.url, "Probing indirection link");
                let url = RedirectResolver::new(self.transport.as_ref())
                    .resolve(&link.url, &self.profile)
                    .await;
                let kind = classify_suffix(&url);
                ResolvedTarget { url, kind }
            }
        }
    }

    /// Resolve, fetch and build the viewer for `link`.
    ///
    /// Kinds without a viewer fail with [`PreviewError::UnsupportedKind`]
    /// before any fetch.
    #[instrument(skip(self, link), fields(url = %link.url))]
    pub async fn activate(&self, link: &PreviewLink) -> Result<ViewerDocument> {
        let target = self.resolve_target(link).await;

        let builder = match self.router.dispatch(target.kind) {
            Dispatch::Viewer(builder) => builder,
            blocked => {
                info!(kind = %target.kind, "No viewer for kind");
                return Err(blocked.to_error(target.kind).unwrap_or(
                    PreviewError::UnsupportedKind {
                        kind: target.kind,
                        message: UNSUPPORTED_MESSAGE,
                    },
                ));
            }
        };

        let Some(mime) = target.kind.mime() else {
            warn!(kind = %target.kind, "Viewer kind without MIME type");
            return Err(PreviewError::UnsupportedKind {
                kind: target.kind,
                message: UNSUPPORTED_MESSAGE,
            });
        };

        let asset = AssetFetcher::new(self.transport.as_ref(), &self.profile)
            .fetch(&target.url, mime)
            .await?;

        let theme = self.themes.get(target.kind);
        let name = display_name(&target.url);
        let document = builder.build(asset, &BuildContext::new(&name, theme));

        info!(kind = %document.kind, name = %document.display_name, %theme, "Viewer ready");
        Ok(document)
    }

    /// [`inspect`](Self::inspect) then [`activate`](Self::activate).
    /// Anchors that are not offered fail as unsupported.
    pub async fn preview(&self, raw: &str, base: &Url) -> Result<ViewerDocument> {
        match self.inspect(raw, base) {
            Inspection::Offered(link) => self.activate(&link).await,
            Inspection::Unresolvable => Err(PreviewError::UnresolvableReference(raw.to_string())),
            Inspection::NotOffered(_) => Err(PreviewError::UnsupportedKind {
                kind: DocumentKind::Other,
                message: UNSUPPORTED_MESSAGE,
            }),
        }
    }
}
