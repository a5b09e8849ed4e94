//! Redirect resolution for indirection links.
//!
//! A header-only probe reveals where the server sends an indirection link.
//! Resolution is fail-open: any probe failure yields the original URL,
//! which then usually classifies as `Other`.

use tracing::{debug, warn};
use url::Url;

use crate::error::PreviewError;
use crate::portal::PortalProfile;
use crate::transport::{ProbeResponse, Transport};

/// Resolves indirection links through a [`Transport`].
pub struct RedirectResolver<'a> {
    transport: &'a dyn Transport,
}

impl<'a> RedirectResolver<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    /// Final URL behind `url`, or `url` itself if the probe fails or the
    /// redirect leaves the hosts `profile` permits.
    pub async fn resolve(&self, url: &Url, profile: &PortalProfile) -> Url {
        match self.probe(url, profile).await {
            Ok(final_url) => final_url,
            Err(e) => {
                warn!("{e}; continuing with original URL");
                url.clone()
            }
        }
    }

    async fn probe(&self, url: &Url, profile: &PortalProfile) -> Result<Url, PreviewError> {
        let failed = |reason: String| PreviewError::RedirectProbeFailed {
            url: url.to_string(),
            reason,
        };

        let response = self
            .transport
            .head(url, profile)
            .await
            .map_err(|e| failed(e.to_string()))?;

        let Some(reported) = reported_url(&response) else {
            debug!("Probe reported no URL, keeping original");
            return Ok(url.clone());
        };

        let final_url = url
            .join(reported)
            .map_err(|e| failed(format!("unparseable final URL {reported}: {e}")))?;

        if !profile.permits(&final_url) {
            return Err(failed(format!(
                "redirect left permitted hosts: {final_url}"
            )));
        }

        debug!(from = %url, to = %final_url, "Resolved indirection link");
        Ok(final_url)
    }
}

/// Final URL first, then the response URL.
fn reported_url(response: &ProbeResponse) -> Option<&str> {
    response
        .final_url
        .as_deref()
        .or(response.response_url.as_deref())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTransport;
    use crate::transport::TransportError;

    const VIEW: &str = "https://e-ucenje.ff.uni-lj.si/mod/resource/view.php?id=9";
    const FILE: &str = "https://e-ucenje.ff.uni-lj.si/pluginfile.php/1/mod_resource/content/2/file.docx";

    fn view() -> Url {
        Url::parse(VIEW).unwrap()
    }

    #[tokio::test]
    async fn returns_final_url_from_probe() {
        let transport = FakeTransport::new().with_probe(
            VIEW,
            Ok(ProbeResponse {
                status: 200,
                final_url: Some(FILE.into()),
                response_url: None,
            }),
        );
        let resolved = RedirectResolver::new(&transport)
            .resolve(&view(), &PortalProfile::eucenje())
            .await;
        assert_eq!(resolved.as_str(), FILE);
        assert_eq!(transport.head_count(), 1);
        assert_eq!(transport.get_count(), 0);
    }

    #[tokio::test]
    async fn falls_back_to_response_url() {
        let transport = FakeTransport::new().with_probe(
            VIEW,
            Ok(ProbeResponse {
                status: 303,
                final_url: None,
                response_url: Some(FILE.into()),
            }),
        );
        let resolved = RedirectResolver::new(&transport)
            .resolve(&view(), &PortalProfile::eucenje())
            .await;
        assert_eq!(resolved.as_str(), FILE);
    }

    #[tokio::test]
    async fn transport_failures_keep_original_url() {
        for error in [
            TransportError::Timeout,
            TransportError::Connect("refused".into()),
            TransportError::Request("reset".into()),
        ] {
            let transport = FakeTransport::new().with_probe(VIEW, Err(error));
            let resolved = RedirectResolver::new(&transport)
                .resolve(&view(), &PortalProfile::eucenje())
                .await;
            assert_eq!(resolved, view());
        }
    }

    #[tokio::test]
    async fn redirect_off_permitted_hosts_keeps_original_url() {
        let transport = FakeTransport::new().with_probe(
            VIEW,
            Ok(ProbeResponse {
                status: 200,
                final_url: Some("https://cdn.example.com/file.docx".into()),
                response_url: None,
            }),
        );
        let resolved = RedirectResolver::new(&transport)
            .resolve(&view(), &PortalProfile::eucenje())
            .await;
        assert_eq!(resolved, view());
    }

    #[tokio::test]
    async fn empty_report_keeps_original_url() {
        let transport = FakeTransport::new().with_probe(VIEW, Ok(ProbeResponse::default()));
        let resolved = RedirectResolver::new(&transport)
            .resolve(&view(), &PortalProfile::eucenje())
            .await;
        assert_eq!(resolved, view());
    }
}
