//! Asset retrieval.
//!
//! One GET per call, fully buffered. No retry, no cache: a second call for
//! the same URL issues a second request.

use bytes::Bytes;
use tracing::{info, instrument, warn};
use url::Url;

use crate::error::{PreviewError, Result};
use crate::transport::{HostScope, Transport};

/// Bytes of one fetched file plus the MIME type they were requested as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedAsset {
    pub bytes: Bytes,
    pub declared_mime: String,
}

/// Fetches assets through a [`Transport`], never leaving `scope`.
pub struct AssetFetcher<'a> {
    transport: &'a dyn Transport,
    scope: &'a dyn HostScope,
}

impl<'a> AssetFetcher<'a> {
    pub fn new(transport: &'a dyn Transport, scope: &'a dyn HostScope) -> Self {
        Self { transport, scope }
    }

    /// Retrieve the complete body of `url`, declaring `mime` in `Accept`.
    ///
    /// Non-2xx → [`PreviewError::FetchFailed`]; transport failure →
    /// [`PreviewError::NetworkError`].
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &Url, mime: &str) -> Result<FetchedAsset> {
        let response = self.transport.get(url, mime, self.scope).await.map_err(|e| {
            warn!("Fetch failed: {e}");
            PreviewError::NetworkError(e.to_string())
        })?;

        if !(200..300).contains(&response.status) {
            warn!(status = response.status, "Fetch rejected");
            return Err(PreviewError::FetchFailed {
                status: response.status,
            });
        }

        info!(bytes = response.body.len(), "Asset fetched");
        Ok(FetchedAsset {
            bytes: response.body,
            declared_mime: mime.to_string(),
        })
    }
}
