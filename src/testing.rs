//! In-memory [`Transport`] for tests.
//!
//! Canned probes stand for the whole redirect chain. A probe whose final
//! URL is outside the request's scope is answered the way [`HttpTransport`]
//! answers it: the chain stops at the requested URL.
//!
//! [`HttpTransport`]: crate::transport::HttpTransport

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::transport::{BodyResponse, HostScope, ProbeResponse, Transport, TransportError};

/// Canned responses keyed by URL. Unknown URLs fail with a connect error.
#[derive(Default)]
pub struct FakeTransport {
    probes: HashMap<String, Result<ProbeResponse, TransportError>>,
    bodies: HashMap<String, Result<BodyResponse, TransportError>>,
    heads: Mutex<Vec<String>>,
    gets: Mutex<Vec<(String, String)>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_probe(mut self, url: &str, response: Result<ProbeResponse, TransportError>) -> Self {
        self.probes.insert(url.to_string(), response);
        self
    }

    /// Redirect `from` to `to` on HEAD.
    #[must_use]
    pub fn with_redirect(self, from: &str, to: &str) -> Self {
        self.with_probe(
            from,
            Ok(ProbeResponse {
                status: 200,
                final_url: Some(to.to_string()),
                response_url: None,
            }),
        )
    }

    #[must_use]
    pub fn with_body(mut self, url: &str, status: u16, body: impl Into<Bytes>) -> Self {
        self.bodies.insert(
            url.to_string(),
            Ok(BodyResponse {
                status,
                content_type: None,
                body: body.into(),
            }),
        );
        self
    }

    #[must_use]
    pub fn with_get_error(mut self, url: &str, error: TransportError) -> Self {
        self.bodies.insert(url.to_string(), Err(error));
        self
    }

    pub fn head_count(&self) -> usize {
        self.heads.lock().map_or(0, |h| h.len())
    }

    pub fn get_count(&self) -> usize {
        self.gets.lock().map_or(0, |g| g.len())
    }

    /// `(url, accept)` of every GET issued, in order.
    pub fn gets(&self) -> Vec<(String, String)> {
        self.gets.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn head(
        &self,
        url: &Url,
        scope: &dyn HostScope,
    ) -> Result<ProbeResponse, TransportError> {
        if !scope.permits(url) {
            return Err(TransportError::Request(format!("{url} is outside the permitted hosts")));
        }
        if let Ok(mut heads) = self.heads.lock() {
            heads.push(url.to_string());
        }
        let mut probe = self
            .probes
            .get(url.as_str())
            .cloned()
            .unwrap_or_else(|| Err(TransportError::Connect(format!("no route to {url}"))))?;

        let off_scope = probe
            .final_url
            .as_deref()
            .and_then(|u| Url::parse(u).ok())
            .filter(|u| !scope.permits(u));
        if let Some(foreign) = off_scope {
            probe = ProbeResponse {
                status: 302,
                final_url: Some(url.to_string()),
                response_url: Some(foreign.to_string()),
            };
        }
        Ok(probe)
    }

    async fn get(
        &self,
        url: &Url,
        accept: &str,
        scope: &dyn HostScope,
    ) -> Result<BodyResponse, TransportError> {
        if !scope.permits(url) {
            return Err(TransportError::Request(format!("{url} is outside the permitted hosts")));
        }
        if let Ok(mut gets) = self.gets.lock() {
            gets.push((url.to_string(), accept.to_string()));
        }
        self.bodies
            .get(url.as_str())
            .cloned()
            .unwrap_or_else(|| Err(TransportError::Connect(format!("no route to {url}"))))
    }
}
