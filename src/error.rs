//! Preview pipeline errors.
//!
//! Every error is scoped to the single activation that raised it. The
//! `Display` text of the user-facing variants is the message shown to the
//! user, so it is phrased for people rather than logs.

use thiserror::Error;

use crate::kind::DocumentKind;

/// Failure of one preview activation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreviewError {
    /// The anchor reference could not be parsed against the page URL.
    /// Callers ignore such links silently.
    #[error("unresolvable reference: {0}")]
    UnresolvableReference(String),

    /// The header-only probe failed. Never surfaced to the user: the
    /// resolver falls back to the original URL.
    #[error("redirect probe failed for {url}: {reason}")]
    RedirectProbeFailed { url: String, reason: String },

    /// Transport failure while fetching the asset.
    #[error("Network error while fetching file: {0}")]
    NetworkError(String),

    /// The server answered the fetch with a non-2xx status.
    #[error("Failed to fetch file, status: {status}")]
    FetchFailed { status: u16 },

    /// Legacy binary format or unknown extension. No fetch is attempted.
    #[error("{message}")]
    UnsupportedKind {
        kind: DocumentKind,
        message: &'static str,
    },
}

impl PreviewError {
    /// Whether the user should see this error.
    pub fn is_user_visible(&self) -> bool {
        !matches!(
            self,
            PreviewError::UnresolvableReference(_) | PreviewError::RedirectProbeFailed { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PreviewError>;
