//! `coursepeek` - inline previews for course-portal documents
//!
//! Turns a link found on a course page into a standalone, theme-aware HTML
//! viewer for the document behind it, following the portal's redirect
//! indirection where needed.
//!
//! # Pipeline
//!
//! - **Normalize**: anchor reference + page URL → absolute URL
//! - **Classify**: path suffix or a profile's indirection shape
//! - **Resolve**: header-only probe for indirection links (fail-open)
//! - **Fetch**: one GET, 2xx required
//! - **Dispatch + build**: PDF, DOCX, PPTX and XLSX viewers with the bytes
//!   embedded by value
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use coursepeek::{HttpTransport, MemoryThemeStore, PortalRegistry, Previewer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let page = url::Url::parse("https://e-ucenje.ff.uni-lj.si/course/view.php?id=42")?;
//!     let profile = PortalRegistry::new()
//!         .for_page(&page)
//!         .cloned()
//!         .ok_or_else(|| anyhow::anyhow!("no profile"))?;
//!
//!     let previewer = Previewer::new(
//!         Arc::new(HttpTransport::new()?),
//!         profile,
//!         Arc::new(MemoryThemeStore::new()),
//!     );
//!     let viewer = previewer.preview("/mod/resource/view.php?id=9", &page).await?;
//!     println!("{} bytes of {}", viewer.markup.len(), viewer.kind);
//!     Ok(())
//! }
//! ```

pub mod classify;
pub mod config;
pub mod display;
pub mod error;
pub mod fetch;
pub mod kind;
pub mod normalize;
pub mod pipeline;
pub mod portal;
pub mod reflow;
pub mod resolve;
pub mod scan;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod theme;
pub mod transport;
pub mod viewer;

pub use classify::Classification;
pub use config::Config;
pub use display::{BrowserDisplay, FileDisplay, ViewerDisplay};
pub use error::PreviewError;
pub use fetch::{AssetFetcher, FetchedAsset};
pub use kind::DocumentKind;
pub use normalize::LinkCandidate;
pub use pipeline::{Inspection, PreviewLink, Previewer, ResolvedTarget};
pub use portal::{PortalProfile, PortalRegistry};
pub use theme::{FileThemeStore, MemoryThemeStore, Theme, ThemeStore};
pub use transport::{AnyHost, HostScope, HttpConfig, HttpTransport, Transport, TransportError};
pub use viewer::{ViewerDocument, ViewerRouter};

/// Version of coursepeek
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
