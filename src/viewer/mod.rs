//! Viewer synthesis and format dispatch.
//!
//! Each supported [`DocumentKind`] has one [`ViewerBuilder`] that turns the
//! fetched bytes into a standalone page. [`ViewerRouter`] maps a kind to its
//! builder, or to the fixed message shown when no viewer exists.
//!
//! | Kind | Builder | Renderer loaded by the page |
//! |------|---------|-----------------------------|
//! | `Pdf` | [`PdfViewer`] | browser's native PDF viewer |
//! | `Docx` | [`DocxViewer`] | mammoth.js |
//! | `Pptx` | [`PptxViewer`] | PPTXjs (+ slide reflow fixes) |
//! | `Xlsx` | [`XlsxViewer`] | SheetJS |
//! | `Doc`, `Ppt` | none | "convert first" message |
//! | `Other` | none | "not supported" message |
//!
//! # Example
//!
//! ```rust
//! use coursepeek::viewer::{BuildContext, Dispatch, ViewerRouter};
//! use coursepeek::{DocumentKind, FetchedAsset, Theme};
//!
//! let router = ViewerRouter::new();
//! let Dispatch::Viewer(builder) = router.dispatch(DocumentKind::Docx) else {
//!     unreachable!()
//! };
//! let asset = FetchedAsset {
//!     bytes: bytes::Bytes::from_static(b"PK\x03\x04"),
//!     declared_mime: DocumentKind::Docx.mime().unwrap().to_string(),
//! };
//! let doc = builder.build(asset, &BuildContext::new("notes.docx", Theme::Dark));
//! assert!(doc.markup.contains("<option value=\"dark\" selected>"));
//! ```

pub mod assets;
pub mod docx;
pub mod document;
pub mod embed;
pub mod pdf;
pub mod pptx;
pub mod themes;
pub mod xlsx;

use std::time::Duration;

use crate::error::PreviewError;
use crate::fetch::FetchedAsset;
use crate::kind::DocumentKind;
use crate::reflow::DEFAULT_SETTLE_DELAY;
use crate::theme::Theme;

pub use assets::ConverterAssets;
pub use docx::DocxViewer;
pub use pdf::PdfViewer;
pub use pptx::PptxViewer;
pub use xlsx::XlsxViewer;

/// Message for legacy Word documents.
pub const DOC_CONVERSION_MESSAGE: &str =
    "Preview not supported for .doc files. Please convert to .docx to view.";
/// Message for legacy PowerPoint presentations.
pub const PPT_CONVERSION_MESSAGE: &str =
    "Preview not supported for .ppt files. Please convert to .pptx to view.";
/// Message for everything else.
pub const UNSUPPORTED_MESSAGE: &str = "Preview not supported for this file type.";

/// A finished, self-contained viewer page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerDocument {
    pub markup: String,
    pub kind: DocumentKind,
    /// Name of the previewed file, for the display boundary.
    pub display_name: String,
}

/// Per-build inputs besides the bytes.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    pub display_name: &'a str,
    pub theme: Theme,
}

impl<'a> BuildContext<'a> {
    pub fn new(display_name: &'a str, theme: Theme) -> Self {
        Self {
            display_name,
            theme,
        }
    }
}

/// Turns fetched bytes into a viewer page.
///
/// Builds never fail: converter errors happen inside the page at render
/// time and are shown there in place of the content.
pub trait ViewerBuilder: Send + Sync {
    /// The one kind this builder handles.
    fn kind(&self) -> DocumentKind;

    /// Consume the asset and produce the page.
    fn build(&self, asset: FetchedAsset, ctx: &BuildContext<'_>) -> ViewerDocument;
}

/// Options shared by all builders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerOptions {
    pub assets: ConverterAssets,
    /// Delay before the final unconditional slide reflow pass.
    pub settle_delay: Duration,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            assets: ConverterAssets::default(),
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

/// Outcome of dispatching a kind.
pub enum Dispatch<'a> {
    Viewer(&'a dyn ViewerBuilder),
    /// Recognized legacy format; user must convert it first.
    ConversionRequired(&'static str),
    Unsupported(&'static str),
}

impl Dispatch<'_> {
    /// The error reported for kinds without a viewer.
    pub fn to_error(&self, kind: DocumentKind) -> Option<PreviewError> {
        match self {
            Dispatch::Viewer(_) => None,
            Dispatch::ConversionRequired(message) | Dispatch::Unsupported(message) => {
                Some(PreviewError::UnsupportedKind { kind, message })
            }
        }
    }
}

/// Maps each [`DocumentKind`] to exactly one outcome.
pub struct ViewerRouter {
    builders: Vec<Box<dyn ViewerBuilder>>,
}

impl ViewerRouter {
    /// Router with all builders and default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(&ViewerOptions::default())
    }

    #[must_use]
    pub fn with_options(options: &ViewerOptions) -> Self {
        let builders: Vec<Box<dyn ViewerBuilder>> = vec![
            Box::new(PdfViewer),
            Box::new(DocxViewer::new(options.assets.clone())),
            Box::new(PptxViewer::new(options.assets.clone(), options.settle_delay)),
            Box::new(XlsxViewer::new(options.assets.clone())),
        ];
        Self { builders }
    }

    /// Total mapping from kind to outcome. Pure: the same kind always yields
    /// the same builder.
    pub fn dispatch(&self, kind: DocumentKind) -> Dispatch<'_> {
        match kind {
            DocumentKind::Doc => Dispatch::ConversionRequired(DOC_CONVERSION_MESSAGE),
            DocumentKind::Ppt => Dispatch::ConversionRequired(PPT_CONVERSION_MESSAGE),
            DocumentKind::Other => Dispatch::Unsupported(UNSUPPORTED_MESSAGE),
            DocumentKind::Pdf | DocumentKind::Docx | DocumentKind::Pptx | DocumentKind::Xlsx => {
                self.builders
                    .iter()
                    .find(|b| b.kind() == kind)
                    .map_or(Dispatch::Unsupported(UNSUPPORTED_MESSAGE), |b| {
                        Dispatch::Viewer(b.as_ref())
                    })
            }
        }
    }
}

impl Default for ViewerRouter {
    fn default() -> Self {
        Self::new()
    }
}

/// Inline error shown in place of content when the page's converter fails.
/// `label` names the format, e.g. "DOCX".
pub(crate) fn conversion_error_js(label: &str, target: &str) -> String {
    format!(
        "document.getElementById({}).innerText = {} + (err && err.message ? err.message : err);",
        document::js_literal(target),
        document::js_literal(&format!("Error rendering {label}: "))
    )
}

/// Runs `render` (which may return a promise) and routes both thrown
/// errors and rejections to the inline error in `#output`.
pub(crate) fn guarded_render_js(label: &str, render: &str) -> String {
    format!(
        "Promise.resolve()
    .then(() => {{
{render}
    }})
    .catch(err => {{
        {}
    }});",
        conversion_error_js(label, "output")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder_ptr(d: &Dispatch<'_>) -> *const () {
        match d {
            Dispatch::Viewer(b) => std::ptr::from_ref(*b).cast::<()>(),
            _ => std::ptr::null(),
        }
    }

    #[test]
    fn router_registers_one_builder_per_viewable_kind() {
        let router = ViewerRouter::new();
        let kinds: Vec<_> = router.builders.iter().map(|b| b.kind()).collect();
        assert_eq!(
            kinds,
            [
                DocumentKind::Pdf,
                DocumentKind::Docx,
                DocumentKind::Pptx,
                DocumentKind::Xlsx
            ]
        );
    }

    #[test]
    fn dispatch_is_total() {
        let router = ViewerRouter::new();
        for kind in DocumentKind::ALL {
            match router.dispatch(kind) {
                Dispatch::Viewer(b) => assert_eq!(b.kind(), kind),
                Dispatch::ConversionRequired(_) => {
                    assert!(matches!(kind, DocumentKind::Doc | DocumentKind::Ppt));
                }
                Dispatch::Unsupported(_) => assert_eq!(kind, DocumentKind::Other),
            }
        }
    }

    #[test]
    fn dispatch_is_deterministic() {
        let router = ViewerRouter::new();
        for kind in [
            DocumentKind::Pdf,
            DocumentKind::Docx,
            DocumentKind::Pptx,
            DocumentKind::Xlsx,
        ] {
            let first = builder_ptr(&router.dispatch(kind));
            let second = builder_ptr(&router.dispatch(kind));
            assert!(!first.is_null());
            assert_eq!(first, second);
        }
    }

    #[test]
    fn legacy_kinds_name_the_modern_format() {
        let router = ViewerRouter::new();
        let err = router
            .dispatch(DocumentKind::Ppt)
            .to_error(DocumentKind::Ppt)
            .unwrap();
        assert!(err.to_string().contains(".pptx"));
        let err = router
            .dispatch(DocumentKind::Doc)
            .to_error(DocumentKind::Doc)
            .unwrap();
        assert!(err.to_string().contains(".docx"));
    }

    #[test]
    fn other_gets_the_generic_message() {
        let router = ViewerRouter::new();
        let err = router
            .dispatch(DocumentKind::Other)
            .to_error(DocumentKind::Other)
            .unwrap();
        assert_eq!(err.to_string(), UNSUPPORTED_MESSAGE);
    }
}
