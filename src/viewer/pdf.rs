//! PDF viewer: a full-window frame on the browser's native PDF renderer.
//!
//! No theme switcher; everything past handing over the bytes belongs to the
//! native viewer.

use tracing::debug;

use super::document::HtmlDocument;
use super::embed::{EmbeddedPayload, PAYLOAD_LOADER_JS};
use super::{conversion_error_js, BuildContext, ViewerBuilder, ViewerDocument};
use crate::fetch::FetchedAsset;
use crate::kind::DocumentKind;

const PDF_CSS: &str = "
html, body {
    margin: 0;
    padding: 0;
    height: 100%;
    overflow: hidden;
}
iframe {
    border: none;
    width: 100%;
    height: 100%;
}
#output {
    font-family: sans-serif;
    padding: 20px;
}
";

pub struct PdfViewer;

impl ViewerBuilder for PdfViewer {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Pdf
    }

    fn build(&self, asset: FetchedAsset, ctx: &BuildContext<'_>) -> ViewerDocument {
        let payload = EmbeddedPayload::new(&asset.bytes, &asset.declared_mime);
        debug!(encoded = payload.encoded_len(), "Building PDF viewer");

        let boot = format!(
            "try {{
    document.getElementById('viewer').src = loadPayloadBlobUrl();
}} catch (err) {{
    document.getElementById('viewer').remove();
    {}
}}",
            conversion_error_js("PDF", "output")
        );

        let markup = HtmlDocument::new(ctx.display_name)
            .style(None, PDF_CSS)
            .body("<iframe id=\"viewer\" allow=\"fullscreen\" title=\"PDF document\"></iframe>")
            .body("<div id=\"output\"></div>")
            .payload(&payload)
            .inline_script(PAYLOAD_LOADER_JS)
            .inline_script(boot)
            .render();

        ViewerDocument {
            markup,
            kind: DocumentKind::Pdf,
            display_name: ctx.display_name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use crate::viewer::embed::extract_payload;

    fn asset(bytes: &'static [u8]) -> FetchedAsset {
        FetchedAsset {
            bytes: bytes::Bytes::from_static(bytes),
            declared_mime: "application/pdf".to_string(),
        }
    }

    #[test]
    fn embeds_bytes_and_frames_them() {
        let doc = PdfViewer.build(
            asset(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3"),
            &BuildContext::new("syllabus.pdf", Theme::Light),
        );
        assert_eq!(doc.kind, DocumentKind::Pdf);
        assert!(doc.markup.contains("<title>syllabus.pdf</title>"));
        assert!(doc.markup.contains("<iframe id=\"viewer\""));
        let (bytes, mime) = extract_payload(&doc.markup).unwrap();
        assert_eq!(bytes, b"%PDF-1.7\n%\xe2\xe3\xcf\xd3");
        assert_eq!(mime, "application/pdf");
    }

    #[test]
    fn has_no_theme_switcher() {
        let doc = PdfViewer.build(asset(b"%PDF"), &BuildContext::new("a.pdf", Theme::Dark));
        assert!(!doc.markup.contains("theme-switcher"));
    }

    #[test]
    fn frame_source_comes_from_the_page_itself() {
        let doc = PdfViewer.build(asset(b"%PDF"), &BuildContext::new("a.pdf", Theme::Light));
        assert!(doc.markup.contains("loadPayloadBlobUrl()"));
        assert!(!doc.markup.contains("src=\"blob:"));
        assert!(doc.markup.contains("Error rendering PDF: "));
    }
}
