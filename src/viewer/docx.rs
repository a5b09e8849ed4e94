//! DOCX viewer backed by mammoth.js.

use tracing::debug;

use super::assets::ConverterAssets;
use super::document::HtmlDocument;
use super::embed::{EmbeddedPayload, PAYLOAD_LOADER_JS};
use super::themes::{ThemeSheet, THEME_STYLE_ID};
use super::{guarded_render_js, BuildContext, ViewerBuilder, ViewerDocument};
use crate::fetch::FetchedAsset;
use crate::kind::DocumentKind;

const DOCX_THEMES: ThemeSheet = ThemeSheet {
    base: "
body {
    font-family: sans-serif;
    padding: 20px;
    max-width: 800px;
    margin: auto;
    line-height: 1.6;
    word-wrap: break-word;
}
img {
    max-width: 100%;
    height: auto;
    display: block;
    margin: 1em 0;
}
h1, h2, h3 {
    margin-top: 1.5em;
}
table {
    border-collapse: collapse;
    width: 100%;
    overflow-x: auto;
}
table, th, td {
    border: 1px solid #ccc;
    padding: 6px;
}
",
    light: "body { background: #fff; color: #000; }",
    dark: "body { background: #121212; color: #e0e0e0; }
a { color: #8ab4f8; }
table, th, td { border-color: #444; }",
    sepia: "body { background: #f4ecd8; color: #5b4636; }",
};

const DOCX_RENDER_JS: &str = "        return mammoth
            .convertToHtml({ arrayBuffer: loadPayloadBytes().buffer })
            .then(result => {
                document.getElementById('output').innerHTML = result.value;
            });";

pub struct DocxViewer {
    assets: ConverterAssets,
}

impl DocxViewer {
    pub fn new(assets: ConverterAssets) -> Self {
        Self { assets }
    }
}

impl ViewerBuilder for DocxViewer {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Docx
    }

    fn build(&self, asset: FetchedAsset, ctx: &BuildContext<'_>) -> ViewerDocument {
        let payload = EmbeddedPayload::new(&asset.bytes, &asset.declared_mime);
        debug!(encoded = payload.encoded_len(), theme = %ctx.theme, "Building DOCX viewer");

        let key = DocumentKind::Docx.theme_key().unwrap_or("docxPreviewTheme");

        let markup = HtmlDocument::new(ctx.display_name)
            .style(Some(THEME_STYLE_ID), DOCX_THEMES.css(ctx.theme))
            .script_src(&self.assets.mammoth)
            .body(ThemeSheet::switcher_markup(ctx.theme))
            .body("<div id=\"output\">Loading...</div>")
            .payload(&payload)
            .inline_script(PAYLOAD_LOADER_JS)
            .inline_script(DOCX_THEMES.switcher_script(key, ctx.theme))
            .inline_script(guarded_render_js("DOCX", DOCX_RENDER_JS))
            .render();

        ViewerDocument {
            markup,
            kind: DocumentKind::Docx,
            display_name: ctx.display_name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use crate::viewer::embed::extract_payload;

    fn build(theme: Theme) -> ViewerDocument {
        let asset = FetchedAsset {
            bytes: bytes::Bytes::from_static(b"PK\x03\x04word/document.xml"),
            declared_mime: DocumentKind::Docx.mime().unwrap().to_string(),
        };
        DocxViewer::new(ConverterAssets::default())
            .build(asset, &BuildContext::new("Seminar 3.docx", theme))
    }

    #[test]
    fn embeds_bytes_by_value() {
        let doc = build(Theme::Light);
        let (bytes, mime) = extract_payload(&doc.markup).unwrap();
        assert_eq!(bytes, b"PK\x03\x04word/document.xml");
        assert_eq!(mime, DocumentKind::Docx.mime().unwrap());
    }

    #[test]
    fn loads_pinned_mammoth() {
        let doc = build(Theme::Light);
        assert!(doc
            .markup
            .contains(&format!("<script src=\"{}\">", ConverterAssets::default().mammoth)));
        assert!(doc.markup.contains("mammoth\n            .convertToHtml"));
    }

    #[test]
    fn switcher_defaults_to_given_theme() {
        let doc = build(Theme::Sepia);
        assert!(doc.markup.contains("<option value=\"sepia\" selected>"));
        assert!(doc.markup.contains("const INITIAL = \"sepia\";"));
        assert!(doc.markup.contains("\"docxPreviewTheme\""));
    }

    #[test]
    fn initial_style_matches_theme_without_script() {
        let doc = build(Theme::Dark);
        let style = doc.markup.find("<style id=\"theme-style\">").unwrap();
        let end = doc.markup[style..].find("</style>").unwrap();
        assert!(doc.markup[style..style + end].contains("#121212"));
    }

    #[test]
    fn conversion_errors_render_inline() {
        let doc = build(Theme::Light);
        assert!(doc.markup.contains(".catch(err =>"));
        assert!(doc.markup.contains("Error rendering DOCX: "));
    }
}
