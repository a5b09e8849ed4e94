//! XLSX viewer backed by SheetJS. Every sheet becomes a titled HTML table.

use tracing::debug;

use super::assets::ConverterAssets;
use super::document::HtmlDocument;
use super::embed::{EmbeddedPayload, PAYLOAD_LOADER_JS};
use super::themes::{ThemeSheet, THEME_STYLE_ID};
use super::{guarded_render_js, BuildContext, ViewerBuilder, ViewerDocument};
use crate::fetch::FetchedAsset;
use crate::kind::DocumentKind;

const XLSX_THEMES: ThemeSheet = ThemeSheet {
    base: "
body {
    font-family: sans-serif;
    padding: 20px;
    max-width: 95vw;
    margin: auto;
    line-height: 1.6;
    overflow-x: auto;
}
table {
    border-collapse: collapse;
    width: 100%;
    margin-top: 1em;
}
th, td {
    border: 1px solid #ccc;
    padding: 6px;
    text-align: left;
}
",
    light: "body { background: #fff; color: #000; }",
    dark: "body { background: #121212; color: #e0e0e0; }
table, th, td { border-color: #444; }",
    sepia: "body { background: #f4ecd8; color: #5b4636; }
table, th, td { border-color: #c8b99a; }",
};

// Sheet names go through textContent; only SheetJS output is set as HTML.
const XLSX_RENDER_JS: &str = "        const workbook = XLSX.read(loadPayloadBytes(), { type: 'array' });
        const output = document.getElementById('output');
        output.innerHTML = '';
        workbook.SheetNames.forEach(sheetName => {
            const sheetDiv = document.createElement('div');
            const heading = document.createElement('h2');
            heading.textContent = sheetName;
            const table = document.createElement('div');
            table.innerHTML = XLSX.utils.sheet_to_html(workbook.Sheets[sheetName]);
            sheetDiv.appendChild(heading);
            sheetDiv.appendChild(table);
            output.appendChild(sheetDiv);
        });";

pub struct XlsxViewer {
    assets: ConverterAssets,
}

impl XlsxViewer {
    pub fn new(assets: ConverterAssets) -> Self {
        Self { assets }
    }
}

impl ViewerBuilder for XlsxViewer {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Xlsx
    }

    fn build(&self, asset: FetchedAsset, ctx: &BuildContext<'_>) -> ViewerDocument {
        let payload = EmbeddedPayload::new(&asset.bytes, &asset.declared_mime);
        debug!(encoded = payload.encoded_len(), theme = %ctx.theme, "Building XLSX viewer");

        let key = DocumentKind::Xlsx.theme_key().unwrap_or("xlsxPreviewTheme");

        let markup = HtmlDocument::new(ctx.display_name)
            .style(Some(THEME_STYLE_ID), XLSX_THEMES.css(ctx.theme))
            .script_src(&self.assets.sheetjs)
            .body(ThemeSheet::switcher_markup(ctx.theme))
            .body("<div id=\"output\">Loading...</div>")
            .payload(&payload)
            .inline_script(PAYLOAD_LOADER_JS)
            .inline_script(XLSX_THEMES.switcher_script(key, ctx.theme))
            .inline_script(guarded_render_js("XLSX", XLSX_RENDER_JS))
            .render();

        ViewerDocument {
            markup,
            kind: DocumentKind::Xlsx,
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
            bytes: bytes::Bytes::from_static(b"PK\x03\x04xl/workbook.xml\x00\xff"),
            declared_mime: DocumentKind::Xlsx.mime().unwrap().to_string(),
        };
        XlsxViewer::new(ConverterAssets::default())
            .build(asset, &BuildContext::new("Ocene.xlsx", theme))
    }

    #[test]
    fn embeds_bytes_by_value() {
        let doc = build(Theme::Light);
        let (bytes, _) = extract_payload(&doc.markup).unwrap();
        assert_eq!(bytes, b"PK\x03\x04xl/workbook.xml\x00\xff");
    }

    #[test]
    fn renders_every_sheet() {
        let doc = build(Theme::Light);
        assert!(doc.markup.contains("workbook.SheetNames.forEach"));
        assert!(doc.markup.contains("XLSX.utils.sheet_to_html"));
        assert!(doc.markup.contains(&ConverterAssets::default().sheetjs));
    }

    #[test]
    fn dark_theme_darkens_table_borders() {
        let doc = build(Theme::Dark);
        assert!(doc.markup.contains("<option value=\"dark\" selected>"));
        assert!(doc.markup.contains("border-color: #444"));
        assert!(doc.markup.contains("\"xlsxPreviewTheme\""));
    }

    #[test]
    fn conversion_errors_render_inline() {
        let doc = build(Theme::Light);
        assert!(doc.markup.contains("Error rendering XLSX: "));
    }
}
