//! PPTX viewer backed by PPTXjs.
//!
//! Slides render into `#viewer` as positioned divs. Attaches the slide
//! reflow post-processor from [`crate::reflow`] so text the renderer emits
//! late still gets its spacing fixed.

use std::time::Duration;

use tracing::debug;

use super::assets::ConverterAssets;
use super::document::HtmlDocument;
use super::embed::{EmbeddedPayload, PAYLOAD_LOADER_JS};
use super::themes::{ThemeSheet, THEME_STYLE_ID};
use super::{guarded_render_js, BuildContext, ViewerBuilder, ViewerDocument};
use crate::fetch::FetchedAsset;
use crate::kind::DocumentKind;
use crate::reflow::reflow_script;

const PPTX_THEMES: ThemeSheet = ThemeSheet {
    base: "
body {
    margin: 0;
    padding: 20px 0;
    font-family: sans-serif;
}
#viewer {
    margin: auto;
}
#viewer .slide {
    margin: 0 auto 20px auto;
    box-shadow: 0 2px 8px rgba(0, 0, 0, 0.3);
}
span.text-block {
    white-space: normal;
    word-break: break-word;
    overflow-wrap: break-word;
    hyphens: auto;
    max-width: 100%;
    display: inline-block;
    margin-right: 6px;
}
#output {
    padding: 0 20px;
}
",
    light: "body { background: #f0f0f0; color: #000; }",
    dark: "body { background: #111; color: #e0e0e0; }
#viewer .slide { box-shadow: 0 2px 8px rgba(0, 0, 0, 0.8); outline: 1px solid #222; }",
    sepia: "body { background: #e8dcc0; color: #5b4636; }",
};

const PPTX_RENDER_JS: &str = "        $('#viewer').pptxToHtml({
            pptxFileUrl: loadPayloadBlobUrl(),
            slideMode: false,
            keyBoardShortCut: false,
            mediaProcess: true,
            jsZipV2: false,
            themeProcess: true,
            slideType: 'divs2slidesjs',
        });";

pub struct PptxViewer {
    assets: ConverterAssets,
    settle_delay: Duration,
}

impl PptxViewer {
    pub fn new(assets: ConverterAssets, settle_delay: Duration) -> Self {
        Self {
            assets,
            settle_delay,
        }
    }
}

impl ViewerBuilder for PptxViewer {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Pptx
    }

    fn build(&self, asset: FetchedAsset, ctx: &BuildContext<'_>) -> ViewerDocument {
        let payload = EmbeddedPayload::new(&asset.bytes, &asset.declared_mime);
        debug!(
            encoded = payload.encoded_len(),
            theme = %ctx.theme,
            settle = ?self.settle_delay,
            "Building PPTX viewer"
        );

        let key = DocumentKind::Pptx.theme_key().unwrap_or("pptxPreviewTheme");

        let mut doc = HtmlDocument::new(ctx.display_name);
        for href in self.assets.pptx_stylesheets() {
            doc = doc.stylesheet(&href);
        }
        doc = doc.style(Some(THEME_STYLE_ID), PPTX_THEMES.css(ctx.theme));
        for src in self.assets.pptx_scripts() {
            doc = doc.script_src(&src);
        }

        let markup = doc
            .body(ThemeSheet::switcher_markup(ctx.theme))
            .body("<div id=\"viewer\"></div>")
            .body("<div id=\"output\"></div>")
            .payload(&payload)
            .inline_script(PAYLOAD_LOADER_JS)
            .inline_script(PPTX_THEMES.switcher_script(key, ctx.theme))
            .inline_script(reflow_script(self.settle_delay))
            .inline_script(guarded_render_js("PPTX", PPTX_RENDER_JS))
            .render();

        ViewerDocument {
            markup,
            kind: DocumentKind::Pptx,
            display_name: ctx.display_name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflow::DEFAULT_SETTLE_DELAY;
    use crate::theme::Theme;
    use crate::viewer::embed::extract_payload;

    const DECK: &[u8] = b"PK\x03\x04ppt/presentation.xml\x00\x01\x02";

    fn build(theme: Theme, settle: Duration) -> ViewerDocument {
        let asset = FetchedAsset {
            bytes: bytes::Bytes::from_static(DECK),
            declared_mime: DocumentKind::Pptx.mime().unwrap().to_string(),
        };
        PptxViewer::new(ConverterAssets::default(), settle)
            .build(asset, &BuildContext::new("Predavanje 1.pptx", theme))
    }

    #[test]
    fn embeds_bytes_by_value() {
        let doc = build(Theme::Light, DEFAULT_SETTLE_DELAY);
        let (bytes, mime) = extract_payload(&doc.markup).unwrap();
        assert_eq!(bytes, DECK);
        assert_eq!(mime, DocumentKind::Pptx.mime().unwrap());
    }

    #[test]
    fn loads_pptxjs_in_order() {
        let doc = build(Theme::Light, DEFAULT_SETTLE_DELAY);
        let jquery = doc.markup.find("jquery-1.11.3.min.js").unwrap();
        let pptxjs = doc.markup.find("js/pptxjs.js").unwrap();
        let render = doc.markup.find(".pptxToHtml(").unwrap();
        assert!(jquery < pptxjs && pptxjs < render);
        assert!(doc.markup.contains("css/pptxjs.css"));
        assert!(doc.markup.contains("slideMode: false"));
    }

    #[test]
    fn attaches_reflow_with_configured_delay() {
        let doc = build(Theme::Light, Duration::from_millis(750));
        assert!(doc.markup.contains("const SETTLE_DELAY_MS = 750;"));
        assert!(doc.markup.contains("new MutationObserver(scheduleFixes)"));
    }

    #[test]
    fn switcher_uses_pptx_key() {
        let doc = build(Theme::Dark, DEFAULT_SETTLE_DELAY);
        assert!(doc.markup.contains("<option value=\"dark\" selected>"));
        assert!(doc.markup.contains("\"pptxPreviewTheme\""));
        assert!(doc.markup.contains("background: #111"));
    }

    #[test]
    fn text_blocks_collapse_and_wrap() {
        let doc = build(Theme::Light, DEFAULT_SETTLE_DELAY);
        assert!(doc.markup.contains("white-space: normal;"));
        assert!(doc.markup.contains("overflow-wrap: break-word;"));
        assert!(doc.markup.contains("display: inline-block;"));
        assert!(!doc.markup.contains("pre-wrap"));
    }

    #[test]
    fn conversion_errors_render_inline() {
        let doc = build(Theme::Light, DEFAULT_SETTLE_DELAY);
        assert!(doc.markup.contains("Error rendering PPTX: "));
    }
}
