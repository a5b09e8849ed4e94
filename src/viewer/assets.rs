//! Version-pinned converter scripts loaded by viewer pages.

use serde::Deserialize;

/// Where each page fetches its byte-to-markup converter from.
///
/// Overridable under `[assets]` in the config file, e.g. to point at a
/// self-hosted mirror.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConverterAssets {
    /// mammoth.js browser bundle (DOCX → HTML).
    pub mammoth: String,
    /// SheetJS full bundle (XLSX → HTML tables).
    pub sheetjs: String,
    /// Root of a PPTXjs checkout (`js/` and `css/` below it).
    pub pptxjs_base: String,
}

impl Default for ConverterAssets {
    fn default() -> Self {
        Self {
            mammoth: "https://cdn.jsdelivr.net/npm/mammoth@1.8.0/mammoth.browser.min.js"
                .to_string(),
            sheetjs: "https://cdn.sheetjs.com/xlsx-0.20.3/package/dist/xlsx.full.min.js"
                .to_string(),
            pptxjs_base: "https://cdn.jsdelivr.net/gh/meshesha/PPTXjs@1.21.1".to_string(),
        }
    }
}

const PPTXJS_SCRIPTS: &[&str] = &[
    "js/jquery-1.11.3.min.js",
    "js/jquery.fullscreen-min.js",
    "js/jszip.min.js",
    "js/filereader.js",
    "js/d3.min.js",
    "js/nv.d3.min.js",
    "js/dingbat.js",
    "js/pptxjs.js",
    "js/divs2slides.js",
];

const PPTXJS_STYLES: &[&str] = &["css/pptxjs.css", "css/nv.d3.min.css"];

impl ConverterAssets {
    /// PPTXjs scripts in load order.
    pub fn pptx_scripts(&self) -> Vec<String> {
        PPTXJS_SCRIPTS.iter().map(|p| self.pptx_path(p)).collect()
    }

    pub fn pptx_stylesheets(&self) -> Vec<String> {
        PPTXJS_STYLES.iter().map(|p| self.pptx_path(p)).collect()
    }

    fn pptx_path(&self, path: &str) -> String {
        format!("{}/{path}", self.pptxjs_base.trim_end_matches('/'))
    }
}
