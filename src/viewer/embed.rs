//! Embedding file bytes by value.
//!
//! The bytes travel inside the viewer page as a base64 data block:
//!
//! ```html
//! <script type="application/octet-stream" id="coursepeek-payload"
//!         data-mime="application/pdf">JVBERi0xLjcK...</script>
//! ```
//!
//! [`PAYLOAD_LOADER_JS`] turns it back into a `Uint8Array` / `Blob` inside
//! the page, so the page never depends on a handle owned by whoever
//! fetched the file.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use scraper::{Html, Selector};

use super::document::escape_attr;

/// Element id of the payload block.
pub const PAYLOAD_ELEMENT_ID: &str = "coursepeek-payload";

/// Page-side decoder for the payload block. Defines `loadPayloadBytes()`
/// and `loadPayloadBlobUrl()`.
pub const PAYLOAD_LOADER_JS: &str = r"
function loadPayloadBytes() {
    const el = document.getElementById('coursepeek-payload');
    const binary = atob(el.textContent.trim());
    const bytes = new Uint8Array(binary.length);
    for (let i = 0; i < binary.length; i++) {
        bytes[i] = binary.charCodeAt(i);
    }
    return bytes;
}

function loadPayloadBlobUrl() {
    const el = document.getElementById('coursepeek-payload');
    const blob = new Blob([loadPayloadBytes()], { type: el.dataset.mime });
    return URL.createObjectURL(blob);
}
";

/// File bytes ready to be placed in a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedPayload {
    mime: String,
    encoded: String,
}

impl EmbeddedPayload {
    pub fn new(bytes: &[u8], mime: &str) -> Self {
        Self {
            mime: mime.to_string(),
            encoded: BASE64.encode(bytes),
        }
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Encoded length, for logs.
    pub fn encoded_len(&self) -> usize {
        self.encoded.len()
    }

    /// The `<script type="application/octet-stream">` block. Base64 never
    /// contains `<`, so the block cannot terminate early.
    pub fn to_element(&self) -> String {
        format!(
            "<script type=\"application/octet-stream\" id=\"{PAYLOAD_ELEMENT_ID}\" data-mime=\"{}\">{}</script>",
            escape_attr(&self.mime),
            self.encoded
        )
    }
}

/// Recover the embedded bytes and MIME type from a rendered page.
pub fn extract_payload(markup: &str) -> Option<(Vec<u8>, String)> {
    let document = Html::parse_document(markup);
    let selector = Selector::parse(&format!("script#{PAYLOAD_ELEMENT_ID}")).ok()?;
    let element = document.select(&selector).next()?;
    let mime = element.value().attr("data-mime").unwrap_or_default().to_string();
    let encoded: String = element.text().collect();
    let bytes = BASE64.decode(encoded.trim()).ok()?;
    Some((bytes, mime))
}
