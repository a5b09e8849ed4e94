//! Standalone HTML document assembly.
//!
//! [`HtmlDocument`] takes structured parts (title, stylesheets, pinned
//! external scripts, style blocks, body markup, payload, inline scripts)
//! and renders one self-contained page. Escaping happens here and nowhere
//! else: text goes through [`escape_text`], attribute values through
//! [`escape_attr`], values injected into inline scripts through
//! [`js_literal`].

use serde::Serialize;

use super::embed::EmbeddedPayload;

/// A `<style>` block, optionally addressable by id so scripts can rewrite it.
#[derive(Debug, Clone)]
struct StyleBlock {
    id: Option<String>,
    css: String,
}

/// Builder for a complete viewer page.
#[derive(Debug, Clone, Default)]
pub struct HtmlDocument {
    title: String,
    stylesheets: Vec<String>,
    styles: Vec<StyleBlock>,
    head_scripts: Vec<String>,
    body: Vec<String>,
    payload: Option<String>,
    inline_scripts: Vec<String>,
}

impl HtmlDocument {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }

    /// External stylesheet, loaded in `<head>`.
    #[must_use]
    pub fn stylesheet(mut self, href: &str) -> Self {
        self.stylesheets.push(href.to_string());
        self
    }

    /// Inline style block.
    #[must_use]
    pub fn style(mut self, id: Option<&str>, css: impl Into<String>) -> Self {
        self.styles.push(StyleBlock {
            id: id.map(String::from),
            css: css.into(),
        });
        self
    }

    /// External script, loaded in `<head>` before the body runs.
    #[must_use]
    pub fn script_src(mut self, src: &str) -> Self {
        self.head_scripts.push(src.to_string());
        self
    }

    /// Trusted body markup. Callers escape any text they interpolate.
    #[must_use]
    pub fn body(mut self, markup: impl Into<String>) -> Self {
        self.body.push(markup.into());
        self
    }

    /// File bytes, embedded by value after the body markup.
    #[must_use]
    pub fn payload(mut self, payload: &EmbeddedPayload) -> Self {
        self.payload = Some(payload.to_element());
        self
    }

    /// Inline script, run after body and payload are in the DOM.
    #[must_use]
    pub fn inline_script(mut self, js: impl Into<String>) -> Self {
        self.inline_scripts.push(js.into());
        self
    }

    pub fn render(&self) -> String {
        let mut html = String::with_capacity(
            4096 + self.payload.as_ref().map_or(0, String::len),
        );

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\" />\n");
        html.push_str(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n",
        );
        html.push_str(&format!("<title>{}</title>\n", escape_text(&self.title)));

        for href in &self.stylesheets {
            html.push_str(&format!(
                "<link rel=\"stylesheet\" href=\"{}\" />\n",
                escape_attr(href)
            ));
        }
        for block in &self.styles {
            match &block.id {
                Some(id) => html.push_str(&format!("<style id=\"{}\">", escape_attr(id))),
                None => html.push_str("<style>"),
            }
            html.push_str(&block.css.replace("</style", "<\\/style"));
            html.push_str("</style>\n");
        }
        for src in &self.head_scripts {
            html.push_str(&format!(
                "<script src=\"{}\"></script>\n",
                escape_attr(src)
            ));
        }

        html.push_str("</head>\n<body>\n");
        for fragment in &self.body {
            html.push_str(fragment);
            html.push('\n');
        }
        if let Some(payload) = &self.payload {
            html.push_str(payload);
            html.push('\n');
        }
        for js in &self.inline_scripts {
            html.push_str("<script>\n");
            html.push_str(&js.replace("</script", "<\\/script"));
            html.push_str("\n</script>\n");
        }
        html.push_str("</body>\n</html>\n");
        html
    }
}

/// Escape text content.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a double-quoted attribute value.
pub fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;").replace('\'', "&#39;")
}

/// JSON literal safe to paste into an inline `<script>`.
pub fn js_literal<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}
