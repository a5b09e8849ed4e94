//! Document kinds and the fixed extension table.
//!
//! Every previewable asset is attributed exactly one [`DocumentKind`].
//! `Doc` and `Ppt` are recognized legacy binary formats that need a
//! conversion before they can be previewed; `Other` covers everything else.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed classification of a previewable asset's format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
    Doc,
    Pptx,
    Ppt,
    Xlsx,
    Other,
}

/// Known path suffixes. Anything not listed is [`DocumentKind::Other`].
const EXTENSIONS: &[(&str, DocumentKind)] = &[
    (".pdf", DocumentKind::Pdf),
    (".docx", DocumentKind::Docx),
    (".doc", DocumentKind::Doc),
    (".pptx", DocumentKind::Pptx),
    (".ppt", DocumentKind::Ppt),
    (".xlsx", DocumentKind::Xlsx),
];

impl DocumentKind {
    /// All kinds, in table order.
    pub const ALL: [DocumentKind; 7] = [
        DocumentKind::Pdf,
        DocumentKind::Docx,
        DocumentKind::Doc,
        DocumentKind::Pptx,
        DocumentKind::Ppt,
        DocumentKind::Xlsx,
        DocumentKind::Other,
    ];

    /// Classify a URL path by its lowercase suffix.
    ///
    /// The path must already be stripped of query and fragment.
    pub fn from_path(path: &str) -> Self {
        let lower = path.to_lowercase();
        EXTENSIONS
            .iter()
            .find(|(ext, _)| lower.ends_with(ext))
            .map_or(DocumentKind::Other, |(_, kind)| *kind)
    }

    /// MIME type declared in the `Accept` header when fetching this kind.
    ///
    /// Only kinds with a viewer have one.
    pub fn mime(self) -> Option<&'static str> {
        match self {
            DocumentKind::Pdf => Some("application/pdf"),
            DocumentKind::Docx => Some(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            ),
            DocumentKind::Pptx => Some(
                "application/vnd.openxmlformats-officedocument.presentationml.presentation",
            ),
            DocumentKind::Xlsx => {
                Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
            }
            DocumentKind::Doc | DocumentKind::Ppt | DocumentKind::Other => None,
        }
    }

    /// Fixed key the theme preference for this kind is stored under.
    ///
    /// `None` for kinds whose viewer has no theme switcher.
    pub fn theme_key(self) -> Option<&'static str> {
        match self {
            DocumentKind::Docx => Some("docxPreviewTheme"),
            DocumentKind::Pptx => Some("pptxPreviewTheme"),
            DocumentKind::Xlsx => Some("xlsxPreviewTheme"),
            _ => None,
        }
    }

    /// Short uppercase label used in titles and messages.
    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "PDF",
            DocumentKind::Docx => "DOCX",
            DocumentKind::Doc => "DOC",
            DocumentKind::Pptx => "PPTX",
            DocumentKind::Ppt => "PPT",
            DocumentKind::Xlsx => "XLSX",
            DocumentKind::Other => "file",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "docx" => Ok(DocumentKind::Docx),
            "doc" => Ok(DocumentKind::Doc),
            "pptx" => Ok(DocumentKind::Pptx),
            "ppt" => Ok(DocumentKind::Ppt),
            "xlsx" => Ok(DocumentKind::Xlsx),
            "other" => Ok(DocumentKind::Other),
            other => Err(format!("unknown document kind: {other}")),
        }
    }
}
