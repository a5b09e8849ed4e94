//! Turns anchor references into absolute URLs.

use url::Url;

/// One anchor examined during a scan. Transient; never retained across scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCandidate {
    pub raw_reference: String,
    pub resolved_url: Option<Url>,
}

impl LinkCandidate {
    /// Normalize `raw_reference` against the page it was found on.
    pub fn new(raw_reference: impl Into<String>, base: &Url) -> Self {
        let raw_reference = raw_reference.into();
        let resolved_url = normalize_reference(&raw_reference, base);
        Self {
            raw_reference,
            resolved_url,
        }
    }
}

/// Resolve a possibly relative reference against `base`.
///
/// Returns `None` for anything that does not parse, and for empty or
/// non-hierarchical references (`mailto:`, `javascript:`) that can never
/// point at a fetchable file.
pub fn normalize_reference(reference: &str, base: &Url) -> Option<Url> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }

    let url = base.join(reference).ok()?;
    if url.cannot_be_a_base() {
        return None;
    }
    Some(url)
}

/// Display name of the file behind `url`: the last path segment,
/// percent-decoded, with query and fragment already excluded by `Url`.
pub fn display_name(url: &Url) -> String {
    let raw = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|s| !s.is_empty())
        .unwrap_or("document");

    urlencoding::decode(raw).map_or_else(|_| raw.to_string(), std::borrow::Cow::into_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://e-ucenje.ff.uni-lj.si/course/view.php?id=42").unwrap()
    }

    #[test]
    fn resolves_relative_reference() {
        let url = normalize_reference("../pluginfile.php/1/a.pdf", &base()).unwrap();
        assert_eq!(url.as_str(), "https://e-ucenje.ff.uni-lj.si/pluginfile.php/1/a.pdf");
    }

    #[test]
    fn keeps_absolute_reference() {
        let url = normalize_reference("https://visff.uni-lj.si/x/y.docx", &base()).unwrap();
        assert_eq!(url.host_str(), Some("visff.uni-lj.si"));
    }

    #[test]
    fn malformed_reference_fails_closed() {
        assert!(normalize_reference("http://[::1", &base()).is_none());
        assert!(normalize_reference("   ", &base()).is_none());
        assert!(normalize_reference("javascript:void(0)", &base()).is_none());
        assert!(normalize_reference("mailto:prof@uni-lj.si", &base()).is_none());
    }

    #[test]
    fn candidate_keeps_raw_reference() {
        let candidate = LinkCandidate::new("notes.pdf", &base());
        assert_eq!(candidate.raw_reference, "notes.pdf");
        assert!(candidate.resolved_url.is_some());
    }

    #[test]
    fn display_name_is_decoded_last_segment() {
        let url = Url::parse("https://x.si/files/Predavanje%201.pptx?forcedownload=1").unwrap();
        assert_eq!(display_name(&url), "Predavanje 1.pptx");
    }

    #[test]
    fn display_name_falls_back_for_bare_directory() {
        let url = Url::parse("https://x.si/files/").unwrap();
        assert_eq!(display_name(&url), "document");
    }
}
