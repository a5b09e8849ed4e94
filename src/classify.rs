//! Extension/type classification.
//!
//! A URL either reveals its kind through its path suffix, or matches one of
//! the active profile's indirection shapes and has to be probed first. An
//! indirection match wins over a concrete-looking suffix.

use url::Url;

use crate::kind::DocumentKind;
use crate::portal::PortalProfile;

/// Result of classifying one URL under a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Kind known from the suffix.
    Direct(DocumentKind),
    /// Real target hidden behind a redirect; carries the matched rule name.
    Indirect(String),
}

/// Classify `url` under `profile`.
pub fn classify(url: &Url, profile: &PortalProfile) -> Classification {
    if let Some(rule) = profile.indirection_rule(url) {
        return Classification::Indirect(rule.name.clone());
    }
    Classification::Direct(classify_suffix(url))
}

/// Suffix-only classification, used for redirect targets.
pub fn classify_suffix(url: &Url) -> DocumentKind {
    DocumentKind::from_path(url.path())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn concrete_suffix_is_classified_immediately() {
        let profile = PortalProfile::vis();
        assert_eq!(
            classify(&url("https://visff.uni-lj.si/f/a.xlsx?x=1"), &profile),
            Classification::Direct(DocumentKind::Xlsx)
        );
    }

    #[test]
    fn query_does_not_leak_into_suffix() {
        assert_eq!(
            classify_suffix(&url("https://x.si/download?file=a.pdf")),
            DocumentKind::Other
        );
    }

    #[test]
    fn indirection_pattern_takes_precedence_over_suffix() {
        let profile = PortalProfile::eucenje();
        let attachment =
            url("https://e-ucenje.ff.uni-lj.si/pluginfile.php/5/mod_forum/attachment/1/x.pdf");
        assert_eq!(
            classify(&attachment, &profile),
            Classification::Indirect("forum-attachment".to_string())
        );
    }

    #[test]
    fn resource_viewer_is_indirect() {
        let profile = PortalProfile::eucenje();
        let link = url("https://e-ucenje.ff.uni-lj.si/mod/resource/view.php?id=9");
        assert!(matches!(classify(&link, &profile), Classification::Indirect(_)));
    }

    #[test]
    fn indirection_shapes_are_profile_specific() {
        let link = url("https://visff.uni-lj.si/mod/resource/view.php?id=9");
        assert_eq!(
            classify(&link, &PortalProfile::vis()),
            Classification::Direct(DocumentKind::Other)
        );
    }
}
