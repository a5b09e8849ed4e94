//! Portal variants.
//!
//! Each supported portal is a [`PortalProfile`]: which hosts it covers,
//! which file suffixes get a preview affordance, and which URL path
//! shapes hide the real file behind a server-side redirect.
//!
//! - [`PortalRegistry`]: picks the profile for a page, first match wins
//! - [`IndirectionRule`]: path shape that must be probed before classifying

use serde::Deserialize;
use url::Url;

use crate::transport::HostScope;

/// Path shape of a link whose real target is only revealed by a redirect.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndirectionRule {
    /// Rule name for logs (e.g., "resource-viewer").
    pub name: String,
    /// Every fragment must occur in the lowercase URL path.
    pub path_contains: Vec<String>,
}

impl IndirectionRule {
    pub fn new(name: &str, fragments: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            path_contains: fragments.iter().map(|f| (*f).to_string()).collect(),
        }
    }

    /// Whether `url`'s path has this rule's shape.
    pub fn matches(&self, url: &Url) -> bool {
        let path = url.path().to_lowercase();
        !self.path_contains.is_empty()
            && self
                .path_contains
                .iter()
                .all(|fragment| path.contains(&fragment.to_lowercase()))
    }
}

/// One portal variant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PortalProfile {
    pub name: String,
    /// Hosts this profile covers and may send requests to. Ignored when
    /// `broad_match` is set.
    #[serde(default)]
    pub hosts: Vec<String>,
    /// Any page, any origin.
    #[serde(default)]
    pub broad_match: bool,
    /// Suffixes (with leading dot) that get a preview affordance.
    pub offered_extensions: Vec<String>,
    #[serde(default)]
    pub indirection: Vec<IndirectionRule>,
}

impl PortalProfile {
    /// Moodle-based e-learning portal. Resource and forum-attachment links
    /// redirect to the real file.
    pub fn eucenje() -> Self {
        Self {
            name: "eucenje".to_string(),
            hosts: vec!["e-ucenje.ff.uni-lj.si".to_string()],
            broad_match: false,
            offered_extensions: extensions(&[".pdf", ".doc", ".docx"]),
            indirection: vec![
                IndirectionRule::new("resource-viewer", &["/mod/resource/view.php"]),
                IndirectionRule::new("forum-attachment", &["/mod_forum/attachment/"]),
            ],
        }
    }

    /// Student information portal. Links carry their real suffix.
    pub fn vis() -> Self {
        Self {
            name: "vis".to_string(),
            hosts: vec!["visff.uni-lj.si".to_string()],
            broad_match: false,
            offered_extensions: extensions(&[".docx", ".pdf", ".xlsx", ".pptx"]),
            indirection: Vec::new(),
        }
    }

    /// Catch-all for any site. Only suffixes with a viewer or a conversion
    /// hint are offered; anything else would end in "not supported".
    pub fn broad() -> Self {
        Self {
            name: "broad".to_string(),
            hosts: Vec::new(),
            broad_match: true,
            offered_extensions: extensions(&[".doc", ".docx", ".ppt", ".pptx", ".xlsx", ".pdf"]),
            indirection: Vec::new(),
        }
    }

    /// Whether requests to `url` are allowed under this profile.
    pub fn permits(&self, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }
        if self.broad_match {
            return true;
        }
        url.host_str().is_some_and(|host| {
            self.hosts.iter().any(|h| {
                let h = h.to_lowercase();
                host == h || host.ends_with(&format!(".{h}"))
            })
        })
    }

    /// Whether this profile applies to pages on `page`.
    pub fn covers_page(&self, page: &Url) -> bool {
        self.permits(page)
    }

    /// First indirection rule matching `url`, if any.
    pub fn indirection_rule(&self, url: &Url) -> Option<&IndirectionRule> {
        self.indirection.iter().find(|rule| rule.matches(url))
    }

    /// Whether `url`'s path ends with one of the offered suffixes.
    pub fn offers_suffix(&self, url: &Url) -> bool {
        let path = url.path().to_lowercase();
        self.offered_extensions
            .iter()
            .any(|ext| path.ends_with(&ext.to_lowercase()))
    }
}

impl HostScope for PortalProfile {
    fn permits(&self, url: &Url) -> bool {
        PortalProfile::permits(self, url)
    }
}

fn extensions(list: &[&str]) -> Vec<String> {
    list.iter().map(|e| (*e).to_string()).collect()
}

/// Routes pages to the portal profile that handles them.
///
/// Profiles are checked in registration order. Broad-match profiles are
/// always checked after host-specific ones.
pub struct PortalRegistry {
    profiles: Vec<PortalProfile>,
}

impl PortalRegistry {
    /// Registry with the built-in profiles.
    #[must_use]
    pub fn new() -> Self {
        Self::with_profiles(Vec::new())
    }

    /// Built-in profiles plus `extra`. Extra profiles take precedence over
    /// built-ins with the same name.
    #[must_use]
    pub fn with_profiles(extra: Vec<PortalProfile>) -> Self {
        let mut profiles = extra;
        for builtin in [PortalProfile::eucenje(), PortalProfile::vis(), PortalProfile::broad()] {
            if !profiles.iter().any(|p| p.name == builtin.name) {
                profiles.push(builtin);
            }
        }
        // Stable: keeps registration order within each group.
        profiles.sort_by_key(|p| p.broad_match);
        Self { profiles }
    }

    /// Profile for a page, or `None` if nothing (not even a broad profile)
    /// covers it.
    pub fn for_page(&self, page: &Url) -> Option<&PortalProfile> {
        let profile = self.profiles.iter().find(|p| p.covers_page(page));
        if let Some(p) = profile {
            tracing::debug!("Matched portal profile: {}", p.name);
        }
        profile
    }

    /// Profile by name.
    pub fn get(&self, name: &str) -> Option<&PortalProfile> {
        self.profiles.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn profiles(&self) -> &[PortalProfile] {
        &self.profiles
    }
}

impl Default for PortalRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn registry_registers_builtin_profiles_broad_last() {
        let registry = PortalRegistry::new();
        let names: Vec<_> = registry.profiles().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["eucenje", "vis", "broad"]);
    }

    #[test]
    fn registry_routes_pages_by_host() {
        let registry = PortalRegistry::new();
        let page = url("https://e-ucenje.ff.uni-lj.si/course/view.php?id=1");
        assert_eq!(registry.for_page(&page).unwrap().name, "eucenje");
        let page = url("https://visff.uni-lj.si/predmeti");
        assert_eq!(registry.for_page(&page).unwrap().name, "vis");
        let page = url("https://example.com/");
        assert_eq!(registry.for_page(&page).unwrap().name, "broad");
    }

    #[test]
    fn extra_profile_overrides_builtin_by_name() {
        let mut custom = PortalProfile::vis();
        custom.offered_extensions = vec![".pdf".to_string()];
        let registry = PortalRegistry::with_profiles(vec![custom]);
        assert_eq!(registry.profiles().len(), 3);
        assert_eq!(registry.get("vis").unwrap().offered_extensions, [".pdf"]);
    }

    #[test]
    fn restricted_profile_only_permits_its_hosts() {
        let profile = PortalProfile::vis();
        assert!(profile.permits(&url("https://visff.uni-lj.si/a.pdf")));
        assert!(!profile.permits(&url("https://evil.example/a.pdf")));
        assert!(!profile.permits(&url("ftp://visff.uni-lj.si/a.pdf")));
    }

    #[test]
    fn broad_profile_permits_any_http_origin() {
        let profile = PortalProfile::broad();
        assert!(profile.permits(&url("https://anything.example/a.pdf")));
        assert!(!profile.permits(&url("file:///tmp/a.pdf")));
    }

    #[test]
    fn indirection_rules_match_path_shapes() {
        let profile = PortalProfile::eucenje();
        let resource = url("https://e-ucenje.ff.uni-lj.si/mod/resource/view.php?id=9");
        assert_eq!(profile.indirection_rule(&resource).unwrap().name, "resource-viewer");
        let attachment =
            url("https://e-ucenje.ff.uni-lj.si/pluginfile.php/77/mod_forum/attachment/3/notes.pdf");
        assert_eq!(profile.indirection_rule(&attachment).unwrap().name, "forum-attachment");
        let plain = url("https://e-ucenje.ff.uni-lj.si/pluginfile.php/77/notes.pdf");
        assert!(profile.indirection_rule(&plain).is_none());
    }

    #[test]
    fn builtin_profiles_offer_no_dead_end_suffixes() {
        use crate::classify::classify_suffix;
        use crate::kind::DocumentKind;

        let registry = PortalRegistry::new();
        for profile in registry.profiles() {
            for ext in &profile.offered_extensions {
                let link = url(&format!("https://host.example/file{ext}"));
                assert_ne!(
                    classify_suffix(&link),
                    DocumentKind::Other,
                    "{} offers {ext}",
                    profile.name
                );
            }
        }
        let broad = PortalProfile::broad();
        for ext in [".xls", ".rtf", ".txt", ".odt", ".ods", ".odp"] {
            assert!(!broad.offers_suffix(&url(&format!("https://host.example/f{ext}"))));
        }
    }

    #[test]
    fn empty_rule_never_matches() {
        let rule = IndirectionRule::new("empty", &[]);
        assert!(!rule.matches(&url("https://x.si/anything")));
    }

    #[test]
    fn profile_deserializes_from_toml() {
        let profile: PortalProfile = toml::from_str(
            r#"
name = "lab"
hosts = ["lab.example.org"]
offered_extensions = [".pdf"]

[[indirection]]
name = "resource-viewer"
path_contains = ["/mod/resource/view.php"]
"#,
        )
        .unwrap();
        assert!(!profile.broad_match);
        assert_eq!(profile.indirection.len(), 1);
    }
}
