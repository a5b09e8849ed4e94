//! Candidate anchors from a page snapshot.

use std::collections::HashSet;

use scraper::{Html, Selector};

/// One `a[href]` found on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    /// Visible link text, whitespace-collapsed.
    pub text: String,
}

/// Every anchor reference in document order, skipping fragments,
/// `javascript:` links and repeats of an earlier `href`.
pub fn extract_candidates(html: &str) -> Vec<Anchor> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut anchors = Vec::new();
    let mut seen = HashSet::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if href.is_empty()
            || href.starts_with('#')
            || href.to_ascii_lowercase().starts_with("javascript:")
            || !seen.insert(href.to_string())
        {
            continue;
        }

        let text = element
            .text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ");

        anchors.push(Anchor {
            href: href.to_string(),
            text,
        });
    }

    anchors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_anchors_in_order() {
        let html = r#"
<ul>
  <li><a href="/pluginfile.php/1/Syllabus.pdf">Syllabus</a></li>
  <li><a href="/mod/resource/view.php?id=9"><span>Seminar</span> <span>notes</span></a></li>
</ul>"#;
        let anchors = extract_candidates(html);
        assert_eq!(anchors.len(), 2);
        assert_eq!(anchors[0].href, "/pluginfile.php/1/Syllabus.pdf");
        assert_eq!(anchors[1].text, "Seminar notes");
    }

    #[test]
    fn skips_fragments_scripts_and_duplicates() {
        let html = r##"
<a href="#top">Top</a>
<a href="JavaScript:void(0)">Menu</a>
<a href="a.docx">A</a>
<a href="a.docx">A again</a>
<a href="">Empty</a>
<a>No href</a>"##;
        let anchors = extract_candidates(html);
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].text, "A");
    }
}
