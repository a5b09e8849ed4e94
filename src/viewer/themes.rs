//! In-page theme switcher.
//!
//! Themed viewers render a `<select class="theme-switcher">` and a
//! `<style id="theme-style">` block. Picking a theme rewrites that block
//! live and persists the choice in the page's `localStorage` under the
//! kind's fixed key.
//!
//! A later page starts from the stored choice. The choice is saved together
//! with the store default the page was built with (`<key>.default`); once
//! `coursepeek theme set` changes that default, the newer default wins until
//! the user picks again in a viewer.

use std::collections::BTreeMap;

use super::document::{escape_attr, escape_text, js_literal};
use crate::theme::Theme;

/// Id of the style block the switcher rewrites.
pub const THEME_STYLE_ID: &str = "theme-style";

/// Switcher chrome; stays fixed and readable under every theme.
const SWITCHER_CSS: &str = "
.theme-switcher {
    position: fixed;
    top: 10px;
    right: 20px;
    z-index: 9999;
    font-size: 14px;
    padding: 4px 6px;
    border-radius: 4px;
    border: 1px solid #ccc;
    background: white;
    color: black;
    cursor: pointer;
}
";

/// Base rules plus per-theme color overrides for one viewer kind.
#[derive(Debug, Clone, Copy)]
pub struct ThemeSheet {
    pub base: &'static str,
    pub light: &'static str,
    pub dark: &'static str,
    pub sepia: &'static str,
}

impl ThemeSheet {
    fn overrides(&self, theme: Theme) -> &'static str {
        match theme {
            Theme::Light => self.light,
            Theme::Dark => self.dark,
            Theme::Sepia => self.sepia,
        }
    }

    fn base_css(&self) -> String {
        format!("{SWITCHER_CSS}{}", self.base)
    }

    /// Full stylesheet for `theme`.
    pub fn css(&self, theme: Theme) -> String {
        format!("{}\n{}", self.base_css(), self.overrides(theme))
    }

    /// `<select>` with `theme` preselected.
    pub fn switcher_markup(theme: Theme) -> String {
        let mut html =
            String::from("<select class=\"theme-switcher\" aria-label=\"Select theme\">\n");
        for option in Theme::ALL {
            let selected = if option == theme { " selected" } else { "" };
            html.push_str(&format!(
                "    <option value=\"{}\"{selected}>{}</option>\n",
                escape_attr(option.as_str()),
                escape_text(option.label())
            ));
        }
        html.push_str("</select>");
        html
    }

    /// Script wiring the switcher to the style block and `localStorage`.
    ///
    /// `theme` is the store default. A choice saved by an earlier page wins
    /// over it while that page was built with the same default.
    pub fn switcher_script(&self, storage_key: &str, theme: Theme) -> String {
        let themes: BTreeMap<&str, &str> = Theme::ALL
            .iter()
            .map(|t| (t.as_str(), self.overrides(*t)))
            .collect();

        format!(
            r"(function () {{
    const BASE_CSS = {base};
    const THEMES = {themes};
    const STORAGE_KEY = {key};
    const DEFAULT_KEY = {default_key};
    const INITIAL = {initial};
    const styleTag = document.getElementById({style_id});
    const switcher = document.querySelector('.theme-switcher');

    function applyTheme(theme) {{
        styleTag.textContent = BASE_CSS + '\n' + (THEMES[theme] || THEMES.light);
    }}

    function storedTheme() {{
        try {{
            const saved = localStorage.getItem(STORAGE_KEY);
            const savedUnder = localStorage.getItem(DEFAULT_KEY);
            if (saved !== null && Object.prototype.hasOwnProperty.call(THEMES, saved)
                && savedUnder === INITIAL) {{
                return saved;
            }}
        }} catch (err) {{
            console.warn('Stored theme unavailable:', err);
        }}
        return INITIAL;
    }}

    switcher.value = storedTheme();
    applyTheme(switcher.value);

    switcher.addEventListener('change', e => {{
        const selected = e.target.value;
        applyTheme(selected);
        try {{
            localStorage.setItem(STORAGE_KEY, selected);
            localStorage.setItem(DEFAULT_KEY, INITIAL);
        }} catch (err) {{
            console.warn('Theme not persisted:', err);
        }}
    }});
}})();",
            base = js_literal(&self.base_css()),
            themes = js_literal(&themes),
            key = js_literal(storage_key),
            default_key = js_literal(&format!("{storage_key}.default")),
            style_id = js_literal(THEME_STYLE_ID),
            initial = js_literal(theme.as_str()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: ThemeSheet = ThemeSheet {
        base: "body { margin: 0; }",
        light: "body { background: #fff; }",
        dark: "body { background: #121212; }",
        sepia: "body { background: #f4ecd8; }",
    };

    #[test]
    fn css_combines_switcher_base_and_theme() {
        let css = SHEET.css(Theme::Dark);
        assert!(css.contains(".theme-switcher"));
        assert!(css.contains("margin: 0"));
        assert!(css.contains("#121212"));
        assert!(!css.contains("#f4ecd8"));
    }

    #[test]
    fn switcher_preselects_theme() {
        let html = ThemeSheet::switcher_markup(Theme::Sepia);
        assert!(html.contains("<option value=\"sepia\" selected>Sepia</option>"));
        assert!(html.contains("<option value=\"light\">Light</option>"));
        assert_eq!(html.matches(" selected").count(), 1);
    }

    #[test]
    fn script_persists_under_given_key() {
        let js = SHEET.switcher_script("docxPreviewTheme", Theme::Dark);
        assert!(js.contains("const STORAGE_KEY = \"docxPreviewTheme\";"));
        assert!(js.contains("const DEFAULT_KEY = \"docxPreviewTheme.default\";"));
        assert!(js.contains("localStorage.setItem(STORAGE_KEY, selected)"));
        assert!(js.contains("localStorage.setItem(DEFAULT_KEY, INITIAL)"));
        assert!(js.contains("\"sepia\":\"body { background: #f4ecd8; }\""));
    }

    #[test]
    fn script_starts_from_stored_choice() {
        let js = SHEET.switcher_script("xlsxPreviewTheme", Theme::Sepia);
        assert!(js.contains("localStorage.getItem(STORAGE_KEY)"));
        assert!(js.contains("localStorage.getItem(DEFAULT_KEY)"));
        assert!(js.contains("const INITIAL = \"sepia\";"));
        assert!(js.contains("switcher.value = storedTheme();"));

        // Reading happens before the first style is applied.
        let read = js.find("switcher.value = storedTheme()").unwrap();
        let apply = js.find("applyTheme(switcher.value)").unwrap();
        assert!(read < apply);
    }
}
