//! Classification of page regions that never belong to a document body.

use scraper::node::Element;

const BOILERPLATE_TAGS: &[&str] = &[
    "nav", "header", "footer", "aside", "script", "style", "noscript", "iframe", "template",
    "head", "link", "meta", "svg", "canvas", "object", "embed", "dialog", "menu", "button",
    "input", "select", "option", "textarea", "label",
];

const BOILERPLATE_ROLES: &[&str] = &[
    "navigation",
    "banner",
    "contentinfo",
    "complementary",
    "search",
    "menu",
    "menubar",
    "toolbar",
    "dialog",
    "alertdialog",
];

/// Tokens of `class`/`id` values, split on whitespace, `-` and `_`.
const BOILERPLATE_MARKERS: &[&str] = &[
    "nav",
    "navbar",
    "navigation",
    "menu",
    "breadcrumb",
    "breadcrumbs",
    "header",
    "footer",
    "sidebar",
    "ad",
    "ads",
    "advert",
    "advertisement",
    "adsense",
    "banner",
    "cookie",
    "cookies",
    "consent",
    "social",
    "share",
    "sharing",
    "popup",
    "modal",
    "promo",
    "sponsored",
    "newsletter",
    "search",
    "skip",
];

/// Page titles that name a placeholder page rather than a document.
const PLACEHOLDER_TITLES: &[&str] = &[
    "just a moment...",
    "attention required!",
    "access denied",
    "403 forbidden",
    "404 not found",
    "page not found",
    "please wait",
    "loading...",
    "untitled",
];

/// True when the element and its whole subtree must be discarded.
pub fn is_boilerplate(element: &Element) -> bool {
    let tag = element.name();
    // The document scaffolding is always kept, whatever its classes say.
    if tag.eq_ignore_ascii_case("html") || tag.eq_ignore_ascii_case("body") {
        return false;
    }
    if BOILERPLATE_TAGS
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(tag))
    {
        return true;
    }
    if let Some(role) = element.attr("role") {
        let role = role.trim();
        if BOILERPLATE_ROLES
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(role))
        {
            return true;
        }
    }
    if is_hidden(element) {
        return true;
    }
    element.classes().any(has_marker) || element.id().is_some_and(has_marker)
}

fn is_hidden(element: &Element) -> bool {
    if element.attr("hidden").is_some() {
        return true;
    }
    if element
        .attr("aria-hidden")
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
    {
        return true;
    }
    element.attr("style").is_some_and(|style| {
        let compact: String = style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        compact.contains("display:none") || compact.contains("visibility:hidden")
    })
}

fn has_marker(value: &str) -> bool {
    value
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|token| !token.is_empty())
        .any(|token| {
            BOILERPLATE_MARKERS
                .iter()
                .any(|marker| marker.eq_ignore_ascii_case(token))
        })
}

/// True when a `<title>` names a challenge, error or placeholder page.
pub fn is_placeholder_title(title: &str) -> bool {
    let title = title.trim();
    title.is_empty()
        || PLACEHOLDER_TITLES
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first(html: &str, selector: &str) -> bool {
        let doc = Html::parse_document(html);
        let sel = Selector::parse(selector).unwrap();
        let element = doc.select(&sel).next().unwrap();
        is_boilerplate(element.value())
    }

    #[test]
    fn structural_tags_are_boilerplate() {
        assert!(first("<nav>Menu</nav>", "nav"));
        assert!(first("<footer>(c)</footer>", "footer"));
        assert!(first("<p>x<script>var a;</script></p>", "script"));
        assert!(!first("<article>text</article>", "article"));
    }

    #[test]
    fn class_and_id_tokens_are_matched_whole() {
        assert!(first(r#"<div class="site-footer">x</div>"#, "div"));
        assert!(first(r#"<div id="ad_slot_3">x</div>"#, "div"));
        assert!(!first(r#"<div class="shadow loaded">x</div>"#, "div"));
        assert!(!first(r#"<div class="headline">x</div>"#, "div"));
    }

    #[test]
    fn roles_and_hidden_elements_are_boilerplate() {
        assert!(first(r#"<div role="navigation">x</div>"#, "div"));
        assert!(first(r#"<div aria-hidden="true">x</div>"#, "div"));
        assert!(first(r#"<div style="display: none">x</div>"#, "div"));
        assert!(first(r#"<p hidden>x</p>"#, "p"));
        assert!(!first(r#"<div role="main">x</div>"#, "div"));
    }

    #[test]
    fn body_is_never_boilerplate() {
        assert!(!first(r#"<body class="page-header">x</body>"#, "body"));
    }

    #[test]
    fn placeholder_titles_are_recognized() {
        assert!(is_placeholder_title("Just a moment..."));
        assert!(is_placeholder_title("  "));
        assert!(!is_placeholder_title("Decision 12/2024 on tenancy law"));
    }
}
