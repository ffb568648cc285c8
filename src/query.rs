//! Selector evaluation and raw value extraction.
//!
//! Thin adapters over the `scraper` crate. Matching nothing is not an error
//! anywhere in this module: an empty match set and a missing attribute both
//! mean "no value", which downstream turns into the field's default.

use scraper::{ElementRef, Selector};

use crate::error::Error;
use crate::rule::{Mode, Rule};

/// Resolve a selector against a node.
///
/// An empty selector selects the node itself; otherwise all descendant
/// matches are returned in document order. Invalid selector syntax is
/// reported here rather than at tag parse time.
pub fn select<'a>(node: ElementRef<'a>, selector: &str) -> Result<Vec<ElementRef<'a>>, Error> {
    if selector.is_empty() {
        return Ok(vec![node]);
    }
    let parsed = Selector::parse(selector).map_err(|e| Error::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })?;
    Ok(node.select(&parsed).collect())
}

/// Pull the raw string value a terminal rule asks for out of one element.
///
/// Returns `None` when the value is absent (missing attribute), which the
/// walker treats as "leave the field at its default". `Mode::Nested` never
/// reaches this function; it is routed to the recursive walk instead.
pub fn extract_raw(rule: &Rule, element: ElementRef<'_>) -> Option<String> {
    match &rule.mode {
        Mode::Text => Some(element.text().collect()),
        Mode::Html => Some(element.inner_html()),
        Mode::Attr(name) => element.value().attr(name).map(str::to_owned),
        Mode::Nested => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn with_doc<R>(html: &str, f: impl FnOnce(ElementRef<'_>) -> R) -> R {
        let doc = Html::parse_document(html);
        f(doc.root_element())
    }

    #[test]
    fn test_empty_selector_returns_node_itself() {
        with_doc("<p>hi</p>", |root| {
            let matches = select(root, "").unwrap();
            assert_eq!(matches.len(), 1);
            assert_eq!(matches[0].value().name(), "html");
        });
    }

    #[test]
    fn test_matches_in_document_order() {
        let html = "<div><p>a</p><span><p>b</p></span><p>c</p></div>";
        with_doc(html, |root| {
            let texts: Vec<String> = select(root, "p")
                .unwrap()
                .into_iter()
                .map(|el| el.text().collect())
                .collect();
            assert_eq!(texts, ["a", "b", "c"]);
        });
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        with_doc("<p>hi</p>", |root| {
            assert!(select(root, "img").unwrap().is_empty());
        });
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        with_doc("<p>hi</p>", |root| {
            assert!(matches!(select(root, "[["), Err(Error::Selector { .. })));
        });
    }

    #[test]
    fn test_extract_text_concatenates_descendants() {
        with_doc("<p>one <b>two</b> three</p>", |root| {
            let el = select(root, "p").unwrap()[0];
            let rule = Rule::parse(";text").unwrap();
            assert_eq!(extract_raw(&rule, el).unwrap(), "one two three");
        });
    }

    #[test]
    fn test_extract_html_is_inner_markup() {
        with_doc("<div><b>x</b></div>", |root| {
            let el = select(root, "div").unwrap()[0];
            let rule = Rule::parse(";html").unwrap();
            assert_eq!(extract_raw(&rule, el).unwrap(), "<b>x</b>");
        });
    }

    #[test]
    fn test_missing_attr_is_absent_but_empty_attr_is_empty_string() {
        with_doc(r#"<img src="">"#, |root| {
            let el = select(root, "img").unwrap()[0];
            let src = Rule::parse(";attr=src").unwrap();
            let alt = Rule::parse(";attr=alt").unwrap();
            assert_eq!(extract_raw(&src, el), Some(String::new()));
            assert_eq!(extract_raw(&alt, el), None);
        });
    }
}
