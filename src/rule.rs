//! Per-field rule tags.
//!
//! A tag is the wire format of a schema: `selector;mode`, where the selector
//! is any CSS selector (empty means "the current node") and the mode picks
//! what to pull out of the matched element. Selector syntax is deliberately
//! not validated here; a bad selector only surfaces when it is evaluated.

use crate::error::Error;

/// What to extract from a matched element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Concatenated descendant text.
    Text,
    /// Inner serialized markup.
    Html,
    /// The value of the named attribute.
    Attr(String),
    /// Recurse into the element with the nested type's own schema.
    Nested,
}

impl Mode {
    /// Mode keyword as written in a tag, for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Text => "text",
            Mode::Html => "html",
            Mode::Attr(_) => "attr",
            Mode::Nested => "obj",
        }
    }
}

/// A parsed selection rule for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// CSS selector; empty selects the current node itself.
    pub selector: String,
    pub mode: Mode,
}

impl Rule {
    /// Parse a `selector;mode` tag.
    ///
    /// Exactly two `;`-separated segments are required. The mode segment is
    /// one of `text`, `html`, `obj`, or `attr=<name>` (split on the first
    /// `=`; everything after it is the attribute name).
    pub fn parse(tag: &str) -> Result<Rule, Error> {
        let trimmed = tag.trim();
        let mut segments = trimmed.split(';');
        let (selector, mode) = match (segments.next(), segments.next(), segments.next()) {
            (Some(selector), Some(mode), None) => (selector, mode),
            _ => return Err(Error::tag(tag, "expected `selector;mode`")),
        };

        let mode = match mode {
            "text" => Mode::Text,
            "html" => Mode::Html,
            "obj" => Mode::Nested,
            other => {
                if let Some(rest) = other.strip_prefix("attr") {
                    match rest.strip_prefix('=') {
                        Some(name) => Mode::Attr(name.to_string()),
                        None => return Err(Error::tag(tag, "attr mode needs `attr=<name>`")),
                    }
                } else {
                    return Err(Error::tag(tag, "unknown mode, expected attr/text/html/obj"));
                }
            }
        };

        Ok(Rule {
            selector: selector.to_string(),
            mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(tag: &str) -> Rule {
        Rule::parse(tag).unwrap()
    }

    #[test]
    fn test_parse_modes() {
        assert_eq!(
            parse("h1>.foo;text"),
            Rule {
                selector: "h1>.foo".into(),
                mode: Mode::Text
            }
        );
        assert_eq!(parse("p;html").mode, Mode::Html);
        assert_eq!(parse("div;obj").mode, Mode::Nested);
        assert_eq!(parse("img;attr=src").mode, Mode::Attr("src".into()));
    }

    #[test]
    fn test_empty_selector_means_current_node() {
        let rule = parse(";text");
        assert_eq!(rule.selector, "");
        assert_eq!(rule.mode, Mode::Text);
    }

    #[test]
    fn test_attr_name_keeps_everything_after_first_equals() {
        assert_eq!(
            parse("meta;attr=data-a=b").mode,
            Mode::Attr("data-a=b".into())
        );
    }

    #[test]
    fn test_malformed_tags() {
        assert!(matches!(Rule::parse("p"), Err(Error::Tag { .. })));
        assert!(matches!(Rule::parse("p;text;extra"), Err(Error::Tag { .. })));
        assert!(matches!(Rule::parse("img;attr"), Err(Error::Tag { .. })));
        assert!(matches!(Rule::parse("p;bogus"), Err(Error::Tag { .. })));
    }

    #[test]
    fn test_selector_syntax_not_validated_at_parse_time() {
        // Garbage selectors pass; they fail later, at evaluation.
        assert!(Rule::parse("[[;text").is_ok());
    }
}
