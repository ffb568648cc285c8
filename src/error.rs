//! Error types for the extraction engine.
//!
//! Absence is never an error here: a selector that matches nothing or an
//! attribute that does not exist simply leaves the field at its default.
//! Everything else aborts the current field or call and bubbles unchanged
//! to the entry point.

use thiserror::Error;

use crate::value::RawValue;

/// Errors returned by user hooks.
///
/// Hooks are free to fail with any error type; the engine boxes it and
/// propagates it verbatim as [`Error::Hook`].
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Extraction errors
#[derive(Debug, Error)]
pub enum Error {
    /// A field tag did not match the `selector;mode` grammar.
    #[error("malformed tag `{tag}`: {reason}")]
    Tag { tag: String, reason: &'static str },

    /// A selector failed to parse when it was evaluated against the document.
    #[error("invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },

    /// An `obj` mode tag was declared on a field that is not struct-valued.
    #[error("field `{field}`: `obj` mode requires a struct-valued field")]
    Mode { field: String },

    /// A collected raw value could not be coerced into the field's type.
    #[error("cannot decode field `{field}`: {reason}")]
    Decode { field: String, reason: String },

    /// One or more items of a collection field failed to extract.
    ///
    /// Extraction continues past failing items; the error reports the total
    /// failure count and the first failure's position and cause. The items
    /// that did extract are carried in `recovered` for callers that want the
    /// partial sequence.
    #[error("{count} item(s) failed while filling `{field}`, first failure (item {first_index}): {first_cause}")]
    Collection {
        field: String,
        count: usize,
        first_index: usize,
        first_cause: Box<Error>,
        recovered: Vec<RawValue>,
    },

    /// A field-inclusion or post-extraction hook failed.
    #[error(transparent)]
    Hook(#[from] HookError),

    /// Reading the document from an `io::Read` source failed.
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),

    /// A panic inside the traversal, caught at the entry point.
    #[error("extraction fault: {0}")]
    Fault(String),
}

impl Error {
    pub(crate) fn tag(tag: &str, reason: &'static str) -> Self {
        Error::Tag {
            tag: tag.to_string(),
            reason,
        }
    }

    pub(crate) fn decode(field: &str, reason: impl Into<String>) -> Self {
        Error::Decode {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats() {
        let err = Error::tag("p", "expected `selector;mode`");
        assert_eq!(err.to_string(), "malformed tag `p`: expected `selector;mode`");

        let err = Error::decode("rating", "`x` is not a valid f64");
        assert_eq!(
            err.to_string(),
            "cannot decode field `rating`: `x` is not a valid f64"
        );
    }

    #[test]
    fn test_hook_error_is_transparent() {
        let cause: HookError = "custom hook failure".into();
        let err = Error::from(cause);
        assert_eq!(err.to_string(), "custom hook failure");
    }
}
