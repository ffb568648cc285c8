//! Raw collected values and weak decoding.
//!
//! Extraction first gathers everything as strings, sequences, and nested
//! maps mirroring the destination's shape; decoding then coerces that raw
//! representation into the real field types. The decode is "weak": numeric
//! strings become numbers and a handful of boolean spellings are accepted,
//! but a genuinely wrong shape (a map where text is expected) fails loudly,
//! naming the field.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::Error;
use crate::schema::{Context, Scrape};

/// Raw values collected during a walk, keyed by field name.
pub type CollectedValues = HashMap<&'static str, RawValue>;

/// A raw value collected from the document, before decoding.
///
/// Serializes untagged, so a collected map turns into the JSON object a
/// caller of the map-returning entry point would expect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Text(String),
    Seq(Vec<RawValue>),
    Map(CollectedValues),
}

impl RawValue {
    /// Shape name for decode error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            RawValue::Text(_) => "text",
            RawValue::Seq(_) => "sequence",
            RawValue::Map(_) => "map",
        }
    }
}

/// Weak conversion from a raw value into a concrete field type.
///
/// Implemented for strings, the numeric primitives, `bool`, `Option<T>`,
/// and `Vec<T>`. The field name is threaded through so failures can say
/// which field could not be decoded.
pub trait FromRaw: Sized {
    fn from_raw(field: &'static str, raw: &RawValue) -> Result<Self, Error>;
}

impl FromRaw for String {
    fn from_raw(field: &'static str, raw: &RawValue) -> Result<Self, Error> {
        match raw {
            RawValue::Text(s) => Ok(s.clone()),
            other => Err(Error::decode(
                field,
                format!("expected text, found {}", other.kind()),
            )),
        }
    }
}

impl FromRaw for bool {
    fn from_raw(field: &'static str, raw: &RawValue) -> Result<Self, Error> {
        match raw {
            RawValue::Text(s) => match s.trim() {
                "true" | "t" | "1" => Ok(true),
                "false" | "f" | "0" => Ok(false),
                other => Err(Error::decode(field, format!("`{other}` is not a boolean"))),
            },
            other => Err(Error::decode(
                field,
                format!("expected text, found {}", other.kind()),
            )),
        }
    }
}

macro_rules! from_raw_parse {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromRaw for $ty {
                fn from_raw(field: &'static str, raw: &RawValue) -> Result<Self, Error> {
                    match raw {
                        RawValue::Text(s) => s.trim().parse::<$ty>().map_err(|e| {
                            Error::decode(
                                field,
                                format!("`{s}` is not a valid {}: {e}", stringify!($ty)),
                            )
                        }),
                        other => Err(Error::decode(
                            field,
                            format!("expected text, found {}", other.kind()),
                        )),
                    }
                }
            }
        )*
    };
}

from_raw_parse!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, isize, usize, f32, f64);

impl<T: FromRaw> FromRaw for Option<T> {
    fn from_raw(field: &'static str, raw: &RawValue) -> Result<Self, Error> {
        T::from_raw(field, raw).map(Some)
    }
}

impl<T: FromRaw> FromRaw for Vec<T> {
    fn from_raw(field: &'static str, raw: &RawValue) -> Result<Self, Error> {
        match raw {
            RawValue::Seq(items) => items.iter().map(|item| T::from_raw(field, item)).collect(),
            other => Err(Error::decode(
                field,
                format!("expected sequence, found {}", other.kind()),
            )),
        }
    }
}

/// Decode a nested raw map into a fresh value of the nested type.
///
/// Runs the nested type's own decode and then its post-extraction hook, so
/// nested values come out as complete as top-level ones.
pub fn decode_nested<T: Scrape>(
    field: &'static str,
    raw: &RawValue,
    ctx: &Context<'_>,
) -> Result<T, Error> {
    match raw {
        RawValue::Map(values) => {
            let mut value = T::default();
            value.populate(values, ctx)?;
            value.post_extract(ctx)?;
            Ok(value)
        }
        other => Err(Error::decode(
            field,
            format!("expected map, found {}", other.kind()),
        )),
    }
}

/// Decode a sequence of nested raw maps, elementwise and in order.
pub fn decode_nested_seq<T: Scrape>(
    field: &'static str,
    raw: &RawValue,
    ctx: &Context<'_>,
) -> Result<Vec<T>, Error> {
    match raw {
        RawValue::Seq(items) => items
            .iter()
            .map(|item| decode_nested(field, item, ctx))
            .collect(),
        other => Err(Error::decode(
            field,
            format!("expected sequence, found {}", other.kind()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawValue {
        RawValue::Text(s.to_string())
    }

    #[test]
    fn test_string_from_text() {
        assert_eq!(String::from_raw("f", &text("hi")).unwrap(), "hi");
    }

    #[test]
    fn test_numeric_coercion_trims_whitespace() {
        assert_eq!(i64::from_raw("f", &text(" 42 ")).unwrap(), 42);
        assert_eq!(f64::from_raw("f", &text("4.5")).unwrap(), 4.5);
        assert_eq!(u32::from_raw("f", &text("7")).unwrap(), 7);
    }

    #[test]
    fn test_numeric_failure_names_the_field() {
        let err = i64::from_raw("count", &text("lots")).unwrap_err();
        match err {
            Error::Decode { field, .. } => assert_eq!(field, "count"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_weak_bools() {
        assert!(bool::from_raw("f", &text("true")).unwrap());
        assert!(bool::from_raw("f", &text("1")).unwrap());
        assert!(!bool::from_raw("f", &text("f")).unwrap());
        assert!(bool::from_raw("f", &text("yes")).is_err());
    }

    #[test]
    fn test_vec_decodes_elementwise_in_order() {
        let raw = RawValue::Seq(vec![text("1"), text("2"), text("3")]);
        assert_eq!(Vec::<u8>::from_raw("f", &raw).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_option_wraps_present_values() {
        assert_eq!(
            Option::<String>::from_raw("f", &text("x")).unwrap(),
            Some("x".to_string())
        );
    }

    #[test]
    fn test_shape_mismatch_fails_loudly() {
        let map = RawValue::Map(CollectedValues::new());
        assert!(matches!(
            String::from_raw("f", &map),
            Err(Error::Decode { .. })
        ));
        assert!(matches!(
            Vec::<String>::from_raw("f", &text("x")),
            Err(Error::Decode { .. })
        ));
    }

    #[test]
    fn test_serializes_untagged() {
        let mut map = CollectedValues::new();
        map.insert("name", text("abc"));
        map.insert("tags", RawValue::Seq(vec![text("a"), text("b")]));
        let json = serde_json::to_value(&RawValue::Map(map)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "name": "abc", "tags": ["a", "b"] })
        );
    }
}
