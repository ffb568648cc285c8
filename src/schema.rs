//! Per-type extraction schemas.
//!
//! Instead of iterating struct metadata at runtime, each scrapeable type
//! exposes a static list of [`FieldDescriptor`]s, built at compile time by
//! the [`schema!`](macro@crate::schema) macro, together with a generated
//! decode body that writes collected values back into the struct.

use std::any::Any;

use scraper::ElementRef;

use crate::error::{Error, HookError};
use crate::value::CollectedValues;

/// Monomorphized recursive walk over a freshly allocated nested value.
///
/// Stored in descriptors of struct-valued fields; the walker calls through
/// it without knowing the nested type.
pub type WalkFn = fn(ElementRef<'_>, &Context<'_>) -> Result<CollectedValues, Error>;

/// How a field's contents are extracted.
#[derive(Debug, Clone, Copy)]
pub enum Shape {
    /// A single string-decodable value.
    Value,
    /// A single nested struct.
    Nested(WalkFn),
    /// A collection, one item per selector match.
    List(ItemShape),
}

/// Shape of one collection item.
#[derive(Debug, Clone, Copy)]
pub enum ItemShape {
    Value,
    Nested(WalkFn),
}

/// One field of an extraction schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    /// Field name; also the key in the collected map.
    pub name: &'static str,
    /// Unparsed `selector;mode` tag.
    pub tag: &'static str,
    pub shape: Shape,
}

/// Opaque caller arguments threaded through one extraction call.
///
/// The engine never looks inside; hooks downcast the entries they expect.
#[derive(Debug, Clone, Copy, Default)]
pub struct Context<'a> {
    args: &'a [&'a dyn Any],
}

impl<'a> Context<'a> {
    pub fn new(args: &'a [&'a dyn Any]) -> Self {
        Context { args }
    }

    /// A context with no arguments.
    pub fn empty() -> Context<'static> {
        Context { args: &[] }
    }

    /// Downcast the argument at `index`, if present and of type `T`.
    pub fn get<T: 'static>(&self, index: usize) -> Option<&T> {
        self.args.get(index)?.downcast_ref()
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

/// A type that can be filled from an HTML document.
///
/// Implementations are normally generated with the [`schema!`](macro@crate::schema)
/// macro. The two hook methods are optional capabilities: the defaults
/// include every field and finalize to nothing, so a type that does not
/// override them behaves as if the capability were absent.
pub trait Scrape: Default {
    /// The type's field descriptors, in declaration order.
    fn fields() -> &'static [FieldDescriptor];

    /// Write collected raw values into `self`, coercing types weakly.
    ///
    /// Fields with no collected entry are left untouched.
    fn populate(&mut self, values: &CollectedValues, ctx: &Context<'_>) -> Result<(), Error>;

    /// Decide whether a field should be extracted at all.
    ///
    /// Consulted before each field; `Ok(false)` skips the field silently,
    /// an error aborts the whole walk.
    fn include_field(&self, _field: &str, _ctx: &Context<'_>) -> Result<bool, HookError> {
        Ok(true)
    }

    /// Post-extraction finalizer.
    ///
    /// Runs exactly once, only after all fields were walked and decoded
    /// successfully. By the time its error is observed the destination has
    /// already been written.
    fn post_extract(&mut self, _ctx: &Context<'_>) -> Result<(), HookError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_downcasts_by_position() {
        let ctx = Context::new(&[&"foo", &2i32]);
        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx.get::<&str>(0), Some(&"foo"));
        assert_eq!(ctx.get::<i32>(1), Some(&2));
        assert_eq!(ctx.get::<i32>(0), None);
        assert_eq!(ctx.get::<i32>(5), None);
    }

    #[test]
    fn test_empty_context() {
        let ctx = Context::empty();
        assert!(ctx.is_empty());
        assert_eq!(ctx.get::<i32>(0), None);
    }
}
