//! The extraction engine: field walker, collection materializer, and the
//! public entry points.
//!
//! One call performs a depth-first, document-order traversal: walk the
//! destination's descriptors, resolve each tag, narrow the document, collect
//! raw values, then decode them into the destination and run its finalizer.
//! The engine keeps no state between calls; concurrent calls against
//! independent destinations need no synchronization.

use std::any::Any;
use std::io::Read;
use std::panic::{self, AssertUnwindSafe};

use scraper::{ElementRef, Html};

use crate::error::Error;
use crate::query::{extract_raw, select};
use crate::rule::{Mode, Rule};
use crate::schema::{Context, FieldDescriptor, ItemShape, Scrape, Shape};
use crate::value::{CollectedValues, RawValue};

/// Extract into an existing destination value, in place.
///
/// Runs the full pipeline: walk, weak decode, then the destination's
/// post-extraction hook. On failure the destination may already be partially
/// populated; that is a documented caller risk, not hidden behaviour.
pub fn extract<T: Scrape>(node: ElementRef<'_>, dest: &mut T, ctx: &Context<'_>) -> Result<(), Error> {
    guard(|| {
        let collected = walk(dest, node, ctx)?;
        dest.populate(&collected, ctx)?;
        dest.post_extract(ctx)?;
        Ok(())
    })
}

/// Extract into a raw map instead of a concrete value.
///
/// Runs the walker only; `template` supplies the schema and the inclusion
/// hook, and is not modified. Useful when the intermediate representation is
/// wanted as-is, for example to aggregate several documents before typing.
pub fn extract_map<T: Scrape>(
    node: ElementRef<'_>,
    template: &T,
    ctx: &Context<'_>,
) -> Result<CollectedValues, Error> {
    guard(|| walk(template, node, ctx))
}

/// Parse an HTML document string and extract into `dest`.
pub fn extract_html<T: Scrape>(html: &str, dest: &mut T, ctx: &Context<'_>) -> Result<(), Error> {
    let doc = Html::parse_document(html);
    extract(doc.root_element(), dest, ctx)
}

/// Parse an HTML document string and extract into a raw map.
pub fn extract_html_map<T: Scrape>(
    html: &str,
    template: &T,
    ctx: &Context<'_>,
) -> Result<CollectedValues, Error> {
    let doc = Html::parse_document(html);
    extract_map(doc.root_element(), template, ctx)
}

/// Read an HTML document from `reader` and extract into `dest`.
pub fn extract_reader<T: Scrape>(
    mut reader: impl Read,
    dest: &mut T,
    ctx: &Context<'_>,
) -> Result<(), Error> {
    let mut html = String::new();
    reader.read_to_string(&mut html)?;
    extract_html(&html, dest, ctx)
}

/// Walk a freshly allocated value of `T`, returning the collected raw map.
///
/// This is the recursion target stored in struct-valued field descriptors.
pub fn collect_new<T: Scrape>(
    node: ElementRef<'_>,
    ctx: &Context<'_>,
) -> Result<CollectedValues, Error> {
    let probe = T::default();
    walk(&probe, node, ctx)
}

/// Enumerate the destination's fields and collect a raw value for each.
///
/// Per field: the inclusion hook may skip it or abort the walk, the tag is
/// parsed (a malformed schema is a programming error and aborts), and the
/// shape decides between single extraction, nested recursion, and the
/// collection materializer. Absent results produce no entry.
fn walk<T: Scrape>(dest: &T, node: ElementRef<'_>, ctx: &Context<'_>) -> Result<CollectedValues, Error> {
    let mut collected = CollectedValues::new();
    for field in T::fields() {
        if !dest.include_field(field.name, ctx).map_err(Error::Hook)? {
            continue;
        }
        let rule = Rule::parse(field.tag)?;
        match field.shape {
            Shape::Value => {
                if rule.mode == Mode::Nested {
                    return Err(Error::Mode {
                        field: field.name.to_string(),
                    });
                }
                let matches = select(node, &rule.selector)?;
                let Some(element) = matches.first().copied() else {
                    continue;
                };
                let Some(raw) = extract_raw(&rule, element) else {
                    continue;
                };
                // An empty result would only overwrite the default with an
                // empty placeholder (or break numeric decoding); drop it.
                if raw.is_empty() {
                    continue;
                }
                collected.insert(field.name, RawValue::Text(raw));
            }
            Shape::Nested(walk_fn) => {
                let matches = select(node, &rule.selector)?;
                let Some(element) = matches.first().copied() else {
                    continue;
                };
                collected.insert(field.name, RawValue::Map(walk_fn(element, ctx)?));
            }
            Shape::List(item) => {
                let items = materialize(field, &rule, item, node, ctx)?;
                collected.insert(field.name, RawValue::Seq(items));
            }
        }
    }
    Ok(collected)
}

/// Materialize a collection field, one item per selector match, in document
/// order.
///
/// Failing items do not stop the loop; if any failed, the whole field fails
/// with an aggregate error carrying the count, the first failure, and the
/// items that did succeed.
fn materialize(
    field: &FieldDescriptor,
    rule: &Rule,
    item: ItemShape,
    node: ElementRef<'_>,
    ctx: &Context<'_>,
) -> Result<Vec<RawValue>, Error> {
    if matches!(item, ItemShape::Value) && rule.mode == Mode::Nested {
        return Err(Error::Mode {
            field: field.name.to_string(),
        });
    }
    let matches = select(node, &rule.selector)?;
    let mut items = Vec::with_capacity(matches.len());
    let mut failures: Vec<(usize, Error)> = Vec::new();
    for (index, element) in matches.into_iter().enumerate() {
        match item {
            ItemShape::Value => {
                let Some(raw) = extract_raw(rule, element) else {
                    continue;
                };
                // Empty extractions are not meaningful list entries.
                if raw.is_empty() {
                    continue;
                }
                items.push(RawValue::Text(raw));
            }
            ItemShape::Nested(walk_fn) => match walk_fn(element, ctx) {
                Ok(values) => items.push(RawValue::Map(values)),
                Err(err) => failures.push((index, err)),
            },
        }
    }
    if !failures.is_empty() {
        let count = failures.len();
        let (first_index, first_cause) = failures.swap_remove(0);
        return Err(Error::Collection {
            field: field.name.to_string(),
            count,
            first_index,
            first_cause: Box::new(first_cause),
            recovered: items,
        });
    }
    Ok(items)
}

/// Single recovery boundary: a panic inside the traversal becomes a reported
/// error instead of an abort.
fn guard<R>(f: impl FnOnce() -> Result<R, Error>) -> Result<R, Error> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(Error::Fault(fault_message(payload.as_ref()))),
    }
}

fn fault_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic of unknown type".to_string()
    }
}
