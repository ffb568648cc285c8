//! Fill Rust structs from HTML using per-field CSS selector rules.
//!
//! Each field of a destination struct declares a `selector;mode` tag; the
//! engine resolves the selectors against a parsed document, collects raw
//! values, and weak-decodes them into the struct's native types:
//! - scalar fields take the first match (`text`, `html`, `attr=<name>`)
//! - `Vec` fields take one item per match, in document order
//! - struct fields recurse with the nested type's own schema (`obj`)
//!
//! A selector that matches nothing is not an error; the field keeps its
//! default. Types may additionally implement two optional hooks: a per-field
//! inclusion predicate and a post-extraction finalizer.
//!
//! ```
//! use tagscrape::{extract_html, Context};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Link {
//!     label: String,
//!     href: String,
//! }
//!
//! #[derive(Debug, Default)]
//! struct Page {
//!     heading: String,
//!     links: Vec<Link>,
//! }
//!
//! tagscrape::schema!(Link {
//!     label: value String = ";text",
//!     href: value String = ";attr=href",
//! });
//!
//! tagscrape::schema!(Page {
//!     heading: value String = "h1;text",
//!     links: nested_list Link = "a;obj",
//! });
//!
//! let html = r#"<h1>Start</h1><a href="/a">first</a><a href="/b">second</a>"#;
//! let mut page = Page::default();
//! extract_html(html, &mut page, &Context::empty()).unwrap();
//! assert_eq!(page.heading, "Start");
//! assert_eq!(page.links[1], Link { label: "second".into(), href: "/b".into() });
//! ```

pub mod engine;
pub mod error;
mod macros;
pub mod query;
pub mod rule;
pub mod schema;
pub mod value;

pub use engine::*;
pub use error::*;
pub use query::*;
pub use rule::*;
pub use schema::*;
pub use value::*;
