//! The `schema!` macro: compile-time registration of extraction schemas.

/// Implement [`Scrape`](crate::Scrape) for a struct from a list of field
/// rules.
///
/// Each line pairs a field with a shape keyword, the field's item type, and
/// its `selector;mode` tag:
///
/// - `value` — a single string-decodable field,
/// - `list` — a `Vec` of string-decodable items,
/// - `nested` — a single nested struct,
/// - `nested_list` — a `Vec` of nested structs.
///
/// Fields without a rule are simply not part of the schema and keep whatever
/// the walk and decode leave in them.
///
/// The optional hook methods (`include_field`, `post_extract`) can be written
/// after the field block; they are spliced into the generated impl:
///
/// ```
/// use tagscrape::{extract_html, Context, HookError};
///
/// #[derive(Debug, Default)]
/// struct Story {
///     paragraphs: Vec<String>,
///     word_count: usize,
/// }
///
/// tagscrape::schema!(Story {
///     paragraphs: list String = "p;text",
/// }
///     fn post_extract(&mut self, _ctx: &Context<'_>) -> Result<(), HookError> {
///         self.word_count = self
///             .paragraphs
///             .iter()
///             .map(|p| p.split_whitespace().count())
///             .sum();
///         Ok(())
///     }
/// );
///
/// let mut story = Story::default();
/// extract_html("<p>one two</p><p>three</p>", &mut story, &Context::empty()).unwrap();
/// assert_eq!(story.word_count, 3);
/// ```
///
/// ```
/// use tagscrape::{extract_html, Context};
///
/// #[derive(Debug, Default)]
/// struct Post {
///     title: String,
///     tags: Vec<String>,
/// }
///
/// tagscrape::schema!(Post {
///     title: value String = "h1;text",
///     tags: list String = ".tag;text",
/// });
///
/// let html = r#"<h1>Hello</h1><a class="tag">rust</a><a class="tag">html</a>"#;
/// let mut post = Post::default();
/// extract_html(html, &mut post, &Context::empty()).unwrap();
/// assert_eq!(post.title, "Hello");
/// assert_eq!(post.tags, ["rust", "html"]);
/// ```
#[macro_export]
macro_rules! schema {
    ($ty:ty {
        $( $field:ident : $shape:ident $item:ty = $tag:literal ),* $(,)?
    } $($hooks:tt)*) => {
        impl $crate::Scrape for $ty {
            fn fields() -> &'static [$crate::FieldDescriptor] {
                const FIELDS: &[$crate::FieldDescriptor] = &[
                    $(
                        $crate::FieldDescriptor {
                            name: ::core::stringify!($field),
                            tag: $tag,
                            shape: $crate::schema!(@shape $shape $item),
                        },
                    )*
                ];
                FIELDS
            }

            fn populate(
                &mut self,
                _values: &$crate::CollectedValues,
                _ctx: &$crate::Context<'_>,
            ) -> ::core::result::Result<(), $crate::Error> {
                $(
                    if let ::core::option::Option::Some(raw) =
                        _values.get(::core::stringify!($field))
                    {
                        self.$field = $crate::schema!(
                            @decode $shape $item, ::core::stringify!($field), raw, _ctx
                        )?;
                    }
                )*
                ::core::result::Result::Ok(())
            }

            $($hooks)*
        }
    };

    (@shape value $item:ty) => {
        $crate::Shape::Value
    };
    (@shape list $item:ty) => {
        $crate::Shape::List($crate::ItemShape::Value)
    };
    (@shape nested $item:ty) => {
        $crate::Shape::Nested($crate::engine::collect_new::<$item>)
    };
    (@shape nested_list $item:ty) => {
        $crate::Shape::List($crate::ItemShape::Nested($crate::engine::collect_new::<$item>))
    };

    (@decode value $item:ty, $name:expr, $raw:expr, $ctx:expr) => {
        <$item as $crate::FromRaw>::from_raw($name, $raw)
    };
    (@decode list $item:ty, $name:expr, $raw:expr, $ctx:expr) => {
        <::std::vec::Vec<$item> as $crate::FromRaw>::from_raw($name, $raw)
    };
    (@decode nested $item:ty, $name:expr, $raw:expr, $ctx:expr) => {
        $crate::decode_nested::<$item>($name, $raw, $ctx)
    };
    (@decode nested_list $item:ty, $name:expr, $raw:expr, $ctx:expr) => {
        $crate::decode_nested_seq::<$item>($name, $raw, $ctx)
    };
}
