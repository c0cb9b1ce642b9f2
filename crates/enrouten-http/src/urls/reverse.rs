//! Reverse URL generation.
//!
//! [`reverse`] looks a name up in a [`NamedRoutes`] table, fills its
//! placeholders from [`UrlParams`], then splits the filled path on `/` and
//! percent-encodes every segment on its own. Separators stay structural,
//! including ones that came from inside a value.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::registry::NamedRoutes;

/// Characters left alone inside a segment: ASCII alphanumerics and
/// `- _ . ! ~ * ' ( )`.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Values to substitute into a named route.
///
/// Most callers never build this directly: anything with a `From` impl can
/// be passed to [`reverse`].
///
/// | input | becomes |
/// |---|---|
/// | `&str`, `String`, integers | one positional value |
/// | `()`, `None` | no values |
/// | `Vec`, slices, arrays | positional values |
/// | `HashMap`, `BTreeMap` | keyed values |
/// | `serde_json::Value` | by variant (`Object` keyed, `Array` positional, `Null` none) |
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlParams {
    /// Filled into placeholders left to right.
    Positional(Vec<String>),
    /// Each fills the first placeholder with the same name.
    Keyed(Vec<(String, String)>),
}

impl UrlParams {
    /// No substitution at all.
    pub fn none() -> Self {
        Self::Positional(Vec::new())
    }

    pub fn positional<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self::Positional(values.into_iter().map(|v| v.to_string()).collect())
    }

    pub fn keyed<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: ToString,
        V: ToString,
    {
        Self::Keyed(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    /// Returns `true` if there is nothing to substitute.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Positional(values) => values.is_empty(),
            Self::Keyed(pairs) => pairs.is_empty(),
        }
    }
}

impl Default for UrlParams {
    fn default() -> Self {
        Self::none()
    }
}

impl From<()> for UrlParams {
    fn from((): ()) -> Self {
        Self::none()
    }
}

impl<T: Into<Self>> From<Option<T>> for UrlParams {
    fn from(value: Option<T>) -> Self {
        value.map_or_else(Self::none, Into::into)
    }
}

impl From<&str> for UrlParams {
    fn from(value: &str) -> Self {
        Self::Positional(vec![value.to_string()])
    }
}

impl From<String> for UrlParams {
    fn from(value: String) -> Self {
        Self::Positional(vec![value])
    }
}

impl From<&String> for UrlParams {
    fn from(value: &String) -> Self {
        Self::Positional(vec![value.clone()])
    }
}

macro_rules! scalar_params {
    ($($t:ty),*) => {
        $(
            impl From<$t> for UrlParams {
                fn from(value: $t) -> Self {
                    Self::Positional(vec![value.to_string()])
                }
            }
        )*
    };
}

scalar_params!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl<S: ToString> From<Vec<S>> for UrlParams {
    fn from(values: Vec<S>) -> Self {
        Self::positional(values)
    }
}

impl<S: ToString> From<&[S]> for UrlParams {
    fn from(values: &[S]) -> Self {
        Self::Positional(values.iter().map(ToString::to_string).collect())
    }
}

impl<S: ToString, const N: usize> From<[S; N]> for UrlParams {
    fn from(values: [S; N]) -> Self {
        Self::positional(values)
    }
}

impl<S: ToString, const N: usize> From<&[S; N]> for UrlParams {
    fn from(values: &[S; N]) -> Self {
        Self::from(&values[..])
    }
}

impl<K: ToString, V: ToString, H: BuildHasher> From<HashMap<K, V, H>> for UrlParams {
    fn from(map: HashMap<K, V, H>) -> Self {
        Self::keyed(map)
    }
}

impl<K: ToString, V: ToString, H: BuildHasher> From<&HashMap<K, V, H>> for UrlParams {
    fn from(map: &HashMap<K, V, H>) -> Self {
        Self::Keyed(map.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }
}

impl<K: ToString, V: ToString> From<BTreeMap<K, V>> for UrlParams {
    fn from(map: BTreeMap<K, V>) -> Self {
        Self::keyed(map)
    }
}

impl<K: ToString, V: ToString> From<&BTreeMap<K, V>> for UrlParams {
    fn from(map: &BTreeMap<K, V>) -> Self {
        Self::Keyed(map.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }
}

impl From<serde_json::Value> for UrlParams {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::none(),
            Value::Object(map) => Self::Keyed(
                map.into_iter()
                    .map(|(k, v)| (k, json_to_string(v)))
                    .collect(),
            ),
            Value::Array(items) => {
                Self::Positional(items.into_iter().map(json_to_string).collect())
            }
            scalar => Self::Positional(vec![json_to_string(scalar)]),
        }
    }
}

/// Strings are used verbatim; everything else in its JSON form.
fn json_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Builds the URL for the route registered as `name`.
///
/// Returns `None` if no route has that name.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use enrouten_http::urls::registry::NamedRoutes;
/// use enrouten_http::urls::reverse::reverse;
///
/// let mut routes = NamedRoutes::new("/foo");
/// routes.register("item", "/:id").unwrap();
///
/// let params = HashMap::from([("id", "abc")]);
/// assert_eq!(reverse(&routes, "item", params).as_deref(), Some("/foo/abc"));
/// assert_eq!(reverse(&routes, "item", "a b").as_deref(), Some("/foo/a%20b"));
/// ```
pub fn reverse(routes: &NamedRoutes, name: &str, params: impl Into<UrlParams>) -> Option<String> {
    let template = routes.get(name)?;
    let filled = match params.into() {
        UrlParams::Positional(values) => template.fill_positional(&values),
        UrlParams::Keyed(pairs) => template.fill_keyed(&pairs),
    };
    Some(encode_path(&filled))
}

/// Percent-encodes each `/`-separated segment of `path` independently.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}
