//! Query-string encoding for filter structs.
//!
//! Filter options are plain `Serialize` structs. Their serde field names
//! (including `#[serde(rename = "...")]`) become the query keys, so the
//! mapping is declared on the type instead of being discovered at runtime.
//!
//! Encoding rules:
//!
//! - scalars (strings, numbers, booleans) produce one `key=value` pair
//! - sequences produce one pair per element, repeating the key
//! - `None`, empty strings and empty sequences are left out
//! - anything nested deeper is rejected with [`Error::QueryEncoding`]
//!
//! Pairs are sorted by key; repeated keys keep their sequence order.

use crate::{Error, Result};
use serde::Serialize;
use serde_json::Value;

/// Encodes `params` into ordered query pairs.
///
/// # Examples
///
/// ```
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Filter {
///     q: Option<String>,
///     ids: Vec<String>,
/// }
///
/// let pairs = affise::query::encode_query(&Filter {
///     q: None,
///     ids: vec!["a".into(), "b".into()],
/// })
/// .unwrap();
///
/// assert_eq!(
///     pairs,
///     vec![("ids".to_string(), "a".to_string()), ("ids".to_string(), "b".to_string())]
/// );
/// ```
pub fn encode_query<Q>(params: &Q) -> Result<Vec<(String, String)>>
where
    Q: Serialize + ?Sized,
{
    let value = serde_json::to_value(params).map_err(|e| Error::QueryEncoding(e.to_string()))?;

    let fields = match value {
        Value::Object(fields) => fields,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(Error::QueryEncoding(format!(
                "expected a struct or map, got {}",
                kind(&other)
            )))
        }
    };

    let mut pairs = Vec::new();
    for (key, value) in fields {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = scalar(&key, item)? {
                        pairs.push((key.clone(), text));
                    }
                }
            }
            other => {
                if let Some(text) = scalar(&key, other)? {
                    pairs.push((key, text));
                }
            }
        }
    }

    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(pairs)
}

/// Renders encoded pairs as an `application/x-www-form-urlencoded` string.
pub fn to_query_string(pairs: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

fn scalar(key: &str, value: Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(Error::QueryEncoding(format!(
            "field `{}` is {}, which cannot be a query value",
            key,
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "an object",
    }
}
