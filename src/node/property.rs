//! Path lookups into a node's JSON payload.
//!
//! The catalog endpoints do not agree on where a field lives (an artist name
//! may sit under `artist/name`, `interpreter/name` or `composer/name`), so
//! lookups take a list of candidate paths and answer the first one that
//! resolves to a present, non-empty value.

use serde_json::Value;

/// Outcome of resolving one slash-delimited path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    Found(&'a Value),
    /// A segment does not exist.
    Missing,
    /// The path (or one of its prefixes) exists but holds nothing.
    Empty,
}

impl<'a> Lookup<'a> {
    pub fn found(self) -> Option<&'a Value> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Missing | Lookup::Empty => None,
        }
    }
}

/// One path or a list of alternative paths.
pub trait PropertyPaths {
    fn candidates(&self) -> Vec<&str>;
}

impl PropertyPaths for str {
    fn candidates(&self) -> Vec<&str> {
        vec![self]
    }
}

impl PropertyPaths for String {
    fn candidates(&self) -> Vec<&str> {
        vec![self.as_str()]
    }
}

impl PropertyPaths for [&str] {
    fn candidates(&self) -> Vec<&str> {
        self.to_vec()
    }
}

impl<const N: usize> PropertyPaths for [&str; N] {
    fn candidates(&self) -> Vec<&str> {
        self.to_vec()
    }
}

impl PropertyPaths for Vec<String> {
    fn candidates(&self) -> Vec<&str> {
        self.iter().map(String::as_str).collect()
    }
}

/// Null, `""`, `"None"`, `[]` and `{}` count as absent.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty() || s == "None",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

pub fn lookup<'a>(data: &'a Value, path: &str) -> Lookup<'a> {
    let mut current = data;
    for segment in path.split('/') {
        let next = match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        match next {
            None => return Lookup::Missing,
            Some(value) if is_empty_value(value) => return Lookup::Empty,
            Some(value) => current = value,
        }
    }
    Lookup::Found(current)
}

/// First candidate path of `paths` resolving to a present value.
pub fn first_present<'a, P>(data: Option<&'a Value>, paths: &P) -> Option<&'a Value>
where
    P: PropertyPaths + ?Sized,
{
    let data = data?;
    paths
        .candidates()
        .into_iter()
        .find_map(|path| lookup(data, path).found())
}

/// Text rendering of scalar values; containers have none.
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
