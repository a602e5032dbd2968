//! Document value type
//!
//! A [`Document`] is the unit that is stored and merged: a recursive tagged
//! value with exactly six variants.
//!
//! ## Equality
//!
//! - Maps compare as maps; key order is not significant.
//! - Arrays compare element-wise; order is significant.
//! - Numbers keep integer/float fidelity: `1 != 1.0`.
//!
//! ## Serialization
//!
//! `Document` is `#[serde(untagged)]`, so its serde form is plain JSON data:
//! `Null` is `null`, `Map` is an object, and so on. Maps are
//! [`IndexMap`]s: decoding preserves the stored key order and encoding is
//! deterministic (insertion order).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;

/// Map node of a document
pub type DocMap = IndexMap<String, Document>;

/// Recursive document value
///
/// # Examples
///
/// ```
/// use notnodb_core::Document;
///
/// let doc = Document::from(serde_json::json!({"title": "Missing cat", "tags": ["local"]}));
/// assert!(doc.is_map());
/// assert_eq!(doc.type_name(), "map");
/// assert_eq!(Document::from("bar").as_str(), Some("bar"));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Document {
    /// Null value (distinct from an absent node)
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer or floating point number
    Number(Number),
    /// UTF-8 string
    String(String),
    /// Ordered array of documents
    Array(Vec<Document>),
    /// String-keyed map of documents
    Map(DocMap),
}

impl Document {
    /// Create an empty map
    pub fn map() -> Self {
        Document::Map(DocMap::new())
    }

    /// Create an empty array
    pub fn array() -> Self {
        Document::Array(Vec::new())
    }

    /// Lowercase type name, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Document::Null => "null",
            Document::Bool(_) => "bool",
            Document::Number(_) => "number",
            Document::String(_) => "string",
            Document::Array(_) => "array",
            Document::Map(_) => "map",
        }
    }

    /// Check if this is null
    pub fn is_null(&self) -> bool {
        matches!(self, Document::Null)
    }

    /// Check if this is an array
    pub fn is_array(&self) -> bool {
        matches!(self, Document::Array(_))
    }

    /// Check if this is a map
    pub fn is_map(&self) -> bool {
        matches!(self, Document::Map(_))
    }

    /// Check if this is an array or a map
    pub fn is_container(&self) -> bool {
        matches!(self, Document::Array(_) | Document::Map(_))
    }

    /// Get as bool if this is a Bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Document::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an integral Number that fits
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Document::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Get as f64 if this is a Number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Document::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Get as &str if this is a String
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Document::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the elements if this is an Array
    pub fn as_array(&self) -> Option<&Vec<Document>> {
        match self {
            Document::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Get the entries if this is a Map
    pub fn as_map(&self) -> Option<&DocMap> {
        match self {
            Document::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Maximum nesting depth
    ///
    /// Scalars have depth 0; each enclosing array or map adds one.
    pub fn nesting_depth(&self) -> usize {
        match self {
            Document::Null | Document::Bool(_) | Document::Number(_) | Document::String(_) => 0,
            Document::Array(items) => 1 + items.iter().map(Document::nesting_depth).max().unwrap_or(0),
            Document::Map(map) => 1 + map.values().map(Document::nesting_depth).max().unwrap_or(0),
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<bool> for Document {
    fn from(v: bool) -> Self {
        Document::Bool(v)
    }
}

impl From<i64> for Document {
    fn from(v: i64) -> Self {
        Document::Number(v.into())
    }
}

impl From<i32> for Document {
    fn from(v: i32) -> Self {
        Document::Number(v.into())
    }
}

impl From<u64> for Document {
    fn from(v: u64) -> Self {
        Document::Number(v.into())
    }
}

impl From<u32> for Document {
    fn from(v: u32) -> Self {
        Document::Number(v.into())
    }
}

/// Non-finite floats have no representation and become `Null`
impl From<f64> for Document {
    fn from(v: f64) -> Self {
        Number::from_f64(v).map_or(Document::Null, Document::Number)
    }
}

impl From<&str> for Document {
    fn from(v: &str) -> Self {
        Document::String(v.to_string())
    }
}

impl From<String> for Document {
    fn from(v: String) -> Self {
        Document::String(v)
    }
}

impl From<DocMap> for Document {
    fn from(v: DocMap) -> Self {
        Document::Map(v)
    }
}

impl<T: Into<Document>> From<Vec<T>> for Document {
    fn from(v: Vec<T>) -> Self {
        Document::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Document>> From<Option<T>> for Document {
    fn from(v: Option<T>) -> Self {
        v.map_or(Document::Null, Into::into)
    }
}

impl From<serde_json::Value> for Document {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Document::Null,
            serde_json::Value::Bool(b) => Document::Bool(b),
            serde_json::Value::Number(n) => Document::Number(n),
            serde_json::Value::String(s) => Document::String(s),
            serde_json::Value::Array(items) => {
                Document::Array(items.into_iter().map(Document::from).collect())
            }
            serde_json::Value::Object(obj) => Document::Map(
                obj.into_iter()
                    .map(|(k, v)| (k, Document::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Document> for serde_json::Value {
    fn from(v: Document) -> Self {
        match v {
            Document::Null => serde_json::Value::Null,
            Document::Bool(b) => serde_json::Value::Bool(b),
            Document::Number(n) => serde_json::Value::Number(n),
            Document::String(s) => serde_json::Value::String(s),
            Document::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            Document::Map(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}
