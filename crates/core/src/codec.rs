//! Document codec
//!
//! Converts between the stored byte form of a root record and in-memory
//! values. The byte form is compact JSON text.
//!
//! - [`encode`] / [`decode`]: `Document` <-> bytes. Deterministic, preserves
//!   array order and map keys; `Null` encodes as `null`, distinct from an
//!   absent record.
//! - [`decode_as`]: typed read into a caller-supplied shape, driven by an
//!   explicit [`DecodePolicy`].
//!
//! All functions are pure. Malformed input is `Error::CorruptData`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::overlay;
use crate::path::SubPath;

/// How stored maps are materialized on typed reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodePolicy {
    /// Decode into the [`Document`] tree first (maps become order-preserving
    /// associative containers), navigate it, then build the target shape
    /// from the located node.
    #[default]
    AsMap,
    /// Decode straight into the caller's statically-shaped type. No document
    /// tree is built.
    AsStruct,
}

impl fmt::Display for DecodePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodePolicy::AsMap => write!(f, "as_map"),
            DecodePolicy::AsStruct => write!(f, "as_struct"),
        }
    }
}

impl FromStr for DecodePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "as_map" => Ok(DecodePolicy::AsMap),
            "as_struct" => Ok(DecodePolicy::AsStruct),
            other => Err(Error::config(format!(
                "invalid decode policy '{}', expected \"as_map\" or \"as_struct\"",
                other
            ))),
        }
    }
}

/// Serialize a document to bytes
pub fn encode(doc: &Document) -> Result<Vec<u8>> {
    serde_json::to_vec(doc).map_err(|e| Error::CorruptData(format!("encode failed: {}", e)))
}

/// Deserialize bytes into a document
///
/// # Examples
///
/// ```
/// use notnodb_core::codec::{decode, encode};
/// use notnodb_core::Document;
///
/// let doc = Document::from(serde_json::json!({"b": [1, 2], "a": null}));
/// let bytes = encode(&doc).unwrap();
/// assert_eq!(decode(&bytes).unwrap(), doc);
/// assert!(decode(b"{broken").unwrap_err().is_corrupt_data());
/// ```
pub fn decode(bytes: &[u8]) -> Result<Document> {
    serde_json::from_slice(bytes).map_err(Error::from)
}

/// Decode the node at `sub_path` of a stored record into `T`
///
/// Returns `Ok(None)` when the sub-path does not resolve to a node. A node
/// that does not fit the shape `T` is `Error::CorruptData`.
pub fn decode_as<T: DeserializeOwned>(
    bytes: &[u8],
    sub_path: SubPath<'_>,
    policy: DecodePolicy,
) -> Result<Option<T>> {
    match policy {
        DecodePolicy::AsMap => {
            let doc = decode(bytes)?;
            match overlay::get(&doc, sub_path) {
                Some(node) => {
                    let value = serde_json::Value::from(node.clone());
                    Ok(Some(serde_json::from_value(value)?))
                }
                None => Ok(None),
            }
        }
        DecodePolicy::AsStruct => {
            if sub_path.is_empty() {
                return Ok(Some(serde_json::from_slice(bytes)?));
            }
            let mut value: serde_json::Value = serde_json::from_slice(bytes)?;
            match value.pointer_mut(&json_pointer(sub_path)) {
                Some(node) => Ok(Some(serde_json::from_value(node.take())?)),
                None => Ok(None),
            }
        }
    }
}

/// RFC 6901 pointer for a sub-path
fn json_pointer(sub_path: SubPath<'_>) -> String {
    let mut pointer = String::new();
    for segment in sub_path.segments() {
        pointer.push('/');
        pointer.push_str(&segment.replace('~', "~0").replace('/', "~1"));
    }
    pointer
}
