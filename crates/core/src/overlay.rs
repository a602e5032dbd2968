//! Document overlay: the merge engine
//!
//! Applies get / set / append / remove at a [`SubPath`] inside a whole root
//! document. Every function takes the root by value (or by reference for
//! reads) and hands back the resulting root; nothing is shared between calls.
//!
//! # Navigation
//!
//! | Node | Segment | Result |
//! |------|---------|--------|
//! | Map | any | entry with that key |
//! | Array | canonical index (`0`, `12`) | element at that index |
//! | Array | anything else | absent |
//! | scalar | any | absent |
//!
//! # Writes
//!
//! `set` and `append` create missing intermediate nodes as empty maps and
//! overwrite scalars standing in the way. An array in the way keeps its
//! elements: an in-range index descends into it, an index equal to its length
//! appends, and any other segment turns it into a map keyed by the decimal
//! indices of the existing elements.

use crate::document::{DocMap, Document};
use crate::path::{as_index, SubPath};

// =============================================================================
// Read
// =============================================================================

/// Node at `sub_path`, or `None` if it does not resolve
///
/// An empty sub-path resolves to `root` itself.
///
/// # Examples
///
/// ```
/// use notnodb_core::{overlay, Document, KeyPath};
///
/// let root = Document::from(serde_json::json!({"two": {"three": ["a", "b"]}}));
/// let path = KeyPath::parse("one.two.three.1").unwrap();
/// assert_eq!(overlay::get(&root, path.sub_path()), Some(&Document::from("b")));
///
/// let missing = KeyPath::parse("one.two.four").unwrap();
/// assert_eq!(overlay::get(&root, missing.sub_path()), None);
/// ```
pub fn get<'a>(root: &'a Document, sub_path: SubPath<'_>) -> Option<&'a Document> {
    sub_path
        .segments()
        .iter()
        .try_fold(root, |node, segment| child(node, segment))
}

fn child<'a>(node: &'a Document, segment: &str) -> Option<&'a Document> {
    match node {
        Document::Map(map) => map.get(segment),
        Document::Array(items) => as_index(segment).and_then(|i| items.get(i)),
        _ => None,
    }
}

fn get_mut<'a>(root: &'a mut Document, sub_path: SubPath<'_>) -> Option<&'a mut Document> {
    let mut current = root;
    for segment in sub_path.segments() {
        current = match current {
            Document::Map(map) => map.get_mut(segment.as_str())?,
            Document::Array(items) => items.get_mut(as_index(segment)?)?,
            _ => return None,
        };
    }
    Some(current)
}

// =============================================================================
// Write
// =============================================================================

/// Replace the node at `sub_path` with `value`
///
/// With an empty sub-path the result is `value` itself.
pub fn set(mut root: Document, sub_path: SubPath<'_>, value: Document) -> Document {
    *slot(&mut root, sub_path) = value;
    root
}

/// Append rejected because the node at the sub-path is not an array
///
/// Carries the untouched root back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct AppendRejected {
    /// The root exactly as it was passed in
    pub root: Document,
    /// Type name of the node occupying the sub-path
    pub found: &'static str,
}

/// Append `value` to the array at `sub_path`
///
/// An absent node becomes `[value]`. An existing array grows by one at the
/// end, so the new element's index is the prior length. Any other existing
/// node, `null` included, rejects the append.
pub fn append(
    mut root: Document,
    sub_path: SubPath<'_>,
    value: Document,
) -> Result<Document, AppendRejected> {
    match get(&root, sub_path) {
        None | Some(Document::Array(_)) => {}
        Some(other) => {
            let found = other.type_name();
            return Err(AppendRejected { root, found });
        }
    }

    match slot(&mut root, sub_path) {
        Document::Array(items) => items.push(value),
        absent => *absent = Document::Array(vec![value]),
    }
    Ok(root)
}

/// Outcome of [`remove`]
#[derive(Debug, Clone, PartialEq)]
pub enum Removal {
    /// The sub-path was empty: the caller must delete the whole record
    WholeRecord,
    /// The tree was edited in place
    Edited {
        /// Resulting root
        root: Document,
        /// The node that was removed, if there was one
        removed: Option<Document>,
    },
}

/// Remove the node at `sub_path` from its parent
///
/// Map entries are removed by key (remaining keys keep their order); array
/// elements by index, shifting later elements down. A node that does not
/// exist is not an error.
pub fn remove(mut root: Document, sub_path: SubPath<'_>) -> Removal {
    let Some((parent_path, last)) = sub_path.split_last() else {
        return Removal::WholeRecord;
    };

    let removed = match get_mut(&mut root, parent_path) {
        Some(Document::Map(map)) => map.shift_remove(last),
        Some(Document::Array(items)) => match as_index(last) {
            Some(i) if i < items.len() => Some(items.remove(i)),
            _ => None,
        },
        _ => None,
    };
    Removal::Edited { root, removed }
}

// =============================================================================
// Slot creation
// =============================================================================

/// Walk to `sub_path`, making every node on the way a container
///
/// Missing terminal nodes are materialized as `Null`.
fn slot<'a>(root: &'a mut Document, sub_path: SubPath<'_>) -> &'a mut Document {
    let mut current = root;
    for segment in sub_path.segments() {
        current = child_slot(current, segment);
    }
    current
}

fn child_slot<'a>(node: &'a mut Document, segment: &str) -> &'a mut Document {
    let index = match &*node {
        Document::Array(items) => as_index(segment).filter(|&i| i <= items.len()),
        _ => None,
    };

    match (index, node) {
        (Some(i), Document::Array(items)) => {
            if i == items.len() {
                items.push(Document::Null);
            }
            &mut items[i]
        }
        (_, node) => ensure_map(node)
            .entry(segment.to_string())
            .or_insert(Document::Null),
    }
}

fn ensure_map(node: &mut Document) -> &mut DocMap {
    match node {
        Document::Map(map) => map,
        other => {
            // recurses once: `other` is a map afterwards
            *other = match std::mem::take(other) {
                Document::Array(items) => Document::Map(
                    items
                        .into_iter()
                        .enumerate()
                        .map(|(i, item)| (i.to_string(), item))
                        .collect(),
                ),
                _ => Document::map(),
            };
            ensure_map(other)
        }
    }
}
