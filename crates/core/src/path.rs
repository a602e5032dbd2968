//! Dot-delimited key paths
//!
//! A key such as `users.admins.alice` addresses a node inside a stored
//! document. The first segment (`users`) is the *root segment*: it names both
//! the storage partition and the whole-record key. The remaining segments
//! (`admins.alice`) form the [`SubPath`] navigated inside that record.
//!
//! # Syntax
//!
//! | Key | Root | Sub-path |
//! |-----|------|----------|
//! | `foo` | `foo` | (empty) |
//! | `one.two.three` | `one` | `two.three` |
//! | `an.array.1` | `an` | `array.1` |
//! | `` / `a..b` / `.a` / `a.` | invalid | |
//!
//! Segments are opaque strings. Whether a segment addresses an array element
//! is decided at navigation time, see [`as_index`].

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Segment separator
pub const SEPARATOR: char = '.';

/// A parsed, non-empty key path with no empty segments
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Parse a dot-delimited key
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if the key is empty or contains an empty segment
    /// (which covers leading, trailing and doubled separators).
    ///
    /// # Examples
    ///
    /// ```
    /// use notnodb_core::path::KeyPath;
    ///
    /// let path = KeyPath::parse("one.two.three").unwrap();
    /// let (root, sub) = path.split();
    /// assert_eq!(root, "one");
    /// assert_eq!(sub.to_string(), "two.three");
    ///
    /// assert!(KeyPath::parse("one..three").is_err());
    /// ```
    pub fn parse(key: &str) -> Result<Self> {
        if key.is_empty() {
            return Err(Error::invalid_path(key, "empty key"));
        }
        let mut segments = Vec::new();
        for (position, segment) in key.split(SEPARATOR).enumerate() {
            if segment.is_empty() {
                return Err(Error::invalid_path(
                    key,
                    format!("empty segment at position {}", position),
                ));
            }
            segments.push(segment.to_string());
        }
        Ok(KeyPath { segments })
    }

    /// All segments, root first
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments (always at least one)
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; a parsed path has at least one segment
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The root segment
    pub fn root(&self) -> &str {
        &self.segments[0]
    }

    /// The segments after the root
    pub fn sub_path(&self) -> SubPath<'_> {
        SubPath::new(&self.segments[1..])
    }

    /// Split into root segment and sub-path
    pub fn split(&self) -> (&str, SubPath<'_>) {
        (self.root(), self.sub_path())
    }
}

impl FromStr for KeyPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        KeyPath::parse(s)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// Address of a node inside a root record
///
/// An empty sub-path means "the whole record".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubPath<'a> {
    segments: &'a [String],
}

impl<'a> SubPath<'a> {
    /// Wrap a slice of segments
    pub fn new(segments: &'a [String]) -> Self {
        SubPath { segments }
    }

    /// The empty sub-path (whole record)
    pub fn whole() -> SubPath<'static> {
        SubPath { segments: &[] }
    }

    /// The segments
    pub fn segments(&self) -> &'a [String] {
        self.segments
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True when this addresses the whole record
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Split off the last segment: (parent segments, last segment)
    pub fn split_last(&self) -> Option<(SubPath<'a>, &'a str)> {
        self.segments
            .split_last()
            .map(|(last, parent)| (SubPath::new(parent), last.as_str()))
    }
}

impl fmt::Display for SubPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// Interpret a segment as an array index
///
/// Only canonical non-negative decimal integers qualify: `0`, `7`, `42`.
/// Signs, leading zeros and whitespace do not.
pub fn as_index(segment: &str) -> Option<usize> {
    let bytes = segment.as_bytes();
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if bytes.len() > 1 && bytes[0] == b'0' {
        return None;
    }
    segment.parse().ok()
}
