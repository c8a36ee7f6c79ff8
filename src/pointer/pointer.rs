//! Pointer and array index types.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// ArrayIndex is the interpretation of a reference token against an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayIndex {
    /// A concrete element position.
    At(usize),
    /// The `-` token: one past the last element.
    End,
}

impl ArrayIndex {
    /// Parses a reference token as an array index.
    ///
    /// Only canonical decimal integers (no sign, no leading zeros) and `-` qualify.
    pub fn parse(token: &str) -> Option<ArrayIndex> {
        if token == "-" {
            return Some(ArrayIndex::End);
        }
        if !is_canonical_index(token) {
            return None;
        }
        token.parse::<usize>().ok().map(ArrayIndex::At)
    }

    /// Resolves the index against an array of the given length, for insertion.
    pub fn insertion_point(self, len: usize) -> Option<usize> {
        match self {
            ArrayIndex::At(i) if i <= len => Some(i),
            ArrayIndex::At(_) => None,
            ArrayIndex::End => Some(len),
        }
    }

    /// Resolves the index against an array of the given length, for an existing element.
    pub fn element(self, len: usize) -> Option<usize> {
        match self {
            ArrayIndex::At(i) if i < len => Some(i),
            _ => None,
        }
    }

    /// Position used to order tokens; `-` sorts after every concrete index.
    pub fn ordinal(self) -> usize {
        match self {
            ArrayIndex::At(i) => i,
            ArrayIndex::End => usize::MAX,
        }
    }
}

fn is_canonical_index(token: &str) -> bool {
    let bytes = token.as_bytes();
    if bytes.is_empty() || (bytes.len() > 1 && bytes[0] == b'0') {
        return false;
    }
    bytes.iter().all(|b| b.is_ascii_digit())
}

/// Pointer addresses a node inside a JSON document (RFC 6901).
///
/// Tokens are kept unescaped. The empty pointer addresses the document root.
/// Comparison works token by token, so `/ab` is never mistaken for a child of `/a`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pointer {
    tokens: Vec<String>,
}

impl Pointer {
    /// Creates the root pointer.
    pub fn root() -> Self {
        Pointer { tokens: Vec::new() }
    }

    /// Creates a pointer from unescaped tokens.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Pointer {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses an RFC 6901 pointer string.
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Ok(Pointer::root());
        }
        let rest = s
            .strip_prefix('/')
            .ok_or_else(|| Error::invalid_pointer(s, "must be empty or start with '/'"))?;
        let tokens = rest
            .split('/')
            .map(|raw| unescape_token(raw).ok_or_else(|| Error::invalid_pointer(s, "invalid '~' escape")))
            .collect::<Result<Vec<_>>>()?;
        Ok(Pointer { tokens })
    }

    /// Returns the number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if this pointer addresses the root.
    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns true if this pointer has no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn push(&mut self, token: impl Into<String>) {
        self.tokens.push(token.into());
    }

    pub fn pop(&mut self) -> Option<String> {
        self.tokens.pop()
    }

    pub fn last(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }

    /// Returns the pointer to the containing node, or `None` for the root.
    pub fn parent(&self) -> Option<Pointer> {
        let (_, init) = self.tokens.split_last()?;
        Some(Pointer {
            tokens: init.to_vec(),
        })
    }

    /// Creates a new pointer with an object key appended.
    pub fn child(&self, key: impl Into<String>) -> Pointer {
        let mut p = self.clone();
        p.push(key);
        p
    }

    /// Creates a new pointer with an array index appended.
    pub fn child_index(&self, index: usize) -> Pointer {
        self.child(index.to_string())
    }

    /// Returns true if `self` equals `other` or is an ancestor of it.
    pub fn is_prefix_of(&self, other: &Pointer) -> bool {
        self.tokens.len() <= other.tokens.len() && other.tokens[..self.tokens.len()] == self.tokens[..]
    }

    /// Returns true if `self` is an ancestor of `other` (and not equal to it).
    pub fn is_strict_prefix_of(&self, other: &Pointer) -> bool {
        self.tokens.len() < other.tokens.len() && self.is_prefix_of(other)
    }

    /// Returns true if the two pointers address the same node or one contains the other.
    pub fn overlaps(&self, other: &Pointer) -> bool {
        self.is_prefix_of(other) || other.is_prefix_of(self)
    }

    /// Returns the longest pointer that is a prefix of both.
    pub fn common_prefix(&self, other: &Pointer) -> Pointer {
        let tokens = self
            .tokens
            .iter()
            .zip(&other.tokens)
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a.clone())
            .collect();
        Pointer { tokens }
    }

    /// If this pointer lies at or below a direct child of `parent` whose token is an
    /// array index, returns that index.
    pub fn element_index_under(&self, parent: &Pointer) -> Option<ArrayIndex> {
        if !parent.is_strict_prefix_of(self) {
            return None;
        }
        ArrayIndex::parse(&self.tokens[parent.len()])
    }
}

/// Escapes a reference token (`~` → `~0`, `/` → `~1`).
pub fn escape_token(token: &str) -> String {
    if !token.contains(['~', '/']) {
        return token.to_string();
    }
    token.replace('~', "~0").replace('/', "~1")
}

/// Unescapes a reference token, rejecting `~` not followed by `0` or `1`.
pub fn unescape_token(raw: &str) -> Option<String> {
    if !raw.contains('~') {
        return Some(raw.to_string());
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '~' {
            match chars.next() {
                Some('0') => out.push('~'),
                Some('1') => out.push('/'),
                _ => return None,
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}

impl FromIterator<String> for Pointer {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Pointer {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl FromStr for Pointer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Pointer::parse(s)
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "/{}", escape_token(token))?;
        }
        Ok(())
    }
}

impl Serialize for Pointer {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pointer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Pointer::parse(&s).map_err(serde::de::Error::custom)
    }
}
