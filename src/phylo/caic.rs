//! Hierarchical CAIC clade codes.
//!
//! A code is the root-to-node path of a node, one character per level. Each
//! character encodes the 0-based position of the node among its siblings:
//! `A`..`Z` for 0..25, `a`..`z` for 26..51, and `-` for anything beyond.
//! The root has the empty code.

use std::cmp::Ordering;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Character used for every child index that does not fit the alphabet.
pub const CAIC_OVERFLOW: char = '-';

/// Number of child indices with their own character.
pub const CAIC_ALPHABET_LEN: usize = 52;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CaicCodeError {
    #[error("Invalid CAIC code character: '{0}'.")]
    InvalidCharacter(char),
}

/// Maps a child index to its code character. Indices of 52 and above all
/// collapse to `-`, so the mapping is lossy past that point.
pub fn index_to_char(index: usize) -> char {
    match index {
        0..=25 => (b'A' + index as u8) as char,
        26..=51 => (b'a' + (index - 26) as u8) as char,
        _ => CAIC_OVERFLOW,
    }
}

/// Inverse of [index_to_char] for `A`..`Z` and `a`..`z`.
///
/// Panics for `-` and for anything outside the alphabet: the overflow
/// character no longer identifies a single index.
pub fn char_to_index(c: char) -> usize {
    assert!(c >= 'A', "'{c}' is not a CAIC code character");
    match c {
        'A'..='Z' => c as usize - 'A' as usize,
        'a'..='z' => c as usize - 'a' as usize + 26,
        _ => panic!("'{c}' is not a CAIC code character"),
    }
}

/// Successor of `c` in the order `A`..`Z`, `a`..`z`, `-`. Saturates at `-`.
pub fn next_char(c: char) -> char {
    match c {
        'Z' => 'a',
        'z' => CAIC_OVERFLOW,
        CAIC_OVERFLOW => CAIC_OVERFLOW,
        _ => index_to_char(char_to_index(c) + 1),
    }
}

fn is_caic_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == CAIC_OVERFLOW
}

fn rank(c: char) -> usize {
    if c == CAIC_OVERFLOW { CAIC_ALPHABET_LEN } else { char_to_index(c) }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct CaicCode {
    code: String,
}

impl CaicCode {
    /// The empty code of the root.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_index(index: usize) -> Self {
        Self::from(index_to_char(index))
    }

    pub fn as_str(&self) -> &str {
        &self.code
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.code.chars()
    }

    pub fn last(&self) -> char {
        match self.code.chars().last() {
            Some(c) => c,
            None => panic!("the root CAIC code has no last character"),
        }
    }

    /// Sibling position encoded by the last character.
    pub fn child_index(&self) -> usize {
        char_to_index(self.last())
    }

    pub fn parent(&self) -> CaicCode {
        let mut parent = self.clone();
        parent.truncate();
        parent
    }

    pub fn is_parent_of(&self, other: &CaicCode) -> bool {
        other.len() == self.len() + 1 && other.code.starts_with(&self.code)
    }

    pub fn is_child_of(&self, other: &CaicCode) -> bool {
        other.is_parent_of(self)
    }

    pub fn is_ancestor_of(&self, other: &CaicCode) -> bool {
        other.len() > self.len() && other.code.starts_with(&self.code)
    }

    pub fn is_descendent_of(&self, other: &CaicCode) -> bool {
        other.is_ancestor_of(self)
    }

    /// Distinct codes of the same length sharing a parent.
    pub fn is_sibling_of(&self, other: &CaicCode) -> bool {
        !self.is_empty()
            && self.len() == other.len()
            && self != other
            && self.code[..self.len() - 1] == other.code[..other.len() - 1]
    }

    /// Moves to the next sibling. The empty code becomes `A`.
    pub fn increment(&mut self) {
        match self.code.pop() {
            Some(c) => self.code.push(next_char(c)),
            None => self.code.push(index_to_char(0)),
        }
    }

    /// Descends to the child at `child_index`.
    pub fn extend(&mut self, child_index: usize) {
        self.code.push(index_to_char(child_index));
    }

    /// Ascends to the parent.
    pub fn truncate(&mut self) {
        assert!(!self.is_empty(), "cannot truncate the root CAIC code");
        let _ = self.code.pop();
    }

    /// Removes and returns the first character, i.e. the first step of the
    /// path from the root.
    pub fn pop_front(&mut self) -> char {
        assert!(!self.is_empty(), "cannot pop from the root CAIC code");
        self.code.remove(0)
    }
}

impl From<char> for CaicCode {
    fn from(c: char) -> Self {
        assert!(is_caic_char(c), "'{c}' is not a CAIC code character");
        Self { code: c.to_string() }
    }
}

impl FromStr for CaicCode {
    type Err = CaicCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.chars().find(|&c| !is_caic_char(c)) {
            Some(c) => Err(CaicCodeError::InvalidCharacter(c)),
            None => Ok(Self { code: s.to_string() }),
        }
    }
}

impl Ord for CaicCode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.chars().map(rank).cmp(other.chars().map(rank))
    }
}

impl PartialOrd for CaicCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for CaicCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code)
    }
}
