pub(crate) mod newick;

use thiserror::Error;

/// Failure to read a tree description. Positions are 1-based.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TreeParseError {
    #[error("Expected {expected} but got {found} at line {line}, column {column}.")]
    Unexpected {
        expected: String,
        found: String,
        line: usize,
        column: usize,
    },
    #[error("Unclosed comment starting at line {line}, column {column}.")]
    UnclosedComment { line: usize, column: usize },
    #[error("Invalid distance '{text}' at line {line}, column {column}.")]
    InvalidDistance {
        text: String,
        line: usize,
        column: usize,
    },
}
