//! Notation-core error types

use thiserror::Error;

/// Errors from path-addressed tree commands and cursor operations.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("path resolves to no node at depth {depth}")]
    InvalidPath { depth: usize },

    #[error("child index {index} out of range for {len} children")]
    OutOfRange { index: usize, len: usize },

    #[error("move `{0}` does not apply to the current position")]
    UnresolvedMove(String),

    #[error("stored position is not a legal FEN: {0}")]
    CorruptPosition(String),
}

/// Errors that abort a parse outright. Unresolvable moves and unmatched
/// parentheses are recovered in place and never surface here.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("invalid starting FEN: {0}")]
    InvalidFen(String),
}
