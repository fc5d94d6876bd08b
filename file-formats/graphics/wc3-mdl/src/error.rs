use std::fmt;
use std::io;
use thiserror::Error;

/// A 1-based line/column location in MDL source text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Error types for MDL decoding, encoding and validation
#[derive(Error, Debug)]
pub enum MdlError {
    /// I/O error while reading or writing a file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Unterminated string, invalid number or unexpected character
    #[error("Lexical error at {pos}: {message}")]
    Lexical { pos: Position, message: String },

    /// Unbalanced braces, premature end of file, or a keyword that is not
    /// permitted where it appears
    #[error("Structural error at {pos}: expected {expected}, found {found}")]
    Structural {
        pos: Position,
        expected: String,
        found: String,
    },

    /// A block declared `N` children but a different number was found
    #[error("Count mismatch at {pos}: {block} declares {expected} entries, found {found}")]
    CountMismatch {
        pos: Position,
        block: String,
        expected: usize,
        found: usize,
    },

    /// A vector literal has the wrong number of components for its context
    #[error("Arity mismatch at {pos}: {context} expects {expected} components, found {found}")]
    ArityMismatch {
        pos: Position,
        context: String,
        expected: usize,
        found: usize,
    },

    /// A numeric reference points outside the list it refers to
    #[error("Reference error: {field} = {value} does not resolve ({count} available)")]
    Reference {
        field: String,
        value: usize,
        count: usize,
    },

    /// Following parent links from a node leads back to itself
    #[error("Parent cycle detected at node {node:?}")]
    ParentCycle { node: String },

    /// The document violates a model invariant and cannot be encoded
    #[error("Invariant violation: {0}")]
    Invariant(String),
}

impl MdlError {
    pub fn lexical(pos: Position, message: impl Into<String>) -> Self {
        Self::Lexical {
            pos,
            message: message.into(),
        }
    }

    pub fn structural(pos: Position, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::Structural {
            pos,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn count_mismatch(
        pos: Position,
        block: impl Into<String>,
        expected: usize,
        found: usize,
    ) -> Self {
        Self::CountMismatch {
            pos,
            block: block.into(),
            expected,
            found,
        }
    }

    pub fn arity_mismatch(
        pos: Position,
        context: impl Into<String>,
        expected: usize,
        found: usize,
    ) -> Self {
        Self::ArityMismatch {
            pos,
            context: context.into(),
            expected,
            found,
        }
    }

    pub fn reference(field: impl Into<String>, value: usize, count: usize) -> Self {
        Self::Reference {
            field: field.into(),
            value,
            count,
        }
    }

    /// Source position of the error, if it came from the parser
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::Lexical { pos, .. }
            | Self::Structural { pos, .. }
            | Self::CountMismatch { pos, .. }
            | Self::ArityMismatch { pos, .. } => Some(*pos),
            _ => None,
        }
    }
}

/// Result type using MdlError
pub type Result<T> = std::result::Result<T, MdlError>;
