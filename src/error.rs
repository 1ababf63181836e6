//! Error types for document writing and reading.
//!
//! Every writer error is a usage error reported synchronously at the offending
//! call. None of them poison the writer: after an error the writer accepts the
//! next correct call as if the failed one had never been made.
//!
//! ## Error Categories
//!
//! - **Scope errors**: [`Error::IllegalContext`], [`Error::UnterminatedScope`], [`Error::NestingTooDeep`]
//! - **Lifecycle errors**: [`Error::NotSealed`]
//! - **Value errors**: [`Error::InvalidScale`], [`Error::InvalidNumber`], [`Error::InvalidWindow`]
//! - **Reader errors**: [`Error::Syntax`] with line/column information
//!
//! ## Examples
//!
//! ```rust
//! use typed_doc::{DocumentWriter, Error};
//!
//! let mut writer = DocumentWriter::new();
//! let err = writer.add(1).unwrap_err();
//! assert!(matches!(err, Error::IllegalContext { .. }));
//! ```

use crate::context::{Operation, ScopeKind};
use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised while building, rendering or reading documents.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// An operation was issued in a scope that does not permit it
    #[error("Illegal context: {operation} is not allowed in {scope}")]
    IllegalContext {
        operation: Operation,
        scope: ScopeKind,
    },

    /// Sealing was attempted while nested scopes were still open
    #[error("Unterminated scope: {open} nested scope(s) still open")]
    UnterminatedScope { open: usize },

    /// A container would nest deeper than the writer allows
    #[error("Nesting too deep: containers may nest at most {limit} levels below the top-level map")]
    NestingTooDeep { limit: usize },

    /// The document was read or serialized before `build()`
    #[error("Document is not sealed, call build() first")]
    NotSealed,

    /// A decimal was constructed with a negative scale
    #[error("Invalid decimal scale: {0}")]
    InvalidScale(i64),

    /// A decimal source could not be represented exactly
    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    /// A binary window does not fit inside its buffer
    #[error("Invalid binary window: offset {offset} + length {len} exceeds buffer of {buffer_len} bytes")]
    InvalidWindow {
        offset: usize,
        len: usize,
        buffer_len: usize,
    },

    /// Syntax error in canonical text
    #[error("Syntax error at line {line}, column {col}: {msg}")]
    Syntax { line: usize, col: usize, msg: String },

    /// IO error while writing serialized output
    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    /// Creates an illegal-context error for `operation` attempted in `scope`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_doc::{Error, Operation, ScopeKind};
    ///
    /// let err = Error::illegal_context(Operation::Add, ScopeKind::TopLevelMap);
    /// assert!(err.to_string().contains("add"));
    /// ```
    pub fn illegal_context(operation: Operation, scope: ScopeKind) -> Self {
        Error::IllegalContext { operation, scope }
    }

    /// Creates a syntax error with line and column information.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_doc::Error;
    ///
    /// let err = Error::syntax(3, 7, "unexpected token");
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    pub fn syntax(line: usize, col: usize, msg: &str) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
        }
    }

    pub fn invalid_number<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidNumber(msg.to_string())
    }

    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
