//! Error types for the JSONiq front end

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by the type algebra and the item value model.
///
/// Every failure carries enough context (offending literal or type names)
/// for the calling layer to surface a query-level diagnostic or abort the
/// enclosing evaluation. Nothing here is retried or silently recovered.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum Error {
    /// Unknown declared type name in a type annotation
    #[error("Unrecognized type: {name}")]
    UnrecognizedType { name: String },

    /// Incompatible item families compared or combined at runtime
    #[error("Cannot compare item of type {left} with item of type {right}")]
    TypeMismatch { left: String, right: String },

    /// Malformed lexical literal for the target type
    #[error("Cannot parse {literal:?} as {target_type}")]
    Parse {
        literal: String,
        target_type: String,
    },

    /// Operand or cast combination with no defined semantics.
    ///
    /// The static type checker should have prevented this; seeing it at
    /// runtime indicates a gap upstream.
    #[error("No defined semantics for {from} -> {to}")]
    ClassCast { from: String, to: String },

    /// Arithmetic result with no representable value in its family
    #[error("Undefined arithmetic result: {context}")]
    Arithmetic { context: String },
}

impl Error {
    /// Create an unrecognized-type error
    pub fn unrecognized_type(name: impl Into<String>) -> Self {
        Self::UnrecognizedType { name: name.into() }
    }

    /// Create a type-mismatch error from the two type names involved
    pub fn type_mismatch(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::TypeMismatch {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Create a parse error naming the offending literal and target type
    pub fn parse(literal: impl Into<String>, target_type: impl Into<String>) -> Self {
        Self::Parse {
            literal: literal.into(),
            target_type: target_type.into(),
        }
    }

    /// Create a class-cast error for an undefined operand combination
    pub fn class_cast(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::ClassCast {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create an arithmetic error for an unrepresentable result
    pub fn arithmetic(context: impl Into<String>) -> Self {
        Self::Arithmetic {
            context: context.into(),
        }
    }
}

/// Abort on a programmer error with full context.
///
/// Internal invariant violations (e.g. reading the arity of the empty
/// sequence) are never recoverable: they signal a caller bug, not a
/// user-facing condition, so they panic instead of returning `Err`.
#[track_caller]
pub fn invariant_violation(message: &str) -> ! {
    panic!("internal invariant violated: {message}");
}
