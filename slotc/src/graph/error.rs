//! Declaration errors.

use thiserror::Error;

use crate::ty::Signature;

/// Errors rejecting a class or method declaration.
///
/// A rejected declaration leaves the graph exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclError {
    #[error("class `{name}` is already declared")]
    DuplicateClass { name: String },

    #[error("parent `{parent}` of class `{class}` is not declared")]
    UnknownParent { class: String, parent: String },

    #[error("class `{name}` is not declared")]
    UnknownClass { name: String },

    #[error("`{class}.{method}{signature}` is marked override but no ancestor slot matches")]
    InvalidOverride {
        class: String,
        method: String,
        signature: Signature,
    },

    #[error("`{class}.{method}{signature}` is already declared")]
    DuplicateSignature {
        class: String,
        method: String,
        signature: Signature,
    },
}

/// Declaration result type.
pub type DeclResult<T> = Result<T, DeclError>;
