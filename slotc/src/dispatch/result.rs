//! Dispatch result types and errors.

use thiserror::Error;

use crate::graph::{ClassId, MethodId, SlotId, TypeGraph};
use crate::ty::{display_args, PrimitiveTy};

/// How the executed method was bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    /// Fixed by the static type; the runtime type played no part.
    Static,
    /// Redirected through the runtime type within a slot.
    Dynamic { slot: SlotId },
}

/// A successfully resolved call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedCall {
    /// The method body that runs.
    pub method: MethodId,
    /// The class declaring `method`.
    pub declaring_class: ClassId,
    /// The member chosen by static lookup, before runtime redirection.
    pub selected: MethodId,
    pub binding: Binding,
}

impl ResolvedCall {
    pub fn is_dynamic(&self) -> bool {
        matches!(self.binding, Binding::Dynamic { .. })
    }

    /// `Class.Name(params)` of the executed method.
    pub fn describe(&self, graph: &TypeGraph) -> String {
        graph.qualified_name(self.method)
    }
}

/// Error when no method matches the arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no applicable overload of `{method_name}` for arguments {}", display_args(.arg_types))]
pub struct NoMatchError {
    /// The method name that was called.
    pub method_name: String,
    /// The argument types provided.
    pub arg_types: Vec<PrimitiveTy>,
    /// The class whose overload set was searched, if any class declares the name.
    pub lookup_class: Option<ClassId>,
    /// All candidates that were considered.
    pub candidates: Vec<MethodId>,
}

/// Error when multiple methods are equally specific.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("call to `{method_name}` with arguments {} is ambiguous", display_args(.arg_types))]
pub struct AmbiguityError {
    /// The method name that was called.
    pub method_name: String,
    /// The argument types provided.
    pub arg_types: Vec<PrimitiveTy>,
    /// The ambiguous candidates (all maximal).
    pub candidates: Vec<MethodId>,
}

/// Resolution failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error(transparent)]
    NoApplicableMethod(#[from] NoMatchError),

    #[error(transparent)]
    AmbiguousOverload(#[from] AmbiguityError),
}

impl ResolveError {
    /// Short name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::NoApplicableMethod(_) => "NoApplicableMethod",
            ResolveError::AmbiguousOverload(_) => "AmbiguousOverload",
        }
    }
}

/// Resolution result type.
pub type ResolveResult<T> = Result<T, ResolveError>;
