//! Primitive parameter types and signatures.
//!
//! Overload ranking only ever compares primitive type tags, so a type here
//! is a plain `Copy` enum. Conversions between tags follow the implicit
//! numeric widenings of C-family languages:
//!
//! ```text
//! byte  -> short -> int -> long -> float -> double
//!                   ^
//! char -------------+
//! ```
//!
//! `bool` and `string` only ever match themselves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A primitive type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveTy {
    Bool,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
}

impl PrimitiveTy {
    /// Every tag, in declaration order.
    pub const ALL: [PrimitiveTy; 9] = [
        PrimitiveTy::Bool,
        PrimitiveTy::Char,
        PrimitiveTy::Byte,
        PrimitiveTy::Short,
        PrimitiveTy::Int,
        PrimitiveTy::Long,
        PrimitiveTy::Float,
        PrimitiveTy::Double,
        PrimitiveTy::String,
    ];

    /// The source-level spelling of this tag.
    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveTy::Bool => "bool",
            PrimitiveTy::Char => "char",
            PrimitiveTy::Byte => "byte",
            PrimitiveTy::Short => "short",
            PrimitiveTy::Int => "int",
            PrimitiveTy::Long => "long",
            PrimitiveTy::Float => "float",
            PrimitiveTy::Double => "double",
            PrimitiveTy::String => "string",
        }
    }

    /// Check if a value of this type implicitly widens to `target`.
    ///
    /// Strict: a type never widens to itself.
    pub fn widens_to(self, target: PrimitiveTy) -> bool {
        use PrimitiveTy::*;

        match self {
            Byte => matches!(target, Short | Int | Long | Float | Double),
            Short => matches!(target, Int | Long | Float | Double),
            Char => matches!(target, Int | Long | Float | Double),
            Int => matches!(target, Long | Float | Double),
            Long => matches!(target, Float | Double),
            Float => matches!(target, Double),
            Double | Bool | String => false,
        }
    }

    /// Check if an argument of this type may be passed to a `target` parameter,
    /// either exactly or through widening.
    pub fn converts_to(self, target: PrimitiveTy) -> bool {
        self == target || self.widens_to(target)
    }
}

impl fmt::Display for PrimitiveTy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognised type tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown primitive type `{0}`")]
pub struct UnknownTypeError(pub String);

impl FromStr for PrimitiveTy {
    type Err = UnknownTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrimitiveTy::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| UnknownTypeError(s.to_string()))
    }
}

/// An ordered list of parameter types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(Vec<PrimitiveTy>);

impl Signature {
    /// Create a signature from parameter types.
    pub fn new(params: impl Into<Vec<PrimitiveTy>>) -> Self {
        Self(params.into())
    }

    /// The empty signature `()`.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn params(&self) -> &[PrimitiveTy] {
        &self.0
    }

    pub fn arity(&self) -> usize {
        self.0.len()
    }

    /// Check if arguments of the given types can be passed to this signature.
    pub fn accepts(&self, args: &[PrimitiveTy]) -> bool {
        self.0.len() == args.len()
            && args.iter().zip(&self.0).all(|(arg, param)| arg.converts_to(*param))
    }

    /// Check if every argument matches its parameter without widening.
    pub fn is_exact_for(&self, args: &[PrimitiveTy]) -> bool {
        self.0.as_slice() == args
    }
}

impl From<Vec<PrimitiveTy>> for Signature {
    fn from(params: Vec<PrimitiveTy>) -> Self {
        Self(params)
    }
}

impl<const N: usize> From<[PrimitiveTy; N]> for Signature {
    fn from(params: [PrimitiveTy; N]) -> Self {
        Self(params.to_vec())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, ty) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", ty)?;
        }
        write!(f, ")")
    }
}

/// Format a list of argument types the same way a signature is printed.
pub fn display_args(args: &[PrimitiveTy]) -> String {
    Signature::new(args.to_vec()).to_string()
}
