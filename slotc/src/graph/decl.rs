//! Declarations stored in the type graph.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ty::{PrimitiveTy, Signature};

/// Identifier of a declared class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId {
    pub index: u32,
}

impl ClassId {
    pub fn new(index: u32) -> Self {
        Self { index }
    }
}

/// Identifier of a declared method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId {
    pub index: u32,
}

impl MethodId {
    pub fn new(index: u32) -> Self {
        Self { index }
    }
}

/// Identifier of a dynamically dispatched slot.
///
/// A slot is created by a `Virtual` declaration and shared by every
/// `Override` of it further down the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId {
    pub index: u32,
}

impl SlotId {
    pub fn new(index: u32) -> Self {
        Self { index }
    }
}

/// How a declared method takes part in dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchKind {
    /// Introduces a new slot.
    Virtual,
    /// Reuses the slot of the nearest ancestor member with the same signature.
    Override,
    /// Statically bound member that hides same-named ancestor members.
    #[serde(alias = "new")]
    Hide,
    /// Ordinary statically bound member.
    Plain,
}

impl DispatchKind {
    /// Whether calls bound to a member of this kind are redirected at runtime.
    pub fn is_dynamic(self) -> bool {
        matches!(self, DispatchKind::Virtual | DispatchKind::Override)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DispatchKind::Virtual => "virtual",
            DispatchKind::Override => "override",
            DispatchKind::Hide => "hide",
            DispatchKind::Plain => "plain",
        }
    }
}

impl fmt::Display for DispatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A call made on `this` from inside a method body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyCall {
    /// The called method's name.
    pub method: String,
    /// Static types of the arguments.
    #[serde(default)]
    pub args: Vec<PrimitiveTy>,
}

impl BodyCall {
    pub fn new(method: impl Into<String>, args: &[PrimitiveTy]) -> Self {
        Self {
            method: method.into(),
            args: args.to_vec(),
        }
    }
}

/// A method declaration, as handed to [`TypeGraph::declare_method`].
///
/// [`TypeGraph::declare_method`]: super::TypeGraph::declare_method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    /// The method's name.
    pub name: String,
    /// Parameter types.
    pub signature: Signature,
    /// Dispatch kind.
    pub kind: DispatchKind,
    /// Calls made on `this` when the method runs.
    pub body: Vec<BodyCall>,
}

impl MethodDecl {
    pub fn new(name: impl Into<String>, signature: impl Into<Signature>, kind: DispatchKind) -> Self {
        Self {
            name: name.into(),
            signature: signature.into(),
            kind,
            body: Vec::new(),
        }
    }

    pub fn virtual_(name: impl Into<String>, signature: impl Into<Signature>) -> Self {
        Self::new(name, signature, DispatchKind::Virtual)
    }

    pub fn override_(name: impl Into<String>, signature: impl Into<Signature>) -> Self {
        Self::new(name, signature, DispatchKind::Override)
    }

    pub fn hide(name: impl Into<String>, signature: impl Into<Signature>) -> Self {
        Self::new(name, signature, DispatchKind::Hide)
    }

    pub fn plain(name: impl Into<String>, signature: impl Into<Signature>) -> Self {
        Self::new(name, signature, DispatchKind::Plain)
    }

    /// Set the calls this method makes on `this`.
    pub fn with_body(mut self, body: Vec<BodyCall>) -> Self {
        self.body = body;
        self
    }
}

/// A class in the hierarchy.
#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub id: ClassId,
    pub name: String,
    /// Back-reference to the parent class.
    pub parent: Option<ClassId>,
    /// Declared methods, in declaration order.
    pub methods: Vec<MethodId>,
}

/// A method after it has been accepted into the graph.
#[derive(Debug, Clone)]
pub struct Method {
    pub id: MethodId,
    /// The declaring class.
    pub class: ClassId,
    pub name: String,
    pub signature: Signature,
    pub kind: DispatchKind,
    /// The slot this method implements, for `Virtual` and `Override`.
    pub slot: Option<SlotId>,
    /// The nearest ancestor member with the same name and signature that this
    /// declaration hides, if any.
    pub hides: Option<MethodId>,
    pub body: Vec<BodyCall>,
}

impl Method {
    pub fn is_dynamic(&self) -> bool {
        self.kind.is_dynamic()
    }
}

/// A dynamically dispatched slot.
#[derive(Debug, Clone)]
pub struct Slot {
    pub id: SlotId,
    pub name: String,
    pub signature: Signature,
    /// The `Virtual` declaration that introduced the slot.
    pub origin: MethodId,
    /// Every class declaring a member attached to this slot, with that member,
    /// in declaration order. The origin comes first.
    pub implementations: Vec<(ClassId, MethodId)>,
}
