//! Method dispatch resolution for single-inheritance class hierarchies.
//!
//! `slotc` answers, for any call site, which method body runs given the
//! static type of the receiver expression, the runtime type of the object
//! and the members declared along the hierarchy: virtual slots and their
//! overrides, hiding (`new`) members, plain members and overloads.
//!
//! # Example
//!
//! ```
//! use slotc::{CallSite, MethodDecl, Resolver, Signature, TypeGraph};
//!
//! let mut graph = TypeGraph::new();
//! let parent = graph.declare_class("Parent", None).unwrap();
//! let child = graph.declare_class("Child", Some("Parent")).unwrap();
//! graph.declare_method(parent, MethodDecl::virtual_("Foo", Signature::empty())).unwrap();
//! graph.declare_method(child, MethodDecl::override_("Foo", Signature::empty())).unwrap();
//!
//! let site = CallSite::new(&graph, parent, child, "Foo", &[]).unwrap();
//! let resolved = Resolver::new(&graph).resolve(&site).unwrap();
//! assert_eq!(resolved.describe(&graph), "Child.Foo()");
//! ```

pub mod config;
pub mod dispatch;
pub mod graph;
pub mod sim;
pub mod ty;

pub use config::{OverrideLookup, ResolverConfig};
pub use dispatch::{Binding, CallSite, CallSiteError, ResolveError, ResolvedCall, Resolver};
pub use graph::{ClassId, DeclError, DispatchKind, MethodDecl, MethodId, SlotId, TypeGraph};
pub use sim::{CallReport, Scenario, ScenarioError, Simulator};
pub use ty::{PrimitiveTy, Signature};
