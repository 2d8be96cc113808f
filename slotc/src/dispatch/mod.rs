//! Call resolution for single-inheritance hierarchies.
//!
//! This module decides which method body a call site runs, given the static
//! type of the receiver expression, the runtime type of the object and the
//! members declared along the hierarchy.
//!
//! # Algorithm Overview
//!
//! 1. **Find the visible overload set**: walk up from the static type; the
//!    first class declaring any member of the called name supplies every
//!    candidate. Same-named members above it are hidden by name.
//! 2. **Filter applicable**: keep candidates whose arity matches and whose
//!    parameters accept each argument exactly or by widening.
//! 3. **Select best**: choose the unique most specific candidate, or report
//!    no match / ambiguity.
//! 4. **Redirect**: a `Virtual`/`Override` choice fixes a slot; the call runs
//!    the most-derived implementation of that slot at or above the runtime
//!    type. `Hide`/`Plain` choices run as selected.
//!
//! # Module Structure
//!
//! - [`call_site`] - Call site descriptors
//! - [`result`] - Resolution results and errors
//! - [`overload`] - Overload ranking
//! - [`resolver`] - The two-phase resolver

mod call_site;
mod overload;
mod resolver;
mod result;


pub use call_site::{CallSite, CallSiteError};

pub use overload::OverloadRanker;

pub use result::{
    AmbiguityError,
    Binding,
    NoMatchError,
    ResolveError,
    ResolveResult,
    ResolvedCall,
};

pub use resolver::Resolver;
