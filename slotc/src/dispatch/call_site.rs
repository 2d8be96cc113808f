//! Call site descriptors.

use thiserror::Error;

use crate::graph::{ClassId, TypeGraph};
use crate::ty::{display_args, PrimitiveTy};

/// Errors constructing a call site.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallSiteError {
    #[error("class `{name}` is not declared")]
    UnknownClass { name: String },

    #[error("runtime type `{runtime}` is not `{static_type}` or one of its descendants")]
    NotADescendant { static_type: String, runtime: String },
}

/// One method call: `((Static) obj).method(args)` where `obj` is an instance
/// of the runtime type.
///
/// A `CallSite` always satisfies "runtime type is the static type or a
/// descendant of it" for the graph it was built against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallSite {
    static_type: ClassId,
    runtime_type: ClassId,
    method: String,
    args: Vec<PrimitiveTy>,
}

impl CallSite {
    /// Create a call site, checking both classes against `graph`.
    pub fn new(
        graph: &TypeGraph,
        static_type: ClassId,
        runtime_type: ClassId,
        method: impl Into<String>,
        args: &[PrimitiveTy],
    ) -> Result<Self, CallSiteError> {
        for class in [static_type, runtime_type] {
            if class.index as usize >= graph.class_count() {
                return Err(CallSiteError::UnknownClass {
                    name: format!("#{}", class.index),
                });
            }
        }

        if !graph.is_same_or_descendant(runtime_type, static_type) {
            return Err(CallSiteError::NotADescendant {
                static_type: graph.class(static_type).name.clone(),
                runtime: graph.class(runtime_type).name.clone(),
            });
        }

        Ok(Self {
            static_type,
            runtime_type,
            method: method.into(),
            args: args.to_vec(),
        })
    }

    /// Create a call site from class names.
    pub fn by_name(
        graph: &TypeGraph,
        static_type: &str,
        runtime_type: &str,
        method: impl Into<String>,
        args: &[PrimitiveTy],
    ) -> Result<Self, CallSiteError> {
        let lookup = |name: &str| {
            graph.class_by_name(name).ok_or_else(|| CallSiteError::UnknownClass {
                name: name.to_string(),
            })
        };
        Self::new(graph, lookup(static_type)?, lookup(runtime_type)?, method, args)
    }

    /// A call whose receiver's static and runtime types agree.
    pub fn direct(
        graph: &TypeGraph,
        class: ClassId,
        method: impl Into<String>,
        args: &[PrimitiveTy],
    ) -> Result<Self, CallSiteError> {
        Self::new(graph, class, class, method, args)
    }

    pub fn static_type(&self) -> ClassId {
        self.static_type
    }

    pub fn runtime_type(&self) -> ClassId {
        self.runtime_type
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn args(&self) -> &[PrimitiveTy] {
        &self.args
    }

    /// `((Static) Runtime).method(args)`, for reports.
    pub fn describe(&self, graph: &TypeGraph) -> String {
        let static_name = &graph.class(self.static_type).name;
        let runtime_name = &graph.class(self.runtime_type).name;
        if self.static_type == self.runtime_type {
            format!("{}.{}{}", runtime_name, self.method, display_args(&self.args))
        } else {
            format!(
                "(({}) {}).{}{}",
                static_name,
                runtime_name,
                self.method,
                display_args(&self.args)
            )
        }
    }
}
