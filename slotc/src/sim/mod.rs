//! Scenario driver.
//!
//! Feeds call sites to a [`Resolver`] and turns the results into printable
//! reports. A call can also be *executed*: the resolved member's body calls
//! are resolved in turn, with `this` typed as the member's declaring class,
//! which yields the order in which method bodies run.

mod scenario;

pub use scenario::{CallSpec, ClassSpec, MethodSpec, Scenario, ScenarioError, ScenarioRun, RunEntry};

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::ResolverConfig;
use crate::dispatch::{Binding, CallSite, CallSiteError, ResolveError, ResolveResult, ResolvedCall, Resolver};
use crate::graph::TypeGraph;
use crate::ty::Signature;

/// Errors while executing a call's body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    #[error("{call}: {source}")]
    Resolve {
        call: String,
        #[source]
        source: ResolveError,
    },

    #[error(transparent)]
    CallSite(#[from] CallSiteError),

    #[error("call depth limit of {limit} exceeded in `{method}`")]
    CallDepthExceeded { limit: usize, method: String },
}

/// The outcome of one call, in printable form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Resolved {
        class: String,
        method: String,
        signature: Signature,
        dynamic: bool,
    },
    Failed {
        kind: &'static str,
        message: String,
    },
}

/// Report line for one call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallReport {
    /// The call as written, e.g. `((Parent) Child).Foo()`.
    pub call: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl CallReport {
    /// `Class.Name(params)` of the executed member, or the failure kind.
    pub fn result_text(&self) -> String {
        match &self.outcome {
            Outcome::Resolved { class, method, signature, .. } => format!("{}.{}{}", class, method, signature),
            Outcome::Failed { kind, .. } => kind.to_string(),
        }
    }
}

impl fmt::Display for CallReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Resolved { dynamic, .. } => {
                let binding = if *dynamic { "dynamic" } else { "static" };
                write!(f, "{} -> {} [{}]", self.call, self.result_text(), binding)
            }
            Outcome::Failed { kind, message } => write!(f, "{} -> error {}: {}", self.call, kind, message),
        }
    }
}

/// One executed method body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEntry {
    /// Nesting depth; the traced call itself is depth 0.
    pub depth: usize,
    pub call: ResolvedCall,
}

/// The method bodies run by a call, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    pub entries: Vec<TraceEntry>,
}

impl Trace {
    /// Indented `Class.Name(params)` lines.
    pub fn lines(&self, graph: &TypeGraph) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| format!("{}{}", "  ".repeat(e.depth), e.call.describe(graph)))
            .collect()
    }
}

/// Drives call sites through a resolver.
#[derive(Debug, Clone)]
pub struct Simulator<'g> {
    resolver: Resolver<'g>,
}

impl<'g> Simulator<'g> {
    pub fn new(graph: &'g TypeGraph) -> Self {
        Self::with_config(graph, ResolverConfig::default())
    }

    pub fn with_config(graph: &'g TypeGraph, config: ResolverConfig) -> Self {
        Self {
            resolver: Resolver::with_config(graph, config),
        }
    }

    pub fn resolver(&self) -> &Resolver<'g> {
        &self.resolver
    }

    /// Resolve every call in order.
    pub fn run_scenario(&self, calls: &[CallSite]) -> Vec<ResolveResult<ResolvedCall>> {
        calls.iter().map(|site| self.resolver.resolve(site)).collect()
    }

    /// Resolve every call and describe the outcomes.
    pub fn report(&self, calls: &[CallSite]) -> Vec<CallReport> {
        calls
            .iter()
            .zip(self.run_scenario(calls))
            .map(|(site, result)| self.report_one(site, &result))
            .collect()
    }

    fn report_one(&self, site: &CallSite, result: &ResolveResult<ResolvedCall>) -> CallReport {
        let graph = self.resolver.graph();
        let outcome = match result {
            Ok(resolved) => {
                let method = graph.method(resolved.method);
                Outcome::Resolved {
                    class: graph.class(resolved.declaring_class).name.clone(),
                    method: method.name.clone(),
                    signature: method.signature.clone(),
                    dynamic: matches!(resolved.binding, Binding::Dynamic { .. }),
                }
            }
            Err(err) => Outcome::Failed {
                kind: err.kind(),
                message: err.to_string(),
            },
        };
        CallReport {
            call: site.describe(graph),
            outcome,
        }
    }

    /// Resolve a call and run the bodies it reaches.
    pub fn execute(&self, site: &CallSite) -> Result<Trace, ExecError> {
        let mut trace = Trace::default();
        self.execute_into(site, 0, &mut trace)?;
        Ok(trace)
    }

    fn execute_into(&self, site: &CallSite, depth: usize, trace: &mut Trace) -> Result<(), ExecError> {
        let graph = self.resolver.graph();
        let resolved = self.resolver.resolve(site).map_err(|source| ExecError::Resolve {
            call: site.describe(graph),
            source,
        })?;
        trace.entries.push(TraceEntry { depth, call: resolved });

        let method = graph.method(resolved.method);
        if method.body.is_empty() {
            return Ok(());
        }

        let limit = self.resolver.config().max_call_depth;
        if depth >= limit {
            return Err(ExecError::CallDepthExceeded {
                limit,
                method: graph.qualified_name(resolved.method),
            });
        }

        debug!(method = %graph.qualified_name(resolved.method), depth, "executing body");
        for call in &method.body {
            // `this` inside the body is typed as the declaring class.
            let inner = CallSite::new(graph, method.class, site.runtime_type(), call.method.as_str(), &call.args)?;
            self.execute_into(&inner, depth + 1, trace)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{BodyCall, MethodDecl};
    use crate::ty::PrimitiveTy;
    use pretty_assertions::assert_eq;

    /// The Parent/Child/Grandchild hierarchy where `Parent.Func` calls `Foo`
    /// and `Bar` on itself.
    fn with_func() -> TypeGraph {
        let mut graph = TypeGraph::new();
        let parent = graph.declare_class("Parent", None).unwrap();
        let child = graph.declare_class("Child", Some("Parent")).unwrap();
        let grandchild = graph.declare_class("Grandchild", Some("Child")).unwrap();

        graph.declare_method(parent, MethodDecl::virtual_("Foo", Signature::empty())).unwrap();
        graph.declare_method(parent, MethodDecl::plain("Bar", Signature::empty())).unwrap();
        graph
            .declare_method(
                parent,
                MethodDecl::plain("Func", Signature::empty())
                    .with_body(vec![BodyCall::new("Foo", &[]), BodyCall::new("Bar", &[])]),
            )
            .unwrap();
        for class in [child, grandchild] {
            graph.declare_method(class, MethodDecl::override_("Foo", Signature::empty())).unwrap();
            graph.declare_method(class, MethodDecl::hide("Bar", Signature::empty())).unwrap();
        }
        graph
    }

    #[test]
    fn test_execute_runs_body_through_declaring_class() {
        let graph = with_func();
        let sim = Simulator::new(&graph);

        let site = CallSite::by_name(&graph, "Grandchild", "Grandchild", "Func", &[]).unwrap();
        let trace = sim.execute(&site).unwrap();
        assert_eq!(
            trace.lines(&graph),
            vec!["Parent.Func()", "  Grandchild.Foo()", "  Parent.Bar()"]
        );

        let site = CallSite::by_name(&graph, "Child", "Child", "Func", &[]).unwrap();
        let trace = sim.execute(&site).unwrap();
        assert_eq!(trace.lines(&graph), vec!["Parent.Func()", "  Child.Foo()", "  Parent.Bar()"]);
    }

    #[test]
    fn test_execute_depth_limit() {
        let mut graph = TypeGraph::new();
        let c = graph.declare_class("Loop", None).unwrap();
        graph
            .declare_method(
                c,
                MethodDecl::plain("Spin", Signature::empty()).with_body(vec![BodyCall::new("Spin", &[])]),
            )
            .unwrap();

        let sim = Simulator::with_config(&graph, ResolverConfig::default().with_max_call_depth(4));
        let site = CallSite::direct(&graph, c, "Spin", &[]).unwrap();
        assert_eq!(
            sim.execute(&site).unwrap_err(),
            ExecError::CallDepthExceeded {
                limit: 4,
                method: "Loop.Spin()".to_string(),
            }
        );
    }

    #[test]
    fn test_execute_reports_failing_body_call() {
        let mut graph = TypeGraph::new();
        let c = graph.declare_class("C", None).unwrap();
        graph
            .declare_method(
                c,
                MethodDecl::plain("Run", Signature::empty())
                    .with_body(vec![BodyCall::new("Missing", &[PrimitiveTy::Int])]),
            )
            .unwrap();

        let site = CallSite::direct(&graph, c, "Run", &[]).unwrap();
        match Simulator::new(&graph).execute(&site) {
            Err(ExecError::Resolve { call, source }) => {
                assert_eq!(call, "C.Missing(int)");
                assert_eq!(source.kind(), "NoApplicableMethod");
            }
            other => panic!("Expected Resolve error, got {:?}", other),
        }
    }

    #[test]
    fn test_report_lines() {
        let graph = with_func();
        let sim = Simulator::new(&graph);
        let calls = vec![
            CallSite::by_name(&graph, "Parent", "Grandchild", "Foo", &[]).unwrap(),
            CallSite::by_name(&graph, "Child", "Grandchild", "Bar", &[]).unwrap(),
            CallSite::by_name(&graph, "Parent", "Child", "Foo", &[PrimitiveTy::Int]).unwrap(),
        ];

        let lines: Vec<_> = sim.report(&calls).iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec![
                "((Parent) Grandchild).Foo() -> Grandchild.Foo() [dynamic]",
                "((Child) Grandchild).Bar() -> Child.Bar() [static]",
                "((Parent) Child).Foo(int) -> error NoApplicableMethod: \
                 no applicable overload of `Foo` for arguments (int)",
            ]
        );
    }

    #[test]
    fn test_run_scenario_preserves_order() {
        let graph = with_func();
        let sim = Simulator::new(&graph);
        let calls = vec![
            CallSite::by_name(&graph, "Parent", "Parent", "Foo", &[]).unwrap(),
            CallSite::by_name(&graph, "Parent", "Child", "Foo", &[]).unwrap(),
            CallSite::by_name(&graph, "Parent", "Grandchild", "Foo", &[]).unwrap(),
        ];

        let described: Vec<_> = sim
            .run_scenario(&calls)
            .into_iter()
            .map(|r| r.unwrap().describe(&graph))
            .collect();
        assert_eq!(described, vec!["Parent.Foo()", "Child.Foo()", "Grandchild.Foo()"]);
    }
}
