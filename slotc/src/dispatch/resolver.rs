//! Two-phase call resolution.

use tracing::{debug, trace};

use crate::config::{OverrideLookup, ResolverConfig};
use crate::graph::{ClassId, DispatchKind, MethodId, TypeGraph};
use crate::ty::PrimitiveTy;

use super::call_site::CallSite;
use super::overload::OverloadRanker;
use super::result::{Binding, NoMatchError, ResolveResult, ResolvedCall};

/// Resolves call sites against a type graph.
///
/// Holds no mutable state, so one resolver can serve any number of threads.
#[derive(Debug, Clone)]
pub struct Resolver<'g> {
    graph: &'g TypeGraph,
    config: ResolverConfig,
}

impl<'g> Resolver<'g> {
    /// Create a resolver with the default configuration.
    pub fn new(graph: &'g TypeGraph) -> Self {
        Self::with_config(graph, ResolverConfig::default())
    }

    pub fn with_config(graph: &'g TypeGraph, config: ResolverConfig) -> Self {
        Self { graph, config }
    }

    pub fn graph(&self) -> &'g TypeGraph {
        self.graph
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve which method body a call site runs.
    pub fn resolve(&self, site: &CallSite) -> ResolveResult<ResolvedCall> {
        let selected = self.lookup_static(site.static_type(), site.method(), site.args())?;
        let resolved = self.redirect(selected, site.runtime_type());

        debug!(
            call = %site.describe(self.graph),
            selected = %self.graph.qualified_name(selected),
            resolved = %self.graph.qualified_name(resolved.method),
            dynamic = resolved.is_dynamic(),
            "resolved call"
        );
        Ok(resolved)
    }

    /// Phase 1: pick the member a call binds to at compile time.
    pub fn lookup_static(&self, static_type: ClassId, name: &str, args: &[PrimitiveTy]) -> ResolveResult<MethodId> {
        let Some((class, candidates)) = self.visible_overloads(static_type, name) else {
            return Err(NoMatchError {
                method_name: name.to_string(),
                arg_types: args.to_vec(),
                lookup_class: None,
                candidates: Vec::new(),
            }
            .into());
        };

        trace!(
            method = name,
            class = %self.graph.class(class).name,
            candidates = candidates.len(),
            "visible overload set"
        );
        OverloadRanker::new(self.graph).select(name, args, &candidates)
    }

    /// The overload set visible from `class` under `name`: the members of the
    /// first class at or above `class` declaring that name. Members further up
    /// are hidden regardless of their signatures.
    pub fn visible_overloads(&self, class: ClassId, name: &str) -> Option<(ClassId, Vec<MethodId>)> {
        self.graph.ancestors(class).find_map(|c| {
            let members: Vec<_> = self
                .graph
                .members_named(c, name)
                .iter()
                .copied()
                .filter(|&m| self.is_lookup_candidate(m))
                .collect();
            (!members.is_empty()).then_some((c, members))
        })
    }

    fn is_lookup_candidate(&self, method: MethodId) -> bool {
        match self.config.override_lookup {
            OverrideLookup::AtOverride => true,
            OverrideLookup::AtIntroduction => self.graph.method(method).kind != DispatchKind::Override,
        }
    }

    /// Phase 2: redirect a dynamically dispatched member through the runtime
    /// type. Statically bound members are returned unchanged.
    pub fn redirect(&self, selected: MethodId, runtime_type: ClassId) -> ResolvedCall {
        let method = self.graph.method(selected);
        match method.slot {
            Some(slot) if method.is_dynamic() => {
                let target = self
                    .graph
                    .most_derived_implementation(runtime_type, slot)
                    .unwrap_or(selected);
                ResolvedCall {
                    method: target,
                    declaring_class: self.graph.method(target).class,
                    selected,
                    binding: Binding::Dynamic { slot },
                }
            }
            _ => ResolvedCall {
                method: selected,
                declaring_class: method.class,
                selected,
                binding: Binding::Static,
            },
        }
    }
}
