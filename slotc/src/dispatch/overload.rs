//! Overload ranking within a visible overload set.

use std::cmp::Ordering;

use tracing::trace;

use crate::graph::{MethodId, TypeGraph};
use crate::ty::PrimitiveTy;

use super::result::{AmbiguityError, NoMatchError, ResolveResult};

/// Picks the most specific applicable member of an overload set.
#[derive(Debug, Clone, Copy)]
pub struct OverloadRanker<'g> {
    graph: &'g TypeGraph,
}

impl<'g> OverloadRanker<'g> {
    pub fn new(graph: &'g TypeGraph) -> Self {
        Self { graph }
    }

    /// Select the unique most specific applicable candidate.
    pub fn select(&self, method_name: &str, arg_types: &[PrimitiveTy], candidates: &[MethodId]) -> ResolveResult<MethodId> {
        // Step 1: Filter to applicable methods
        let applicable: Vec<_> = candidates
            .iter()
            .copied()
            .filter(|&m| self.is_applicable(m, arg_types))
            .collect();

        // Step 2: Handle no matches
        if applicable.is_empty() {
            return Err(NoMatchError {
                method_name: method_name.to_string(),
                arg_types: arg_types.to_vec(),
                lookup_class: candidates.first().map(|&m| self.graph.method(m).class),
                candidates: candidates.to_vec(),
            }
            .into());
        }

        // Step 3: Find maximally specific methods
        let maximal = self.find_maximal(&applicable);
        trace!(
            method = method_name,
            applicable = applicable.len(),
            maximal = maximal.len(),
            "ranked overloads"
        );

        // Step 4: Check for unique winner
        match maximal.as_slice() {
            [single] => Ok(*single),
            _ => Err(AmbiguityError {
                method_name: method_name.to_string(),
                arg_types: arg_types.to_vec(),
                candidates: maximal,
            }
            .into()),
        }
    }

    /// Check if a method is applicable to the given argument types.
    ///
    /// A method is applicable if it has the same arity as the arguments and
    /// each argument converts to the corresponding parameter.
    pub fn is_applicable(&self, method: MethodId, arg_types: &[PrimitiveTy]) -> bool {
        self.graph.method(method).signature.accepts(arg_types)
    }

    /// Find the maximally specific methods from the applicable set.
    ///
    /// A method is maximal if no other method is strictly more specific.
    fn find_maximal(&self, applicable: &[MethodId]) -> Vec<MethodId> {
        applicable
            .iter()
            .copied()
            .filter(|&m| !applicable.iter().any(|&other| other != m && self.is_more_specific(other, m)))
            .collect()
    }

    /// Check if method m1 is more specific than method m2.
    ///
    /// m1 is more specific than m2 if every parameter of m1 converts to the
    /// matching parameter of m2 and at least one of them only by widening.
    pub fn is_more_specific(&self, m1: MethodId, m2: MethodId) -> bool {
        let p1 = self.graph.method(m1).signature.params();
        let p2 = self.graph.method(m2).signature.params();
        if p1.len() != p2.len() {
            return false;
        }

        let mut some_strictly = false;
        for (a, b) in p1.iter().zip(p2) {
            if !a.converts_to(*b) {
                return false;
            }
            if a.widens_to(*b) {
                some_strictly = true;
            }
        }
        some_strictly
    }

    /// Compare the specificity of two methods.
    ///
    /// Returns:
    /// - Ordering::Less if m1 is more specific
    /// - Ordering::Greater if m2 is more specific
    /// - Ordering::Equal if neither is (potential ambiguity)
    pub fn compare_specificity(&self, m1: MethodId, m2: MethodId) -> Ordering {
        match (self.is_more_specific(m1, m2), self.is_more_specific(m2, m1)) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => Ordering::Equal,
        }
    }
}
