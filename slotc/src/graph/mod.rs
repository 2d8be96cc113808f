//! The class hierarchy and its member tables.
//!
//! A [`TypeGraph`] is an arena of classes linked by parent pointers. Each
//! class owns a member table (declared methods grouped by name) and an
//! explicit slot table mapping every slot the class implements to the
//! implementing method. Dynamic dispatch never relies on anything but this
//! data.
//!
//! All validation happens in [`TypeGraph::declare_class`] and
//! [`TypeGraph::declare_method`]; a graph that exists is consistent.

mod decl;
mod error;

pub use decl::{BodyCall, ClassDecl, ClassId, DispatchKind, Method, MethodDecl, MethodId, Slot, SlotId};
pub use error::{DeclError, DeclResult};

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::ty::Signature;

/// Per-class member storage.
#[derive(Debug, Clone, Default)]
struct MemberTable {
    /// Declared methods grouped by name, in declaration order.
    by_name: IndexMap<String, Vec<MethodId>>,
    /// Slots implemented by a declaration in this class.
    slot_impls: FxHashMap<SlotId, MethodId>,
}

/// A single-inheritance class hierarchy with declared members.
#[derive(Debug, Clone, Default)]
pub struct TypeGraph {
    classes: Vec<ClassDecl>,
    class_names: IndexMap<String, ClassId>,
    members: Vec<MemberTable>,
    methods: Vec<Method>,
    slots: Vec<Slot>,
}

impl TypeGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a class. The parent, if any, must already be declared.
    pub fn declare_class(&mut self, name: impl Into<String>, parent: Option<&str>) -> DeclResult<ClassId> {
        let name = name.into();
        if self.class_names.contains_key(&name) {
            return Err(DeclError::DuplicateClass { name });
        }

        let parent = match parent {
            Some(parent_name) => match self.class_by_name(parent_name) {
                Some(id) => Some(id),
                None => {
                    return Err(DeclError::UnknownParent {
                        class: name,
                        parent: parent_name.to_string(),
                    });
                }
            },
            None => None,
        };

        let id = ClassId::new(self.classes.len() as u32);
        debug!(class = %name, parent = ?parent.map(|p| self.class(p).name.as_str()), "declared class");

        self.class_names.insert(name.clone(), id);
        self.classes.push(ClassDecl {
            id,
            name,
            parent,
            methods: Vec::new(),
        });
        self.members.push(MemberTable::default());
        Ok(id)
    }

    /// Declare a method in `class`.
    ///
    /// An `Override` binds to the slot of the nearest ancestor member with the
    /// same name and signature. The declaration is rejected when that member
    /// does not exist or is not dynamically dispatched.
    pub fn declare_method(&mut self, class: ClassId, decl: MethodDecl) -> DeclResult<MethodId> {
        let Some(class_decl) = self.classes.get(class.index as usize) else {
            return Err(DeclError::UnknownClass {
                name: format!("#{}", class.index),
            });
        };

        if self.find_declared(class, &decl.name, &decl.signature).is_some() {
            return Err(DeclError::DuplicateSignature {
                class: class_decl.name.clone(),
                method: decl.name,
                signature: decl.signature,
            });
        }

        let inherited = class_decl
            .parent
            .and_then(|parent| self.nearest_with_signature(parent, &decl.name, &decl.signature));

        let id = MethodId::new(self.methods.len() as u32);
        let (slot, hides) = match decl.kind {
            DispatchKind::Override => match inherited.and_then(|m| self.method(m).slot) {
                Some(slot) => (Some(slot), None),
                None => {
                    return Err(DeclError::InvalidOverride {
                        class: class_decl.name.clone(),
                        method: decl.name,
                        signature: decl.signature,
                    });
                }
            },
            DispatchKind::Virtual => {
                let slot = SlotId::new(self.slots.len() as u32);
                self.slots.push(Slot {
                    id: slot,
                    name: decl.name.clone(),
                    signature: decl.signature.clone(),
                    origin: id,
                    implementations: Vec::new(),
                });
                (Some(slot), inherited)
            }
            DispatchKind::Hide => {
                let hides_any = class_decl
                    .parent
                    .is_some_and(|parent| self.ancestors(parent).any(|c| !self.members_named(c, &decl.name).is_empty()));
                if !hides_any {
                    warn!(
                        class = %class_decl.name,
                        method = %decl.name,
                        "member is declared as hiding but no inherited member has that name"
                    );
                }
                (None, inherited)
            }
            DispatchKind::Plain => (None, inherited),
        };

        if let Some(hidden) = hides {
            if decl.kind != DispatchKind::Hide {
                warn!(
                    class = %class_decl.name,
                    method = %decl.name,
                    signature = %decl.signature,
                    hidden = %self.qualified_name(hidden),
                    "member implicitly hides an inherited member"
                );
            }
        }

        debug!(
            class = %class_decl.name,
            method = %decl.name,
            signature = %decl.signature,
            kind = %decl.kind,
            slot = ?slot.map(|s| s.index),
            "declared method"
        );

        let table = &mut self.members[class.index as usize];
        table.by_name.entry(decl.name.clone()).or_default().push(id);
        if let Some(slot) = slot {
            table.slot_impls.insert(slot, id);
            self.slots[slot.index as usize].implementations.push((class, id));
        }
        self.classes[class.index as usize].methods.push(id);
        self.methods.push(Method {
            id,
            class,
            name: decl.name,
            signature: decl.signature,
            kind: decl.kind,
            slot,
            hides,
            body: decl.body,
        });
        Ok(id)
    }

    /// Look up a class by name.
    pub fn class_by_name(&self, name: &str) -> Option<ClassId> {
        self.class_names.get(name).copied()
    }

    /// Get a class.
    ///
    /// Panics if `id` was not issued by this graph.
    pub fn class(&self, id: ClassId) -> &ClassDecl {
        &self.classes[id.index as usize]
    }

    /// Get a method.
    ///
    /// Panics if `id` was not issued by this graph.
    pub fn method(&self, id: MethodId) -> &Method {
        &self.methods[id.index as usize]
    }

    /// Get a slot.
    ///
    /// Panics if `id` was not issued by this graph.
    pub fn slot(&self, id: SlotId) -> &Slot {
        &self.slots[id.index as usize]
    }

    /// All classes, in declaration order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassDecl> {
        self.classes.iter()
    }

    /// Number of declared classes.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Number of declared methods.
    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    /// Iterate `class` and its ancestors, most-derived first.
    pub fn ancestors(&self, class: ClassId) -> Ancestors<'_> {
        Ancestors {
            graph: self,
            next: Some(class),
        }
    }

    /// Check if `class` is `ancestor` or one of its descendants.
    pub fn is_same_or_descendant(&self, class: ClassId, ancestor: ClassId) -> bool {
        self.ancestors(class).any(|c| c == ancestor)
    }

    /// The overload set declared directly in `class` under `name`.
    pub fn members_named(&self, class: ClassId, name: &str) -> &[MethodId] {
        self.members[class.index as usize]
            .by_name
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The method declared directly in `class` with this exact name and signature.
    pub fn find_declared(&self, class: ClassId, name: &str, signature: &Signature) -> Option<MethodId> {
        self.members_named(class, name)
            .iter()
            .copied()
            .find(|&m| self.method(m).signature == *signature)
    }

    /// The nearest declaration of (name, signature) at or above `class`.
    pub fn nearest_with_signature(&self, class: ClassId, name: &str, signature: &Signature) -> Option<MethodId> {
        self.ancestors(class)
            .find_map(|c| self.find_declared(c, name, signature))
    }

    /// The slot seen from `class` for (name, signature), if the nearest
    /// declaration of that pair is dynamically dispatched.
    pub fn visible_slot(&self, class: ClassId, name: &str, signature: &Signature) -> Option<SlotId> {
        self.nearest_with_signature(class, name, signature)
            .and_then(|m| self.method(m).slot)
    }

    /// The method `class` itself declares for `slot`, if any.
    pub fn implementation_in(&self, class: ClassId, slot: SlotId) -> Option<MethodId> {
        self.members[class.index as usize].slot_impls.get(&slot).copied()
    }

    /// Classes on the ancestor chain of `class` (inclusive) that declare a
    /// member attached to `slot`, ordered from ancestor to descendant.
    pub fn slot_chain(&self, class: ClassId, slot: SlotId) -> Vec<ClassId> {
        let mut chain: Vec<_> = self
            .ancestors(class)
            .filter(|&c| self.implementation_in(c, slot).is_some())
            .collect();
        chain.reverse();
        chain
    }

    /// The slot chain for the slot visible at `class` for (name, signature),
    /// most-derived last. Empty when no slot is visible.
    pub fn resolve_slot_chain(&self, class: ClassId, name: &str, signature: &Signature) -> Vec<ClassId> {
        match self.visible_slot(class, name, signature) {
            Some(slot) => self.slot_chain(class, slot),
            None => Vec::new(),
        }
    }

    /// The most-derived implementation of `slot` at or above `class`.
    pub fn most_derived_implementation(&self, class: ClassId, slot: SlotId) -> Option<MethodId> {
        self.ancestors(class)
            .find_map(|c| self.implementation_in(c, slot))
    }

    /// The full slot table of `class`: every slot it inherits or introduces,
    /// ordered by introduction from the root down, mapped to the method a call
    /// on an object of exactly this class runs.
    pub fn vtable(&self, class: ClassId) -> IndexMap<SlotId, MethodId> {
        let mut lineage: Vec<_> = self.ancestors(class).collect();
        lineage.reverse();

        let mut table = IndexMap::new();
        for c in lineage {
            for &m in &self.classes[c.index as usize].methods {
                if let Some(slot) = self.method(m).slot {
                    table.insert(slot, m);
                }
            }
        }
        table
    }

    /// `Class.Name(params)` for diagnostics and reports.
    pub fn qualified_name(&self, method: MethodId) -> String {
        let m = self.method(method);
        format!("{}.{}{}", self.class(m.class).name, m.name, m.signature)
    }
}

/// Iterator over a class and its ancestors.
#[derive(Debug, Clone)]
pub struct Ancestors<'g> {
    graph: &'g TypeGraph,
    next: Option<ClassId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ClassId;

    fn next(&mut self) -> Option<ClassId> {
        let current = self.next?;
        self.next = self.graph.class(current).parent;
        Some(current)
    }
}
