// ABOUTME: The environment arena: lexical scopes as GC-rooted, indexable nodes

use crate::error::SchemeError;
use crate::value::ValueRef;
use std::collections::HashMap;

/// A handle to a heap-allocated environment frame. Cheap to copy; only meaningful
/// relative to the `Envs` arena that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnvId(pub usize);

struct EnvNode {
    bindings: HashMap<String, ValueRef>,
    parent: Option<EnvId>,
    marked: bool,
}

/// Every lexical scope the interpreter ever creates lives here, addressed by
/// `EnvId`. Scopes are never returned to the caller by value (a `UserFunction`
/// captures its defining scope's `EnvId`, not a snapshot of it), which is what lets
/// a closure continue to observe later `set!`s against variables it captured.
pub struct Envs {
    nodes: Vec<EnvNode>,
}

impl Envs {
    pub fn new() -> Self {
        Envs { nodes: Vec::new() }
    }

    fn alloc(&mut self, parent: Option<EnvId>) -> EnvId {
        self.nodes.push(EnvNode {
            bindings: HashMap::new(),
            parent,
            marked: false,
        });
        EnvId(self.nodes.len() - 1)
    }

    pub fn new_root(&mut self) -> EnvId {
        self.alloc(None)
    }

    pub fn child(&mut self, parent: EnvId) -> EnvId {
        self.alloc(Some(parent))
    }

    /// Binds `name` in `env` itself, shadowing (without disturbing) any binding of
    /// the same name in an ancestor scope.
    pub fn define(&mut self, env: EnvId, name: String, value: ValueRef) {
        self.nodes[env.0].bindings.insert(name, value);
    }

    /// Looks up `name` starting at `env` and walking outward through parents.
    pub fn lookup(&self, env: EnvId, name: &str) -> Option<ValueRef> {
        let mut cur = Some(env);
        while let Some(id) = cur {
            if let Some(v) = self.nodes[id.0].bindings.get(name) {
                return Some(*v);
            }
            cur = self.nodes[id.0].parent;
        }
        None
    }

    /// `set!`: writes `value` into every scope on the chain from `env` outward that
    /// already binds `name`, rather than stopping at the first (innermost) match.
    /// This deliberately departs from single-site mutation: a variable shadowed at
    /// an inner scope and also bound at an outer scope is updated at BOTH sites by a
    /// single `set!` performed from the inner scope.
    pub fn set(&mut self, env: EnvId, name: &str, value: ValueRef) -> Result<(), SchemeError> {
        let mut found = false;
        let mut cur = Some(env);
        while let Some(id) = cur {
            if self.nodes[id.0].bindings.contains_key(name) {
                self.nodes[id.0].bindings.insert(name.to_string(), value);
                found = true;
            }
            cur = self.nodes[id.0].parent;
        }
        if found {
            Ok(())
        } else {
            Err(crate::undefined_error!(name))
        }
    }

    pub fn parent(&self, env: EnvId) -> Option<EnvId> {
        self.nodes[env.0].parent
    }

    pub fn is_marked(&self, env: EnvId) -> bool {
        self.nodes[env.0].marked
    }

    pub fn set_marked(&mut self, env: EnvId, marked: bool) {
        self.nodes[env.0].marked = marked;
    }

    pub fn clear_marks(&mut self) {
        for node in &mut self.nodes {
            node.marked = false;
        }
    }

    pub fn bound_values(&self, env: EnvId) -> Vec<ValueRef> {
        self.nodes[env.0].bindings.values().copied().collect()
    }

    /// Reclaims frames the collector did not mark, mirroring `Heap::collect`'s
    /// tombstoning of unreachable values: an unmarked frame's bindings are dropped
    /// so it retains no references of its own, but the slot index is not reused.
    pub fn sweep_unmarked(&mut self) {
        for node in &mut self.nodes {
            if !node.marked {
                node.bindings.clear();
                node.parent = None;
            }
        }
    }

    /// Lists `(name, display-string)` pairs bound anywhere on `env`'s chain, used by
    /// the REPL's `(help)` environment listing.
    pub fn names(&self, env: EnvId) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut names = Vec::new();
        let mut cur = Some(env);
        while let Some(id) = cur {
            for key in self.nodes[id.0].bindings.keys() {
                if seen.insert(key.clone()) {
                    names.push(key.clone());
                }
            }
            cur = self.nodes[id.0].parent;
        }
        names.sort();
        names
    }
}

impl Default for Envs {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_sees_parent_bindings() {
        let mut envs = Envs::new();
        let root = envs.new_root();
        envs.define(root, "x".to_string(), ValueRef(7));
        let child = envs.child(root);
        assert_eq!(envs.lookup(child, "x"), Some(ValueRef(7)));
    }

    #[test]
    fn child_binding_shadows_without_disturbing_parent() {
        let mut envs = Envs::new();
        let root = envs.new_root();
        envs.define(root, "x".to_string(), ValueRef(1));
        let child = envs.child(root);
        envs.define(child, "x".to_string(), ValueRef(2));
        assert_eq!(envs.lookup(child, "x"), Some(ValueRef(2)));
        assert_eq!(envs.lookup(root, "x"), Some(ValueRef(1)));
    }

    #[test]
    fn set_bang_updates_every_ancestor_binding() {
        let mut envs = Envs::new();
        let root = envs.new_root();
        envs.define(root, "x".to_string(), ValueRef(1));
        let child = envs.child(root);
        envs.define(child, "x".to_string(), ValueRef(2));
        envs.set(child, "x", ValueRef(99)).unwrap();
        assert_eq!(envs.lookup(child, "x"), Some(ValueRef(99)));
        assert_eq!(envs.lookup(root, "x"), Some(ValueRef(99)));
    }

    #[test]
    fn set_bang_on_undefined_name_errors() {
        let mut envs = Envs::new();
        let root = envs.new_root();
        assert!(envs.set(root, "never-defined", ValueRef(0)).is_err());
    }
}
