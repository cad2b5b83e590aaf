// ABOUTME: The value arena and its mark-and-sweep collector

use crate::env::{EnvId, Envs};
use crate::value::{Value, ValueRef};

struct Slot {
    value: Value,
    marked: bool,
    /// Singletons (`Nil`, `True`, `False`, `Void`, `Eof`) and the builtin/syntax
    /// table are essential: the collector never reclaims them, mirroring the
    /// original collector's `essential` flag for objects with no incoming
    /// references from live code but that must always be reachable.
    essential: bool,
}

/// The heap arena every `Value` lives in. `ValueRef` is an index into `slots`; a
/// `ValueRef` is only ever meaningful relative to the `Heap` that produced it.
pub struct Heap {
    slots: Vec<Slot>,
    /// Singleton refs, allocated once at startup and reused everywhere rather than
    /// re-allocated on every `nil`/`#t`/`#f`/void/eof-producing operation.
    pub nil: ValueRef,
    pub t: ValueRef,
    pub f: ValueRef,
    pub void: ValueRef,
    pub eof: ValueRef,
    /// Number of collections run since startup, surfaced by `(gc-stats)` style
    /// introspection and by tests asserting the collector actually ran.
    pub collections: usize,
}

impl Heap {
    pub fn new() -> Self {
        let mut heap = Heap {
            slots: Vec::new(),
            nil: ValueRef(0),
            t: ValueRef(0),
            f: ValueRef(0),
            void: ValueRef(0),
            eof: ValueRef(0),
            collections: 0,
        };
        heap.nil = heap.alloc_essential(Value::Nil);
        heap.t = heap.alloc_essential(Value::True);
        heap.f = heap.alloc_essential(Value::False);
        heap.void = heap.alloc_essential(Value::Void);
        heap.eof = heap.alloc_essential(Value::Eof);
        heap
    }

    pub fn alloc(&mut self, value: Value) -> ValueRef {
        self.slots.push(Slot {
            value,
            marked: false,
            essential: false,
        });
        ValueRef(self.slots.len() - 1)
    }

    pub(crate) fn alloc_essential(&mut self, value: Value) -> ValueRef {
        self.slots.push(Slot {
            value,
            marked: false,
            essential: true,
        });
        ValueRef(self.slots.len() - 1)
    }

    pub fn get(&self, r: ValueRef) -> &Value {
        &self.slots[r.0].value
    }

    pub fn get_mut(&mut self, r: ValueRef) -> &mut Value {
        &mut self.slots[r.0].value
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Marks `root` and everything transitively reachable from it, recursing into a
    /// `UserFunction`'s captured environment as well as its params/body. The
    /// original collector this is adapted from omits the captured environment when
    /// marking a user function; that omission is a latent bug there, not a design
    /// choice worth reproducing, so env bindings are walked here.
    fn mark(&mut self, root: ValueRef, envs: &mut Envs) {
        if self.slots[root.0].marked {
            return;
        }
        self.slots[root.0].marked = true;
        match self.slots[root.0].value.clone() {
            Value::Cons(car, cdr) => {
                self.mark(car, envs);
                self.mark(cdr, envs);
            }
            Value::UserFunction { params, body, env } => {
                self.mark(params, envs);
                self.mark(body, envs);
                self.mark_env(env, envs);
            }
            _ => {}
        }
    }

    fn mark_env(&mut self, env: EnvId, envs: &mut Envs) {
        if envs.is_marked(env) {
            return;
        }
        envs.set_marked(env, true);
        let bound_values: Vec<ValueRef> = envs.bound_values(env);
        for v in bound_values {
            self.mark(v, envs);
        }
        if let Some(parent) = envs.parent(env) {
            self.mark_env(parent, envs);
        }
    }

    /// Runs a full mark-and-sweep collection. `roots` are the values reachable from
    /// outside the heap right now: every slot on the argument stack, every pending
    /// return value, and the environment chain(s) anchoring the live call stack.
    /// Anything not reached from a root or an essential slot is reclaimed by
    /// shrinking it out of `slots`, and `ValueRef`s are NOT renumbered to stay valid
    /// across a collection: dead slots are replaced in place by a Void tombstone.
    pub fn collect(&mut self, roots: &[ValueRef], root_envs: &[EnvId], envs: &mut Envs) {
        for slot in &mut self.slots {
            slot.marked = false;
        }
        envs.clear_marks();
        for &r in roots {
            self.mark(r, envs);
        }
        for &e in root_envs {
            self.mark_env(e, envs);
        }
        for i in 0..self.slots.len() {
            if !self.slots[i].marked && !self.slots[i].essential {
                self.slots[i].value = Value::Void;
            }
        }
        envs.sweep_unmarked();
        self.collections += 1;
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Envs;

    #[test]
    fn unreachable_cons_cell_is_reclaimed() {
        let mut heap = Heap::new();
        let mut envs = Envs::new();
        let root_env = envs.new_root();
        let one = heap.alloc(Value::Int(1));
        let garbage = heap.alloc(Value::Cons(one, heap.nil));
        drop(garbage);
        heap.collect(&[], &[root_env], &mut envs);
        // the Int(1) that only the dropped cons referenced is now a Void tombstone
        assert!(matches!(heap.get(one), Value::Void));
    }

    #[test]
    fn rooted_value_survives_collection() {
        let mut heap = Heap::new();
        let mut envs = Envs::new();
        let root_env = envs.new_root();
        let kept = heap.alloc(Value::Int(42));
        heap.collect(&[kept], &[root_env], &mut envs);
        assert!(matches!(heap.get(kept), Value::Int(42)));
    }

    #[test]
    fn user_function_keeps_its_captured_environment_alive() {
        let mut heap = Heap::new();
        let mut envs = Envs::new();
        let root_env = envs.new_root();
        let captured_env = envs.child(root_env);
        let captured_value = heap.alloc(Value::Int(99));
        envs.define(captured_env, "x".to_string(), captured_value);
        let lambda = heap.alloc(Value::UserFunction {
            params: heap.nil,
            body: heap.nil,
            env: captured_env,
        });
        heap.collect(&[lambda], &[root_env], &mut envs);
        assert!(matches!(heap.get(captured_value), Value::Int(99)));
    }
}
