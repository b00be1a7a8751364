use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::interpreter::value::core::Value;

/// A lexical scope: a mutable set of bindings with a link to the enclosing
/// scope.
///
/// A `local` statement does not add to the current scope; it opens a child
/// scope that the rest of the block runs in. A closure created before the
/// declaration therefore keeps seeing the outer binding.
///
/// Environments are shared through `Rc`. Closures keep their defining
/// environment alive, so a binding updated after a closure was created is seen
/// by that closure. The outermost environment holds the globals.
///
/// Function-call scopes additionally carry the call's variadic arguments,
/// which `...` reads from the nearest enclosing call scope.
#[derive(Debug, Default)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    parent:   Option<Rc<Environment>>,
    varargs:  Option<Vec<Value>>,
}

impl Environment {
    /// Creates an empty root environment.
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Creates a block scope nested in `parent`.
    #[must_use]
    pub fn with_parent(parent: &Rc<Self>) -> Rc<Self> {
        Rc::new(Self { bindings: RefCell::default(),
                       parent:   Some(Rc::clone(parent)),
                       varargs:  None, })
    }

    /// Creates the scope of a function call nested in the closure's captured
    /// environment.
    #[must_use]
    pub fn for_call(parent: &Rc<Self>, varargs: Vec<Value>) -> Rc<Self> {
        Rc::new(Self { bindings: RefCell::default(),
                       parent:   Some(Rc::clone(parent)),
                       varargs:  Some(varargs), })
    }

    /// Creates or overwrites a binding in this scope, shadowing any binding
    /// of the same name further out.
    pub fn declare(&self, name: impl Into<String>, value: Value) {
        self.bindings.borrow_mut().insert(name.into(), value);
    }

    /// Looks a name up, searching from this scope outwards.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        let mut scope = self;
        loop {
            if let Some(value) = scope.bindings.borrow().get(name) {
                return Some(value.clone());
            }
            scope = scope.parent.as_deref()?;
        }
    }

    /// Updates the nearest existing binding of `name`.
    ///
    /// Returns `false` if no scope binds the name; the caller decides where
    /// the new binding goes.
    pub fn assign(&self, name: &str, value: Value) -> bool {
        let mut scope = self;
        loop {
            if let Some(slot) = scope.bindings.borrow_mut().get_mut(name) {
                *slot = value;
                return true;
            }
            match scope.parent.as_deref() {
                Some(parent) => scope = parent,
                None => return false,
            }
        }
    }

    /// The variadic arguments of the innermost enclosing call.
    #[must_use]
    pub fn varargs(&self) -> &[Value] {
        let mut scope = self;
        loop {
            if let Some(varargs) = &scope.varargs {
                return varargs;
            }
            match scope.parent.as_deref() {
                Some(parent) => scope = parent,
                None => return &[],
            }
        }
    }
}

impl Drop for Environment {
    /// Every `local` opens a scope, so chains get long. Unlink them in a loop
    /// rather than through nested drops.
    fn drop(&mut self) {
        let mut parent = self.parent.take();
        while let Some(scope) = parent {
            parent = Rc::try_unwrap(scope).ok().and_then(|mut scope| scope.parent.take());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_outwards() {
        let globals = Environment::new();
        globals.declare("x", Value::Number(1.0));
        let inner = Environment::with_parent(&globals);
        assert_eq!(inner.get("x"), Some(Value::Number(1.0)));
        assert_eq!(inner.get("y"), None);
    }

    #[test]
    fn shadowing_leaves_outer_binding() {
        let globals = Environment::new();
        globals.declare("x", Value::Number(1.0));
        let inner = Environment::with_parent(&globals);
        inner.declare("x", Value::Number(2.0));
        assert_eq!(inner.get("x"), Some(Value::Number(2.0)));
        assert_eq!(globals.get("x"), Some(Value::Number(1.0)));
    }

    #[test]
    fn assign_updates_nearest_binding() {
        let globals = Environment::new();
        globals.declare("x", Value::Number(1.0));
        let inner = Environment::with_parent(&globals);
        assert!(inner.assign("x", Value::Number(5.0)));
        assert_eq!(globals.get("x"), Some(Value::Number(5.0)));
        assert!(!inner.assign("missing", Value::Nil));
        assert_eq!(inner.get("missing"), None);
    }

    #[test]
    fn long_chains_drop_without_recursion() {
        let globals = Environment::new();
        let mut scope = Rc::clone(&globals);
        for i in 0..200_000 {
            scope = Environment::with_parent(&scope);
            scope.declare("i", Value::Number(f64::from(i)));
        }
        assert_eq!(scope.get("i"), Some(Value::Number(199_999.0)));
        drop(scope);
        assert_eq!(Rc::strong_count(&globals), 1);
    }

    #[test]
    fn varargs_come_from_nearest_call() {
        let globals = Environment::new();
        let call = Environment::for_call(&globals, vec![Value::Number(1.0), Value::Number(2.0)]);
        let block = Environment::with_parent(&call);
        assert_eq!(block.varargs().len(), 2);
        assert!(globals.varargs().is_empty());
    }
}
