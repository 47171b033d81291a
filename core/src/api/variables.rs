//! Host-owned variables that compiled programs read by reference.

use alloc::sync::Arc;
use core::fmt;

use hashbrown::HashMap;

use crate::String;
use crate::vm::{Scalar, Slot};

/// A shared, mutable `f64` owned by the host.
///
/// Clones share the same cell. A compiled program keeps a clone of every
/// variable it reads and reads its current value on each evaluation, so
/// `set` takes effect without recompiling.
///
/// # Example
///
/// ```
/// use xeval_core::Variable;
///
/// let x = Variable::new(1.0);
/// let alias = x.clone();
/// alias.set(2.0);
/// assert_eq!(x.get(), 2.0);
/// ```
#[derive(Clone)]
pub struct Variable(Arc<Scalar>);

impl Variable {
    pub fn new(value: f64) -> Self {
        Variable(Arc::new(Scalar::new(value)))
    }

    pub fn get(&self) -> f64 {
        self.0.get()
    }

    pub fn set(&self, value: f64) {
        self.0.set(value)
    }

    /// Whether both handles refer to the same cell.
    pub fn ptr_eq(&self, other: &Variable) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn slot(&self) -> Slot {
        Slot::to(&self.0)
    }
}

impl Default for Variable {
    fn default() -> Self {
        Variable::new(0.0)
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Variable").field(&self.get()).finish()
    }
}

/// Name to [`Variable`] bindings visible to the compiler.
///
/// # Example
///
/// ```
/// use xeval_core::{Variables, parse};
///
/// let mut vars = Variables::new();
/// vars.define("x1", 100.0);
/// vars.define("y1", 200.0);
/// assert_eq!(parse("x1 + y1 * 2", &vars).unwrap().evaluate(), 500.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Variables {
    entries: HashMap<String, Variable>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value` and return its handle.
    ///
    /// If `name` is already bound its existing cell is updated in place, so
    /// programs compiled earlier observe the new value.
    pub fn define(&mut self, name: &str, value: f64) -> Variable {
        let variable = self.entries.entry_ref(name).or_default();
        variable.set(value);
        variable.clone()
    }

    /// Bind `name` to an existing handle, replacing any earlier binding.
    pub fn insert(&mut self, name: &str, variable: Variable) -> Option<Variable> {
        self.entries.insert(name.into(), variable)
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.entries.iter().map(|(name, var)| (name.as_str(), var))
    }
}

impl<'a> FromIterator<(&'a str, f64)> for Variables {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        let mut vars = Variables::new();
        for (name, value) in iter {
            vars.define(name, value);
        }
        vars
    }
}
