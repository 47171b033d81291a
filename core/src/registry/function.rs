//! Host-supplied functions.

use alloc::sync::Arc;
use core::fmt;

/// Signature of a registered 0-ary function.
pub type Fn0 = dyn Fn() -> f64 + Send + Sync;
/// Signature of a registered 1-ary function.
pub type Fn1 = dyn Fn(f64) -> f64 + Send + Sync;
/// Signature of a registered 2-ary function.
pub type Fn2 = dyn Fn(f64, f64) -> f64 + Send + Sync;

/// A named callable of one fixed signature.
///
/// Cloning shares the underlying closure.
pub struct Native<F: ?Sized> {
    pub(crate) name: Arc<str>,
    pub(crate) func: Arc<F>,
}

impl<F: ?Sized> Native<F> {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<F: ?Sized> Clone for Native<F> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            func: self.func.clone(),
        }
    }
}

impl<F: ?Sized> fmt::Debug for Native<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name)
    }
}

/// A registered function, segregated by arity.
#[derive(Clone, Debug)]
pub enum NativeFunction {
    Nullary(Native<Fn0>),
    Unary(Native<Fn1>),
    Binary(Native<Fn2>),
}

impl NativeFunction {
    pub fn arity(&self) -> usize {
        match self {
            NativeFunction::Nullary(_) => 0,
            NativeFunction::Unary(_) => 1,
            NativeFunction::Binary(_) => 2,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            NativeFunction::Nullary(f) => f.name(),
            NativeFunction::Unary(f) => f.name(),
            NativeFunction::Binary(f) => f.name(),
        }
    }
}

/// Conversion from a Rust closure to a [`NativeFunction`].
///
/// The `Args` parameter only disambiguates the blanket impls; the arity is
/// inferred from the closure's parameter list. Closures with more than two
/// parameters, or with non-`f64` parameters, do not implement this trait.
///
/// # Example
///
/// ```
/// use xeval_core::registry::{IntoNativeFunction, NativeFunction};
///
/// let f = (|a: f64, b: f64| (a * a + b * b).sqrt()).into_native("len2");
/// assert_eq!(f.arity(), 2);
/// ```
pub trait IntoNativeFunction<Args> {
    fn into_native(self, name: &str) -> NativeFunction;
}

impl<F> IntoNativeFunction<()> for F
where
    F: Fn() -> f64 + Send + Sync + 'static,
{
    fn into_native(self, name: &str) -> NativeFunction {
        NativeFunction::Nullary(Native {
            name: Arc::from(name),
            func: Arc::new(self),
        })
    }
}

impl<F> IntoNativeFunction<(f64,)> for F
where
    F: Fn(f64) -> f64 + Send + Sync + 'static,
{
    fn into_native(self, name: &str) -> NativeFunction {
        NativeFunction::Unary(Native {
            name: Arc::from(name),
            func: Arc::new(self),
        })
    }
}

impl<F> IntoNativeFunction<(f64, f64)> for F
where
    F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
{
    fn into_native(self, name: &str) -> NativeFunction {
        NativeFunction::Binary(Native {
            name: Arc::from(name),
            func: Arc::new(self),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sqr(x: f64) -> f64 {
        x * x
    }

    #[test]
    fn test_arity_is_inferred() {
        assert_eq!((|| 4.0).into_native("four").arity(), 0);
        assert_eq!(sqr.into_native("sqr").arity(), 1);
        assert_eq!(f64::atan2.into_native("atan2").arity(), 2);
    }

    #[test]
    fn test_native_keeps_name() {
        let f = sqr.into_native("sqr");
        assert_eq!(f.name(), "sqr");
        match f {
            NativeFunction::Unary(native) => assert_eq!((native.func)(3.0), 9.0),
            other => panic!("expected unary function, got {:?}", other),
        }
    }
}
