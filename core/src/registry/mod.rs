//! Operator and function tables consulted by the compiler.
//!
//! A [`Registry`] is an explicit value: the compiler receives one by
//! reference and never touches global state. For single-call convenience the
//! crate also keeps one process-wide registry (see [`register_function`] and
//! [`default_registry`]) that the free functions in [`crate::api`] use.

mod function;

use std::sync::{PoisonError, RwLock};

use hashbrown::HashMap;
use once_cell::sync::Lazy;

use crate::vm::{BinaryOp, UnaryOp};

pub use function::{Fn0, Fn1, Fn2, IntoNativeFunction, Native, NativeFunction};

/// A binary infix operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Operator {
    pub symbol: &'static str,
    /// Precedence level; lower binds tighter.
    pub level: u8,
    pub op: BinaryOp,
}

const fn op(symbol: &'static str, level: u8, op: BinaryOp) -> Operator {
    Operator { symbol, level, op }
}

const OPERATORS: &[Operator] = &[
    op("*", 1, BinaryOp::Mul),
    op("/", 1, BinaryOp::Div),
    op("+", 2, BinaryOp::Add),
    op("-", 2, BinaryOp::Sub),
    op("<<", 3, BinaryOp::Shl),
    op(">>", 3, BinaryOp::Shr),
    op("&", 4, BinaryOp::BitAnd),
    op("|", 5, BinaryOp::BitOr),
    op("^", 5, BinaryOp::BitXor),
    op("<", 6, BinaryOp::Lt),
    op(">", 6, BinaryOp::Gt),
    op("<=", 6, BinaryOp::Le),
    op(">=", 6, BinaryOp::Ge),
    op("==", 6, BinaryOp::Eq),
    op("!=", 6, BinaryOp::Ne),
    op("&&", 7, BinaryOp::And),
    op("||", 8, BinaryOp::Or),
];

/// A function compiled to a dedicated opcode instead of an indirect call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intrinsic {
    Random,
    Unary(UnaryOp),
    Binary(BinaryOp),
}

impl Intrinsic {
    pub fn arity(self) -> usize {
        match self {
            Intrinsic::Random => 0,
            Intrinsic::Unary(_) => 1,
            Intrinsic::Binary(_) => 2,
        }
    }
}

const INTRINSICS: &[(&str, Intrinsic)] = &[
    ("floor", Intrinsic::Unary(UnaryOp::Floor)),
    ("abs", Intrinsic::Unary(UnaryOp::Abs)),
    ("sqrt", Intrinsic::Unary(UnaryOp::Sqrt)),
    ("sin", Intrinsic::Unary(UnaryOp::Sin)),
    ("cos", Intrinsic::Unary(UnaryOp::Cos)),
    ("tan", Intrinsic::Unary(UnaryOp::Tan)),
    ("atan", Intrinsic::Unary(UnaryOp::Atan)),
    ("log", Intrinsic::Unary(UnaryOp::Log)),
    ("exp", Intrinsic::Unary(UnaryOp::Exp)),
    ("atan2", Intrinsic::Binary(BinaryOp::Atan2)),
    ("pow", Intrinsic::Binary(BinaryOp::Pow)),
    ("random", Intrinsic::Random),
];

/// What a function name resolves to.
#[derive(Clone, Debug)]
pub enum FunctionRef<'r> {
    Inlined(Intrinsic),
    Registered(&'r NativeFunction),
}

impl FunctionRef<'_> {
    pub fn arity(&self) -> usize {
        match self {
            FunctionRef::Inlined(intrinsic) => intrinsic.arity(),
            FunctionRef::Registered(native) => native.arity(),
        }
    }
}

/// Operator table plus inlined and registered functions.
#[derive(Clone, Debug)]
pub struct Registry {
    operators: HashMap<&'static str, Operator>,
    inlined: HashMap<&'static str, Intrinsic>,
    functions: HashMap<String, NativeFunction>,
    max_level: u8,
}

impl Registry {
    /// Operators and inlined functions, no registered functions.
    pub fn new() -> Self {
        let operators: HashMap<_, _> = OPERATORS.iter().map(|op| (op.symbol, *op)).collect();
        let max_level = OPERATORS.iter().map(|op| op.level).max().unwrap_or(0);
        Self {
            operators,
            inlined: INTRINSICS.iter().copied().collect(),
            functions: HashMap::new(),
            max_level,
        }
    }

    /// Install `f` under `name`, replacing any earlier registration.
    ///
    /// The arity (0, 1 or 2) is taken from the closure's signature.
    pub fn register_function<Args>(&mut self, name: &str, f: impl IntoNativeFunction<Args>) {
        self.register_native(name, f.into_native(name));
    }

    /// Install a pre-built native function under `name`.
    pub fn register_native(&mut self, name: &str, function: NativeFunction) {
        if self.inlined.contains_key(name) {
            tracing::warn!(name, "registered function is shadowed by an inlined function");
        }
        if let Some(previous) = self.functions.insert(name.to_string(), function) {
            tracing::debug!(name, arity = previous.arity(), "replaced registered function");
        }
    }

    /// Operator spelled at the start of `text`.
    ///
    /// Tries the 2-character spelling first and only falls back to the
    /// 1-character spelling when no 2-character operator exists.
    pub fn lookup_operator(&self, text: &str) -> Option<&Operator> {
        let two = text.get(..2).and_then(|s| self.operators.get(s));
        two.or_else(|| text.get(..1).and_then(|s| self.operators.get(s)))
    }

    /// Resolve a function name: inlined functions first, then registered ones.
    pub fn lookup_function(&self, name: &str) -> Option<FunctionRef<'_>> {
        if let Some(intrinsic) = self.inlined.get(name) {
            return Some(FunctionRef::Inlined(*intrinsic));
        }
        self.functions.get(name).map(FunctionRef::Registered)
    }

    /// Loosest precedence level in the operator table.
    pub fn max_level(&self) -> u8 {
        self.max_level
    }

    /// Names of registered (not inlined) functions, sorted.
    pub fn registered_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

static DEFAULT_REGISTRY: Lazy<RwLock<Registry>> = Lazy::new(|| RwLock::new(Registry::new()));

/// Register `f` in the process-wide registry used by [`crate::parse`] and
/// [`crate::compile`]. Last registration for a name wins.
///
/// Registrations are expected to happen before programs are compiled
/// concurrently.
pub fn register_function<Args>(name: &str, f: impl IntoNativeFunction<Args>) {
    let function = f.into_native(name);
    DEFAULT_REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register_native(name, function);
}

/// Snapshot of the process-wide registry.
pub fn default_registry() -> Registry {
    with_default_registry(Registry::clone)
}

pub(crate) fn with_default_registry<T>(f: impl FnOnce(&Registry) -> T) -> T {
    let registry = DEFAULT_REGISTRY.read().unwrap_or_else(PoisonError::into_inner);
    f(&registry)
}
