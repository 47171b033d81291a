//! xeval - compile-once, evaluate-many arithmetic expressions
//!
//! # Overview
//!
//! xeval compiles infix expressions over named host variables into a flat
//! register program that can be evaluated over and over as the variables
//! change. Common use cases include:
//!
//! - Per-pixel or per-sample formulas supplied at runtime
//! - Spreadsheet-style cell formulas
//! - Configurable thresholds and scoring rules
//!
//! # Quick Start
//!
//! ```
//! use xeval::{Variables, parse};
//!
//! let mut vars = Variables::new();
//! let x = vars.define("x", 0.0);
//! let program = parse("x * x - 2 * x + 1", &vars).unwrap();
//!
//! for (input, expected) in [(0.0, 1.0), (1.0, 0.0), (3.0, 4.0)] {
//!     x.set(input);
//!     assert_eq!(program.evaluate(), expected);
//! }
//! ```
//!
//! # Native Functions
//!
//! Closures taking zero, one or two `f64` arguments can be registered by
//! name. The arity is taken from the closure signature:
//!
//! ```
//! use xeval::{Engine, Variables};
//!
//! let mut engine = Engine::default();
//! engine.register_function("hypot", |a: f64, b: f64| a.hypot(b));
//!
//! let program = engine.parse("hypot(3, 4)", &Variables::new()).unwrap();
//! assert_eq!(program.evaluate(), 5.0);
//! ```
//!
//! # Errors
//!
//! Compilation failures carry the byte offset where parsing stopped. The
//! `render_error*` functions turn them into annotated source snippets.

mod error_renderer;

// Re-export public API from xeval_core
pub use xeval_core::api::{
    CompilationOptions, Diagnostic, Engine, EngineOptions, Severity, Span, Variable, Variables,
};
pub use xeval_core::parser::{Cursor, ParseError, ParseErrorKind};
pub use xeval_core::registry::{
    self, IntoNativeFunction, NativeFunction, Registry, default_registry, register_function,
};
pub use xeval_core::vm::{self, Program};
pub use xeval_core::{compile, parse};

pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};
