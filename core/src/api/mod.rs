//! Public API for the xeval expression language.
//!
//! Two entry points:
//!
//! 1. **Free functions** ([`parse`], [`compile`]): compile against the
//!    process-wide registry with default options.
//! 2. **[`Engine`]**: owns a [`Registry`](crate::Registry) and
//!    [`EngineOptions`], for embeddings that need their own functions or
//!    reservation sizes.
//!
//! # Example
//!
//! ```
//! use xeval_core::api::{Variables, parse};
//!
//! let mut vars = Variables::new();
//! let x = vars.define("x", 0.5);
//! let program = parse("sin(x) * sin(x) + cos(x) * cos(x)", &vars).unwrap();
//! assert!((program.evaluate() - 1.0).abs() < 1e-12);
//!
//! x.set(2.0);
//! assert!((program.evaluate() - 1.0).abs() < 1e-12);
//! ```

pub mod engine;
pub mod error;
pub mod options;
pub mod variables;

pub use engine::Engine;
pub use error::{Diagnostic, Severity, Span};
pub use options::{CompilationOptions, EngineOptions};
pub use variables::{Variable, Variables};

use crate::compiler;
use crate::parser::{Cursor, ParseError};
use crate::registry::with_default_registry;
use crate::vm::Program;

/// Compile all of `text` against the process-wide registry.
///
/// Trailing characters other than whitespace and comments are an error.
pub fn parse(text: &str, variables: &Variables) -> Result<Program, ParseError> {
    let mut cursor = Cursor::new(text);
    let program = compile(&mut cursor, variables)?;
    engine::finish(&cursor)?;
    Ok(program)
}

/// Compile one expression starting at `cursor` against the process-wide
/// registry.
///
/// On success the cursor is advanced past the expression and any following
/// whitespace, so callers can keep reading the surrounding text. On failure
/// the cursor is left at the error offset.
///
/// ```
/// use xeval_core::{Cursor, Variables, compile};
///
/// let vars = Variables::new();
/// let mut cursor = Cursor::new("1 + 2 , 3 * 4");
/// let first = compile(&mut cursor, &vars).unwrap();
/// assert_eq!(cursor.rest(), ", 3 * 4");
/// assert_eq!(first.evaluate(), 3.0);
/// ```
pub fn compile(cursor: &mut Cursor<'_>, variables: &Variables) -> Result<Program, ParseError> {
    let options = CompilationOptions::default();
    with_default_registry(|registry| {
        compiler::compile_program(registry, &options, cursor, variables)
    })
}
