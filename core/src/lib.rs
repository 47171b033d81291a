//! Compile-once, evaluate-many arithmetic expressions over host variables.
//!
//! ```
//! use xeval_core::{Variables, parse, register_function};
//!
//! register_function("sqr", |x: f64| x * x);
//!
//! let mut vars = Variables::new();
//! let x = vars.define("x", 3.0);
//! let program = parse("sqr(x) + 1 ; comments run to end of line", &vars).unwrap();
//! assert_eq!(program.evaluate(), 10.0);
//!
//! x.set(4.0);
//! assert_eq!(program.evaluate(), 17.0);
//! ```

extern crate alloc;

// Re-export for convenience so other modules don't need alloc:: prefix
#[allow(unused_imports)]
pub(crate) use alloc::{boxed::Box, format, string::String, string::ToString, vec, vec::Vec};

pub mod api;
mod compiler;
pub mod parser;
pub mod registry;
pub mod vm;

pub use api::{CompilationOptions, Engine, EngineOptions, Variable, Variables, compile, parse};
pub use parser::{Cursor, ParseError, ParseErrorKind};
pub use registry::{Registry, register_function};
pub use vm::Program;

/// Test utilities for enabling logging in tests
#[cfg(test)]
pub mod test_utils {
    /// Initialize tracing subscriber for tests with DEBUG level
    /// Call this at the start of tests where you want to see logging output
    ///
    /// # Example
    /// ```ignore
    /// #[test]
    /// fn test_retry() {
    ///     test_utils::init_test_logging();
    ///     // ... your test code
    /// }
    /// ```
    pub fn init_test_logging() {
        use tracing_subscriber::{EnvFilter, fmt};

        // Try to initialize, ignore error if already initialized
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }
}
