//! Configuration options for the xeval engine.

/// Configuration options for compilation.
///
/// The compiler reserves register and constant storage up front so that the
/// pointers baked into instructions never move. When an expression needs
/// more than was reserved, compilation starts over with double the
/// exhausted reservation; these values only decide how often that happens.
///
/// # Example
///
/// ```
/// use xeval_core::api::CompilationOptions;
///
/// let options = CompilationOptions {
///     initial_registers: 4,
///     ..CompilationOptions::default()
/// };
/// assert_eq!(options.initial_constants, 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationOptions {
    /// Registers reserved for the first attempt.
    ///
    /// Default: 16
    pub initial_registers: usize,

    /// Constant pool entries reserved for the first attempt.
    ///
    /// Default: 16
    pub initial_constants: usize,

    /// Deepest allowed nesting of parentheses, negations and call arguments.
    /// Deeper input fails with `NestingTooDeep` instead of exhausting the
    /// stack.
    ///
    /// Default: 100
    pub max_depth: usize,
}

impl Default for CompilationOptions {
    fn default() -> Self {
        Self {
            initial_registers: 16,
            initial_constants: 16,
            max_depth: 100,
        }
    }
}

/// Configuration options for the xeval engine.
///
/// # Example
///
/// ```
/// use xeval_core::api::{CompilationOptions, EngineOptions};
///
/// let options = EngineOptions {
///     default_compilation_options: CompilationOptions {
///         initial_registers: 64,
///         initial_constants: 64,
///         ..CompilationOptions::default()
///     },
/// };
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Default options for compilation.
    ///
    /// These can be overridden with `Engine::compile_with()`.
    pub default_compilation_options: CompilationOptions,
}
