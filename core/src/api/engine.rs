//! The xeval compilation engine.

use super::{CompilationOptions, EngineOptions, Variables};
use crate::compiler;
use crate::parser::{Cursor, ParseError, ParseErrorKind};
use crate::registry::{IntoNativeFunction, Registry};
use crate::vm::Program;

/// A registry plus the options used to compile against it.
///
/// The free functions [`crate::parse`] and [`crate::compile`] use the
/// process-wide registry; an `Engine` owns its own, so independent
/// embeddings can register different functions without interfering.
///
/// # Example
///
/// ```
/// use xeval_core::{Engine, Registry, Variables};
/// use xeval_core::api::EngineOptions;
///
/// let mut engine = Engine::new(Registry::new(), EngineOptions::default());
/// engine.register_function("sqr", |x: f64| x * x);
///
/// let mut vars = Variables::new();
/// vars.define("x", 3.0);
/// let program = engine.parse("sqr(x) + 1", &vars).unwrap();
/// assert_eq!(program.evaluate(), 10.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    registry: Registry,
    options: EngineOptions,
}

impl Engine {
    pub fn new(registry: Registry, options: EngineOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Shorthand for `registry_mut().register_function(name, f)`.
    pub fn register_function<Args>(&mut self, name: &str, f: impl IntoNativeFunction<Args>) {
        self.registry.register_function(name, f);
    }

    /// Compile all of `text`. Anything but whitespace and comments after the
    /// expression is an error.
    pub fn parse(&self, text: &str, variables: &Variables) -> Result<Program, ParseError> {
        let mut cursor = Cursor::new(text);
        let program = self.compile(&mut cursor, variables)?;
        finish(&cursor)?;
        Ok(program)
    }

    /// Compile one expression starting at `cursor`.
    ///
    /// On success the cursor is left after the expression and any following
    /// whitespace. On failure it is left at the error offset.
    pub fn compile(
        &self,
        cursor: &mut Cursor<'_>,
        variables: &Variables,
    ) -> Result<Program, ParseError> {
        self.compile_with(cursor, variables, &self.options.default_compilation_options)
    }

    /// [`Engine::compile`] with per-call options.
    pub fn compile_with(
        &self,
        cursor: &mut Cursor<'_>,
        variables: &Variables,
        options: &CompilationOptions,
    ) -> Result<Program, ParseError> {
        compiler::compile_program(&self.registry, options, cursor, variables)
    }
}

/// Reject anything left after a complete expression.
pub(crate) fn finish(cursor: &Cursor<'_>) -> Result<(), ParseError> {
    let kind = match cursor.rest().chars().next() {
        None => return Ok(()),
        Some(')') => ParseErrorKind::UnmatchedCloseParen,
        Some(_) => ParseErrorKind::TrailingCharacters,
    };
    Err(ParseError::new(kind, cursor.offset()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engines_are_isolated() {
        let mut first = Engine::default();
        let second = Engine::default();
        first.register_function("twice", |x: f64| x * 2.0);

        let vars = Variables::new();
        assert_eq!(first.parse("twice(4)", &vars).unwrap().evaluate(), 8.0);

        let err = second.parse("twice(4)", &vars).unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnknownFunction {
                name: "twice".into()
            }
        );
    }

    #[test]
    fn test_compile_with_tiny_reservations() {
        let engine = Engine::default();
        let vars = Variables::new();
        let options = CompilationOptions {
            initial_registers: 0,
            initial_constants: 0,
            ..CompilationOptions::default()
        };
        let mut cursor = Cursor::new("(1 + 2) * (3 + 4) - 5");
        let program = engine.compile_with(&mut cursor, &vars, &options).unwrap();
        assert_eq!(program.evaluate(), 16.0);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_parse_rejects_trailing_text() {
        let engine = Engine::default();
        let err = engine.parse("1 + 2 3", &Variables::new()).unwrap_err();
        assert_eq!(err, ParseError::new(ParseErrorKind::TrailingCharacters, 6));
    }
}
