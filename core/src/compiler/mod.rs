//! Compiler from expression text to a [`Program`].
//!
//! ## Design
//!
//! - Single pass: parsing and code generation are the same walk
//!   ([`codegen`]), driven by precedence climbing over the registry's
//!   operator levels
//! - Operands are resolved pointers, so register and constant storage is
//!   reserved before the walk and must not move during it
//! - When a reservation runs out the attempt is thrown away and the driver
//!   ([`compile_program`]) starts over with that reservation doubled

mod allocator;
mod codegen;


use tracing::{debug, trace};

use crate::api::{CompilationOptions, Variables};
use crate::parser::{Cursor, ParseError};
use crate::registry::Registry;
use crate::vm::Program;

pub(crate) use allocator::{Allocator, Overflow};
pub(crate) use codegen::{CompileError, Compiler};

/// Next reservation after `capacity` was exhausted. Always larger.
fn grow(capacity: usize) -> usize {
    capacity.saturating_mul(2).max(capacity.saturating_add(1))
}

/// Compile one expression starting at `cursor`.
///
/// On success the cursor is moved past the expression and the whitespace
/// after it. On failure it is moved to the error offset. Reservation
/// overflows are handled here and never reach the caller.
pub(crate) fn compile_program(
    registry: &Registry,
    options: &CompilationOptions,
    cursor: &mut Cursor<'_>,
    variables: &Variables,
) -> Result<Program, ParseError> {
    let start = *cursor;
    let mut registers = options.initial_registers;
    let mut constants = options.initial_constants;

    loop {
        let alloc = Allocator::new(registers, constants);
        let mut compiler = Compiler::new(registry, variables, start, alloc, options.max_depth);

        match compiler.run() {
            Ok(result) => {
                *cursor = compiler.cursor;
                let program = compiler.finish(result);
                trace!(
                    instructions = program.len(),
                    registers = program.register_count(),
                    constants = program.constant_count(),
                    "compiled expression"
                );
                return Ok(program);
            }
            Err(CompileError::Parse(err)) => {
                cursor.reset(err.offset);
                return Err(err);
            }
            Err(CompileError::Overflow(Overflow::Registers)) => {
                registers = grow(compiler.alloc.register_capacity());
                debug!(registers, "register reservation exhausted, recompiling");
            }
            Err(CompileError::Overflow(Overflow::Constants)) => {
                constants = grow(compiler.alloc.constant_capacity());
                debug!(constants, "constant reservation exhausted, recompiling");
            }
        }
    }
}
