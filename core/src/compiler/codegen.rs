//! Single-pass precedence-climbing compiler.
//!
//! There is no syntax tree: every operand is compiled straight to the slot
//! that will hold its value, and every operator emits its instruction as
//! soon as both operands are known.

use alloc::sync::Arc;

use super::allocator::{Allocator, Overflow};
use crate::api::{Variable, Variables};
use crate::parser::{Cursor, ParseError, ParseErrorKind, is_ident_continue, is_ident_start};
use crate::registry::{FunctionRef, Intrinsic, NativeFunction, Registry};
use crate::vm::{BinaryOp, Instruction, Program, Slot, UnaryOp};
use crate::{String, Vec};

/// Why a compile attempt stopped.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CompileError {
    Parse(ParseError),
    /// A reservation ran out. The driver retries with a larger one.
    Overflow(Overflow),
}

impl From<ParseError> for CompileError {
    fn from(err: ParseError) -> Self {
        CompileError::Parse(err)
    }
}

impl From<Overflow> for CompileError {
    fn from(overflow: Overflow) -> Self {
        CompileError::Overflow(overflow)
    }
}

type Result<T> = core::result::Result<T, CompileError>;

/// One compile attempt over a fixed pair of reservations.
pub(crate) struct Compiler<'r, 's, 'v> {
    registry: &'r Registry,
    variables: &'v Variables,
    pub(crate) cursor: Cursor<'s>,
    pub(crate) alloc: Allocator,
    instructions: Vec<Instruction>,
    /// Variables referenced so far, in first-use order.
    used: Vec<(Arc<str>, Variable)>,
    depth: usize,
    max_depth: usize,
}

impl<'r, 's, 'v> Compiler<'r, 's, 'v> {
    pub(crate) fn new(
        registry: &'r Registry,
        variables: &'v Variables,
        cursor: Cursor<'s>,
        alloc: Allocator,
        max_depth: usize,
    ) -> Self {
        Self {
            registry,
            variables,
            cursor,
            alloc,
            instructions: Vec::new(),
            used: Vec::new(),
            depth: 0,
            max_depth,
        }
    }

    /// Compile one full expression and skip the whitespace after it.
    pub(crate) fn run(&mut self) -> Result<Slot> {
        let result = self.expression(self.registry.max_level())?;
        self.cursor.skip_trivia();
        Ok(result)
    }

    pub(crate) fn finish(self, result: Slot) -> Program {
        let (registers, constants) = self.alloc.into_buffers();
        Program::new(self.instructions, registers, constants, self.used, result)
    }

    fn error(&self, kind: ParseErrorKind) -> CompileError {
        CompileError::Parse(ParseError::new(kind, self.cursor.offset()))
    }

    /// Compile operators of precedence `level` and tighter.
    fn expression(&mut self, level: u8) -> Result<Slot> {
        if level == 0 {
            return self.atom();
        }

        let mut lhs = self.expression(level - 1)?;
        loop {
            self.cursor.skip_trivia();
            let Some(operator) = self.registry.lookup_operator(self.cursor.rest()) else {
                break;
            };
            if operator.level != level {
                break;
            }
            let op = operator.op;
            self.cursor.bump(operator.symbol.len());

            let rhs = self.expression(level - 1)?;
            lhs = self.emit_binary(op, lhs, rhs)?;
        }
        Ok(lhs)
    }

    /// Every nested operand passes through here, so `depth` bounds the
    /// recursion.
    fn atom(&mut self) -> Result<Slot> {
        self.cursor.skip_trivia();
        if self.depth >= self.max_depth {
            return Err(self.error(ParseErrorKind::NestingTooDeep {
                limit: self.max_depth,
            }));
        }
        self.depth += 1;
        let result = self.operand();
        self.depth -= 1;
        result
    }

    fn operand(&mut self) -> Result<Slot> {
        let Some(b) = self.cursor.peek() else {
            return Err(self.error(ParseErrorKind::UnexpectedEnd));
        };

        match b {
            b'(' => {
                self.cursor.bump(1);
                let inner = self.expression(self.registry.max_level())?;
                self.cursor.skip_trivia();
                self.close_paren()?;
                Ok(inner)
            }
            b'0'..=b'9' => self.number(),
            b'-' if self.cursor.peek_at(1).is_some_and(|b| b.is_ascii_digit()) => self.number(),
            b'-' => {
                self.cursor.bump(1);
                let operand = self.atom()?;
                self.emit_unary(UnaryOp::Neg, operand)
            }
            b')' => Err(self.error(ParseErrorKind::UnmatchedCloseParen)),
            b if is_ident_start(b) => self.identifier(),
            _ => {
                let found = self.cursor.peek_char().unwrap_or(char::from(b));
                Err(self.error(ParseErrorKind::UnexpectedCharacter { found }))
            }
        }
    }

    fn close_paren(&mut self) -> Result<()> {
        match self.cursor.peek_char() {
            Some(')') => {
                self.cursor.bump(1);
                Ok(())
            }
            Some(found) => Err(self.error(ParseErrorKind::Expected {
                expected: ')',
                found,
            })),
            None => Err(self.error(ParseErrorKind::UnclosedParen)),
        }
    }

    fn number(&mut self) -> Result<Slot> {
        let start = self.cursor.offset();
        let text = self.cursor.scan_number();
        let value = text.parse::<f64>().map_err(|_| {
            CompileError::Parse(ParseError::new(
                ParseErrorKind::InvalidNumber { text: text.into() },
                start,
            ))
        })?;
        Ok(self.alloc.constant(value)?)
    }

    fn identifier(&mut self) -> Result<Slot> {
        let name = self.cursor.take_while(is_ident_continue);
        if self.cursor.peek() == Some(b'(') {
            return self.call(name);
        }

        let Some(variable) = self.variables.get(name) else {
            return Err(self.error(ParseErrorKind::UnknownVariable { name: name.into() }));
        };
        if !self.used.iter().any(|(used, _)| &**used == name) {
            self.used.push((Arc::from(name), variable.clone()));
        }
        Ok(variable.slot())
    }

    /// Compile a call. The cursor is on the `(` after `name`.
    fn call(&mut self, name: &str) -> Result<Slot> {
        let registry = self.registry;
        let Some(function) = registry.lookup_function(name) else {
            return Err(self.error(ParseErrorKind::UnknownFunction { name: name.into() }));
        };
        self.cursor.bump(1);

        let arity = function.arity();
        let mut args = [None; 2];
        for (index, arg) in args.iter_mut().take(arity).enumerate() {
            if index > 0 {
                self.cursor.skip_trivia();
                match self.cursor.peek_char() {
                    Some(',') => self.cursor.bump(1),
                    Some(')') => return Err(self.wrong_arity(name, arity)),
                    Some(found) => {
                        return Err(self.error(ParseErrorKind::Expected {
                            expected: ',',
                            found,
                        }));
                    }
                    None => return Err(self.error(ParseErrorKind::UnclosedParen)),
                }
            }
            self.cursor.skip_trivia();
            if self.cursor.peek() == Some(b')') {
                return Err(self.wrong_arity(name, arity));
            }
            *arg = Some(self.expression(registry.max_level())?);
        }

        self.cursor.skip_trivia();
        match self.cursor.peek_char() {
            Some(')') => self.cursor.bump(1),
            Some(',') => return Err(self.wrong_arity(name, arity)),
            Some(_) if arity == 0 => return Err(self.wrong_arity(name, arity)),
            Some(found) => {
                return Err(self.error(ParseErrorKind::Expected {
                    expected: ')',
                    found,
                }));
            }
            None => return Err(self.error(ParseErrorKind::UnclosedParen)),
        }

        match (function, args) {
            (FunctionRef::Inlined(Intrinsic::Random), _) => {
                let dst = self.alloc.allocate()?;
                self.instructions.push(Instruction::Random(dst));
                Ok(dst)
            }
            (FunctionRef::Inlined(Intrinsic::Unary(op)), [Some(a), _]) => self.emit_unary(op, a),
            (FunctionRef::Inlined(Intrinsic::Binary(op)), [Some(a), Some(b)]) => {
                self.emit_binary(op, a, b)
            }
            (FunctionRef::Registered(NativeFunction::Nullary(f)), _) => {
                let dst = self.alloc.allocate()?;
                self.instructions.push(Instruction::Call0(dst, f.clone()));
                Ok(dst)
            }
            (FunctionRef::Registered(NativeFunction::Unary(f)), [Some(a), _]) => {
                let dst = self.target(&[a])?;
                self.instructions.push(Instruction::Call1(dst, a, f.clone()));
                self.release_except(dst, &[a]);
                Ok(dst)
            }
            (FunctionRef::Registered(NativeFunction::Binary(f)), [Some(a), Some(b)]) => {
                let dst = self.target(&[a, b])?;
                self.instructions.push(Instruction::Call2(dst, a, b, f.clone()));
                self.release_except(dst, &[a, b]);
                Ok(dst)
            }
            _ => unreachable!("argument slots are filled up to the arity"),
        }
    }

    fn wrong_arity(&self, name: &str, expected: usize) -> CompileError {
        self.error(ParseErrorKind::WrongArity {
            name: String::from(name),
            expected,
        })
    }

    fn emit_unary(&mut self, op: UnaryOp, src: Slot) -> Result<Slot> {
        let dst = self.target(&[src])?;
        self.instructions.push(Instruction::Unary(op, dst, src));
        Ok(dst)
    }

    fn emit_binary(&mut self, op: BinaryOp, lhs: Slot, rhs: Slot) -> Result<Slot> {
        let dst = self.target(&[lhs, rhs])?;
        self.instructions.push(Instruction::Binary(op, dst, lhs, rhs));
        self.release_except(dst, &[lhs, rhs]);
        Ok(dst)
    }

    /// Destination for an instruction reading `sources`: the first source
    /// that is a register, written in place, or a fresh register.
    fn target(&mut self, sources: &[Slot]) -> Result<Slot> {
        match sources.iter().copied().find(|&slot| self.alloc.owns(slot)) {
            Some(slot) => Ok(slot),
            None => Ok(self.alloc.allocate()?),
        }
    }

    /// Release every register in `sources` other than `dst`. Must run after
    /// the consuming instruction has been pushed.
    fn release_except(&mut self, dst: Slot, sources: &[Slot]) {
        for &slot in sources {
            if slot != dst {
                self.alloc.release(slot);
            }
        }
    }
}
