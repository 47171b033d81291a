//! xeval VM Instructions - Register Format
//!
//! This module defines the instruction set for xeval's register machine.
//!
//! # Instruction Format
//!
//! Every instruction names its destination first, then its sources:
//! ```text
//! ┌────────────┬────────┬──────────┬──────────┬──────────┐
//! │ Tag / op   │  dst   │  src a   │  src b   │ callable │
//! └────────────┴────────┴──────────┴──────────┴──────────┘
//! ```
//!
//! Operands are [`Slot`]s: pointers resolved at compile time to a register,
//! a constant, or a bound variable. The operand count is fixed by the
//! variant:
//!
//! | variant  | slots | callable |
//! |----------|-------|----------|
//! | `Random` | 1     | -        |
//! | `Unary`  | 2     | -        |
//! | `Binary` | 3     | -        |
//! | `Call0`  | 1     | `Fn0`    |
//! | `Call1`  | 2     | `Fn1`    |
//! | `Call2`  | 3     | `Fn2`    |
//!
//! # Design Principles
//!
//! - **Register-based**: no operand stack; every result goes to a slot
//! - **Straight-line**: no jumps; conditionals are data flow through
//!   comparison and logical operators
//! - **Parameterized ops**: unary and binary instructions carry their
//!   operation as a small enum (saves variants, keeps `match` flat)

use core::fmt;

use super::Slot;
use crate::registry::{Fn0, Fn1, Fn2, Native};

/// One-operand operations: negation and the inlined 1-ary math functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Floor,
    Abs,
    Sqrt,
    Sin,
    Cos,
    Tan,
    Atan,
    Log,
    Exp,
}

/// Two-operand operations: every infix operator plus the inlined 2-ary
/// math functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
    Shl,
    Shr,
    BitAnd,
    BitOr,
    BitXor,
    Atan2,
    Pow,
}

impl UnaryOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            UnaryOp::Neg => "NEG",
            UnaryOp::Floor => "FFLOOR",
            UnaryOp::Abs => "FABS",
            UnaryOp::Sqrt => "FSQRT",
            UnaryOp::Sin => "FSIN",
            UnaryOp::Cos => "FCOS",
            UnaryOp::Tan => "FTAN",
            UnaryOp::Atan => "FATAN",
            UnaryOp::Log => "FLOG",
            UnaryOp::Exp => "FEXP",
        }
    }
}

impl BinaryOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            BinaryOp::Add => "ADD",
            BinaryOp::Sub => "SUB",
            BinaryOp::Mul => "MUL",
            BinaryOp::Div => "DIV",
            BinaryOp::Lt => "LT",
            BinaryOp::Le => "LE",
            BinaryOp::Gt => "GT",
            BinaryOp::Ge => "GE",
            BinaryOp::Eq => "EQ",
            BinaryOp::Ne => "NE",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
            BinaryOp::Shl => "B_SHL",
            BinaryOp::Shr => "B_SHR",
            BinaryOp::BitAnd => "B_AND",
            BinaryOp::BitOr => "B_OR",
            BinaryOp::BitXor => "B_XOR",
            BinaryOp::Atan2 => "FATAN2",
            BinaryOp::Pow => "FPOW",
        }
    }
}

/// A single VM instruction.
///
/// The first slot of every variant is the destination.
#[derive(Clone)]
pub enum Instruction {
    /// `dst = uniform random value in [0, 1)`
    Random(Slot),

    /// `dst = op(src)`
    Unary(UnaryOp, Slot, Slot),

    /// `dst = op(lhs, rhs)`
    Binary(BinaryOp, Slot, Slot, Slot),

    /// `dst = f()`
    Call0(Slot, Native<Fn0>),

    /// `dst = f(a)`
    Call1(Slot, Slot, Native<Fn1>),

    /// `dst = f(a, b)`
    Call2(Slot, Slot, Slot, Native<Fn2>),
}

impl Instruction {
    /// Destination slot.
    pub fn target(&self) -> Slot {
        match self {
            Instruction::Random(dst)
            | Instruction::Unary(_, dst, _)
            | Instruction::Binary(_, dst, _, _)
            | Instruction::Call0(dst, _)
            | Instruction::Call1(dst, _, _)
            | Instruction::Call2(dst, _, _, _) => *dst,
        }
    }

    /// Source slots, in operand order.
    pub fn sources(&self) -> impl Iterator<Item = Slot> {
        let (a, b) = match self {
            Instruction::Random(_) | Instruction::Call0(..) => (None, None),
            Instruction::Unary(_, _, src) | Instruction::Call1(_, src, _) => (Some(*src), None),
            Instruction::Binary(_, _, lhs, rhs) | Instruction::Call2(_, lhs, rhs, _) => {
                (Some(*lhs), Some(*rhs))
            }
        };
        a.into_iter().chain(b)
    }

    /// Copy of this instruction with every slot passed through `map`.
    ///
    /// Used by [`Program`](super::Program)'s clone to re-point operands at
    /// freshly allocated buffers.
    pub(crate) fn map_slots(&self, mut map: impl FnMut(Slot) -> Slot) -> Instruction {
        match self {
            Instruction::Random(dst) => Instruction::Random(map(*dst)),
            Instruction::Unary(op, dst, src) => Instruction::Unary(*op, map(*dst), map(*src)),
            Instruction::Binary(op, dst, lhs, rhs) => {
                Instruction::Binary(*op, map(*dst), map(*lhs), map(*rhs))
            }
            Instruction::Call0(dst, f) => Instruction::Call0(map(*dst), f.clone()),
            Instruction::Call1(dst, a, f) => Instruction::Call1(map(*dst), map(*a), f.clone()),
            Instruction::Call2(dst, a, b, f) => {
                Instruction::Call2(map(*dst), map(*a), map(*b), f.clone())
            }
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::Random(_) => "FRANDOM",
            Instruction::Unary(op, ..) => op.mnemonic(),
            Instruction::Binary(op, ..) => op.mnemonic(),
            Instruction::Call0(..) => "FUNC0",
            Instruction::Call1(..) => "FUNC1",
            Instruction::Call2(..) => "FUNC2",
        }
    }
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Random(dst) => write!(f, "Random({:?})", dst),
            Instruction::Unary(op, dst, src) => write!(f, "{:?}({:?}, {:?})", op, dst, src),
            Instruction::Binary(op, dst, lhs, rhs) => {
                write!(f, "{:?}({:?}, {:?}, {:?})", op, dst, lhs, rhs)
            }
            Instruction::Call0(dst, func) => write!(f, "Call0({:?}, {})", dst, func.name()),
            Instruction::Call1(dst, a, func) => {
                write!(f, "Call1({:?}, {:?}, {})", dst, a, func.name())
            }
            Instruction::Call2(dst, a, b, func) => {
                write!(f, "Call2({:?}, {:?}, {:?}, {})", dst, a, b, func.name())
            }
        }
    }
}
