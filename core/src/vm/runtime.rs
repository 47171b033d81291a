use super::instruction_set::{BinaryOp, Instruction, UnaryOp};

/// Truncate to a machine integer the way the bitwise operators expect:
/// toward zero (saturating, NaN becomes 0), then wrapped to 32 bits.
#[inline(always)]
fn int(value: f64) -> i32 {
    value as i64 as i32
}

#[inline(always)]
fn truth(value: f64) -> bool {
    value != 0.0
}

#[inline(always)]
fn flag(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

#[inline(always)]
fn unary(op: UnaryOp, a: f64) -> f64 {
    match op {
        UnaryOp::Neg => -a,
        UnaryOp::Floor => a.floor(),
        UnaryOp::Abs => a.abs(),
        UnaryOp::Sqrt => a.sqrt(),
        UnaryOp::Sin => a.sin(),
        UnaryOp::Cos => a.cos(),
        UnaryOp::Tan => a.tan(),
        UnaryOp::Atan => a.atan(),
        UnaryOp::Log => a.ln(),
        UnaryOp::Exp => a.exp(),
    }
}

#[inline(always)]
fn binary(op: BinaryOp, a: f64, b: f64) -> f64 {
    match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Lt => flag(a < b),
        BinaryOp::Le => flag(a <= b),
        BinaryOp::Gt => flag(a > b),
        BinaryOp::Ge => flag(a >= b),
        BinaryOp::Eq => flag(a == b),
        BinaryOp::Ne => flag(a != b),
        BinaryOp::And => flag(truth(a) && truth(b)),
        BinaryOp::Or => flag(truth(a) || truth(b)),
        BinaryOp::Shl => int(a).wrapping_shl(int(b) as u32) as f64,
        BinaryOp::Shr => int(a).wrapping_shr(int(b) as u32) as f64,
        BinaryOp::BitAnd => (int(a) & int(b)) as f64,
        BinaryOp::BitOr => (int(a) | int(b)) as f64,
        BinaryOp::BitXor => (int(a) ^ int(b)) as f64,
        BinaryOp::Atan2 => a.atan2(b),
        BinaryOp::Pow => a.powf(b),
    }
}

/// Run every instruction once, in order.
///
/// Each instruction reads its sources before writing its destination, so a
/// destination may alias one of its own operands.
pub(crate) fn execute(instructions: &[Instruction]) {
    for instruction in instructions {
        use Instruction::*;
        match instruction {
            Random(dst) => dst.set(rand::random::<f64>()),
            Unary(op, dst, src) => dst.set(unary(*op, src.get())),
            Binary(op, dst, lhs, rhs) => dst.set(binary(*op, lhs.get(), rhs.get())),
            Call0(dst, f) => dst.set((f.func)()),
            Call1(dst, a, f) => dst.set((f.func)(a.get())),
            Call2(dst, a, b, f) => dst.set((f.func)(a.get(), b.get())),
        }
    }
}
