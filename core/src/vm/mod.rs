mod disasm;
mod instruction_set;
mod program;
pub(crate) mod runtime;
mod slot;

pub use instruction_set::{BinaryOp, Instruction, UnaryOp};
pub use program::Program;
pub use slot::{Scalar, Slot};
