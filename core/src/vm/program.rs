//! The compiled artifact.

use alloc::sync::Arc;

use crate::api::Variable;
use crate::vm::{Instruction, Scalar, Slot, runtime};
use crate::{String, Vec};

/// A compiled expression: instructions plus the storage they point into.
///
/// A program owns its register and constant buffers and holds a handle to
/// every variable it reads. Instructions reach all of them through resolved
/// [`Slot`] pointers, so evaluation is a flat loop with no lookups.
///
/// `Clone` produces an independent program: new register and constant
/// buffers, with every instruction re-pointed into them. Bound variables are
/// shared, not copied.
///
/// # Example
///
/// ```
/// use xeval_core::{Variables, parse};
///
/// let mut vars = Variables::new();
/// let x = vars.define("x", 2.0);
/// let program = parse("x * x + 1", &vars).unwrap();
/// assert_eq!(program.evaluate(), 5.0);
///
/// x.set(3.0);
/// assert_eq!(program.evaluate(), 10.0);
/// ```
pub struct Program {
    pub(crate) instructions: Vec<Instruction>,
    // Never pushed to after construction: slots point into these buffers.
    pub(crate) registers: Vec<Scalar>,
    pub(crate) constants: Vec<Scalar>,
    pub(crate) variables: Vec<(Arc<str>, Variable)>,
    pub(crate) result: Slot,
}

// SAFETY: every slot points into `registers` or `constants` (owned, moved
// together with the program, heap buffers never reallocated) or into a
// variable cell kept alive by `variables`. Variable cells are atomics and
// registered functions are `Send + Sync`, so handing the whole program to
// another thread is sound. `Program` is not `Sync`: two threads evaluating
// the same program would race on its registers.
unsafe impl Send for Program {}

impl Program {
    pub(crate) fn new(
        instructions: Vec<Instruction>,
        registers: Vec<Scalar>,
        constants: Vec<Scalar>,
        variables: Vec<(Arc<str>, Variable)>,
        result: Slot,
    ) -> Self {
        Self {
            instructions,
            registers,
            constants,
            variables,
            result,
        }
    }

    /// A program with no instructions that always evaluates to `value`.
    pub fn constant(value: f64) -> Self {
        let constants = Vec::from([Scalar::new(value)]);
        let result = Slot::of(&constants, 0);
        Self::new(Vec::new(), Vec::new(), constants, Vec::new(), result)
    }

    /// Run the program against the current values of its bound variables.
    #[inline]
    pub fn evaluate(&self) -> f64 {
        runtime::execute(&self.instructions);
        self.result.get()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn register_count(&self) -> usize {
        self.registers.len()
    }

    pub fn constant_count(&self) -> usize {
        self.constants.len()
    }

    /// Names of the variables this program reads, in first-use order.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|(name, _)| &**name)
    }

    /// Where `slot` lives, for diagnostics.
    pub(crate) fn locate(&self, slot: Slot) -> Location<'_> {
        if let Some(index) = slot.index_in(&self.registers) {
            Location::Register(index)
        } else if let Some(index) = slot.index_in(&self.constants) {
            Location::Constant(index, self.constants[index].get())
        } else if let Some((name, _)) = self.variables.iter().find(|(_, var)| var.slot() == slot) {
            Location::Variable(name)
        } else {
            Location::Unknown
        }
    }
}

/// Resolved storage location of a slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Location<'p> {
    Register(usize),
    Constant(usize, f64),
    Variable(&'p str),
    Unknown,
}

fn copy_buffer(buffer: &[Scalar]) -> Vec<Scalar> {
    buffer.iter().map(|cell| Scalar::new(cell.get())).collect()
}

impl Clone for Program {
    fn clone(&self) -> Self {
        let registers = copy_buffer(&self.registers);
        let constants = copy_buffer(&self.constants);

        let rebase = |slot: Slot| {
            if let Some(index) = slot.index_in(&self.registers) {
                Slot::of(&registers, index)
            } else if let Some(index) = slot.index_in(&self.constants) {
                Slot::of(&constants, index)
            } else {
                // Bound variable: shared with the original.
                slot
            }
        };

        let instructions = self
            .instructions
            .iter()
            .map(|instruction| instruction.map_slots(rebase))
            .collect();
        let result = rebase(self.result);

        Self::new(
            instructions,
            registers,
            constants,
            self.variables.clone(),
            result,
        )
    }
}

impl Default for Program {
    fn default() -> Self {
        Program::constant(0.0)
    }
}

impl From<f64> for Program {
    fn from(value: f64) -> Self {
        Program::constant(value)
    }
}

pub(crate) fn describe(location: Location<'_>) -> String {
    match location {
        Location::Register(index) => alloc::format!("r{}", index),
        Location::Constant(_, value) => alloc::format!("{}", value),
        Location::Variable(name) => String::from(name),
        Location::Unknown => String::from("?"),
    }
}
