//! Text rendering of compiled programs.
//!
//! One line per instruction, `index: MNEMONIC(sources) -> destination`.
//! Registers print as `r<n>`, constants as their value and variables by
//! name. Calls to registered functions show the function name after the
//! mnemonic.

use core::fmt::{self, Write};

use super::program::describe;
use super::{Instruction, Program, Slot};
use crate::{String, Vec};

impl Program {
    /// Human-readable listing of the instructions.
    ///
    /// ```
    /// use xeval_core::{Variables, parse};
    ///
    /// let mut vars = Variables::new();
    /// vars.define("x", 1.0);
    /// let program = parse("(x + 1) * 3", &vars).unwrap();
    /// assert_eq!(program.disassemble(), "0: ADD(x, 1) -> r0\n1: MUL(r0, 3) -> r0\n");
    /// ```
    pub fn disassemble(&self) -> String {
        let mut out = String::new();
        for (index, instruction) in self.instructions.iter().enumerate() {
            // Writing into a String cannot fail.
            let _ = writeln!(out, "{}: {}", index, self.render(instruction));
        }
        out
    }

    fn slot_name(&self, slot: Slot) -> String {
        describe(self.locate(slot))
    }

    fn render(&self, instruction: &Instruction) -> String {
        let sources: Vec<String> = instruction
            .sources()
            .map(|slot| self.slot_name(slot))
            .collect();
        let callee = match instruction {
            Instruction::Call0(_, f) => Some(f.name()),
            Instruction::Call1(_, _, f) => Some(f.name()),
            Instruction::Call2(_, _, _, f) => Some(f.name()),
            _ => None,
        };
        let mut line = String::from(instruction.mnemonic());
        if let Some(name) = callee {
            line.push(' ');
            line.push_str(name);
        }
        let _ = write!(
            line,
            "({}) -> {}",
            sources.join(", "),
            self.slot_name(instruction.target())
        );
        line
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Program {{")?;
        writeln!(f, "  registers: {}", self.registers.len())?;

        if !self.constants.is_empty() {
            writeln!(f, "  constants: [")?;
            for (i, constant) in self.constants.iter().enumerate() {
                writeln!(f, "    [{}] = {}", i, constant.get())?;
            }
            writeln!(f, "  ]")?;
        } else {
            writeln!(f, "  constants: []")?;
        }

        let names: Vec<&str> = self.variables().collect();
        writeln!(f, "  variables: [{}]", names.join(", "))?;

        writeln!(f, "  instructions: [")?;
        for (addr, instruction) in self.instructions.iter().enumerate() {
            writeln!(f, "    {:4}  {}", addr, self.render(instruction))?;
        }
        writeln!(f, "  ]")?;
        writeln!(f, "  result: {}", self.slot_name(self.result))?;
        write!(f, "}}")
    }
}
