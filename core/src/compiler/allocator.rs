//! Register and constant allocation for one compile attempt.
//!
//! Slots handed out here are raw pointers that end up embedded in emitted
//! instructions, so neither buffer may reallocate while a compile attempt is
//! in flight. Both buffers are reserved up front; when a reservation runs
//! out the allocator reports [`Overflow`] and the compile driver starts over
//! with a larger one.

use crate::Vec;
use crate::vm::{Scalar, Slot};

/// A buffer reservation ran out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Overflow {
    Registers,
    Constants,
}

pub(crate) struct Allocator {
    registers: Vec<Scalar>,
    constants: Vec<Scalar>,
    /// Released registers, most recently released last.
    free: Vec<Slot>,
}

impl Allocator {
    pub(crate) fn new(register_capacity: usize, constant_capacity: usize) -> Self {
        Self {
            registers: Vec::with_capacity(register_capacity),
            constants: Vec::with_capacity(constant_capacity),
            free: Vec::new(),
        }
    }

    pub(crate) fn register_capacity(&self) -> usize {
        self.registers.capacity()
    }

    pub(crate) fn constant_capacity(&self) -> usize {
        self.constants.capacity()
    }

    /// A register for a scratch value, reusing the most recently released
    /// one when possible.
    pub(crate) fn allocate(&mut self) -> Result<Slot, Overflow> {
        if let Some(slot) = self.free.pop() {
            return Ok(slot);
        }
        if self.registers.len() == self.registers.capacity() {
            return Err(Overflow::Registers);
        }
        self.registers.push(Scalar::zero());
        Ok(Slot::of(&self.registers, self.registers.len() - 1))
    }

    /// Place a literal in the constant pool.
    pub(crate) fn constant(&mut self, value: f64) -> Result<Slot, Overflow> {
        if self.constants.len() == self.constants.capacity() {
            return Err(Overflow::Constants);
        }
        self.constants.push(Scalar::new(value));
        Ok(Slot::of(&self.constants, self.constants.len() - 1))
    }

    /// Whether `slot` is one of this allocator's registers.
    pub(crate) fn owns(&self, slot: Slot) -> bool {
        slot.index_in(&self.registers).is_some()
    }

    /// Return a register to the free list. Constants and variables are
    /// ignored.
    pub(crate) fn release(&mut self, slot: Slot) {
        if !self.owns(slot) {
            return;
        }
        debug_assert!(!self.free.contains(&slot), "register released twice");
        self.free.push(slot);
    }

    /// Number of registers currently handed out.
    #[cfg(test)]
    pub(crate) fn live(&self) -> usize {
        self.registers.len() - self.free.len()
    }

    /// Hand over both buffers. Slots stay valid: moving a `Vec` does not
    /// move its heap buffer.
    pub(crate) fn into_buffers(self) -> (Vec<Scalar>, Vec<Scalar>) {
        (self.registers, self.constants)
    }
}
