//! Storage cells and the resolved pointers that instructions use to reach them.
//!
//! Every value the interpreter touches lives in a [`Scalar`]: registers and
//! constants in the program's own buffers, bound variables in host-shared
//! cells. Instructions refer to them through [`Slot`], a raw pointer resolved
//! at compile time, so the dispatch loop never performs an indexed lookup.

use core::fmt;
use core::ptr::NonNull;
use core::sync::atomic::{AtomicU64, Ordering};

/// A single `f64` storage cell.
///
/// The value is kept as its bit pattern in an `AtomicU64` so that a host
/// thread may update a bound variable while another thread holds a program
/// that reads it. Relaxed ordering compiles to plain loads and stores.
#[repr(transparent)]
pub struct Scalar(AtomicU64);

impl Scalar {
    pub const fn zero() -> Self {
        Scalar(AtomicU64::new(0))
    }

    pub fn new(value: f64) -> Self {
        Scalar(AtomicU64::new(value.to_bits()))
    }

    #[inline(always)]
    pub fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline(always)]
    pub fn set(&self, value: f64) {
        self.0.store(value.to_bits(), Ordering::Relaxed)
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Scalar::zero()
    }
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Resolved operand: a pointer to a [`Scalar`] owned by a program's register
/// buffer, its constant buffer, or a bound variable the program keeps alive.
///
/// Slots are only created by the compiler and only dereferenced while the
/// owning [`Program`](super::Program) is alive; that is the invariant every
/// `unsafe` block in this module relies on.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot(NonNull<Scalar>);

impl Slot {
    /// Pointer to the `index`-th cell of `buffer`.
    ///
    /// The pointer is derived from `as_ptr`, which does not materialize a
    /// reference to the whole slice, so it stays valid across later pushes
    /// into the same vector as long as the vector does not reallocate.
    pub(crate) fn of(buffer: &[Scalar], index: usize) -> Slot {
        debug_assert!(index < buffer.len());
        // SAFETY: `index` is in bounds, so the pointer is non-null and aligned.
        let ptr = unsafe { buffer.as_ptr().add(index) };
        Slot(unsafe { NonNull::new_unchecked(ptr as *mut Scalar) })
    }

    pub(crate) fn to(cell: &Scalar) -> Slot {
        Slot(NonNull::from(cell))
    }

    #[inline(always)]
    pub(crate) fn get(self) -> f64 {
        // SAFETY: see the type-level invariant.
        unsafe { self.0.as_ref() }.get()
    }

    #[inline(always)]
    pub(crate) fn set(self, value: f64) {
        // SAFETY: see the type-level invariant. `Scalar` has interior
        // mutability, so writing through a shared reference is fine.
        unsafe { self.0.as_ref() }.set(value)
    }

    /// Index of this slot inside `buffer`, if it points into it.
    ///
    /// Works on plain addresses so it is well defined for pointers into
    /// unrelated allocations.
    pub(crate) fn index_in(self, buffer: &[Scalar]) -> Option<usize> {
        let base = buffer.as_ptr() as usize;
        let addr = self.0.as_ptr() as usize;
        let offset = addr.checked_sub(base)?;
        let index = offset / core::mem::size_of::<Scalar>();
        (offset % core::mem::size_of::<Scalar>() == 0 && index < buffer.len()).then_some(index)
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot({:p})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_round_trips_special_values() {
        let cell = Scalar::zero();
        for value in [1.5, -0.0, f64::INFINITY, f64::MIN_POSITIVE] {
            cell.set(value);
            assert_eq!(cell.get().to_bits(), value.to_bits());
        }
        cell.set(f64::NAN);
        assert!(cell.get().is_nan());
    }

    #[test]
    fn test_slot_index_in() {
        let buffer: Vec<Scalar> = (0..4).map(|i| Scalar::new(i as f64)).collect();
        let other: Vec<Scalar> = (0..2).map(|_| Scalar::zero()).collect();

        let slot = Slot::of(&buffer, 2);
        assert_eq!(slot.index_in(&buffer), Some(2));
        assert_eq!(slot.index_in(&other), None);
        assert_eq!(slot.get(), 2.0);

        slot.set(7.0);
        assert_eq!(buffer[2].get(), 7.0);
    }

    #[test]
    fn test_slot_survives_push_within_capacity() {
        let mut buffer: Vec<Scalar> = Vec::with_capacity(4);
        buffer.push(Scalar::new(1.0));
        let first = Slot::of(&buffer, 0);
        buffer.push(Scalar::new(2.0));
        buffer.push(Scalar::new(3.0));
        assert_eq!(first.get(), 1.0);
        assert_eq!(first.index_in(&buffer), Some(0));
    }
}
