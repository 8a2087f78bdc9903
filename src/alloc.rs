//! Raw memory acquisition and in-place construction.
//!
//! [`Allocator`] is the surface an allocator provides: byte-level blocks plus in-place
//! construction and destruction, the latter two with defaults that most allocators keep.
//! Containers go through [`AllocatorTraits`], which every allocator gets for free and which
//! speaks in typed element counts.

use std::alloc::{self as heap, Layout};
use std::mem;
use std::ptr::{self, NonNull};

use crate::error::{AllocError, ContainerError};

/// Type used for element counts.
pub type SizeType = usize;

/// Type used for signed distances between positions.
pub type DifferenceType = isize;

/// A source of raw memory blocks.
///
/// # Safety
///
/// A block returned by `allocate` must be valid for reads and writes of `layout.size()` bytes,
/// aligned to `layout.align()`, and stay valid until it is passed back to `deallocate` with the
/// same layout. Copies of an allocator obtained through `Clone` must be able to free each other's
/// blocks.
///
/// An override of `construct` must leave `value` live in the slot, and an override of `destroy`
/// must drop the value in the slot exactly once.
pub unsafe trait Allocator {
    /// Acquires a block described by `layout`. `layout.size()` is never zero.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Releases a block previously returned by `allocate`.
    ///
    /// # Safety
    ///
    /// `ptr` must come from `allocate` on this allocator (or a clone of it) with the same
    /// `layout`, and must not have been released already.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Moves `value` into the raw slot.
    ///
    /// # Safety
    ///
    /// `slot` must be valid for writes and must not hold a live value, which would be leaked.
    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        ptr::write(slot.as_ptr(), value)
    }

    /// Runs the destructor of the value at `slot` without releasing its memory.
    ///
    /// # Safety
    ///
    /// `slot` must hold a live value, which is dead afterwards.
    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        ptr::drop_in_place(slot.as_ptr())
    }

    /// Upper bound on the size of a single block, in bytes.
    fn max_bytes(&self) -> usize {
        isize::MAX as usize
    }
}

/// The default allocator, backed by the global heap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Global;

unsafe impl Allocator for Global {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        debug_assert!(layout.size() != 0);
        // SAFETY: callers never request zero-sized layouts.
        NonNull::new(unsafe { heap::alloc(layout) }).ok_or(AllocError)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        heap::dealloc(ptr.as_ptr(), layout)
    }
}

unsafe impl<'a, A: Allocator + ?Sized> Allocator for &'a A {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        (**self).allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        (**self).deallocate(ptr, layout)
    }

    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        (**self).construct(slot, value)
    }

    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        (**self).destroy(slot)
    }

    fn max_bytes(&self) -> usize {
        (**self).max_bytes()
    }
}

/// Typed access to any [`Allocator`].
///
/// This is the uniform surface the containers are written against: blocks are measured in
/// elements. Construction and destruction come from the `Allocator` supertrait and happen in
/// place without touching the block itself.
pub trait AllocatorTraits: Allocator {
    /// Acquires a block sized for exactly `n` values of `T`.
    ///
    /// Empty requests (`n == 0`, or a zero-sized `T`) return a dangling block without calling
    /// the allocator; such a block must never be dereferenced.
    fn allocate_array<T>(&self, n: SizeType) -> Result<NonNull<T>, ContainerError> {
        let layout = array_layout::<T>(self, n)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }
        self.allocate(layout)
            .map(NonNull::cast)
            .map_err(|AllocError| ContainerError::AllocFailed {
                bytes: layout.size(),
            })
    }

    /// Releases a block obtained from [`allocate_array`](Self::allocate_array).
    ///
    /// # Safety
    ///
    /// `block` must come from `allocate_array::<T>(n)` on this allocator with the same `n`, and
    /// every value constructed in it must already have been destroyed or moved out.
    unsafe fn deallocate_array<T>(&self, block: NonNull<T>, n: SizeType) {
        let size = mem::size_of::<T>() * n;
        if size != 0 {
            let layout = Layout::from_size_align_unchecked(size, mem::align_of::<T>());
            self.deallocate(block.cast(), layout);
        }
    }

    /// Largest element count a single block of `T` may hold.
    fn max_size<T>(&self) -> SizeType {
        self.max_bytes() / mem::size_of::<T>().max(1)
    }
}

impl<A: Allocator + ?Sized> AllocatorTraits for A {}

fn array_layout<T>(alloc: &(impl AllocatorTraits + ?Sized), n: usize) -> Result<Layout, ContainerError> {
    let max = alloc.max_size::<T>();
    if n > max {
        return Err(ContainerError::CapacityOverflow { requested: n, max });
    }
    Layout::array::<T>(n).map_err(|_| ContainerError::CapacityOverflow { requested: n, max })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_length_blocks_are_dangling() {
        let block = Global.allocate_array::<u64>(0).unwrap();
        assert_eq!(block, NonNull::dangling());
        unsafe { Global.deallocate_array(block, 0) };
    }

    #[test]
    fn construct_then_destroy_runs_drop_once() {
        use std::rc::Rc;

        let tracker = Rc::new(());
        let block = Global.allocate_array::<Rc<()>>(3).unwrap();
        unsafe {
            for i in 0..3 {
                Global.construct(NonNull::new_unchecked(block.as_ptr().add(i)), tracker.clone());
            }
            assert_eq!(Rc::strong_count(&tracker), 4);
            for i in 0..3 {
                Global.destroy(NonNull::new_unchecked(block.as_ptr().add(i)));
            }
            Global.deallocate_array(block, 3);
        }
        assert_eq!(Rc::strong_count(&tracker), 1);
    }

    #[test]
    fn max_size_is_a_byte_ceiling() {
        assert_eq!(Global.max_size::<u8>(), isize::MAX as usize);
        assert_eq!(Global.max_size::<u64>(), isize::MAX as usize / 8);
        assert_eq!(Global.max_size::<()>(), isize::MAX as usize);
    }

    #[test]
    fn oversized_requests_overflow() {
        let n = Global.max_size::<u32>() + 1;
        assert_eq!(
            Global.allocate_array::<u32>(n),
            Err(ContainerError::CapacityOverflow { requested: n, max: n - 1 })
        );
    }

    #[test]
    fn references_forward_to_the_allocator() {
        let alloc = &Global;
        let block = alloc.allocate_array::<u16>(4).unwrap();
        unsafe { alloc.deallocate_array(block, 4) };
    }
}
