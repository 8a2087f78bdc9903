// A block of raw, possibly uninitialized slots behind a single owning handle.
//
// `RawBuf` only tracks the allocation: its pointer, how many slots it holds and which allocator
// it came from. Which slots hold live values is the owner's business; the owner must destroy or
// move out every live value before the buffer is dropped or reallocated past them.

use std::marker::PhantomData;
use std::ptr::{self, NonNull};

use tracing::trace;

use crate::alloc::{Allocator, AllocatorTraits, Global};
use crate::error::Result;

pub struct RawBuf<T, A: Allocator = Global> {
    ptr: NonNull<T>,
    cap: usize,
    alloc: A,
    _marker: PhantomData<T>,
}

unsafe impl<T: Send, A: Allocator + Send> Send for RawBuf<T, A> {}
unsafe impl<T: Sync, A: Allocator + Sync> Sync for RawBuf<T, A> {}

impl<T, A: Allocator> RawBuf<T, A> {
    pub const fn new_in(alloc: A) -> Self {
        RawBuf {
            ptr: NonNull::dangling(),
            cap: 0,
            alloc,
            _marker: PhantomData,
        }
    }

    pub fn ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Pointer to slot `idx`.
    ///
    /// # Safety
    ///
    /// `idx` must not exceed the capacity.
    pub unsafe fn slot(&self, idx: usize) -> NonNull<T> {
        debug_assert!(idx <= self.cap);
        NonNull::new_unchecked(self.ptr.as_ptr().add(idx))
    }

    /// Moves the first `len` values into a fresh block of exactly `new_cap` slots and releases the
    /// old block. On error nothing has changed.
    pub fn try_reallocate(&mut self, len: usize, new_cap: usize) -> Result<()> {
        debug_assert!(len <= self.cap && len <= new_cap);
        if new_cap == self.cap {
            return Ok(());
        }

        trace!(from = self.cap, to = new_cap, len, "reallocating block");
        let new_ptr = self.alloc.allocate_array::<T>(new_cap)?;
        unsafe {
            // The old slots are dead after this copy; only the block itself is released.
            ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr(), len);
            self.alloc.deallocate_array(self.ptr, self.cap);
        }
        self.ptr = new_ptr;
        self.cap = new_cap;
        Ok(())
    }

    pub fn reallocate(&mut self, len: usize, new_cap: usize) {
        if let Err(err) = self.try_reallocate(len, new_cap) {
            panic!("{err}");
        }
    }
}

impl<T, A: Allocator> Drop for RawBuf<T, A> {
    fn drop(&mut self) {
        unsafe {
            self.alloc.deallocate_array(self.ptr, self.cap);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reallocate_keeps_live_prefix() {
        let mut buf = RawBuf::<u32>::new_in(Global);
        buf.reallocate(0, 4);
        unsafe {
            for i in 0..3 {
                buf.alloc.construct(buf.slot(i), i as u32 * 7);
            }
        }
        buf.reallocate(3, 16);
        assert_eq!(buf.capacity(), 16);
        let live = unsafe { std::slice::from_raw_parts(buf.ptr(), 3) };
        assert_eq!(live, &[0, 7, 14]);
    }

    #[test]
    fn shrink_to_nothing_releases_block() {
        let mut buf = RawBuf::<String>::new_in(Global);
        buf.reallocate(0, 8);
        buf.reallocate(0, 0);
        assert_eq!(buf.capacity(), 0);
        assert_eq!(buf.ptr(), NonNull::<String>::dangling().as_ptr());
    }

    #[test]
    fn overflow_leaves_buffer_untouched() {
        let mut buf = RawBuf::<u64>::new_in(Global);
        buf.reallocate(0, 2);
        let before = buf.ptr();
        assert!(buf.try_reallocate(0, usize::MAX).is_err());
        assert_eq!(buf.ptr(), before);
        assert_eq!(buf.capacity(), 2);
    }
}
